use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use duct::cmd;
use itertools::Itertools;
use log::info;
use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;

use gpg_arena::Arena;
use gpg_arena::ArenaDot;
use gpg_arena::ParityGameFormat;
use gpg_arena::generalized_recursive;
use gpg_arena::generalized_recursive_with_psolver;
use gpg_arena::generalized_recursive_with_psolver_multiple_calls;
use gpg_arena::guess_format_from_extension;
use gpg_arena::read_gpg;
use gpg_arena::read_pg;
use gpg_arena::recursive;
use gpg_arena::recursive_with_buchi;
use gpg_arena::ziel_with_psolver;
use gpg_symbolic::CubeIterAll;
use gpg_tools::VerbosityFlag;
use gpg_utilities::GpgError;
use gpg_utilities::Timing;

/// Default node capacity for the Oxidd decision diagram manager.
const DEFAULT_OXIDD_NODE_CAPACITY: usize = 2048;

#[derive(clap::Parser, Debug)]
#[command(about = "Solve generalized parity game realizability", arg_required_else_help = true, version)]
struct Cli {
    #[command(flatten)]
    verbosity: VerbosityFlag,

    #[arg(long, global = true)]
    timings: bool,

    #[arg(long, global = true, default_value_t = 1)]
    oxidd_workers: u32,

    #[arg(long, global = true, default_value_t = DEFAULT_OXIDD_NODE_CAPACITY)]
    oxidd_node_capacity: usize,

    #[arg(long, global = true)]
    oxidd_cache_capacity: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Solve(SolveArgs),
    Display(DisplayArgs),
}

/// The recursion strategy used to solve a game (§6).
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum Algorithm {
    /// Full recursion, no partial solver.
    Rec,
    /// A single partial-solver call upfront, then full recursion on the remainder.
    Snl,
    /// The partial solver interleaved into every recursive call.
    Par,
}

/// The internal representation used to solve a game (§6). Only `Bdd` is
/// implemented; the others are reserved for a future explicit or
/// fully-symbolic representation.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum Representation {
    Bdd,
    Reg,
    Fbdd,
}

#[derive(clap::Args, Debug)]
struct SolveArgs {
    filename: String,

    /// The parity game file format; auto-detected from the extension if omitted.
    #[arg(long)]
    format: Option<ParityGameFormat>,

    /// The recursion strategy.
    #[arg(long, default_value = "par")]
    algorithm: Algorithm,

    /// The internal representation; only `bdd` is implemented.
    #[arg(long, default_value = "bdd")]
    representation: Representation,

    /// Print the winning-region membership of every vertex, not just the initial one.
    #[arg(long, default_value_t = false)]
    full_solution: bool,
}

#[derive(clap::Args, Debug)]
struct DisplayArgs {
    filename: String,

    /// The `.dot` file output path.
    output: String,

    /// The parity game file format; auto-detected from the extension if omitted.
    #[arg(long)]
    format: Option<ParityGameFormat>,
}

fn main() -> Result<ExitCode, GpgError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    let mut timing = Timing::new();

    let result = match &cli.command {
        Commands::Solve(args) => handle_solve(&cli, args, &mut timing),
        Commands::Display(args) => handle_display(&cli, args, &mut timing),
    };

    if cli.timings {
        timing.print();
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            log::error!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_arena(cli: &Cli, path: &Path, format: Option<ParityGameFormat>) -> Result<Arena, GpgError> {
    let format = guess_format_from_extension(path, format).ok_or("Unknown parity game file format.")?;
    let mut file = File::open(path)?;

    let manager_ref = oxidd::bdd::new_manager(
        cli.oxidd_node_capacity,
        cli.oxidd_cache_capacity.unwrap_or(cli.oxidd_node_capacity),
        cli.oxidd_workers,
    );

    match format {
        ParityGameFormat::Pg => read_pg(&mut file, &manager_ref),
        ParityGameFormat::Gpg => read_gpg(&mut file, &manager_ref),
    }
}

fn handle_solve(cli: &Cli, args: &SolveArgs, timing: &mut Timing) -> Result<(), GpgError> {
    if args.representation != Representation::Bdd {
        return Err(format!(
            "representation {:?} is not implemented; only `bdd` is supported",
            args.representation
        )
        .into());
    }

    let path = Path::new(&args.filename);

    let mut time_read = timing.start("read");
    let arena = load_arena(cli, path, args.format)?;
    time_read.finish();
    info!("Loaded arena with {} priority dimension(s)", arena.nbr_functions());

    let mut time_solve = timing.start("solve");
    let (w0, w1) = if arena.nbr_functions() == 1 {
        match args.algorithm {
            Algorithm::Rec => recursive(&arena)?,
            Algorithm::Snl => recursive_with_buchi(&arena)?,
            Algorithm::Par => ziel_with_psolver(&arena)?,
        }
    } else {
        match args.algorithm {
            Algorithm::Rec => generalized_recursive(&arena)?,
            Algorithm::Snl => generalized_recursive_with_psolver(&arena)?,
            Algorithm::Par => generalized_recursive_with_psolver_multiple_calls(&arena)?,
        }
    };
    time_solve.finish();
    info!("Solved using algorithm {:?}", args.algorithm);

    let initial = direct_encoding_of(&arena, 0)?;
    if initial.and(&w0)?.satisfiable() {
        println!("REALIZABLE");
    } else {
        println!("UNREALIZABLE");
    }

    if args.full_solution {
        println!("W0: {}", indices_in(&arena, &w0)?.iter().format(", "));
        println!("W1: {}", indices_in(&arena, &w1)?.iter().format(", "));
    }

    Ok(())
}

fn handle_display(cli: &Cli, args: &DisplayArgs, timing: &mut Timing) -> Result<(), GpgError> {
    let path = Path::new(&args.filename);

    let mut time_read = timing.start("read");
    let arena = load_arena(cli, path, args.format)?;
    time_read.finish();

    std::fs::write(&args.output, ArenaDot::new(&arena).to_string())?;

    if let Ok(dot_path) = which::which("dot") {
        info!("Generating PDF using dot...");
        cmd!(dot_path, "-Tpdf", &args.output, "-O").run()?;
    }

    Ok(())
}

fn direct_encoding_of(arena: &Arena, index: usize) -> Result<BDDFunction, GpgError> {
    let n = arena.vars().len();
    let manager_ref = arena.manager_ref();
    let true_bdd = manager_ref.with_manager_shared(|manager| BDDFunction::t(manager));

    let mut cube = true_bdd;
    for (bit, var) in arena.vars().iter().enumerate() {
        let set = (index >> (n - 1 - bit)) & 1 == 1;
        let literal = if set { var.clone() } else { var.not()? };
        cube = cube.and(&literal)?;
    }
    Ok(cube)
}

fn indices_in(arena: &Arena, w: &BDDFunction) -> Result<Vec<usize>, GpgError> {
    let entries: Vec<_> = CubeIterAll::new(arena.vars(), w).collect::<Result<_, _>>()?;
    Ok(entries
        .into_iter()
        .map(|(bits, _)| {
            let n = bits.len();
            let mut index = 0usize;
            for (bit, value) in bits.iter().enumerate() {
                if *value == oxidd::util::OptBool::True {
                    index |= 1 << (n - 1 - bit);
                }
            }
            index
        })
        .collect())
}
