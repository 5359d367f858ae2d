use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;

use clap::ValueEnum;
use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;
use oxidd::bdd::BDDManagerRef;

use gpg_utilities::GpgError;

use crate::Arena;
use crate::Player;
use crate::random_arena::direct_encoding;

/// Specifies the on-disk parity game file format (§6).
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ParityGameFormat {
    /// Single-dimension PGSolver format.
    Pg,
    /// Generalized (k-dimension) PGSolver format.
    Gpg,
}

/// Guesses the parity game file format from the file extension (`.pg` vs
/// `.gpg`/`.vpg`), or uses `format` directly if already given.
pub fn guess_format_from_extension(path: &Path, format: Option<ParityGameFormat>) -> Option<ParityGameFormat> {
    if let Some(format) = format {
        return Some(format);
    }

    if path.extension() == Some(OsStr::new("pg")) {
        Some(ParityGameFormat::Pg)
    } else if path.extension() == Some(OsStr::new("gpg")) || path.extension() == Some(OsStr::new("vpg")) {
        Some(ParityGameFormat::Gpg)
    } else {
        None
    }
}

/// Builds an [`Arena`] from parsed PGSolver-style vertex data, assigning
/// each vertex index its direct binary encoding (§3). Shared by the `.pg`
/// and generalized `.pg` loaders.
pub(crate) fn build_arena(
    manager_ref: &BDDManagerRef,
    num_vertices: usize,
    owner: &[u8],
    priorities: &[Vec<usize>],
    edges: &[(usize, usize)],
) -> Result<Arena, GpgError> {
    let n = if num_vertices <= 1 {
        1
    } else {
        (usize::BITS - (num_vertices - 1).leading_zeros()).max(1)
    };

    let (vars, vars_bis) = Arena::declare_vertex_variables(manager_ref, n)?;
    let (false_bdd, true_bdd) =
        manager_ref.with_manager_shared(|manager| (BDDFunction::f(manager), BDDFunction::t(manager)));

    let cubes: Vec<BDDFunction> = (0..num_vertices)
        .map(|i| direct_encoding(&vars, &true_bdd, i))
        .collect::<Result<_, _>>()?;
    let cubes_bis: Vec<BDDFunction> = (0..num_vertices)
        .map(|i| direct_encoding(&vars_bis, &true_bdd, i))
        .collect::<Result<_, _>>()?;

    let mut player0_vertices = false_bdd.clone();
    let mut player1_vertices = false_bdd.clone();
    for (i, cube) in cubes.iter().enumerate() {
        match Player::from_index(owner[i]) {
            Player::Zero => player0_vertices = player0_vertices.or(cube)?,
            Player::One => player1_vertices = player1_vertices.or(cube)?,
        }
    }

    let mut edges_bdd = false_bdd.clone();
    for &(u, v) in edges {
        edges_bdd = edges_bdd.or(&cubes[u].and(&cubes_bis[v])?)?;
    }

    let mut priority_maps = Vec::with_capacity(priorities.len());
    for dim_priorities in priorities {
        let mut map: BTreeMap<usize, BDDFunction> = BTreeMap::new();
        for (i, &p) in dim_priorities.iter().enumerate() {
            let entry = map.entry(p).or_insert_with(|| false_bdd.clone());
            *entry = entry.or(&cubes[i])?;
        }
        priority_maps.push(map);
    }

    Arena::new(manager_ref.clone(), vars, vars_bis, player0_vertices, player1_vertices, edges_bdd, priority_maps)
}
