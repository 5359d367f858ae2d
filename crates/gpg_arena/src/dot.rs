//! Graphviz `.dot` rendering of an arena, optionally colored by winning
//! region (§6 `display` subcommand).

use std::fmt;

use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;
use oxidd::util::OptBool;

use gpg_symbolic::CubeIterAll;

use crate::Arena;

fn bits_to_index(bits: &[OptBool]) -> usize {
    let n = bits.len();
    let mut index = 0usize;
    for (bit, value) in bits.iter().enumerate() {
        if *value == OptBool::True {
            index |= 1 << (n - 1 - bit);
        }
    }
    index
}

/// Renders an [`Arena`] (optionally with a solved partition) as a Graphviz
/// `.dot` digraph, one node per vertex (labeled with its per-dimension
/// priority vector and index) and one edge per transition.
pub struct ArenaDot<'a> {
    arena: &'a Arena,
    winning: Option<(&'a BDDFunction, &'a BDDFunction)>,
}

impl<'a> ArenaDot<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self { arena, winning: None }
    }

    /// Colors vertices in `w0` green and vertices in `w1` red.
    pub fn with_winning_regions(arena: &'a Arena, w0: &'a BDDFunction, w1: &'a BDDFunction) -> Self {
        Self {
            arena,
            winning: Some((w0, w1)),
        }
    }
}

impl fmt::Display for ArenaDot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph arena {{")?;
        writeln!(f, "  rankdir=LR;")?;
        writeln!(f, "  graph [fontname=\"DejaVu Sans\", splines=true];")?;
        writeln!(f, "  node [fontname=\"DejaVu Sans\"];")?;
        writeln!(
            f,
            "  edge [fontname=\"DejaVu Sans\", color=\"#444444\", arrowsize=0.9, penwidth=1.2];"
        )?;

        let vertices = self.arena.vertices().map_err(|_| fmt::Error)?;
        let entries: Vec<(Vec<OptBool>, BDDFunction)> = CubeIterAll::new(self.arena.vars(), &vertices)
            .collect::<Result<_, _>>()
            .map_err(|_| fmt::Error)?;

        for (bits, cube) in &entries {
            let index = bits_to_index(bits);
            let orientation = if self.arena.player0_vertices().and(cube).map_err(|_| fmt::Error)?.satisfiable() {
                "45"
            } else {
                "0"
            };

            let priorities = (0..self.arena.nbr_functions())
                .map(|dim| {
                    self.arena
                        .priorities_in(dim)
                        .find(|&p| cube.and(self.arena.priority_set(dim, p)).map(|r| r.satisfiable()).unwrap_or(false))
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "?".to_string())
                })
                .collect::<Vec<_>>()
                .join(",");

            let color = match self.winning {
                Some((w0, _)) if w0.and(cube).map(|r| r.satisfiable()).unwrap_or(false) => ", style=filled, fillcolor=\"#c8e6c9\"",
                Some((_, w1)) if w1.and(cube).map(|r| r.satisfiable()).unwrap_or(false) => ", style=filled, fillcolor=\"#ffcdd2\"",
                _ => "",
            };

            writeln!(
                f,
                "  v{index} [label=\"({priorities})\", shape=square, orientation={orientation}, xlabel=< <FONT POINT-SIZE=\"9\">v{index}</FONT> >{color}];"
            )?;
        }

        for (bits, cube) in &entries {
            let index = bits_to_index(bits);
            let successors_bdd = self.arena.edges().and(cube).map_err(|_| fmt::Error)?;
            for (succ_bits, _) in CubeIterAll::new(self.arena.vars_bis(), &successors_bdd)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| fmt::Error)?
            {
                let succ_index = bits_to_index(&succ_bits);
                writeln!(f, "  v{index} -> v{succ_index};")?;
            }
        }

        writeln!(f, "}}")
    }
}
