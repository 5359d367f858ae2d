//! PGSolver `.pg` format: single-dimension parity games (§6).

use std::io::BufRead;
use std::io::Read;
use std::io::Write;

use itertools::Itertools;
use log::info;
use oxidd::BooleanFunction;
use oxidd::bdd::BDDManagerRef;
use oxidd::util::OptBool;
use regex::Regex;
use thiserror::Error;

use gpg_symbolic::CubeIterAll;
use gpg_utilities::GpgError;

use crate::Arena;
use crate::io::build_arena;

#[derive(Error, Debug)]
pub enum IOError {
    #[error("Invalid .pg header: {0}")]
    InvalidHeader(&'static str),

    #[error("Invalid vertex line: {0}")]
    InvalidLine(&'static str),
}

/// Reads a single-dimension parity game in PGSolver `.pg` format:
///
/// ```text
/// parity <max_index>;
/// <index> <priority> <owner> <succ1,succ2,...>;
/// ```
pub fn read_pg(reader: impl Read, manager_ref: &BDDManagerRef) -> Result<Arena, GpgError> {
    info!("Reading parity game in .pg format...");

    let mut lines = std::io::BufReader::new(reader).lines();

    let header = lines
        .next()
        .ok_or(IOError::InvalidHeader("missing header line"))??;
    let header_regex = Regex::new(r#"parity\s+([0-9]+)\s*;"#).expect("regex compilation should not fail");
    let (_, [num_vertices_text]) = header_regex
        .captures(&header)
        .ok_or(IOError::InvalidHeader("does not match parity <max_index>;"))?
        .extract();
    let num_vertices: usize = num_vertices_text.parse::<usize>()? + 1;

    let mut owner = vec![0u8; num_vertices];
    let mut priority = vec![0usize; num_vertices];
    let mut edges = Vec::new();

    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let index: usize = parts
            .next()
            .ok_or(IOError::InvalidLine("expected <index> ...;"))?
            .parse()?;
        let vertex_priority: usize = parts
            .next()
            .ok_or(IOError::InvalidLine("expected <index> <priority> ...;"))?
            .parse()?;
        let vertex_owner: u8 = parts
            .next()
            .ok_or(IOError::InvalidLine("expected <index> <priority> <owner> ...;"))?
            .parse()?;

        owner[index] = vertex_owner;
        priority[index] = vertex_priority;

        for successors in parts {
            for successor in successors
                .trim_end_matches(';')
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().parse::<usize>())
            {
                edges.push((index, successor?));
            }
        }
    }

    build_arena(manager_ref, num_vertices, &owner, std::slice::from_ref(&priority), &edges)
}

/// Writes `arena`'s dimension-0 priorities to `.pg` format. Vertex indices
/// are recovered from the direct binary encoding of `arena.vars()`.
pub fn write_pg(mut writer: impl Write, arena: &Arena) -> Result<(), GpgError> {
    info!("Writing parity game to .pg format...");

    let vertices = arena.vertices()?;
    let entries: Vec<_> = CubeIterAll::new(arena.vars(), &vertices).collect::<Result<_, _>>()?;

    let max_index = entries
        .iter()
        .map(|(bits, _)| bits_to_index(bits))
        .max()
        .unwrap_or(0);
    writeln!(writer, "parity {max_index};")?;

    for (bits, cube) in &entries {
        let index = bits_to_index(bits);
        let owner = if arena.player0_vertices().and(cube)?.satisfiable() { 0 } else { 1 };
        let priority = arena
            .priorities_in(0)
            .find(|&p| cube.and(arena.priority_set(0, p)).map(|r| r.satisfiable()).unwrap_or(false))
            .unwrap_or(0);

        let successors_bdd = arena.edges().and(cube)?;
        let successor_indices: Vec<usize> = CubeIterAll::new(arena.vars_bis(), &successors_bdd)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(succ_bits, _)| bits_to_index(&succ_bits))
            .collect();

        writeln!(writer, "{index} {priority} {owner} {};", successor_indices.iter().format(","))?;
    }

    Ok(())
}

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

#[cfg(test)]
mod tests {
    use gpg_macros::gpg_test;

    use crate::io_pg::read_pg;

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_read_pg_small_instance() {
        // S1 from the test matrix: a 3-vertex cycle, all realizable for Player 0.
        let input = b"parity 2;\n0 1 0 1;\n1 2 1 0,2;\n2 0 0 2;\n";
        let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
        let arena = read_pg(&input[..], &manager_ref).unwrap();
        assert_eq!(arena.nbr_functions(), 1);

        use oxidd::BooleanFunction;
        assert!(!arena.is_empty().unwrap());
        assert!(!arena.player0_vertices().and(arena.player1_vertices()).unwrap().satisfiable());
    }
}
