//! Generalized PGSolver `.gpg` format: k-dimension parity games (§6).

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
    #[error("Invalid .gpg header: {0}")]
    InvalidHeader(&'static str),

    #[error("Invalid vertex line: {0}")]
    InvalidLine(&'static str),
}

/// Reads a k-dimension generalized parity game:
///
/// ```text
/// parity <max_index> <k>;
/// <index> <p_1,p_2,...,p_k> <owner> <succ1,succ2,...>;
/// ```
pub fn read_gpg(reader: impl Read, manager_ref: &BDDManagerRef) -> Result<Arena, GpgError> {
    info!("Reading generalized parity game in .gpg format...");

    let mut lines = std::io::BufReader::new(reader).lines();

    let header = lines
        .next()
        .ok_or(IOError::InvalidHeader("missing header line"))??;
    let header_regex = Regex::new(r#"parity\s+([0-9]+)\s+([0-9]+)\s*;"#).expect("regex compilation should not fail");
    let (_, [num_vertices_text, num_dimensions_text]) = header_regex
        .captures(&header)
        .ok_or(IOError::InvalidHeader("does not match parity <max_index> <k>;"))?
        .extract();
    let num_vertices: usize = num_vertices_text.parse::<usize>()? + 1;
    let num_dimensions: usize = num_dimensions_text.parse()?;

    let mut owner = vec![0u8; num_vertices];
    let mut priorities = vec![vec![0usize; num_vertices]; num_dimensions];
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
        let priority_field = parts
            .next()
            .ok_or(IOError::InvalidLine("expected <index> <p_1,...,p_k> ...;"))?;
        let vertex_owner: u8 = parts
            .next()
            .ok_or(IOError::InvalidLine("expected <index> <p_1,...,p_k> <owner> ...;"))?
            .parse()?;

        let values: Vec<usize> = priority_field
            .split(',')
            .map(|s| s.parse::<usize>())
            .collect::<Result<_, _>>()?;
        if values.len() != num_dimensions {
            return Err(IOError::InvalidLine("priority vector length does not match the header's dimension count").into());
        }
        for (dim, &p) in values.iter().enumerate() {
            priorities[dim][index] = p;
        }
        owner[index] = vertex_owner;

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

    build_arena(manager_ref, num_vertices, &owner, &priorities, &edges)
}

/// Writes `arena` to generalized `.gpg` format.
pub fn write_gpg(mut writer: impl Write, arena: &Arena) -> Result<(), GpgError> {
    info!("Writing generalized parity game to .gpg format...");

    let vertices = arena.vertices()?;
    let entries: Vec<_> = CubeIterAll::new(arena.vars(), &vertices).collect::<Result<_, _>>()?;

    let max_index = entries.iter().map(|(bits, _)| bits_to_index(bits)).max().unwrap_or(0);
    writeln!(writer, "parity {max_index} {};", arena.nbr_functions())?;

    for (bits, cube) in &entries {
        let index = bits_to_index(bits);
        let owner = if arena.player0_vertices().and(cube)?.satisfiable() { 0 } else { 1 };

        let priorities = (0..arena.nbr_functions())
            .map(|dim| {
                arena
                    .priorities_in(dim)
                    .find(|&p| cube.and(arena.priority_set(dim, p)).map(|r| r.satisfiable()).unwrap_or(false))
                    .unwrap_or(0)
            })
            .format(",");

        let successors_bdd = arena.edges().and(cube)?;
        let successor_indices: Vec<usize> = CubeIterAll::new(arena.vars_bis(), &successors_bdd)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(succ_bits, _)| bits_to_index(&succ_bits))
            .collect();

        writeln!(writer, "{index} {priorities} {owner} {};", successor_indices.iter().format(","))?;
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

    use crate::io_gpg::read_gpg;

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_read_gpg_two_dimension_instance() {
        // S4 from the test matrix: both vertices end up in W1.
        let input = b"parity 1 2;\n0 2,1 0 1;\n1 1,2 0 0;\n";
        let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
        let arena = read_gpg(&input[..], &manager_ref).unwrap();
        assert_eq!(arena.nbr_functions(), 2);
    }
}
