//! Random arena generation for property and fuzz tests (§8).

use std::collections::BTreeMap;

use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;
use oxidd::bdd::BDDManagerRef;
use rand::Rng;

use gpg_utilities::GpgError;

use crate::Arena;
use crate::Player;

pub(crate) fn direct_encoding(vars: &[BDDFunction], true_bdd: &BDDFunction, index: usize) -> Result<BDDFunction, GpgError> {
    let n = vars.len();
    let mut cube = true_bdd.clone();
    for (bit, var) in vars.iter().enumerate() {
        let set = (index >> (n - 1 - bit)) & 1 == 1;
        let literal = if set { var.clone() } else { var.not()? };
        cube = cube.and(&literal)?;
    }
    Ok(cube)
}

/// Generates a random arena with `num_vertices` vertices, `num_dimensions`
/// priority dimensions (each priority drawn from `0..max_priority`), and a
/// random outdegree in `[1, 4]` so every vertex has at least one outgoing
/// edge (no dead-ends, per §8's fuzz requirements).
///
/// Vertices are assigned the direct binary encoding (§3): vertex `i`'s cube
/// is its index's bits over `vars`, most-significant variable first.
pub fn random_arena(
    manager_ref: &BDDManagerRef,
    rng: &mut impl Rng,
    num_vertices: usize,
    num_dimensions: usize,
    max_priority: usize,
) -> Result<Arena, GpgError> {
    assert!(num_vertices > 0, "arena must have at least one vertex");
    assert!(num_dimensions > 0, "arena must have at least one priority dimension");
    assert!(max_priority > 0, "max_priority must be positive");

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
    for cube in &cubes {
        match Player::from_index(rng.random_range(0..2)) {
            Player::Zero => player0_vertices = player0_vertices.or(cube)?,
            Player::One => player1_vertices = player1_vertices.or(cube)?,
        }
    }

    let mut edges = false_bdd.clone();
    for (u, cube) in cubes.iter().enumerate() {
        let outdegree = rng.random_range(1..=4);
        for _ in 0..outdegree {
            let v = rng.random_range(0..num_vertices);
            edges = edges.or(&cube.and(&cubes_bis[v])?)?;
        }
    }

    let mut priorities = Vec::with_capacity(num_dimensions);
    for _ in 0..num_dimensions {
        let mut map: BTreeMap<usize, BDDFunction> = BTreeMap::new();
        for cube in &cubes {
            let p = rng.random_range(0..max_priority);
            let entry = map.entry(p).or_insert_with(|| false_bdd.clone());
            *entry = entry.or(cube)?;
        }
        priorities.push(map);
    }

    Arena::new(manager_ref.clone(), vars, vars_bis, player0_vertices, player1_vertices, edges, priorities)
}
