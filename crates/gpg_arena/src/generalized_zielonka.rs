//! Multi-dimension generalized-parity recursion (`disj_parity_win`, §4.7) and
//! its partial-solver-enhanced variants.

use std::collections::BTreeMap;

use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;

use gpg_utilities::GpgError;

use crate::Arena;
use crate::Player;
use crate::attractor;
use crate::generalized_buchi_partial_solver;
use crate::generalized_buchi_partial_solver_inverted_players;

/// Complements every dimension's priorities by adding one, then, per
/// dimension, adding one more to the (now possibly even) maximum so each
/// dimension's maximum is odd. Returns the complemented arena together with
/// the per-dimension maxima `M`.
fn complement_priorities(arena: &Arena) -> Result<(Arena, Vec<usize>), GpgError> {
    let mut priorities = Vec::with_capacity(arena.nbr_functions());
    let mut maxima = Vec::with_capacity(arena.nbr_functions());

    for dim in 0..arena.nbr_functions() {
        let mut map: BTreeMap<usize, BDDFunction> = BTreeMap::new();
        for p in arena.priorities_in(dim) {
            map.insert(p + 1, arena.priority_set(dim, p).clone());
        }

        let max = match map.keys().next_back().copied() {
            Some(max) => max,
            None => {
                priorities.push(map);
                maxima.push(0);
                continue;
            }
        };

        let max = if max % 2 == 0 {
            let set = map.remove(&max).expect("max key present");
            let bumped = max + 1;
            map.insert(bumped, set);
            bumped
        } else {
            max
        };

        priorities.push(map);
        maxima.push(max);
    }

    let complemented = Arena::new(
        arena.manager_ref().clone(),
        arena.vars().to_vec(),
        arena.vars_bis().to_vec(),
        arena.player0_vertices().clone(),
        arena.player1_vertices().clone(),
        arena.edges().clone(),
        priorities,
    )?;

    Ok((complemented, maxima))
}

/// Implements the conjunctive-parity algorithm over an arena whose
/// priorities have already been complemented so every dimension's maximum is
/// odd, with per-dimension maxima `m` (§4.7).
pub fn disj_parity_win(arena: &Arena, m: &[usize]) -> Result<(BDDFunction, BDDFunction), GpgError> {
    disj_parity_win_recurse(arena, m, false)
}

/// Runs [`generalized_buchi_partial_solver`] once upfront, then
/// [`disj_parity_win`] on the remainder, unioning the regions.
pub fn generalized_recursive_with_psolver(arena: &Arena) -> Result<(BDDFunction, BDDFunction), GpgError> {
    let (remaining, w0_partial, w1_partial) = generalized_buchi_partial_solver(arena)?;
    if remaining.is_empty()? {
        return Ok((w0_partial, w1_partial));
    }

    let (complemented, m) = complement_priorities(&remaining)?;
    let (w0_rest, w1_rest) = disj_parity_win(&complemented, &m)?;
    Ok((w0_rest.or(&w0_partial)?, w1_rest.or(&w1_partial)?))
}

/// Complements priorities once, then calls the inverted-players partial
/// solver at the entry of every recursive invocation of `disj_parity_win`.
pub fn generalized_recursive_with_psolver_multiple_calls(arena: &Arena) -> Result<(BDDFunction, BDDFunction), GpgError> {
    let (complemented, m) = complement_priorities(arena)?;
    disj_parity_win_recurse(&complemented, &m, true)
}

/// Complements priorities once, then runs the plain [`disj_parity_win`].
pub fn generalized_recursive(arena: &Arena) -> Result<(BDDFunction, BDDFunction), GpgError> {
    let (complemented, m) = complement_priorities(arena)?;
    disj_parity_win(&complemented, &m)
}

fn disj_parity_win_recurse(arena: &Arena, m: &[usize], use_psolver: bool) -> Result<(BDDFunction, BDDFunction), GpgError> {
    if use_psolver {
        let (remaining, w0_partial, w1_partial) = generalized_buchi_partial_solver_inverted_players(arena)?;
        if remaining.is_empty()? {
            return Ok((w0_partial, w1_partial));
        }
        let (w0, w1) = disj_parity_win_body(&remaining, m, use_psolver)?;
        return Ok((w0.or(&w0_partial)?, w1.or(&w1_partial)?));
    }

    disj_parity_win_body(arena, m, use_psolver)
}

fn disj_parity_win_body(arena: &Arena, m: &[usize], use_psolver: bool) -> Result<(BDDFunction, BDDFunction), GpgError> {
    if arena.is_empty()? || m.iter().all(|&mi| mi == 1) {
        return Ok((arena.vertices()?, arena.false_bdd().clone()));
    }

    let vertices = arena.vertices()?;

    for (i, &mi) in m.iter().enumerate() {
        if mi <= 1 {
            continue;
        }

        let a_odd = attractor(arena, arena.priority_set(i, mi), Player::Zero)?;
        let mut g1 = arena.subarena(&vertices.and(&a_odd.not()?)?)?;

        let a_even = attractor(&g1, g1.priority_set(i, mi - 1), Player::One)?;
        let mut h1 = g1.subarena(&g1.vertices()?.and(&a_even.not()?)?)?;

        let mut m_prime = m.to_vec();
        m_prime[i] = mi - 2;

        let mut w0_prime: BDDFunction;
        let mut w1_prime: BDDFunction;

        loop {
            let (w0, w1) = disj_parity_win_recurse(&h1, &m_prime, use_psolver)?;
            w0_prime = w0;
            w1_prime = w1;

            if g1.is_empty()? || w1_prime == h1.vertices()? {
                break;
            }

            let t = attractor(&g1, &w0_prime, Player::Zero)?;
            let g1_vertices = g1.vertices()?;
            g1 = g1.subarena(&g1_vertices.and(&t.not()?)?)?;

            let a_even2 = attractor(&g1, g1.priority_set(i, mi - 1), Player::One)?;
            h1 = g1.subarena(&g1.vertices()?.and(&a_even2.not()?)?)?;
        }

        if !g1.is_empty()? && w1_prime == h1.vertices()? {
            let b = attractor(arena, &g1.vertices()?, Player::One)?;
            let remaining = vertices.and(&b.not()?)?;
            let (w0_double, w1_double) = disj_parity_win_recurse(&arena.subarena(&remaining)?, m, use_psolver)?;
            return Ok((w0_double, b.or(&w1_double)?));
        }
    }

    Ok((vertices, arena.false_bdd().clone()))
}

#[cfg(test)]
mod tests {
    use gpg_macros::gpg_test;
    use oxidd::BooleanFunction;

    use crate::generalized_recursive;
    use crate::generalized_recursive_with_psolver;
    use crate::generalized_recursive_with_psolver_multiple_calls;
    use crate::random_arena;

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_generalized_variants_agree() {
        gpg_utilities::random_test(20, |rng| {
            let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
            let arena = random_arena(&manager_ref, rng, 10, 2, 3).unwrap();

            let (w0_rec, w1_rec) = generalized_recursive(&arena).unwrap();
            let (w0_ps, w1_ps) = generalized_recursive_with_psolver(&arena).unwrap();
            let (w0_mc, w1_mc) = generalized_recursive_with_psolver_multiple_calls(&arena).unwrap();

            assert_eq!(w0_rec, w0_ps, "psolver variant must agree on W0");
            assert_eq!(w1_rec, w1_ps);
            assert_eq!(w0_rec, w0_mc, "multiple-calls psolver variant must agree on W0");
            assert_eq!(w1_rec, w1_mc);
        });
    }

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_generalized_partition_covers_vertices() {
        gpg_utilities::random_test(20, |rng| {
            let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
            let arena = random_arena(&manager_ref, rng, 10, 3, 3).unwrap();

            let (w0, w1) = generalized_recursive(&arena).unwrap();
            assert!(!w0.and(&w1).unwrap().satisfiable());
            assert_eq!(w0.or(&w1).unwrap(), arena.vertices().unwrap());
        });
    }
}
