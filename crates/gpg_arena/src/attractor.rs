//! The attractor kernel: standard, monotone (fatal), and safe attractors,
//! each a monotone least fixed point over the arena's vertex lattice (§4.2).

use log::trace;
use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;

use gpg_symbolic::FormatConfigSet;
use gpg_utilities::GpgError;

use crate::Arena;
use crate::Player;

/// The set of vertices from which `player` can force reaching `v`.
///
/// One round: `ExSucc = ∃vars_bis. (edges ∧ σ(X))`, `AllSucc = ¬∃vars_bis.
/// (edges ∧ ¬σ(X))`; `player`'s own vertices join via `ExSucc`, the
/// opponent's via `AllSucc`. Iterates `X ← X ∨ Step` to a fixed point.
pub fn attractor(arena: &Arena, v: &BDDFunction, player: Player) -> Result<BDDFunction, GpgError> {
    let mut x = v.clone();

    let (own_vertices, opponent_vertices) = match player {
        Player::Zero => (arena.player0_vertices(), arena.player1_vertices()),
        Player::One => (arena.player1_vertices(), arena.player0_vertices()),
    };

    loop {
        let x_bis = arena.to_bis(&x)?;
        let ex_succ = arena.exists_successor_in(&x_bis)?;
        let all_succ = arena.all_successors_in(&x_bis)?;

        let step = own_vertices.and(&ex_succ)?.or(&opponent_vertices.and(&all_succ)?)?;
        let next = x.or(&step)?;

        trace!("attractor({player}): |X| step, {}", FormatConfigSet(&next));
        if next == x {
            return Ok(x);
        }
        x = next;
    }
}

/// The monotone ("fatal") attractor for priority `priority` in dimension
/// `dim` (§4.2). A least fixed point where the target `v` is re-added as a
/// source every round (but not unconditionally part of the result), every
/// round is restricted to the vertices whose dimension-`dim` priority is `≤
/// priority`, and the forcing player is `player` — ordinarily `priority mod
/// 2`, but callers certifying a fatal attractor under inverted/complemented
/// priorities must pass the player the certificate is actually being built
/// for, matching `regular/generalizedBuchiSolver.py`'s `specific_player`
/// argument to the same call.
pub fn monotone_attractor(arena: &Arena, v: &BDDFunction, priority: usize, dim: usize, player: Player) -> Result<BDDFunction, GpgError> {
    let (own_vertices, opponent_vertices) = match player {
        Player::Zero => (arena.player0_vertices(), arena.player1_vertices()),
        Player::One => (arena.player1_vertices(), arena.player0_vertices()),
    };

    let mut le = arena.false_bdd().clone();
    for p in arena.priorities_in(dim) {
        if p <= priority {
            le = le.or(arena.priority_set(dim, p))?;
        }
    }

    let mut x = arena.false_bdd().clone();
    loop {
        let source = x.or(v)?;
        let source_bis = arena.to_bis(&source)?;
        let ex_succ = arena.exists_successor_in(&source_bis)?;
        let all_succ = arena.all_successors_in(&source_bis)?;

        let step = own_vertices.and(&ex_succ)?.or(&opponent_vertices.and(&all_succ)?)?;
        let next = x.or(&step)?.and(&le)?;

        if next == x {
            return Ok(x);
        }
        x = next;
    }
}

/// The standard attractor restricted to vertices outside `avoid` (§4.2):
/// each round's `Step` additionally conjoins with `¬avoid`.
pub fn safe_attractor(arena: &Arena, v: &BDDFunction, avoid: &BDDFunction, player: Player) -> Result<BDDFunction, GpgError> {
    let not_avoid = avoid.not()?;
    let mut x = v.and(&not_avoid)?;

    let (own_vertices, opponent_vertices) = match player {
        Player::Zero => (arena.player0_vertices(), arena.player1_vertices()),
        Player::One => (arena.player1_vertices(), arena.player0_vertices()),
    };

    loop {
        let x_bis = arena.to_bis(&x)?;
        let ex_succ = arena.exists_successor_in(&x_bis)?;
        let all_succ = arena.all_successors_in(&x_bis)?;

        let step = own_vertices.and(&ex_succ)?.or(&opponent_vertices.and(&all_succ)?)?;
        let next = x.or(&step.and(&not_avoid)?)?;

        if next == x {
            return Ok(x);
        }
        x = next;
    }
}

#[cfg(test)]
mod tests {
    use gpg_macros::gpg_test;

    use crate::Player;
    use crate::attractor;
    use crate::random_arena;
    use crate::recursive;

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_attractor_idempotent() {
        gpg_utilities::random_test(30, |rng| {
            let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
            let arena = random_arena(&manager_ref, rng, 12, 1, 4).unwrap();

            let target = arena.player0_vertices().clone();
            let once = attractor(&arena, &target, Player::Zero).unwrap();
            let twice = attractor(&arena, &once, Player::Zero).unwrap();

            assert_eq!(once, twice, "attractor should be idempotent once it has converged");
        });
    }

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_attractor_contains_target() {
        gpg_utilities::random_test(30, |rng| {
            let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
            let arena = random_arena(&manager_ref, rng, 12, 1, 4).unwrap();

            let target = arena.player0_vertices().clone();
            let a = attractor(&arena, &target, Player::Zero).unwrap();
            let missing = target.and(&a.not().unwrap()).unwrap();
            assert!(!missing.satisfiable(), "the attractor must contain its target set");
        });
    }

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_recursive_partition_on_random_arenas() {
        gpg_utilities::random_test(30, |rng| {
            let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
            let arena = random_arena(&manager_ref, rng, 15, 1, 4).unwrap();

            let (w0, w1) = recursive(&arena).unwrap();
            assert!(!w0.and(&w1).unwrap().satisfiable(), "W0 and W1 must be disjoint");
            assert_eq!(w0.or(&w1).unwrap(), arena.vertices().unwrap(), "W0 ∪ W1 must cover all vertices");
        });
    }
}
