//! Single-dimension Zielonka recursion and its Büchi-accelerated variants (§4.6).

use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;

use gpg_utilities::GpgError;

use crate::Arena;
use crate::Player;
use crate::attractor;
use crate::buchi_partial_solver;

/// Solves a single-dimension parity game by Zielonka's classical recursive
/// algorithm, operating on dimension 0 of `arena`.
pub fn recursive(arena: &Arena) -> Result<(BDDFunction, BDDFunction), GpgError> {
    if arena.is_empty()? {
        return Ok((arena.false_bdd().clone(), arena.false_bdd().clone()));
    }

    let d = arena.max_priority(0).expect("non-empty arena has a maximum priority");
    let owner = Player::from_priority(d);
    let opponent = owner.opponent();

    let u = arena.priority_set(0, d).clone();
    let a = attractor(arena, &u, owner)?;

    let remaining = arena.vertices()?.and(&a.not()?)?;
    let (w0_sub, w1_sub) = recursive(&arena.subarena(&remaining)?)?;
    let (w_owner_sub, w_opp_sub) = match owner {
        Player::Zero => (w0_sub, w1_sub),
        Player::One => (w1_sub, w0_sub),
    };

    if w_opp_sub == *arena.false_bdd() {
        let all = arena.vertices()?;
        return Ok(match owner {
            Player::Zero => (all, arena.false_bdd().clone()),
            Player::One => (arena.false_bdd().clone(), all),
        });
    }

    let b = attractor(arena, &w_opp_sub, opponent)?;
    let remaining2 = arena.vertices()?.and(&b.not()?)?;
    let (w0_sub2, w1_sub2) = recursive(&arena.subarena(&remaining2)?)?;
    let (w_owner_sub2, w_opp_sub2) = match owner {
        Player::Zero => (w0_sub2, w1_sub2),
        Player::One => (w1_sub2, w0_sub2),
    };

    let w_opp = b.or(&w_opp_sub2)?;
    let w_owner = w_owner_sub2;

    Ok(match owner {
        Player::Zero => (w_owner, w_opp),
        Player::One => (w_opp, w_owner),
    })
}

/// Runs the fatal-attractor partial solver once, then falls back to
/// [`recursive`] on the remainder, unioning the regions (§4.6).
pub fn recursive_with_buchi(arena: &Arena) -> Result<(BDDFunction, BDDFunction), GpgError> {
    let (remaining, w0_partial, w1_partial) = buchi_partial_solver(arena)?;
    let (w0_rest, w1_rest) = recursive(&remaining)?;
    Ok((w0_partial.or(&w0_rest)?, w1_partial.or(&w1_rest)?))
}

/// Interleaves the fatal-attractor partial solver at the entry of every
/// recursive invocation ("ziel with partial solver", §4.6).
pub fn ziel_with_psolver(arena: &Arena) -> Result<(BDDFunction, BDDFunction), GpgError> {
    let (remaining, w0_partial, w1_partial) = buchi_partial_solver(arena)?;

    if remaining.is_empty()? {
        return Ok((w0_partial, w1_partial));
    }

    let d = remaining.max_priority(0).expect("non-empty arena has a maximum priority");
    let owner = Player::from_priority(d);
    let opponent = owner.opponent();

    let u = remaining.priority_set(0, d).clone();
    let a = attractor(&remaining, &u, owner)?;

    let vertices = remaining.vertices()?;
    let rest = vertices.and(&a.not()?)?;
    let (w0_sub, w1_sub) = ziel_with_psolver(&remaining.subarena(&rest)?)?;
    let (w_owner_sub, w_opp_sub) = match owner {
        Player::Zero => (w0_sub, w1_sub),
        Player::One => (w1_sub, w0_sub),
    };

    let (w_owner, w_opp) = if w_opp_sub == *remaining.false_bdd() {
        match owner {
            Player::Zero => (vertices, remaining.false_bdd().clone()),
            Player::One => (remaining.false_bdd().clone(), vertices),
        }
    } else {
        let b = attractor(&remaining, &w_opp_sub, opponent)?;
        let rest2 = vertices.and(&b.not()?)?;
        let (w0_sub2, w1_sub2) = ziel_with_psolver(&remaining.subarena(&rest2)?)?;
        let (w_owner_sub2, w_opp_sub2) = match owner {
            Player::Zero => (w0_sub2, w1_sub2),
            Player::One => (w1_sub2, w0_sub2),
        };
        (w_owner_sub2, b.or(&w_opp_sub2)?)
    };

    let (w0, w1) = match owner {
        Player::Zero => (w_owner, w_opp),
        Player::One => (w_opp, w_owner),
    };

    Ok((w0.or(&w0_partial)?, w1.or(&w1_partial)?))
}

#[cfg(test)]
mod tests {
    use gpg_macros::gpg_test;

    use crate::random_arena;
    use crate::recursive;
    use crate::recursive_with_buchi;
    use crate::ziel_with_psolver;

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_variants_agree() {
        gpg_utilities::random_test(30, |rng| {
            let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
            let arena = random_arena(&manager_ref, rng, 13, 1, 5).unwrap();

            let (w0_rec, w1_rec) = recursive(&arena).unwrap();
            let (w0_buchi, w1_buchi) = recursive_with_buchi(&arena).unwrap();
            let (w0_ps, w1_ps) = ziel_with_psolver(&arena).unwrap();

            assert_eq!(w0_rec, w0_buchi, "recursive_with_buchi must agree with recursive on W0");
            assert_eq!(w1_rec, w1_buchi);
            assert_eq!(w0_rec, w0_ps, "ziel_with_psolver must agree with recursive on W0");
            assert_eq!(w1_rec, w1_ps);
        });
    }

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_partition_covers_vertices() {
        use oxidd::BooleanFunction;

        gpg_utilities::random_test(30, |rng| {
            let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
            let arena = random_arena(&manager_ref, rng, 10, 1, 4).unwrap();

            let (w0, w1) = recursive(&arena).unwrap();
            assert!(!w0.and(&w1).unwrap().satisfiable());
            assert_eq!(w0.or(&w1).unwrap(), arena.vertices().unwrap());
        });
    }
}
