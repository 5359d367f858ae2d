//! Generalized-Büchi-∩-safety solving and the lattice-traversal partial
//! solver built on top of it (§4.4, §4.5).

use log::debug;
use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;

use gpg_utilities::GpgError;

use crate::Arena;
use crate::Player;
use crate::attractor;
use crate::safe_attractor;

/// Vertices from which Player 0 can, while avoiding `avoid`, visit every
/// `targets[i]` infinitely often (§4.4).
///
/// Repeatedly looks for a dimension whose safe attractor to its target
/// misses some vertex, attracts Player 1 to the complement, and restricts to
/// the remainder; stops when every dimension's safe attractor covers the
/// whole (shrunk) arena.
pub fn generalized_buchi_inter_safety(arena: &Arena, targets: &[BDDFunction], avoid: &BDDFunction) -> Result<BDDFunction, GpgError> {
    let mut current = arena.clone();

    loop {
        let vertices = current.vertices()?;
        if vertices == *current.false_bdd() {
            return Ok(current.false_bdd().clone());
        }

        let mut shrunk = None;
        for target in targets {
            let y = safe_attractor(&current, target, avoid, Player::Zero)?;
            let s = vertices.and(&y.not()?)?;
            if s.satisfiable() {
                let d = attractor(&current, &s, Player::One)?;
                let remaining = vertices.and(&d.not()?)?;
                current = current.subarena(&remaining)?;
                shrunk = Some(());
                break;
            }
        }

        if shrunk.is_none() {
            return Ok(vertices);
        }
    }
}

/// Uses the Büchi partial solver's structure but traverses a lattice of
/// even-priority vectors across all dimensions (§4.5).
pub fn generalized_buchi_partial_solver(arena: &Arena) -> Result<(Arena, BDDFunction, BDDFunction), GpgError> {
    generalized_buchi_partial_solver_impl(arena, false)
}

/// The polarity-swapped variant used after priorities have been complemented
/// (§4.5): treats odd priority-vectors as winning for Player 0 and recurses
/// through even-priority fatal attractors first.
pub fn generalized_buchi_partial_solver_inverted_players(arena: &Arena) -> Result<(Arena, BDDFunction, BDDFunction), GpgError> {
    generalized_buchi_partial_solver_impl(arena, true)
}

fn generalized_buchi_partial_solver_impl(arena: &Arena, inverted: bool) -> Result<(Arena, BDDFunction, BDDFunction), GpgError> {
    let mut current = arena.clone();
    let mut w0 = arena.false_bdd().clone();
    let mut w1 = arena.false_bdd().clone();

    let k = arena.nbr_functions();
    let good_parity = |p: usize| if inverted { p % 2 == 1 } else { p % 2 == 0 };
    let dominant_player = if inverted { Player::One } else { Player::Zero };

    'restart: loop {
        if current.is_empty()? {
            return Ok((current, w0, w1));
        }

        // Base case: if some dimension has no priority of the "good" parity, that
        // dimension is dominated by the opponent and wins the whole arena.
        for dim in 0..k {
            if !current.priorities_in(dim).any(good_parity) {
                let all = current.vertices()?;
                match dominant_player.opponent() {
                    Player::Zero => w0 = w0.or(&all)?,
                    Player::One => w1 = w1.or(&all)?,
                }
                return Ok((current.subarena(current.false_bdd())?, w0, w1));
            }
        }

        // Per-dimension fatal attractors on the "bad" parity, ascending, mirroring §4.3.
        for dim in 0..k {
            for p in current.priorities_in(dim).collect::<Vec<_>>() {
                if good_parity(p) {
                    continue;
                }

                let owner = if inverted {
                    Player::from_priority(p).opponent()
                } else {
                    Player::from_priority(p)
                };

                let mut t = current.priority_set(dim, p).and(&current.vertices()?)?;
                loop {
                    if t == *current.false_bdd() {
                        break;
                    }

                    let m = crate::monotone_attractor(&current, &t, p, dim, owner)?;
                    if t.and(&m.not()?)?.satisfiable() {
                        let shrunk = t.and(&m)?;
                        if shrunk == t {
                            break;
                        }
                        t = shrunk;
                        continue;
                    }

                    let r = attractor(&current, &m, owner)?;
                    debug!("generalized_buchi_partial_solver: fatal attractor for {owner} at dim {dim}, priority {p}");

                    match owner {
                        Player::Zero => w0 = w0.or(&r)?,
                        Player::One => w1 = w1.or(&r)?,
                    }

                    let remaining = current.vertices()?.and(&r.not()?)?;
                    current = current.subarena(&remaining)?;
                    continue 'restart;
                }
            }
        }

        // Traverse even-priority (resp. odd, if inverted) k-tuples in increasing depth.
        let good_priorities: Vec<Vec<usize>> = (0..k)
            .map(|dim| current.priorities_in(dim).filter(|p| good_parity(*p)).collect())
            .collect();

        let mut tuples: Vec<Vec<usize>> = vec![vec![]];
        for options in &good_priorities {
            let mut next = Vec::new();
            for prefix in &tuples {
                for &p in options {
                    let mut extended = prefix.clone();
                    extended.push(p);
                    next.push(extended);
                }
            }
            tuples = next;
        }
        tuples.sort_by_key(|tuple| tuple.iter().sum::<usize>());

        for tuple in tuples {
            let mut targets = Vec::with_capacity(k);
            for (dim, &q) in tuple.iter().enumerate() {
                targets.push(current.priority_set(dim, q).clone());
            }

            let mut avoid = current.false_bdd().clone();
            for dim in 0..k {
                for p in current.priorities_in(dim) {
                    if !good_parity(p) && p > tuple[dim] {
                        avoid = avoid.or(current.priority_set(dim, p))?;
                    }
                }
            }

            let winning = generalized_buchi_inter_safety(&current, &targets, &avoid)?;
            if winning.satisfiable() {
                let region = attractor(&current, &winning, dominant_player)?;
                match dominant_player {
                    Player::Zero => w0 = w0.or(&region)?,
                    Player::One => w1 = w1.or(&region)?,
                }

                let remaining = current.vertices()?.and(&region.not()?)?;
                current = current.subarena(&remaining)?;
                continue 'restart;
            }
        }

        return Ok((current, w0, w1));
    }
}

#[cfg(test)]
mod tests {
    use gpg_macros::gpg_test;
    use oxidd::BooleanFunction;

    use crate::generalized_buchi_partial_solver;
    use crate::random_arena;

    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn test_generalized_partial_solver_sound_disjoint() {
        gpg_utilities::random_test(30, |rng| {
            let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
            let arena = random_arena(&manager_ref, rng, 14, 2, 4).unwrap();

            let (remaining, w0, w1) = generalized_buchi_partial_solver(&arena).unwrap();
            assert!(!w0.and(&w1).unwrap().satisfiable(), "partial regions must be disjoint");

            let remaining_vertices = remaining.vertices().unwrap();
            assert!(!remaining_vertices.and(&w0).unwrap().satisfiable());
            assert!(!remaining_vertices.and(&w1).unwrap().satisfiable());
        });
    }
}
