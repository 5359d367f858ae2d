//! Fatal-attractor partial solver for a single priority dimension (§4.3).

use log::debug;
use oxidd::BooleanFunction;
use oxidd::bdd::BDDFunction;

use gpg_utilities::GpgError;

use crate::Arena;
use crate::Player;
use crate::attractor;
use crate::monotone_attractor;

/// Iteratively removes vertices that are provably winning for one player via
/// fatal attractors in dimension 0 (§4.3).
///
/// Priorities are processed in ascending order so that cheap low-priority
/// dominations shrink the arena before the more expensive high-priority
/// iterations run. Returns the shrunk arena together with the accumulated
/// partial winning regions (which are disjoint from the remaining arena's
/// vertices).
pub fn buchi_partial_solver(arena: &Arena) -> Result<(Arena, BDDFunction, BDDFunction), GpgError> {
    let mut current = arena.clone();
    let mut w0 = arena.false_bdd().clone();
    let mut w1 = arena.false_bdd().clone();

    'restart: loop {
        if current.is_empty()? {
            return Ok((current, w0, w1));
        }

        for p in current.priorities_in(0).collect::<Vec<_>>() {
            let mut t = current.priority_set(0, p).and(&current.vertices()?)?;

            loop {
                if t == *current.false_bdd() {
                    break;
                }

                let owner = Player::from_priority(p);
                let m = monotone_attractor(&current, &t, p, 0, owner)?;
                if t.and(&m.not()?)?.satisfiable() {
                    // M does not yet cover T: shrink and retry.
                    let shrunk = t.and(&m)?;
                    if shrunk == t {
                        break;
                    }
                    t = shrunk;
                    continue;
                }

                // T ⊆ M: priority p's owner has a fatal attractor.
                let r = attractor(&current, &m, owner)?;
                debug!("buchi_partial_solver: fatal attractor for {owner} at priority {p}");

                match owner {
                    Player::Zero => w0 = w0.or(&r)?,
                    Player::One => w1 = w1.or(&r)?,
                }

                let remaining = current.vertices()?.and(&r.not()?)?;
                current = current.subarena(&remaining)?;
                continue 'restart;
            }
        }

        // No priority yielded a fatal attractor.
        return Ok((current, w0, w1));
    }
}
