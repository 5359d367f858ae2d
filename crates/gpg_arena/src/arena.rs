//! The symbolic arena representation: a two-player game graph with k priority
//! functions, encoded as Boolean functions over a shared pair of variable
//! vectors (`vars` for the current vertex, `vars_bis` for the successor).

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use oxidd::BooleanFunction;
use oxidd::BooleanFunctionQuant;
use oxidd::ManagerRef;
use oxidd::bdd::BDDFunction;
use oxidd::bdd::BDDManagerRef;

use gpg_symbolic::FormatConfigSet;
use gpg_symbolic::create_variables;
use gpg_utilities::GpgError;

/// A symbolic two-player game arena with `nbr_functions` priority dimensions.
///
/// All vertex sets are Boolean functions over `vars`; `edges` is a Boolean
/// function over `vars ∪ vars_bis`. Arenas are immutable once constructed;
/// [`Arena::subarena`] produces a fresh value that shares the substitution
/// tables (`vars`, `vars_bis`, and the precomputed renaming relation) with its
/// parent.
#[derive(Clone)]
pub struct Arena {
    manager_ref: BDDManagerRef,

    vars: Vec<BDDFunction>,
    vars_bis: Vec<BDDFunction>,

    /// Conjunction of all `vars`, used to existentially project successor
    /// state back onto `vars` after renaming `vars_bis -> vars`.
    vars_cube: BDDFunction,
    /// Conjunction of all `vars_bis`, used to existentially project the
    /// current state out when renaming `vars -> vars_bis`.
    vars_bis_cube: BDDFunction,
    /// `⋀_i (vars[i] ↔ vars_bis[i])`: the renaming relation `mapping_bis`
    /// realized as a Boolean function, per the engine's substitution
    /// contract (`let(σ, f)` is implemented as a fused and-then-exists).
    iff_bis: BDDFunction,

    player0_vertices: BDDFunction,
    player1_vertices: BDDFunction,
    edges: BDDFunction,

    /// `priorities[dim][p]` is the set of vertices whose priority in
    /// dimension `dim` equals `p`. Absent entries denote the empty set.
    priorities: Vec<BTreeMap<usize, BDDFunction>>,

    false_bdd: BDDFunction,
    true_bdd: BDDFunction,
}

impl Arena {
    /// Constructs an arena from its raw components. Callers (loaders) are
    /// responsible for the invariants in the data model: disjoint player
    /// sets, edges whose endpoints lie in the vertex set, and priorities
    /// that partition each dimension.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        manager_ref: BDDManagerRef,
        vars: Vec<BDDFunction>,
        vars_bis: Vec<BDDFunction>,
        player0_vertices: BDDFunction,
        player1_vertices: BDDFunction,
        edges: BDDFunction,
        priorities: Vec<BTreeMap<usize, BDDFunction>>,
    ) -> Result<Self, GpgError> {
        debug_assert_eq!(vars.len(), vars_bis.len(), "vars and vars_bis must have equal length");
        debug_assert!(!priorities.is_empty(), "at least one priority dimension is required");

        let (false_bdd, true_bdd) =
            manager_ref.with_manager_shared(|manager| (BDDFunction::f(manager), BDDFunction::t(manager)));

        let mut vars_cube = true_bdd.clone();
        for v in &vars {
            vars_cube = vars_cube.and(v)?;
        }

        let mut vars_bis_cube = true_bdd.clone();
        for v in &vars_bis {
            vars_bis_cube = vars_bis_cube.and(v)?;
        }

        let mut iff_bis = true_bdd.clone();
        for (v, v_bis) in vars.iter().zip(vars_bis.iter()) {
            iff_bis = iff_bis.and(&v.equiv(v_bis)?)?;
        }

        debug_assert!(
            !player0_vertices.and(&player1_vertices)?.satisfiable(),
            "player0_vertices and player1_vertices must be disjoint"
        );

        Ok(Self {
            manager_ref,
            vars,
            vars_bis,
            vars_cube,
            vars_bis_cube,
            iff_bis,
            player0_vertices,
            player1_vertices,
            edges,
            priorities,
            false_bdd,
            true_bdd,
        })
    }

    pub fn manager_ref(&self) -> &BDDManagerRef {
        &self.manager_ref
    }

    pub fn vars(&self) -> &Vec<BDDFunction> {
        &self.vars
    }

    pub fn vars_bis(&self) -> &Vec<BDDFunction> {
        &self.vars_bis
    }

    pub fn player0_vertices(&self) -> &BDDFunction {
        &self.player0_vertices
    }

    pub fn player1_vertices(&self) -> &BDDFunction {
        &self.player1_vertices
    }

    pub fn edges(&self) -> &BDDFunction {
        &self.edges
    }

    pub fn nbr_functions(&self) -> usize {
        self.priorities.len()
    }

    pub fn nbr_digits_vertices(&self) -> usize {
        self.vars.len()
    }

    pub fn false_bdd(&self) -> &BDDFunction {
        &self.false_bdd
    }

    pub fn true_bdd(&self) -> &BDDFunction {
        &self.true_bdd
    }

    /// The set of vertices with priority `p` in dimension `dim`, or `⊥` if no
    /// vertex carries that priority.
    pub fn priority_set(&self, dim: usize, p: usize) -> &BDDFunction {
        self.priorities[dim].get(&p).unwrap_or(&self.false_bdd)
    }

    /// All distinct priorities present in dimension `dim`, in ascending order.
    pub fn priorities_in(&self, dim: usize) -> impl Iterator<Item = usize> + '_ {
        self.priorities[dim].keys().copied()
    }

    /// The maximum priority present in dimension `dim`. `None` if the arena
    /// is empty.
    pub fn max_priority(&self, dim: usize) -> Option<usize> {
        self.priorities[dim].keys().next_back().copied()
    }

    /// The set of vertices present in the arena: `player0_vertices ∨ player1_vertices`.
    pub fn vertices(&self) -> Result<BDDFunction, GpgError> {
        Ok(self.player0_vertices.or(&self.player1_vertices)?)
    }

    /// Whether the arena has no vertices.
    pub fn is_empty(&self) -> Result<bool, GpgError> {
        Ok(self.vertices()? == self.false_bdd)
    }

    /// Renames the free variables of `f` from `vars` to `vars_bis` (`σ`):
    /// `∃vars. (f ∧ iff_bis)`, leaving the result expressed over `vars_bis`.
    pub fn to_bis(&self, f: &BDDFunction) -> Result<BDDFunction, GpgError> {
        Ok(f.and(&self.iff_bis)?.exist(&self.vars_cube)?)
    }

    /// Renames the free variables of `f` from `vars_bis` to `vars` (`σ⁻¹`):
    /// `∃vars_bis. (f ∧ iff_bis)`, leaving the result expressed over `vars`.
    pub fn from_bis(&self, f: &BDDFunction) -> Result<BDDFunction, GpgError> {
        Ok(f.and(&self.iff_bis)?.exist(&self.vars_bis_cube)?)
    }

    /// `∃vars_bis. (edges ∧ f(vars_bis))`, i.e. the set of vertices with at
    /// least one successor in the (already-renamed) set `f_bis`.
    pub fn exists_successor_in(&self, f_bis: &BDDFunction) -> Result<BDDFunction, GpgError> {
        Ok(self.edges.and(f_bis)?.exist(&self.vars_bis_cube)?)
    }

    /// `¬∃vars_bis. (edges ∧ ¬f(vars_bis))`, i.e. the set of vertices all of
    /// whose successors lie in the (already-renamed) set `f_bis`.
    pub fn all_successors_in(&self, f_bis: &BDDFunction) -> Result<BDDFunction, GpgError> {
        let not_f_bis = f_bis.not()?;
        Ok(self.edges.and(&not_f_bis)?.exist(&self.vars_bis_cube)?.not()?)
    }

    /// Returns the subarena obtained by restricting to the vertices in `v`
    /// (§4.1 `subarena`). Edges are restricted to pairs whose both endpoints
    /// lie in `v`; priority maps are restricted and entries that become `⊥`
    /// are dropped. The substitution tables are shared with `self`.
    pub fn subarena(&self, v: &BDDFunction) -> Result<Arena, GpgError> {
        let v_bis = self.to_bis(v)?;
        let edges = self.edges.and(v).and(&v_bis)?;

        let player0_vertices = self.player0_vertices.and(v)?;
        let player1_vertices = self.player1_vertices.and(v)?;
        let vertices = player0_vertices.or(&player1_vertices)?;

        let mut priorities = Vec::with_capacity(self.priorities.len());
        for dim in &self.priorities {
            let mut restricted = BTreeMap::new();
            for (&p, set) in dim {
                let restricted_set = set.and(&vertices)?;
                if restricted_set != self.false_bdd {
                    restricted.insert(p, restricted_set);
                }
            }
            priorities.push(restricted);
        }

        Ok(Arena {
            manager_ref: self.manager_ref.clone(),
            vars: self.vars.clone(),
            vars_bis: self.vars_bis.clone(),
            vars_cube: self.vars_cube.clone(),
            vars_bis_cube: self.vars_bis_cube.clone(),
            iff_bis: self.iff_bis.clone(),
            player0_vertices,
            player1_vertices,
            edges,
            priorities,
            false_bdd: self.false_bdd.clone(),
            true_bdd: self.true_bdd.clone(),
        })
    }

    /// Restricts the arena to the vertices reachable from `init` along
    /// `edges` (§4.1 `restrict_to_reachable`): the least fixed point
    /// `R_0 = init`, `R_{n+1} = R_n ∨ σ⁻¹(∃vars. (edges ∧ R_n))`, i.e. the
    /// *forward* image of `R_n` renamed from `vars_bis` back onto `vars`.
    ///
    /// Edges are not additionally restricted to the reachable set; only the
    /// player and priority maps are. This matches `subarena`'s contract
    /// (dangling edges cannot be witnesses in attractor computations that
    /// conjoin with player sets).
    pub fn restrict_to_reachable(&self, init: &BDDFunction) -> Result<Arena, GpgError> {
        let mut reachable = init.clone();
        loop {
            let successors_bis = self.edges.and(&reachable)?.exist(&self.vars_cube)?;
            let successors = self.from_bis(&successors_bis)?;
            let next = reachable.or(&successors)?;
            if next == reachable {
                break;
            }
            reachable = next;
        }

        let player0_vertices = self.player0_vertices.and(&reachable)?;
        let player1_vertices = self.player1_vertices.and(&reachable)?;

        let mut priorities = Vec::with_capacity(self.priorities.len());
        for dim in &self.priorities {
            let mut restricted = BTreeMap::new();
            for (&p, set) in dim {
                let restricted_set = set.and(&reachable)?;
                if restricted_set != self.false_bdd {
                    restricted.insert(p, restricted_set);
                }
            }
            priorities.push(restricted);
        }

        Ok(Arena {
            manager_ref: self.manager_ref.clone(),
            vars: self.vars.clone(),
            vars_bis: self.vars_bis.clone(),
            vars_cube: self.vars_cube.clone(),
            vars_bis_cube: self.vars_bis_cube.clone(),
            iff_bis: self.iff_bis.clone(),
            player0_vertices,
            player1_vertices,
            edges: self.edges.clone(),
            priorities,
            false_bdd: self.false_bdd.clone(),
            true_bdd: self.true_bdd.clone(),
        })
    }

    /// Declares `n` fresh current-state variables followed by `n` fresh
    /// successor-state variables, in that fixed interleaving (current, then
    /// successor), per the crate's variable-ordering convention.
    pub fn declare_vertex_variables(manager_ref: &BDDManagerRef, n: u32) -> Result<(Vec<BDDFunction>, Vec<BDDFunction>), GpgError> {
        let vars = create_variables(manager_ref, n)?;
        let vars_bis = create_variables(manager_ref, n)?;
        Ok((vars, vars_bis))
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Arena {{")?;
        writeln!(f, "  vars: {},", self.vars.len())?;
        writeln!(f, "  dimensions: {},", self.priorities.len())?;
        writeln!(f, "  player0_vertices: {}", FormatConfigSet(&self.player0_vertices))?;
        writeln!(f, "  player1_vertices: {}", FormatConfigSet(&self.player1_vertices))?;
        for (dim, map) in self.priorities.iter().enumerate() {
            writeln!(
                f,
                "  priorities[{dim}]: {}",
                map.keys().format_with(", ", |p, fmt| fmt(&format_args!("{p}")))
            )?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use gpg_macros::gpg_test;
    use oxidd::BooleanFunction;

    use crate::read_pg;

    /// `0 -> 1 -> 2`, `3` isolated: restricting to reachable-from-`{0}` must
    /// keep `0,1,2` and drop `3`, not the other way around.
    #[gpg_test]
    #[cfg_attr(miri, ignore)]
    fn restrict_to_reachable_keeps_forward_image() {
        let input = b"parity 3;\n0 0 0 1;\n1 0 0 2;\n2 0 0 2;\n3 0 0 3;\n";
        let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
        let arena = read_pg(&input[..], &manager_ref).unwrap();

        let n = arena.vars().len();
        let index_cube = |index: usize| {
            let mut cube = arena.true_bdd().clone();
            for (bit, var) in arena.vars().iter().enumerate() {
                let set = (index >> (n - 1 - bit)) & 1 == 1;
                cube = cube.and(&if set { var.clone() } else { var.not().unwrap() }).unwrap();
            }
            cube
        };

        let init = index_cube(0);
        let restricted = arena.restrict_to_reachable(&init).unwrap();
        let vertices = restricted.vertices().unwrap();

        for v in [0, 1, 2] {
            assert!(vertices.and(&index_cube(v)).unwrap().satisfiable(), "vertex {v} must stay reachable");
        }
        assert!(!vertices.and(&index_cube(3)).unwrap().satisfiable(), "unreachable vertex 3 must be dropped");
    }
}
