//! End-to-end scenarios (S1-S6) and cross-cutting invariants that don't
//! belong to any single module's unit tests.

use gpg_arena::generalized_recursive;
use gpg_arena::read_gpg;
use gpg_arena::read_pg;
use gpg_arena::recursive;
use gpg_macros::gpg_test;
use oxidd::BooleanFunction;

fn index_in(arena: &gpg_arena::Arena, w: &oxidd::bdd::BDDFunction, index: usize) -> bool {
    let n = arena.vars().len();
    let true_bdd = arena.true_bdd().clone();
    let mut cube = true_bdd;
    for (bit, var) in arena.vars().iter().enumerate() {
        let set = (index >> (n - 1 - bit)) & 1 == 1;
        let literal = if set { var.clone() } else { var.not().unwrap() };
        cube = cube.and(&literal).unwrap();
    }
    cube.and(w).unwrap().satisfiable()
}

#[gpg_test]
#[cfg_attr(miri, ignore)]
fn s1_cycle_all_player0() {
    let input = b"parity 2;\n0 1 0 1;\n1 2 1 0,2;\n2 0 0 2;\n";
    let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
    let arena = read_pg(&input[..], &manager_ref).unwrap();
    let (w0, w1) = recursive(&arena).unwrap();

    for v in 0..3 {
        assert!(index_in(&arena, &w0, v), "vertex {v} should be in W0");
        assert!(!index_in(&arena, &w1, v));
    }
}

#[gpg_test]
#[cfg_attr(miri, ignore)]
fn s2_odd_self_loop_is_player1() {
    let input = b"parity 0;\n0 1 0 0;\n";
    let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
    let arena = read_pg(&input[..], &manager_ref).unwrap();
    let (w0, w1) = recursive(&arena).unwrap();

    assert!(!index_in(&arena, &w0, 0));
    assert!(index_in(&arena, &w1, 0));
}

#[gpg_test]
#[cfg_attr(miri, ignore)]
fn s3_even_self_loop_is_player0() {
    let input = b"parity 0;\n0 2 0 0;\n";
    let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
    let arena = read_pg(&input[..], &manager_ref).unwrap();
    let (w0, w1) = recursive(&arena).unwrap();

    assert!(index_in(&arena, &w0, 0));
    assert!(!index_in(&arena, &w1, 0));
}

#[gpg_test]
#[cfg_attr(miri, ignore)]
fn s4_two_dimension_both_player1() {
    let input = b"parity 1 2;\n0 2,1 0 1;\n1 1,2 0 0;\n";
    let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
    let arena = read_gpg(&input[..], &manager_ref).unwrap();
    let (w0, w1) = generalized_recursive(&arena).unwrap();

    for v in 0..2 {
        assert!(!index_in(&arena, &w0, v), "vertex {v} should not be in W0");
        assert!(index_in(&arena, &w1, v), "vertex {v} should be in W1");
    }
}

#[gpg_test]
#[cfg_attr(miri, ignore)]
fn s5_seven_vertex_decomposition() {
    // A two-dimension gadget wired so {0,1,2,3} form a mutually reachable
    // block that always sees an even priority in both dimensions, while
    // {4,5,6} are drained into a dimension-0 odd sink that dominates them.
    let input = concat!(
        "parity 6 2;\n",
        "0 2,2 0 1;\n",
        "1 2,4 0 2;\n",
        "2 4,2 0 3;\n",
        "3 4,4 0 0;\n",
        "4 1,2 0 5;\n",
        "5 1,2 0 6;\n",
        "6 1,2 0 4;\n",
    );
    let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
    let arena = read_gpg(input.as_bytes(), &manager_ref).unwrap();
    let (w0, w1) = generalized_recursive(&arena).unwrap();

    for v in 0..4 {
        assert!(index_in(&arena, &w0, v), "vertex {v} should be in W0");
    }
    for v in 4..7 {
        assert!(index_in(&arena, &w1, v), "vertex {v} should be in W1");
    }
}

#[gpg_test]
#[cfg_attr(miri, ignore)]
fn s6_priority_one_player1_self_loop() {
    let input = b"parity 0;\n0 1 1 0;\n";
    let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
    let arena = read_pg(&input[..], &manager_ref).unwrap();
    let (w0, w1) = recursive(&arena).unwrap();

    assert!(!index_in(&arena, &w0, 0));
    assert!(index_in(&arena, &w1, 0));
}

#[gpg_test]
#[cfg_attr(miri, ignore)]
fn subarena_edges_match_both_endpoints_restriction() {
    use gpg_arena::random_arena;

    gpg_utilities::random_test(20, |rng| {
        let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
        let arena = random_arena(&manager_ref, rng, 10, 1, 4).unwrap();

        // Restrict to a nontrivial, non-closed subset: the dimension-0 priority-0 vertices.
        let v = arena.priority_set(0, 0).clone();
        let sub = arena.subarena(&v).unwrap();

        let v_bis = arena.to_bis(&v).unwrap();
        let expected_edges = arena.edges().and(&v).unwrap().and(&v_bis).unwrap();
        assert_eq!(sub.edges(), &expected_edges, "subarena edges must be exactly both-endpoints-in-V edges");
    });
}

#[gpg_test]
#[cfg_attr(miri, ignore)]
fn monotone_attractor_stays_within_priority_bound() {
    use gpg_arena::monotone_attractor;
    use gpg_arena::random_arena;

    gpg_utilities::random_test(20, |rng| {
        let manager_ref = oxidd::bdd::new_manager(4096, 2048, 1);
        let arena = random_arena(&manager_ref, rng, 12, 1, 5).unwrap();

        let q = arena.max_priority(0).unwrap();
        let target = arena.priority_set(0, q).clone();
        let m = monotone_attractor(&arena, &target, q, 0, gpg_arena::Player::from_priority(q)).unwrap();

        let mut le_q = arena.false_bdd().clone();
        for p in arena.priorities_in(0) {
            if p <= q {
                le_q = le_q.or(arena.priority_set(0, p)).unwrap();
            }
        }

        let outside_bound = m.and(&le_q.not().unwrap()).unwrap();
        assert!(!outside_bound.satisfiable(), "monotone attractor must stay within the priority bound");
    });
}
