//! Model-based property tests
//!
//! Random operation sequences are replayed on a tree and on a plain `Vec`;
//! every version ever produced must keep matching its model. Seeds are
//! either built from values or empty trees rooted at the sentinel.

mod common;

use common::{assert_matches, Model};
use perseg::{AddMin, AddSum, AssignSum, LazyMonoid, PersistentSegTree, SumCell};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Set { index: usize, value: i64 },
    Apply { start: usize, end: usize, update: i64 },
}

fn ops(len: usize) -> impl Strategy<Value = Vec<(usize, Op)>> {
    let op = prop_oneof![
        (0..len, -50i64..50).prop_map(|(index, value)| Op::Set { index, value }),
        (0..=len, 0..=len, -20i64..20).prop_map(|(a, b, update)| Op::Apply {
            start: a.min(b),
            end: a.max(b),
            update,
        }),
    ];
    // Each op picks the version it derives from
    proptest::collection::vec((any::<usize>(), op), 1..24)
}

/// Seed version: built from `initial`, or an empty tree of the same length
fn seed<M: LazyMonoid>(initial: Vec<M::Value>, empty: bool) -> (PersistentSegTree<M>, Model<M>) {
    if empty {
        let len = initial.len();
        (PersistentSegTree::new(len), Model::new(vec![M::id(); len]))
    } else {
        (PersistentSegTree::build(&initial), Model::new(initial))
    }
}

fn replay<M, V, U>(
    initial: Vec<M::Value>,
    empty: bool,
    ops: &[(usize, Op)],
    value: V,
    update: U,
) -> (Vec<PersistentSegTree<M>>, Vec<Model<M>>)
where
    M: LazyMonoid,
    V: Fn(i64) -> M::Value,
    U: Fn(i64) -> M::Update,
{
    let (tree, model) = seed::<M>(initial, empty);
    let mut trees = vec![tree];
    let mut models = vec![model];

    for (pick, op) in ops {
        let source = pick % trees.len();
        let (tree, model) = match *op {
            Op::Set { index, value: x } => (
                trees[source].set(index, value(x)),
                models[source].set(index, value(x)),
            ),
            Op::Apply { start, end, update: x } => (
                trees[source].apply(start..end, update(x)),
                models[source].apply(start, end, &update(x)),
            ),
        };
        trees.push(tree);
        models.push(model);
    }

    (trees, models)
}

proptest! {
    #[test]
    fn add_sum_versions_match_model(
        initial in proptest::collection::vec(-100i64..100, 1..20),
        empty in any::<bool>(),
        ops in ops(20),
    ) {
        let len = initial.len();
        let ops: Vec<(usize, Op)> = ops.into_iter().map(|(pick, op)| (pick, clamp(op, len))).collect();
        let cells: Vec<SumCell> = initial.into_iter().map(SumCell::new).collect();

        let (trees, models) = replay::<AddSum, _, _>(cells, empty, &ops, SumCell::new, |x| x);
        for (tree, model) in trees.iter().zip(&models) {
            assert_matches(tree, model);
        }
    }

    #[test]
    fn assign_sum_versions_match_model(
        initial in proptest::collection::vec(-100i64..100, 1..20),
        empty in any::<bool>(),
        ops in ops(20),
    ) {
        let len = initial.len();
        let ops: Vec<(usize, Op)> = ops.into_iter().map(|(pick, op)| (pick, clamp(op, len))).collect();
        let cells: Vec<SumCell> = initial.into_iter().map(SumCell::new).collect();

        let (trees, models) = replay::<AssignSum, _, _>(cells, empty, &ops, SumCell::new, Some);
        for (tree, model) in trees.iter().zip(&models) {
            assert_matches(tree, model);
        }
    }

    #[test]
    fn add_min_versions_match_model(
        initial in proptest::collection::vec(-100i64..100, 1..20),
        empty in any::<bool>(),
        ops in ops(20),
    ) {
        let len = initial.len();
        let ops: Vec<(usize, Op)> = ops.into_iter().map(|(pick, op)| (pick, clamp(op, len))).collect();

        let (trees, models) = replay::<AddMin, _, _>(initial, empty, &ops, |x| x, |x| x);
        for (tree, model) in trees.iter().zip(&models) {
            assert_matches(tree, model);
        }
    }

    #[test]
    fn set_then_get_round_trips(
        initial in proptest::collection::vec(-100i64..100, 1..40),
        index in any::<prop::sample::Index>(),
        value in -1000i64..1000,
    ) {
        let tree = PersistentSegTree::<AddMin>::build(&initial);
        let k = index.index(initial.len());
        let updated = tree.set(k, value);

        prop_assert_eq!(updated.get(k), value);
        for j in 0..initial.len() {
            if j != k {
                prop_assert_eq!(updated.get(j), tree.get(j));
            }
            prop_assert_eq!(tree.get(j), initial[j]);
        }
    }

    #[test]
    fn fold_all_is_left_fold(initial in proptest::collection::vec(-100i64..100, 0..40)) {
        let cells: Vec<SumCell> = initial.iter().copied().map(SumCell::new).collect();
        let tree = PersistentSegTree::<AddSum>::build(&cells);
        prop_assert_eq!(tree.fold_all(), perseg::algebra::fold_slice::<AddSum>(&cells));
    }
}

/// Fit an op generated for length 20 into a tree of `len` elements
fn clamp(op: Op, len: usize) -> Op {
    match op {
        Op::Set { index, value } => Op::Set {
            index: index % len,
            value,
        },
        Op::Apply { start, end, update } => Op::Apply {
            start: start.min(len),
            end: end.min(len),
            update,
        },
    }
}
