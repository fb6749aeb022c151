//! Recursive tree engine
//!
//! Every routine walks down from a root while recomputing spans via
//! midpoint splits. Mutations never write to an existing node: they
//! allocate the nodes on the touched paths and return a new root, so the
//! old root keeps describing the old version.
//!
//! Recursion depth: O(log N)

use std::ops::Range;

use super::{NodeRef, Span};
use crate::algebra::LazyMonoid;
use crate::space::NodePool;

/// Build a subtree over `values[span]`.
///
/// Allocates 2 * width - 1 nodes.
pub(crate) fn build<M: LazyMonoid>(
    pool: &mut NodePool<M>,
    values: &[M::Value],
    span: Span,
) -> NodeRef {
    if span.is_unit() {
        return pool.make_leaf(values[span.start].clone());
    }

    let (left_span, right_span) = span.halves();
    let left = build(pool, values, left_span);
    let right = build(pool, values, right_span);
    pool.merge(left, right)
}

/// Clone both children of `node` with its pending update pushed into them.
///
/// Returns handles to the clones; `node` and its children are untouched.
fn push<M: LazyMonoid>(pool: &mut NodePool<M>, node: NodeRef, span: Span) -> (NodeRef, NodeRef) {
    let (left_span, right_span) = span.halves();
    let source = pool.get(node);
    let lazy = source.lazy.clone();
    let (left, right) = (source.left, source.right);

    let left = pool.derive(left, &lazy, left_span.is_unit());
    let right = pool.derive(right, &lazy, right_span.is_unit());
    (left, right)
}

/// Replace the element at `index`, returning the new subtree root.
pub(crate) fn set<M: LazyMonoid>(
    pool: &mut NodePool<M>,
    node: NodeRef,
    span: Span,
    index: usize,
    value: M::Value,
) -> NodeRef {
    debug_assert!(span.contains(index));

    if span.is_unit() {
        return pool.make_leaf(value);
    }

    let (left_span, right_span) = span.halves();
    let (left, right) = push(pool, node, span);

    if left_span.contains(index) {
        let left = set(pool, left, left_span, index, value);
        pool.merge(left, right)
    } else {
        let right = set(pool, right, right_span, index, value);
        pool.merge(left, right)
    }
}

/// Aggregate over `query ∩ span`, as if `pending` had been applied to
/// every element below `node`.
pub(crate) fn fold<M: LazyMonoid>(
    pool: &NodePool<M>,
    node: NodeRef,
    span: Span,
    query: &Range<usize>,
    pending: &M::Update,
) -> M::Value {
    if span.is_disjoint(query) {
        return M::id();
    }

    let current = pool.get(node);
    if node.is_nil() || span.is_within(query) {
        return M::f_apply(pending, &current.data);
    }

    let inner = M::f_compose(pending, &current.lazy);
    let (left_span, right_span) = span.halves();
    let left = fold(pool, current.left, left_span, query, &inner);
    let right = fold(pool, current.right, right_span, query, &inner);
    M::op(&left, &right)
}

/// Apply `f` to every element in `query ∩ span`, returning the new
/// subtree root.
///
/// Disjoint subtrees come back unchanged; fully covered subtrees are
/// replaced by a single node carrying `f` as pending update.
pub(crate) fn apply<M: LazyMonoid>(
    pool: &mut NodePool<M>,
    node: NodeRef,
    span: Span,
    query: &Range<usize>,
    f: &M::Update,
) -> NodeRef {
    if span.is_disjoint(query) {
        return node;
    }
    if span.is_within(query) {
        return pool.derive(node, f, span.is_unit());
    }

    // Partial overlap implies width >= 2
    let (left_span, right_span) = span.halves();
    let (left, right) = push(pool, node, span);
    let left = apply(pool, left, left_span, query, f);
    let right = apply(pool, right, right_span, query, f);
    pool.merge(left, right)
}
