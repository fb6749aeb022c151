//! Monoid / update algebra
//!
//! A lazy segment tree is parameterised by two structures:
//! - a monoid `(Value, op, id)` aggregating adjacent ranges
//! - a monoid of updates `(Update, f_compose, f_id)` acting on values
//!
//! Laws the implementer must uphold (not checked at runtime):
//! - `op` is associative and `id` is its identity
//! - `f_apply(f, op(a, b)) == op(f_apply(f, a), f_apply(f, b))`
//! - `f_apply(f_compose(g, f), x) == f_apply(g, f_apply(f, x))`
//! - `f_apply(f_id(), x) == x`

mod actions;

pub use actions::{Affine, AffineSum, AddMax, AddMin, AddSum, AssignSum, ModCell, SumCell, MOD};

/// Monoid acted on by a monoid of lazy updates.
///
/// All operations are associated functions: the algebra is chosen at
/// compile time through the type parameter of
/// [`PersistentSegTree`](crate::PersistentSegTree).
pub trait LazyMonoid {
    /// Aggregated value stored in every node.
    type Value: Clone;

    /// Pending update stored alongside the value.
    type Update: Clone;

    /// Identity of [`op`](Self::op).
    fn id() -> Self::Value;

    /// Combine the aggregates of two adjacent ranges, `a` on the left.
    fn op(a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// The no-op update.
    fn f_id() -> Self::Update;

    /// Apply `f` to an aggregate.
    fn f_apply(f: &Self::Update, x: &Self::Value) -> Self::Value;

    /// Compose two updates: the result applies `inner` first, then `outer`.
    fn f_compose(outer: &Self::Update, inner: &Self::Update) -> Self::Update;
}

/// Algebra whose elements and updates can be written as a single integer.
///
/// Used by the script runner to read values and updates from text.
pub trait ScalarAction: LazyMonoid {
    /// Lift one element.
    fn value_of(x: i64) -> Self::Value;

    /// Lift one update.
    fn update_of(x: i64) -> Self::Update;

    /// Render an aggregate for output.
    fn render(value: &Self::Value) -> String;
}

/// Left fold of `values` under `M::op`, starting from `M::id()`.
pub fn fold_slice<M: LazyMonoid>(values: &[M::Value]) -> M::Value {
    values.iter().fold(M::id(), |acc, x| M::op(&acc, x))
}
