//! Persistent lazy segment tree
//!
//! A version is `(pool, root, len)`. Updates allocate O(log N) fresh nodes
//! on the touched paths and share every other subtree with the version
//! they were derived from, so all versions stay valid and queryable.
//!
//! Spans are implicit: nodes store no endpoints, they are recomputed by
//! midpoint recursion from `[0, len)`.

mod node;
mod traversal;

pub(crate) use node::Node;
pub use node::{NodeRef, Span};

use std::fmt;
use std::ops::{Bound, Range, RangeBounds};
use std::rc::Rc;

use tracing::trace;

use crate::algebra::LazyMonoid;
use crate::space::{NodePool, PoolProfile, SharedPool};
use crate::{PoolConfig, SegTreeError};

/// One version of a persistent segment tree over `[0, len)`.
///
/// Cloning copies a handle, not the tree. Mutating operations take `&self`
/// and return the new version.
pub struct PersistentSegTree<M: LazyMonoid> {
    pool: SharedPool<M>,
    root: NodeRef,
    len: usize,
}

impl<M: LazyMonoid> PersistentSegTree<M> {
    /// Tree of `len` identity elements in a private pool.
    pub fn new(len: usize) -> Self {
        Self::new_in(len, &NodePool::shared(&PoolConfig::default()))
    }

    /// Tree of `len` identity elements in `pool`.
    ///
    /// Allocates nothing: the root is the sentinel.
    pub fn new_in(len: usize, pool: &SharedPool<M>) -> Self {
        Self {
            pool: Rc::clone(pool),
            root: NodeRef::NIL,
            len,
        }
    }

    /// Tree holding `values` in a private pool.
    pub fn build(values: &[M::Value]) -> Self {
        Self::build_in(values, &NodePool::shared(&PoolConfig::default()))
    }

    /// Tree holding `values` in `pool`. O(N) nodes.
    pub fn build_in(values: &[M::Value], pool: &SharedPool<M>) -> Self {
        let len = values.len();
        let root = if len == 0 {
            NodeRef::NIL
        } else {
            let mut nodes = pool.borrow_mut();
            let root = traversal::build(&mut *nodes, values, Span::root(len));
            trace!(len, nodes = nodes.len(), "built tree");
            root
        };

        Self {
            pool: Rc::clone(pool),
            root,
            len,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Root handle of this version
    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// Pool owning this version's nodes
    pub fn pool(&self) -> &SharedPool<M> {
        &self.pool
    }

    /// Allocation counters of the underlying pool
    pub fn profile(&self) -> PoolProfile {
        self.pool.borrow().profile()
    }

    /// Whether both versions are the same tree (same pool, same root).
    pub fn shares_root_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.pool, &other.pool) && self.root == other.root && self.len == other.len
    }

    /// Element at `index`.
    ///
    /// # Panics
    /// If `index >= len`.
    pub fn get(&self, index: usize) -> M::Value {
        or_panic(self.try_get(index))
    }

    /// Element at `index`, or an error if out of range.
    pub fn try_get(&self, index: usize) -> Result<M::Value, SegTreeError> {
        self.check_index(index)?;
        self.try_fold(index..index + 1)
    }

    /// Aggregate of the elements in `range`; `id()` for an empty range.
    ///
    /// # Panics
    /// If `range` does not lie within `[0, len]` or is reversed.
    pub fn fold<R: RangeBounds<usize>>(&self, range: R) -> M::Value {
        or_panic(self.try_fold(range))
    }

    /// Checked [`fold`](Self::fold).
    pub fn try_fold<R: RangeBounds<usize>>(&self, range: R) -> Result<M::Value, SegTreeError> {
        let query = resolve_range(&range, self.len)?;
        if query.is_empty() {
            return Ok(M::id());
        }

        let pool = self.pool.borrow();
        Ok(traversal::fold(
            &*pool,
            self.root,
            Span::root(self.len),
            &query,
            &M::f_id(),
        ))
    }

    /// Aggregate of the whole tree.
    pub fn fold_all(&self) -> M::Value {
        self.fold(..)
    }

    /// New version with the element at `index` replaced by `value`.
    ///
    /// # Panics
    /// If `index >= len`.
    pub fn set(&self, index: usize, value: M::Value) -> Self {
        or_panic(self.try_set(index, value))
    }

    /// Checked [`set`](Self::set).
    pub fn try_set(&self, index: usize, value: M::Value) -> Result<Self, SegTreeError> {
        self.check_index(index)?;

        let root = {
            let mut pool = self.pool.borrow_mut();
            traversal::set(&mut *pool, self.root, Span::root(self.len), index, value)
        };
        Ok(self.with_root(root))
    }

    /// New version with `f` applied to every element in `range`.
    ///
    /// An empty range returns this version unchanged.
    ///
    /// # Panics
    /// If `range` does not lie within `[0, len]` or is reversed.
    pub fn apply<R: RangeBounds<usize>>(&self, range: R, f: M::Update) -> Self {
        or_panic(self.try_apply(range, f))
    }

    /// Checked [`apply`](Self::apply).
    pub fn try_apply<R: RangeBounds<usize>>(
        &self,
        range: R,
        f: M::Update,
    ) -> Result<Self, SegTreeError> {
        let query = resolve_range(&range, self.len)?;
        if query.is_empty() {
            return Ok(self.clone());
        }

        let root = {
            let mut pool = self.pool.borrow_mut();
            traversal::apply(&mut *pool, self.root, Span::root(self.len), &query, &f)
        };
        Ok(self.with_root(root))
    }

    /// Every element, in order. O(N log N); meant for tests and debugging.
    pub fn to_vec(&self) -> Vec<M::Value> {
        self.to_vec_prefix(self.len)
    }

    /// The first `up_to` elements.
    ///
    /// # Panics
    /// If `up_to > len`.
    pub fn to_vec_prefix(&self, up_to: usize) -> Vec<M::Value> {
        assert!(
            up_to <= self.len,
            "prefix length {} exceeds tree length {}",
            up_to,
            self.len
        );
        (0..up_to).map(|i| self.get(i)).collect()
    }

    fn with_root(&self, root: NodeRef) -> Self {
        Self {
            pool: Rc::clone(&self.pool),
            root,
            len: self.len,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), SegTreeError> {
        if index >= self.len {
            return Err(SegTreeError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }
}

impl<M: LazyMonoid> Clone for PersistentSegTree<M> {
    fn clone(&self) -> Self {
        self.with_root(self.root)
    }
}

impl<M: LazyMonoid> fmt::Debug for PersistentSegTree<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentSegTree")
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}

impl<M: LazyMonoid> FromIterator<M::Value> for PersistentSegTree<M> {
    fn from_iter<I: IntoIterator<Item = M::Value>>(iter: I) -> Self {
        let values: Vec<M::Value> = iter.into_iter().collect();
        Self::build(&values)
    }
}

/// Turn any range expression into `start..end` within `[0, len]`.
fn resolve_range<R: RangeBounds<usize>>(range: &R, len: usize) -> Result<Range<usize>, SegTreeError> {
    let start = match range.start_bound() {
        Bound::Included(&s) => Some(s),
        Bound::Excluded(&s) => s.checked_add(1),
        Bound::Unbounded => Some(0),
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.checked_add(1),
        Bound::Excluded(&e) => Some(e),
        Bound::Unbounded => Some(len),
    };

    match (start, end) {
        (Some(start), Some(end)) if start <= end && end <= len => Ok(start..end),
        (start, end) => Err(SegTreeError::InvalidRange {
            start: start.unwrap_or(usize::MAX),
            end: end.unwrap_or(usize::MAX),
            len,
        }),
    }
}

fn or_panic<T>(result: Result<T, SegTreeError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}
