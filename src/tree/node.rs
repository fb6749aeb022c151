//! Node representation
//!
//! Node = (data, lazy, left, right) stored in the node pool.
//! Span = half-open interval [start, end) covered by a node, recomputed
//! on the way down and never stored:
//!   m = ⌊(start + end) / 2⌋
//!   Left child: [start, m)
//!   Right child: [m, end)

use std::fmt;
use std::ops::Range;

use crate::algebra::LazyMonoid;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Handle to a node inside a [`NodePool`](crate::space::NodePool).
///
/// Encodes `(block, slot)`, so it stays valid however many blocks the pool
/// grows. [`NodeRef::NIL`] addresses the pool's sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    block: u32,
    slot: u32,
}

impl NodeRef {
    /// The sentinel: an empty subtree aggregating to the identity.
    pub const NIL: NodeRef = NodeRef {
        block: u32::MAX,
        slot: u32::MAX,
    };

    pub(crate) fn new(block: u32, slot: u32) -> Self {
        debug_assert!(block != u32::MAX, "block index collides with NIL");
        Self { block, slot }
    }

    /// Whether this handle is the sentinel.
    #[inline]
    pub fn is_nil(self) -> bool {
        self == Self::NIL
    }

    #[inline]
    pub(crate) fn block(self) -> usize {
        self.block as usize
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.slot as usize
    }
}

/// Tree node. Immutable once its handle has been handed out.
pub(crate) struct Node<M: LazyMonoid> {
    /// Aggregate of the subtree, with `lazy` already applied
    pub data: M::Value,
    /// Update not yet pushed into the children
    pub lazy: M::Update,
    pub left: NodeRef,
    pub right: NodeRef,
}

impl<M: LazyMonoid> Node<M> {
    /// The sentinel's contents.
    pub fn nil() -> Self {
        Self {
            data: M::id(),
            lazy: M::f_id(),
            left: NodeRef::NIL,
            right: NodeRef::NIL,
        }
    }

    pub fn leaf(data: M::Value) -> Self {
        Self {
            data,
            lazy: M::f_id(),
            left: NodeRef::NIL,
            right: NodeRef::NIL,
        }
    }
}

/// Index interval `[start, end)` covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Span {
    /// First index (inclusive)
    pub start: usize,
    /// Last index (exclusive)
    pub end: usize,
}

impl Span {
    /// Span of a whole tree of length `len`.
    pub fn root(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    /// Number of indices covered.
    #[inline]
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// Check if leaf (unit interval)
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.width() == 1
    }

    /// Split point `⌊(start + end) / 2⌋`, computed without overflow.
    #[inline]
    pub fn midpoint(&self) -> usize {
        self.start + self.width() / 2
    }

    /// Split at the midpoint: `([start, m), [m, end))`.
    pub fn halves(&self) -> (Span, Span) {
        debug_assert!(self.width() > 1, "unit span has no halves");

        let mid = self.midpoint();
        (
            Span {
                start: self.start,
                end: mid,
            },
            Span {
                start: mid,
                end: self.end,
            },
        )
    }

    /// No index in common with `query`.
    #[inline]
    pub fn is_disjoint(&self, query: &Range<usize>) -> bool {
        query.end <= self.start || self.end <= query.start
    }

    /// Every index lies inside `query`.
    #[inline]
    pub fn is_within(&self, query: &Range<usize>) -> bool {
        query.start <= self.start && self.end <= query.end
    }

    /// `index` lies in `[start, end)`.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Depth of the deepest leaf below this span.
    ///
    /// Midpoint splitting halves the width (rounding up) per level, so this
    /// is ⌈log2(width)⌉.
    pub fn height(&self) -> usize {
        let mut width = self.width();
        let mut depth = 0;
        while width > 1 {
            width -= width / 2;
            depth += 1;
        }
        depth
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_split() {
        let span = Span::root(100);
        let (left, right) = span.halves();

        assert_eq!(left, Span { start: 0, end: 50 });
        assert_eq!(right, Span { start: 50, end: 100 });
    }

    #[test]
    fn test_odd_split_puts_extra_on_right() {
        let (left, right) = Span::root(5).halves();
        assert_eq!(left.width(), 2);
        assert_eq!(right.width(), 3);
    }

    #[test]
    fn test_geometric_shrinkage() {
        // Widest path always follows the right half
        let root = Span::root(1000);
        let mut span = root;
        let mut depth = 0;

        while !span.is_unit() {
            let (left, right) = span.halves();
            assert!(right.width() <= (span.width() + 1) / 2);
            assert!(left.width() <= right.width());
            span = right;
            depth += 1;
        }

        assert_eq!(depth, root.height());
        assert_eq!(root.height(), 10);
    }

    #[test]
    fn test_split_near_usize_max() {
        let span = Span::root(usize::MAX);
        assert_eq!(span.midpoint(), usize::MAX / 2);
        assert_eq!(span.height(), usize::BITS as usize);

        let tail = Span {
            start: usize::MAX - 3,
            end: usize::MAX,
        };
        let (left, right) = tail.halves();
        assert_eq!(left.width(), 1);
        assert_eq!(right, Span { start: usize::MAX - 2, end: usize::MAX });
    }

    #[test]
    fn test_range_relations() {
        let span = Span { start: 4, end: 8 };
        assert!(span.is_disjoint(&(0..4)));
        assert!(span.is_disjoint(&(8..10)));
        assert!(!span.is_disjoint(&(7..9)));
        assert!(span.is_within(&(4..8)));
        assert!(span.is_within(&(0..10)));
        assert!(!span.is_within(&(5..8)));
        assert!(span.contains(4) && !span.contains(8));
    }

    #[test]
    fn test_nil_handle() {
        assert!(NodeRef::NIL.is_nil());
        assert!(!NodeRef::new(0, 0).is_nil());
        assert_eq!(format!("{}", Span { start: 1, end: 3 }), "[1, 3)");
    }
}
