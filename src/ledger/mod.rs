//! Version ledger
//!
//! Records every version a driver creates, the version it was derived
//! from and the operation that produced it. Versions form a forest:
//! roots come from `build`/`empty`, every `set`/`apply` adds an edge.

use std::fmt;

use tracing::trace;

use crate::algebra::LazyMonoid;
use crate::tree::PersistentSegTree;
use crate::SegTreeError;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Index of a version inside a [`VersionLedger`], in creation order
pub type VersionId = usize;

/// Operation that produced a version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Origin {
    /// Built from initial values
    Build {
        /// Number of elements
        len: usize,
    },
    /// Empty tree of identity elements
    Empty {
        /// Number of elements
        len: usize,
    },
    /// Point assignment
    Set {
        /// Assigned index
        index: usize,
    },
    /// Range update over `[start, end)`
    Apply {
        /// Range start
        start: usize,
        /// Range end (exclusive)
        end: usize,
    },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Build { len } => write!(f, "build({})", len),
            Origin::Empty { len } => write!(f, "empty({})", len),
            Origin::Set { index } => write!(f, "set({})", index),
            Origin::Apply { start, end } => write!(f, "apply({}..{})", start, end),
        }
    }
}

struct Entry<M: LazyMonoid> {
    tree: PersistentSegTree<M>,
    parent: Option<VersionId>,
    origin: Origin,
}

/// Append-only record of versions
pub struct VersionLedger<M: LazyMonoid> {
    entries: Vec<Entry<M>>,
}

impl<M: LazyMonoid> VersionLedger<M> {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a version with no parent
    pub fn insert_root(&mut self, tree: PersistentSegTree<M>, origin: Origin) -> VersionId {
        self.push(tree, None, origin)
    }

    /// Derive a new version from `parent` and record it.
    ///
    /// Errors from `op` are passed through and nothing is recorded.
    pub fn derive<F>(
        &mut self,
        parent: VersionId,
        origin: Origin,
        op: F,
    ) -> Result<VersionId, SegTreeError>
    where
        F: FnOnce(&PersistentSegTree<M>) -> Result<PersistentSegTree<M>, SegTreeError>,
    {
        let tree = op(self.get(parent)?)?;
        Ok(self.push(tree, Some(parent), origin))
    }

    fn push(
        &mut self,
        tree: PersistentSegTree<M>,
        parent: Option<VersionId>,
        origin: Origin,
    ) -> VersionId {
        let id = self.entries.len();
        trace!(id, ?parent, %origin, "recorded version");
        self.entries.push(Entry {
            tree,
            parent,
            origin,
        });
        id
    }

    /// Look up a version
    pub fn get(&self, id: VersionId) -> Result<&PersistentSegTree<M>, SegTreeError> {
        self.entry(id).map(|entry| &entry.tree)
    }

    /// Version `id` was derived from, `None` for roots
    pub fn parent(&self, id: VersionId) -> Result<Option<VersionId>, SegTreeError> {
        self.entry(id).map(|entry| entry.parent)
    }

    /// Operation that produced version `id`
    pub fn origin(&self, id: VersionId) -> Result<Origin, SegTreeError> {
        self.entry(id).map(|entry| entry.origin)
    }

    /// Chain of versions from `id` back to its root, `id` first
    pub fn lineage(&self, id: VersionId) -> Result<Vec<VersionId>, SegTreeError> {
        let mut chain = vec![id];
        let mut current = self.entry(id)?;
        while let Some(parent) = current.parent {
            chain.push(parent);
            current = self.entry(parent)?;
        }
        Ok(chain)
    }

    /// Number of recorded versions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: VersionId) -> Result<&Entry<M>, SegTreeError> {
        self.entries.get(id).ok_or(SegTreeError::UnknownVersion {
            id,
            count: self.entries.len(),
        })
    }
}

impl<M: LazyMonoid> Default for VersionLedger<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: LazyMonoid> fmt::Debug for VersionLedger<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionLedger")
            .field("versions", &self.entries.len())
            .finish()
    }
}
