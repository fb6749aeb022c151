//! # Persistent Lazy Segment Tree
//!
//! Immutable, versioned segment tree over a fixed index range `[0, N)`
//! supporting range updates and range queries. Every update returns a new
//! version; all older versions remain intact and queryable.
//!
//! ## Core Design
//!
//! 1. **Node pool**: nodes are bump-allocated from fixed-capacity blocks
//!    that grow geometrically and are never freed individually
//! 2. **Sentinel**: one read-only identity node per pool, addressed by
//!    [`NodeRef::NIL`], stands in for every absent subtree
//! 3. **Path copying**: `set`/`apply` allocate only the O(log N) nodes on
//!    the touched paths and share everything else
//! 4. **Lazy push by cloning**: pending updates are pushed into fresh
//!    copies of the children, never into the shared originals
//!
//! ## Usage Example
//!
//! ```
//! use perseg::{AddSum, PersistentSegTree, SumCell};
//!
//! let values: Vec<SumCell> = (1..=5).map(SumCell::new).collect();
//! let v0 = PersistentSegTree::<AddSum>::build(&values);
//! let v1 = v0.apply(1..4, 10);
//!
//! assert_eq!(v1.fold_all().sum, 45);
//! assert_eq!(v0.fold_all().sum, 15);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod algebra; // Monoid / update contract and built-in instances
pub mod space; // Node pool and allocation accounting
pub mod tree; // Versions and the recursive engine
pub mod ledger; // Version history
pub mod script; // Line-oriented command runner

// Re-exports for convenience
pub use algebra::{
    Affine, AffineSum, AddMax, AddMin, AddSum, AssignSum, LazyMonoid, ModCell, ScalarAction,
    SumCell,
};
pub use ledger::{Origin, VersionId, VersionLedger};
pub use space::{NodePool, PoolProfile, SharedPool};
pub use tree::{NodeRef, PersistentSegTree, Span};

use thiserror::Error;

/// Configuration parameters for a node pool
///
/// Fields are private: every `PoolConfig` in existence has passed
/// validation, so a pool never sees a zero capacity or a shrinking growth.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    initial_block_capacity: usize,
    growth_factor: f64,
}

impl PoolConfig {
    /// Default first block capacity
    pub const DEFAULT_BLOCK_CAPACITY: usize = 1024;

    /// Default growth factor
    pub const DEFAULT_GROWTH_FACTOR: f64 = 1.5;

    /// Create a validated configuration.
    pub fn new(initial_block_capacity: usize, growth_factor: f64) -> Result<Self, SegTreeError> {
        Self {
            initial_block_capacity,
            growth_factor,
        }
        .validated()
    }

    /// Capacity of the first block, in nodes
    pub fn initial_block_capacity(&self) -> usize {
        self.initial_block_capacity
    }

    /// Factor by which each new block outgrows the previous one
    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    /// Replace the first block capacity.
    pub fn with_block_capacity(self, capacity: usize) -> Result<Self, SegTreeError> {
        Self::new(capacity, self.growth_factor)
    }

    /// Replace the growth factor.
    pub fn with_growth_factor(self, factor: f64) -> Result<Self, SegTreeError> {
        Self::new(self.initial_block_capacity, factor)
    }

    fn validated(self) -> Result<Self, SegTreeError> {
        if self.initial_block_capacity == 0 {
            return Err(SegTreeError::InvalidConfig(
                "block capacity must be > 0".to_string(),
            ));
        }
        if self.initial_block_capacity > u32::MAX as usize {
            return Err(SegTreeError::InvalidConfig(format!(
                "block capacity {} exceeds {}",
                self.initial_block_capacity,
                u32::MAX
            )));
        }
        if !self.growth_factor.is_finite() || self.growth_factor < 1.0 {
            return Err(SegTreeError::InvalidConfig(format!(
                "growth factor must be finite and >= 1, got {}",
                self.growth_factor
            )));
        }
        Ok(self)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_block_capacity: Self::DEFAULT_BLOCK_CAPACITY,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }
}

/// Errors reported by the checked API, the ledger and configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegTreeError {
    /// Point index past the end of the tree
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Tree length
        len: usize,
    },

    /// Range reversed or reaching past the end of the tree
    #[error("range {start}..{end} invalid for length {len}")]
    InvalidRange {
        /// Range start
        start: usize,
        /// Range end (exclusive)
        end: usize,
        /// Tree length
        len: usize,
    },

    /// Version id never issued by the ledger
    #[error("unknown version {id} (ledger holds {count})")]
    UnknownVersion {
        /// Requested version
        id: VersionId,
        /// Number of versions recorded
        count: usize,
    },

    /// Pool configuration rejected
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
}
