//! Node storage and allocation accounting
//!
//! Nodes live in a bump arena of fixed-capacity blocks and are never freed
//! individually; a pool is released as a whole.

mod allocator;

pub use allocator::{NodePool, SharedPool};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Snapshot of a pool's allocation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PoolProfile {
    /// Nodes handed out so far (the sentinel is not counted)
    pub nodes_allocated: usize,

    /// Number of blocks allocated
    pub blocks: usize,

    /// Total slots reserved across all blocks
    pub reserved_slots: usize,

    /// Capacity of the block currently being filled
    pub current_block_capacity: usize,
}

impl PoolProfile {
    /// Fraction of reserved slots in use
    pub fn occupancy(&self) -> f64 {
        if self.reserved_slots == 0 {
            return 0.0;
        }
        self.nodes_allocated as f64 / self.reserved_slots as f64
    }

    /// Nodes allocated since `earlier` was taken
    pub fn allocated_since(&self, earlier: &PoolProfile) -> usize {
        self.nodes_allocated - earlier.nodes_allocated
    }

    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "nodes: {}\nblocks: {}\nreserved: {}\ncurrent block: {}\noccupancy: {:.3}",
            self.nodes_allocated,
            self.blocks,
            self.reserved_slots,
            self.current_block_capacity,
            self.occupancy()
        )
    }
}
