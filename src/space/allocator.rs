//! Block-growing bump allocator for tree nodes

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::PoolProfile;
use crate::algebra::LazyMonoid;
use crate::tree::{Node, NodeRef};
use crate::PoolConfig;

/// Pool shared by every version built in it.
///
/// Dropped, together with all its nodes, once the last version or external
/// handle goes away.
pub type SharedPool<M> = Rc<RefCell<NodePool<M>>>;

/// Arena of tree nodes
///
/// Blocks are allocated with a fixed capacity and never resized, so a
/// [`NodeRef`] stays valid for the lifetime of the pool. When the current
/// block is full the next one is `growth_factor` times larger.
pub struct NodePool<M: LazyMonoid> {
    /// Filled blocks followed by the block currently being filled
    blocks: Vec<Vec<Node<M>>>,

    /// Capacity of the last block in `blocks`
    block_capacity: usize,

    growth_factor: f64,

    /// Read-only target of [`NodeRef::NIL`]
    sentinel: Node<M>,

    /// Total slots reserved across blocks
    reserved: usize,

    allocated: usize,
}

impl<M: LazyMonoid> NodePool<M> {
    /// Create an empty pool; the first block is reserved on first use.
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            blocks: Vec::new(),
            block_capacity: config.initial_block_capacity(),
            growth_factor: config.growth_factor(),
            sentinel: Node::nil(),
            reserved: 0,
            allocated: 0,
        }
    }

    /// Create a pool behind a shared handle.
    pub fn shared(config: &PoolConfig) -> SharedPool<M> {
        Rc::new(RefCell::new(Self::new(config)))
    }

    /// Resolve a handle. [`NodeRef::NIL`] resolves to the sentinel.
    #[inline]
    pub(crate) fn get(&self, node: NodeRef) -> &Node<M> {
        if node.is_nil() {
            return &self.sentinel;
        }
        &self.blocks[node.block()][node.slot()]
    }

    /// Store a node and return its handle.
    pub(crate) fn alloc(&mut self, node: Node<M>) -> NodeRef {
        let full = match self.blocks.last() {
            Some(block) => block.len() == self.block_capacity,
            None => true,
        };
        if full {
            self.grow();
        }

        let block_idx = self.blocks.len() - 1;
        let block = &mut self.blocks[block_idx];
        let slot = block.len();
        block.push(node);
        self.allocated += 1;

        NodeRef::new(block_idx as u32, slot as u32)
    }

    /// Reserve the next block
    fn grow(&mut self) {
        if !self.blocks.is_empty() {
            let scaled = (self.block_capacity as f64 * self.growth_factor).ceil() as usize;
            self.block_capacity = scaled.max(self.block_capacity);
        }
        assert!(
            self.blocks.len() < u32::MAX as usize && self.block_capacity <= u32::MAX as usize,
            "node pool exceeded its addressable size"
        );

        self.blocks.push(Vec::with_capacity(self.block_capacity));
        self.reserved += self.block_capacity;

        debug!(
            block = self.blocks.len() - 1,
            capacity = self.block_capacity,
            reserved = self.reserved,
            "node pool grew"
        );
    }

    /// New leaf holding `data`.
    pub(crate) fn make_leaf(&mut self, data: M::Value) -> NodeRef {
        self.alloc(Node::leaf(data))
    }

    /// New internal node over two children with no pending update.
    pub(crate) fn merge(&mut self, left: NodeRef, right: NodeRef) -> NodeRef {
        let data = M::op(&self.get(left).data, &self.get(right).data);
        self.alloc(Node {
            data,
            lazy: M::f_id(),
            left,
            right,
        })
    }

    /// Copy of `node` with `f` applied to its data.
    ///
    /// Internal nodes keep `f` pending for their (shared) children; leaves
    /// have nothing below them and keep the identity update.
    pub(crate) fn derive(&mut self, node: NodeRef, f: &M::Update, leaf: bool) -> NodeRef {
        let source = self.get(node);
        let data = M::f_apply(f, &source.data);
        let lazy = if leaf {
            M::f_id()
        } else {
            M::f_compose(f, &source.lazy)
        };
        let (left, right) = (source.left, source.right);

        self.alloc(Node {
            data,
            lazy,
            left,
            right,
        })
    }

    /// Nodes handed out so far
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// Whether no node has been allocated yet
    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    /// Snapshot of the allocation counters
    pub fn profile(&self) -> PoolProfile {
        PoolProfile {
            nodes_allocated: self.allocated,
            blocks: self.blocks.len(),
            reserved_slots: self.reserved,
            current_block_capacity: if self.blocks.is_empty() {
                0
            } else {
                self.block_capacity
            },
        }
    }
}

impl<M: LazyMonoid> fmt::Debug for NodePool<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePool")
            .field("profile", &self.profile())
            .field("growth_factor", &self.growth_factor)
            .finish()
    }
}
