//! Block-lazy storage for `SearchNode`s, keyed by padded id.
//!
//! Grounded on the teacher's `node_pool/gridpool.rs` and
//! `node_pool/indexpool.rs` (the `SearchNode` field set, `search_id`
//! stamping), but where the teacher's `GridPool`/`IndexPool` allocate the
//! whole backing table up front, this pool allocates in fixed blocks of
//! `BLOCK_SIZE` nodes on first touch, using the arena-of-fixed-size-blocks
//! pattern the teacher's `HashPool` already uses `bumpalo` for (reused
//! here instead of a second bespoke allocator).

use std::ptr::NonNull;

use bumpalo::Bump;

use crate::ids::PaddedId;

/// Nodes per lazily-allocated block.
pub const BLOCK_SIZE: usize = 8;

#[derive(Clone, Copy, Debug)]
pub struct SearchNode {
    pub id: PaddedId,
    pub parent: PaddedId,
    pub g: f64,
    pub f: f64,
    pub ub: f64,
    pub expanded: bool,
    pub search_id: u32,
    pub heap_slot: u32,
}

impl SearchNode {
    fn fresh(id: PaddedId) -> Self {
        SearchNode {
            id,
            parent: PaddedId::NONE,
            g: f64::INFINITY,
            f: f64::INFINITY,
            ub: f64::INFINITY,
            expanded: false,
            search_id: u32::MAX,
            heap_slot: u32::MAX,
        }
    }
}

type Block = [SearchNode; BLOCK_SIZE];

/// Owns every `SearchNode` for one `ExpansionPolicy`. Deliberately unaware
/// of "which search is current" — a node's `search_id` field records the
/// search that last initialised it, and it is the caller's (the search
/// loop's) job to notice a stale id and reinitialise before using a node,
/// the same split the reference engine's `unidirectional_search.h` makes
/// between `NodePool::generate` and `initialise_node_`.
pub struct NodePool {
    blocks: Vec<Option<NonNull<Block>>>,
    arena: Bump,
    max_id: u32,
}

// SAFETY: `blocks` only ever holds pointers into `arena`, which this
// struct owns outright; nothing escapes a `&mut self`/`&self` borrow of
// this type, so the raw pointers never alias a live reference elsewhere.
unsafe impl Send for NodePool {}

impl NodePool {
    pub fn new(max_id: u32) -> Self {
        let nblocks = (max_id as usize + BLOCK_SIZE - 1) / BLOCK_SIZE;
        NodePool {
            blocks: vec![None; nblocks],
            arena: Bump::new(),
            max_id,
        }
    }

    pub fn mem(&self) -> usize {
        self.arena.allocated_bytes()
            + self.blocks.capacity() * std::mem::size_of::<Option<NonNull<Block>>>()
    }

    /// Returns the node for `id`, allocating its containing block on first
    /// touch. Freshly allocated nodes read back with `search_id ==
    /// u32::MAX`, which never matches a real `ProblemInstance::id` (those
    /// start at 1), so the search loop's staleness check fires naturally.
    pub fn generate(&mut self, id: PaddedId) -> &mut SearchNode {
        let idx = id.raw();
        assert!(idx < self.max_id, "padded id {idx} out of bounds for this node pool");
        let block_idx = (idx / BLOCK_SIZE as u32) as usize;
        let slot = (idx % BLOCK_SIZE as u32) as usize;

        let ptr = match self.blocks[block_idx] {
            Some(ptr) => ptr,
            None => {
                let base = block_idx as u32 * BLOCK_SIZE as u32;
                let block: Block = std::array::from_fn(|i| SearchNode::fresh(PaddedId(base + i as u32)));
                let ptr = NonNull::from(self.arena.alloc(block));
                self.blocks[block_idx] = Some(ptr);
                ptr
            }
        };

        // SAFETY: `ptr` was allocated from `self.arena`, which outlives
        // this borrow and never frees or moves individual allocations.
        let block = unsafe { &mut *ptr.as_ptr() };
        &mut block[slot]
    }

    /// The node for `id` if its block has been allocated, regardless of
    /// whether it was touched by the current search.
    pub fn get(&self, id: PaddedId) -> Option<&SearchNode> {
        let idx = id.raw();
        if idx >= self.max_id {
            return None;
        }
        let block_idx = (idx / BLOCK_SIZE as u32) as usize;
        let slot = (idx % BLOCK_SIZE as u32) as usize;
        let ptr = self.blocks.get(block_idx).copied().flatten()?;
        // SAFETY: see `generate`.
        let block = unsafe { &*ptr.as_ptr() };
        Some(&block[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_has_infinite_bounds() {
        let mut pool = NodePool::new(100);
        let n = pool.generate(PaddedId(42));
        assert_eq!(n.g, f64::INFINITY);
        assert_eq!(n.search_id, u32::MAX);
    }

    #[test]
    fn get_before_generate_is_none() {
        let pool = NodePool::new(100);
        assert!(pool.get(PaddedId(5)).is_none());
    }

    #[test]
    fn values_persist_across_calls() {
        let mut pool = NodePool::new(100);
        pool.generate(PaddedId(7)).g = 3.5;
        assert_eq!(pool.get(PaddedId(7)).unwrap().g, 3.5);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_panics() {
        let mut pool = NodePool::new(10);
        pool.generate(PaddedId(10));
    }
}
