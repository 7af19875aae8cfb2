//! The interface `UnidirectionalSearch` expands a frontier through.
//!
//! Grounded on the teacher's `expansion_policy/mod.rs` trait shape
//! (`expand` filling a caller-visible buffer); `pool`/`pool_mut` replace
//! the teacher's implicit "the search owns a matching `NodePool`"
//! convention with an explicit accessor, since this crate's `NodePool`
//! has no generic `VertexId` parameter for the search to hold one of on
//! its own.

mod uniform;
mod weighted;

pub use uniform::UniformCostExpansionPolicy;
pub use weighted::WeightedExpansionPolicy;

use crate::ids::{PackedId, PaddedId};
use crate::node_pool::NodePool;

#[derive(Clone, Copy, Debug)]
pub struct Successor {
    pub node: PaddedId,
    pub cost: f64,
}

pub trait ExpansionPolicy {
    fn pool(&self) -> &NodePool;
    fn pool_mut(&mut self) -> &mut NodePool;

    fn to_padded(&self, id: PackedId) -> PaddedId;
    fn to_packed(&self, id: PaddedId) -> PackedId;

    /// Generates the node for `start`, or `None` if it is impassable.
    fn generate_start_node(&mut self, start: PackedId) -> Option<PaddedId>;

    /// Generates the node for `target`, or `None` if it is impassable.
    fn generate_target_node(&mut self, target: PackedId) -> Option<PaddedId>;

    /// Clears and refills the successor buffer with `current`'s
    /// successors.
    fn expand(&mut self, current: PaddedId);

    fn successors(&self) -> &[Successor];

    fn mem(&self) -> usize;
}
