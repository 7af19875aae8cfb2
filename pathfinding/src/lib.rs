//! Grid-based best-first search.
//!
//! `GridMap`/`WeightedGridMap` hold the domain, `ExpansionPolicy`
//! implementations generate successors over one of them, `Heuristic`
//! implementations bound the remaining distance, and
//! `UnidirectionalSearch` ties a policy and a heuristic together into
//! Dijkstra, A*, weighted A*, or a bounded-suboptimal search depending on
//! its `SearchConfig`.

pub mod bittable;
pub mod expansion;
pub mod gridmap;
pub mod heuristic;
pub mod ids;
pub mod listener;
mod neighbourhood;
mod node_pool;
mod padding;
pub mod pqueue;
pub mod search;
pub mod weighted;

pub use expansion::{ExpansionPolicy, Successor, UniformCostExpansionPolicy, WeightedExpansionPolicy};
pub use gridmap::{GridMap, GridMapError};
pub use heuristic::{Heuristic, HeuristicValue, ManhattanHeuristic, OctileHeuristic, WeightedOctileHeuristic, ZeroHeuristic};
pub use ids::{PackedId, PaddedId};
pub use listener::SearchListener;
pub use neighbourhood::Neighbourhood;
pub use node_pool::{NodePool, SearchNode, BLOCK_SIZE};
pub use search::{
    AdmissibilityCriterion, FeasibilityCriterion, ProblemInstance, ReopenPolicy, SearchConfig,
    SearchMetrics, SearchParameters, SearchScope, Solution, UnidirectionalSearch,
};
pub use weighted::{CostTable, CostTableError, WeightedGridMap};
