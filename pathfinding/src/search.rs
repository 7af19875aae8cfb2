//! The single parameterised best-first search loop every algorithm in
//! this crate (Dijkstra, A*, weighted A*, bounded-suboptimal variants) is
//! an instance of.
//!
//! Grounded on two sources: the `qcell`-free ownership discipline is this
//! crate's own answer to the same problem the teacher's
//! `pathfinding/src/lib.rs` solves with `TLCell`/`TLCellOwner` — nodes
//! keyed by padded id, owned exclusively by the `NodePool` inside the
//! `ExpansionPolicy`, with every other component (the queue, the search
//! loop itself) holding ids rather than references, so two mutable
//! borrows of the same node never coexist and no interior-mutability cell
//! is needed at all. The algorithmic skeleton — mark expanded before
//! generating successors, the `gval + (f - g) < incumbent` domination
//! check, admissibility/feasibility/reopen as data rather than template
//! parameters — is ported from `original_source/include/warthog/search/
//! unidirectional_search.h`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use crate::expansion::{ExpansionPolicy, Successor};
use crate::heuristic::{Heuristic, HeuristicValue};
use crate::ids::{PackedId, PaddedId};
use crate::listener::SearchListener;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmissibilityCriterion {
    /// Stop as soon as any solution (even a grossly suboptimal one) is
    /// found.
    Any,
    /// Stop once the incumbent is provably within a factor `w` of
    /// optimal.
    WAdmissible,
    /// Stop once the incumbent is provably within an additive `eps` of
    /// optimal.
    EpsAdmissible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeasibilityCriterion {
    /// Keep searching until OPEN is exhausted or admissibility is met.
    UntilExhaustion,
    /// Additionally stop once a cost, expansion, or wall-clock cutoff is
    /// crossed.
    UntilCutoff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReopenPolicy {
    /// A CLOSED node whose key improves goes back into OPEN.
    Reopen,
    /// A CLOSED node whose key improves is left CLOSED (its improved
    /// bound is still recorded, but it will not be re-expanded).
    NoReopen,
}

#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    pub admissibility: AdmissibilityCriterion,
    pub feasibility: FeasibilityCriterion,
    pub reopen: ReopenPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            admissibility: AdmissibilityCriterion::Any,
            feasibility: FeasibilityCriterion::UntilExhaustion,
            reopen: ReopenPolicy::NoReopen,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SearchParameters {
    pub cost_cutoff: f64,
    pub expansion_cutoff: u64,
    pub time_cutoff_ns: u64,
    pub w: f64,
    pub eps: f64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        SearchParameters {
            cost_cutoff: f64::INFINITY,
            expansion_cutoff: u64::MAX,
            time_cutoff_ns: u64::MAX,
            w: 1.0,
            eps: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SearchMetrics {
    pub time_ns: u64,
    pub expanded: u64,
    pub generated: u64,
    pub reopened: u64,
    pub surplus: u64,
    pub heap_ops: u64,
    pub lb: f64,
    pub ub: f64,
}

/// Mints the monotonically increasing `search_id`s that mark which
/// `SearchNode`s belong to which query, so a `NodePool` never needs to be
/// cleared between queries.
pub struct SearchScope {
    next_id: AtomicU32,
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchScope {
    pub fn new() -> Self {
        SearchScope { next_id: AtomicU32::new(1) }
    }

    pub fn new_problem(&self, start: PackedId, target: PackedId) -> ProblemInstance {
        ProblemInstance {
            start,
            target,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ProblemInstance {
    pub start: PackedId,
    pub target: PackedId,
    pub id: u32,
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub incumbent: Option<PaddedId>,
    pub sum_of_edge_costs: f64,
    pub path: Vec<PackedId>,
    pub metrics: SearchMetrics,
}

impl Default for Solution {
    fn default() -> Self {
        Solution {
            incumbent: None,
            sum_of_edge_costs: f64::INFINITY,
            path: Vec::new(),
            metrics: SearchMetrics { ub: f64::INFINITY, ..SearchMetrics::default() },
        }
    }
}

pub struct UnidirectionalSearch<'a, E, H> {
    expander: &'a mut E,
    heuristic: &'a H,
    queue: crate::pqueue::PriorityQueue,
    config: SearchConfig,
    listeners: Vec<&'a mut dyn SearchListener>,
}

impl<'a, E: ExpansionPolicy, H: Heuristic> UnidirectionalSearch<'a, E, H> {
    pub fn new(expander: &'a mut E, heuristic: &'a H, config: SearchConfig) -> Self {
        UnidirectionalSearch {
            expander,
            heuristic,
            queue: crate::pqueue::PriorityQueue::new(),
            config,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: &'a mut dyn SearchListener) {
        self.listeners.push(listener);
    }

    fn init_node(&mut self, id: PaddedId, parent: PaddedId, g: f64, problem: &ProblemInstance, params: &SearchParameters, sol: &mut Solution) {
        let packed = self.expander.to_packed(id);
        let mut hv = HeuristicValue {
            from: packed,
            to: problem.target,
            lb: 0.0,
            ub: f64::INFINITY,
            feasible: false,
        };
        self.heuristic.h_bulk(&mut hv);

        let node = self.expander.pool_mut().generate(id);
        node.search_id = problem.id;
        node.parent = parent;
        node.g = g;
        node.f = g + params.w * hv.lb;
        node.ub = if hv.feasible { g + hv.ub } else { f64::INFINITY };
        node.expanded = false;
        let total_ub = node.ub;

        if packed == problem.target && g < sol.sum_of_edge_costs {
            sol.incumbent = Some(id);
            sol.sum_of_edge_costs = g;
        } else if hv.feasible && total_ub < sol.sum_of_edge_costs {
            sol.incumbent = Some(id);
            sol.sum_of_edge_costs = total_ub;
        }

        for l in &mut self.listeners {
            l.on_generate(if parent.is_none() { None } else { Some(parent) }, id, g);
        }
    }

    fn node_f(&self, id: PaddedId) -> f64 {
        self.expander.pool().get(id).unwrap().f
    }

    fn admissible(&self, top: PaddedId, sol: &Solution, params: &SearchParameters) -> bool {
        let lb = self.node_f(top);
        match self.config.admissibility {
            AdmissibilityCriterion::Any => sol.incumbent.is_some(),
            AdmissibilityCriterion::WAdmissible => sol.sum_of_edge_costs <= params.w * lb,
            AdmissibilityCriterion::EpsAdmissible => sol.sum_of_edge_costs <= params.eps + lb,
        }
    }

    fn feasible(&self, top: PaddedId, metrics: &SearchMetrics, params: &SearchParameters, start: Instant) -> bool {
        match self.config.feasibility {
            FeasibilityCriterion::UntilExhaustion => true,
            FeasibilityCriterion::UntilCutoff => {
                if self.node_f(top) > params.cost_cutoff {
                    return false;
                }
                if metrics.expanded >= params.expansion_cutoff {
                    return false;
                }
                if start.elapsed().as_nanos() as u64 >= params.time_cutoff_ns {
                    return false;
                }
                true
            }
        }
    }

    /// Runs the search; does not reconstruct a path (see `get_path`).
    pub fn search(&mut self, problem: &ProblemInstance, params: &SearchParameters) -> Solution {
        let start_time = Instant::now();
        let mut sol = Solution::default();
        self.queue.clear();

        for l in &mut self.listeners {
            l.on_source(problem.start);
            l.on_destination(problem.target);
        }

        let Some(start_node) = self.expander.generate_start_node(problem.start) else {
            return sol;
        };
        if self.expander.generate_target_node(problem.target).is_none() {
            return sol;
        }

        self.init_node(start_node, PaddedId::NONE, 0.0, problem, params, &mut sol);
        self.queue.push(self.expander.pool_mut(), start_node);

        loop {
            let Some(top) = self.queue.peek() else { break };
            if !self.feasible(top, &sol.metrics, params, start_time) {
                break;
            }
            if self.admissible(top, &sol, params) {
                break;
            }

            let current = self.queue.pop(self.expander.pool_mut()).unwrap();
            let (current_g, current_f) = {
                let node = self.expander.pool().get(current).unwrap();
                (node.g, node.f)
            };
            self.expander.pool_mut().generate(current).expanded = true;
            sol.metrics.expanded += 1;
            sol.metrics.lb = current_f;

            for l in &mut self.listeners {
                l.on_close(current, current_g);
            }

            for l in &mut self.listeners {
                l.on_expand(current);
            }

            self.expander.expand(current);
            // Copied out of the expander's successor buffer so the
            // borrow on `self.expander` ends before we need `&mut` access
            // to its node pool below; `Successor` is two words, cheap to
            // clone per expansion.
            let successors: Vec<Successor> = self.expander.successors().to_vec();

            for succ in successors {
                sol.metrics.generated += 1;
                let g_new = current_g + succ.cost;
                let is_new = self.expander.pool().get(succ.node).map(|n| n.search_id) != Some(problem.id);

                if is_new {
                    self.init_node(succ.node, current, g_new, problem, params, &mut sol);
                    let f_new = self.expander.pool().get(succ.node).unwrap().f;
                    if f_new <= sol.sum_of_edge_costs {
                        self.queue.push(self.expander.pool_mut(), succ.node);
                    }
                    continue;
                }

                let (g_old, f_old) = {
                    let n = self.expander.pool().get(succ.node).unwrap();
                    (n.g, n.f)
                };
                if g_new < g_old && g_new + (f_old - g_old) < sol.sum_of_edge_costs {
                    let new_ub = {
                        let delta = g_new - g_old;
                        let n = self.expander.pool_mut().generate(succ.node);
                        n.g = g_new;
                        n.f += delta;
                        n.ub += delta;
                        n.parent = current;
                        n.ub
                    };
                    for l in &mut self.listeners {
                        l.on_relax(succ.node, g_new);
                    }
                    if self.queue.contains(self.expander.pool(), succ.node) {
                        self.queue.decrease_key(self.expander.pool_mut(), succ.node);
                    } else if self.config.reopen == ReopenPolicy::Reopen {
                        self.queue.push(self.expander.pool_mut(), succ.node);
                        sol.metrics.reopened += 1;
                    }
                    let packed = self.expander.to_packed(succ.node);
                    if packed == problem.target && g_new < sol.sum_of_edge_costs {
                        sol.incumbent = Some(succ.node);
                        sol.sum_of_edge_costs = g_new;
                    } else if new_ub < sol.sum_of_edge_costs {
                        sol.incumbent = Some(succ.node);
                        sol.sum_of_edge_costs = new_ub;
                    }
                }
            }
        }

        sol.metrics.time_ns = start_time.elapsed().as_nanos() as u64;
        sol.metrics.surplus = self.queue.len() as u64;
        sol.metrics.heap_ops = self.queue.get_heap_ops();
        if sol.incumbent.is_some() {
            sol.metrics.ub = sol.metrics.ub.min(sol.sum_of_edge_costs);
        }
        sol
    }

    /// Runs the search and reconstructs the path (as packed ids) if one
    /// was found.
    pub fn get_path(&mut self, problem: &ProblemInstance, params: &SearchParameters) -> Solution {
        let mut sol = self.search(problem, params);
        let Some(incumbent) = sol.incumbent else { return sol };

        let mut packed_path = Vec::new();
        let mut current = incumbent;
        loop {
            let node = self.expander.pool().get(current).expect("path node missing from pool");
            packed_path.push(self.expander.to_packed(current));
            if node.parent.is_none() {
                break;
            }
            current = node.parent;
        }
        packed_path.reverse();

        let incumbent_packed = self.expander.to_packed(incumbent);
        if incumbent_packed != problem.target {
            self.heuristic.append_path(incumbent_packed, problem.target, &mut packed_path);
        }

        sol.path = packed_path;
        sol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::UniformCostExpansionPolicy;
    use crate::gridmap::GridMap;
    use crate::heuristic::{OctileHeuristic, ZeroHeuristic};

    fn open_map(w: u32, h: u32) -> GridMap {
        let mut m = GridMap::new(w, h);
        for y in 0..h {
            for x in 0..w {
                m.set_traversable(x, y, true);
            }
        }
        m
    }

    #[test]
    fn astar_on_open_map_finds_octile_optimal_path() {
        let map = open_map(8, 4);
        let mut policy = UniformCostExpansionPolicy::new(&map, true);
        let h = OctileHeuristic::new(&map);
        let scope = SearchScope::new();
        let problem = scope.new_problem(map.xy_to_packed(0, 0), map.xy_to_packed(7, 3));
        let mut search = UnidirectionalSearch::new(&mut policy, &h, SearchConfig::default());
        let sol = search.get_path(&problem, &SearchParameters::default());
        assert_eq!(sol.path.first().copied(), Some(problem.start));
        assert_eq!(sol.path.last().copied(), Some(problem.target));
        assert!((sol.sum_of_edge_costs - (3.0 * SQRT_2_CONST + 4.0)).abs() < 1e-9);
    }

    const SQRT_2_CONST: f64 = std::f64::consts::SQRT_2;

    #[test]
    fn dijkstra_matches_zero_heuristic_cost() {
        let map = open_map(6, 6);
        let mut policy = UniformCostExpansionPolicy::new(&map, false);
        let h = ZeroHeuristic;
        let scope = SearchScope::new();
        let problem = scope.new_problem(map.xy_to_packed(0, 0), map.xy_to_packed(5, 0));
        let mut search = UnidirectionalSearch::new(&mut policy, &h, SearchConfig::default());
        let sol = search.get_path(&problem, &SearchParameters::default());
        assert_eq!(sol.sum_of_edge_costs, 5.0);
    }

    #[test]
    fn blocked_start_yields_no_path() {
        let mut map = open_map(4, 4);
        map.set_traversable(0, 0, false);
        let mut policy = UniformCostExpansionPolicy::new(&map, true);
        let h = ZeroHeuristic;
        let scope = SearchScope::new();
        let problem = scope.new_problem(map.xy_to_packed(0, 0), map.xy_to_packed(3, 3));
        let mut search = UnidirectionalSearch::new(&mut policy, &h, SearchConfig::default());
        let sol = search.get_path(&problem, &SearchParameters::default());
        assert!(sol.incumbent.is_none());
        assert!(sol.path.is_empty());
    }
}
