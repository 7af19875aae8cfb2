//! Scenario iteration: builds the map/heuristic/expansion policy/search
//! object once per scenario file, then runs one query at a time and
//! prints a tab-separated metrics row per query.
//!
//! Grounded on the teacher's `benchmark/src/main.rs::run_grid_problems`
//! (construct the expander once, loop queries through it), generalized
//! from "one hardcoded policy per `Algorithm` match arm" to the
//! uniform/weighted split this crate's `ExpansionPolicy` trait models.

use std::path::Path;
use std::str::FromStr;

use pathfinding::{
    AdmissibilityCriterion, ExpansionPolicy, FeasibilityCriterion, GridMap, Heuristic,
    ManhattanHeuristic, OctileHeuristic, ReopenPolicy, SearchConfig, SearchParameters,
    SearchScope, UnidirectionalSearch, UniformCostExpansionPolicy, WeightedExpansionPolicy,
    WeightedOctileHeuristic,
};
use tracing::info;

use crate::error::LoadError;
use crate::map_io;
use crate::trace::YamlTraceListener;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    AStar,
    AStar4c,
    AStarWgm,
    Dijkstra,
}

impl FromStr for Algorithm {
    type Err = InvalidAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "astar" => Algorithm::AStar,
            "astar4c" => Algorithm::AStar4c,
            "astar_wgm" => Algorithm::AStarWgm,
            "dijkstra" => Algorithm::Dijkstra,
            _ => return Err(InvalidAlgorithm(s.to_string())),
        })
    }
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "astar",
            Algorithm::AStar4c => "astar4c",
            Algorithm::AStarWgm => "astar_wgm",
            Algorithm::Dijkstra => "dijkstra",
        }
    }
}

#[derive(Debug)]
pub struct InvalidAlgorithm(String);

impl std::fmt::Display for InvalidAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized algorithm {:?}", self.0)
    }
}

impl std::error::Error for InvalidAlgorithm {}

pub struct QueryRow {
    pub id: usize,
    pub alg: &'static str,
    pub expanded: u64,
    pub generated: u64,
    pub reopened: u64,
    pub surplus: u64,
    pub heap_ops: u64,
    pub nanos: u64,
    pub plen: usize,
    pub pcost: f64,
    pub scost: f64,
    pub map_name: String,
}

impl QueryRow {
    pub fn print_tsv(&self) {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.alg,
            self.expanded,
            self.generated,
            self.reopened,
            self.surplus,
            self.heap_ops,
            self.nanos,
            self.plen,
            self.pcost,
            self.scost,
            self.map_name,
        );
    }
}

pub fn tsv_header() {
    println!("id\talg\texpanded\tgenerated\treopen\tsurplus\theapops\tnanos\tplen\tpcost\tscost\tmap");
}

pub struct RunOutcome {
    pub rows: Vec<QueryRow>,
    pub checkopt_failed: bool,
}

pub fn run_scenario(
    alg: Algorithm,
    scen_path: &Path,
    map_override: Option<&Path>,
    costs_override: Option<&Path>,
    checkopt: bool,
    verbose: bool,
) -> Result<RunOutcome, LoadError> {
    let scenario = map_io::load_scenario(scen_path)?;
    if scenario.queries.is_empty() {
        return Ok(RunOutcome { rows: Vec::new(), checkopt_failed: false });
    }

    let first = &scenario.queries[0];
    let map_path = match map_override {
        Some(p) => p.to_owned(),
        None => map_io::resolve_map_path(scen_path, &first.map_name)?,
    };
    info!(map = %map_path.display(), queries = scenario.queries.len(), "loaded scenario");

    let precision = map_io::inferred_precision(&scenario);
    let eps = 10f64.powi(-(precision as i32)) / 2.0;

    let outcome = match alg {
        Algorithm::AStarWgm => {
            let costs_path = costs_override.ok_or(LoadError::MissingCostTable)?;
            let map = map_io::load_weighted_map(&map_path)?;
            map_io::check_map_size(scen_path, &map_path, first.map_width, first.map_height, map.width(), map.height())?;
            let costs = map_io::load_cost_table(costs_path)?;
            let scale = match costs.lowest_cost(&map) {
                Some(v) if v.is_finite() => v,
                _ => {
                    let ch = costs.first_unspecified(&map).unwrap_or('?');
                    return Err(LoadError::UnspecifiedTerrain { ch });
                }
            };
            let heuristic = WeightedOctileHeuristic::new(&map, scale);
            let width = map.width();
            let mut policy = WeightedExpansionPolicy::new(&map, &costs);
            run_with_policy(alg, &scenario, &map_path, &mut policy, &heuristic, checkopt, eps, width, None::<&GridMap>, verbose)
        }
        Algorithm::AStar | Algorithm::AStar4c | Algorithm::Dijkstra => {
            let map = map_io::load_map(&map_path)?;
            map_io::check_map_size(scen_path, &map_path, first.map_width, first.map_height, map.width(), map.height())?;
            let diagonals = alg != Algorithm::AStar4c;
            let width = map.width();
            let mut policy = UniformCostExpansionPolicy::new(&map, diagonals);
            match alg {
                Algorithm::Dijkstra => {
                    let heuristic = pathfinding::ZeroHeuristic;
                    run_with_policy(alg, &scenario, &map_path, &mut policy, &heuristic, checkopt, eps, width, Some(&map), verbose)
                }
                Algorithm::AStar4c => {
                    let heuristic = ManhattanHeuristic::new(&map);
                    run_with_policy(alg, &scenario, &map_path, &mut policy, &heuristic, checkopt, eps, width, Some(&map), verbose)
                }
                _ => {
                    let heuristic = OctileHeuristic::new(&map);
                    run_with_policy(alg, &scenario, &map_path, &mut policy, &heuristic, checkopt, eps, width, Some(&map), verbose)
                }
            }
        }
    };

    Ok(outcome)
}

#[allow(clippy::too_many_arguments)]
fn run_with_policy<E: ExpansionPolicy, H: Heuristic>(
    alg: Algorithm,
    scenario: &map_io::Scenario,
    map_path: &Path,
    policy: &mut E,
    heuristic: &H,
    checkopt: bool,
    eps: f64,
    width: u32,
    trace_map: Option<&GridMap>,
    verbose: bool,
) -> RunOutcome {
    let scope = SearchScope::new();
    let mut rows = Vec::with_capacity(scenario.queries.len());
    let mut checkopt_failed = false;
    let map_name = map_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    for (idx, query) in scenario.queries.iter().enumerate() {
        let start = pathfinding::PackedId::from(query.start.1 * width + query.start.0);
        let goal = pathfinding::PackedId::from(query.goal.1 * width + query.goal.0);
        let problem = scope.new_problem(start, goal);

        let mut search = UnidirectionalSearch::new(policy, heuristic, SearchConfig {
            admissibility: AdmissibilityCriterion::WAdmissible,
            feasibility: FeasibilityCriterion::UntilExhaustion,
            reopen: ReopenPolicy::NoReopen,
        });

        let sol = if verbose {
            if let Some(map) = trace_map {
                let mut listener = YamlTraceListener::new(map);
                search.add_listener(&mut listener);
                search.get_path(&problem, &SearchParameters::default())
            } else {
                search.get_path(&problem, &SearchParameters::default())
            }
        } else {
            search.get_path(&problem, &SearchParameters::default())
        };

        if checkopt && (sol.sum_of_edge_costs - query.optimal_distance).abs() >= eps {
            checkopt_failed = true;
        }

        rows.push(QueryRow {
            id: idx,
            alg: alg.name(),
            expanded: sol.metrics.expanded,
            generated: sol.metrics.generated,
            reopened: sol.metrics.reopened,
            surplus: sol.metrics.surplus,
            heap_ops: sol.metrics.heap_ops,
            nanos: sol.metrics.time_ns,
            plen: sol.path.len(),
            pcost: sol.sum_of_edge_costs,
            scost: query.optimal_distance,
            map_name: map_name.clone(),
        });
    }

    RunOutcome { rows, checkopt_failed }
}
