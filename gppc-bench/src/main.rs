use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use structopt::StructOpt;
use tracing::error;

mod driver;
mod error;
mod map_io;
mod trace;

use driver::Algorithm;

#[derive(StructOpt)]
#[structopt(name = "gppc-bench", about = "Scenario-file driver for grid pathfinding searches")]
struct Options {
    /// astar | astar4c | astar_wgm | dijkstra
    #[structopt(short, long, parse(try_from_str))]
    alg: Algorithm,

    /// GPPC scenario file (.scen).
    #[structopt(long, parse(from_os_str))]
    scen: PathBuf,

    /// Map file; derived from the scenario's declared map name if omitted.
    #[structopt(long, parse(from_os_str))]
    map: Option<PathBuf>,

    /// Cost table; required for `--alg astar_wgm`.
    #[structopt(long, parse(from_os_str))]
    costs: Option<PathBuf>,

    /// Verify each query's cost against the scenario's declared optimal
    /// distance; exit code 4 if any query fails.
    #[structopt(long)]
    checkopt: bool,

    /// Emit a YAML trace of search events and structured progress logs.
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let options = Options::from_args();

    let filter = if options.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .without_time()
        .init();

    match run(options) {
        Ok(true) => ExitCode::from(4),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(true)` when `--checkopt` caught an optimality failure.
fn run(options: Options) -> Result<bool> {
    if options.alg == Algorithm::AStarWgm && options.costs.is_none() {
        anyhow::bail!("--costs is required for --alg astar_wgm");
    }

    let outcome = driver::run_scenario(
        options.alg,
        &options.scen,
        options.map.as_deref(),
        options.costs.as_deref(),
        options.checkopt,
        options.verbose,
    )
    .with_context(|| format!("running scenario {}", options.scen.display()))?;

    if outcome.rows.is_empty() {
        anyhow::bail!("scenario {} has no queries", options.scen.display());
    }

    driver::tsv_header();
    for row in &outcome.rows {
        row.print_tsv();
    }

    Ok(outcome.checkopt_failed)
}
