//! Loader error taxonomy. Every variant here is a fatal, exit-1 condition
//! by the time it reaches `main` — the loader never partially recovers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{path:?}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("{path:?}: {source}")]
    Map { path: PathBuf, #[source] source: pathfinding::GridMapError },

    #[error("{path:?}: {source}")]
    Costs { path: PathBuf, #[source] source: pathfinding::CostTableError },

    #[error("{path:?}: {reason}")]
    Scenario { path: PathBuf, reason: String },

    #[error("could not resolve a map file for scenario {scen:?}")]
    UnresolvedMap { scen: PathBuf },

    #[error("scenario declares a {decl_w}x{decl_h} map but {map_path:?} is {map_w}x{map_h}")]
    MapSizeMismatch {
        scen: PathBuf,
        map_path: PathBuf,
        decl_w: u32,
        decl_h: u32,
        map_w: u32,
        map_h: u32,
    },

    #[error("--costs is required for algorithm astar_wgm")]
    MissingCostTable,

    #[error("terrain {ch:?} at query time has no defined cost (NaN)")]
    UnspecifiedTerrain { ch: char },
}
