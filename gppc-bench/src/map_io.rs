//! Map, scenario, and cost-table file loading.
//!
//! Scenario parsing (`parse_scen`) is grounded on the teacher's
//! `movingai.rs::parse_scen`: same `version 1` header check, same
//! whitespace-split row shape, same eight positional fields. Map and
//! cost-table parsing instead delegate to `GridMap::parse_ascii`/
//! `WeightedGridMap::parse_ascii`/`CostTable::parse`, since those now live
//! in `pathfinding` rather than being reimplemented per-driver the way
//! the teacher's `movingai.rs` builds a `BitGrid` directly.

use std::fs;
use std::path::{Path, PathBuf};

use pathfinding::{CostTable, GridMap, WeightedGridMap};

use crate::error::LoadError;

pub struct ScenarioQuery {
    pub bucket: u32,
    pub map_name: String,
    pub map_width: u32,
    pub map_height: u32,
    pub start: (u32, u32),
    pub goal: (u32, u32),
    /// Verbatim text of the declared optimal distance, kept so its decimal
    /// precision survives for `--checkopt`.
    pub optimal_distance_text: String,
    pub optimal_distance: f64,
}

pub struct Scenario {
    pub queries: Vec<ScenarioQuery>,
}

/// Number of digits after the decimal point across every
/// `optimal_distance` field in the scenario, used to pick `--checkopt`'s
/// tolerance. Defaults to 4 (the MovingAI convention) when every value is
/// integral.
pub fn inferred_precision(scenario: &Scenario) -> u32 {
    scenario
        .queries
        .iter()
        .map(|q| match q.optimal_distance_text.split_once('.') {
            Some((_, frac)) => frac.trim_end_matches('0').len() as u32,
            None => 0,
        })
        .max()
        .filter(|&p| p > 0)
        .unwrap_or(4)
}

pub fn load_scenario(path: &Path) -> Result<Scenario, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_owned(), source })?;
    parse_scen(path, &text)
}

fn parse_scen(path: &Path, text: &str) -> Result<Scenario, LoadError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| LoadError::Scenario {
        path: path.to_owned(),
        reason: "empty scenario file".to_string(),
    })?;
    let mut header_fields = header.split_whitespace();
    let version_kw = header_fields.next();
    let version = header_fields.next();
    if version_kw != Some("version") || !matches!(version, Some("1") | Some("1.0")) {
        return Err(LoadError::Scenario { path: path.to_owned(), reason: "missing `version 1` header".to_string() });
    }

    let mut queries = Vec::new();
    for (row, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [bucket, map_name, map_width, map_height, sx, sy, gx, gy, dist] = <[&str; 9]>::try_from(fields)
            .map_err(|_| LoadError::Scenario { path: path.to_owned(), reason: format!("row {row} has the wrong field count") })?;

        let parse_u32 = |s: &str| -> Result<u32, LoadError> {
            s.parse().map_err(|_| LoadError::Scenario { path: path.to_owned(), reason: format!("row {row}: invalid integer {s:?}") })
        };
        let parse_f64 = |s: &str| -> Result<f64, LoadError> {
            s.parse().map_err(|_| LoadError::Scenario { path: path.to_owned(), reason: format!("row {row}: invalid distance {s:?}") })
        };

        queries.push(ScenarioQuery {
            bucket: parse_u32(bucket)?,
            map_name: map_name.to_string(),
            map_width: parse_u32(map_width)?,
            map_height: parse_u32(map_height)?,
            start: (parse_u32(sx)?, parse_u32(sy)?),
            goal: (parse_u32(gx)?, parse_u32(gy)?),
            optimal_distance_text: dist.to_string(),
            optimal_distance: parse_f64(dist)?,
        });
    }

    Ok(Scenario { queries })
}

/// Resolves a scenario's declared map name to an actual file: absolute
/// paths are used as-is; otherwise try `(scenario dir)/(name)`, then the
/// scenario path with its extension replaced by `.map`.
pub fn resolve_map_path(scen_path: &Path, map_name: &str) -> Result<PathBuf, LoadError> {
    let declared = PathBuf::from(map_name);
    if declared.is_absolute() && declared.is_file() {
        return Ok(declared);
    }
    if let Some(dir) = scen_path.parent() {
        let candidate = dir.join(map_name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    let candidate = scen_path.with_extension("map");
    if candidate.is_file() {
        return Ok(candidate);
    }
    Err(LoadError::UnresolvedMap { scen: scen_path.to_owned() })
}

pub fn load_map(path: &Path) -> Result<GridMap, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_owned(), source })?;
    GridMap::parse_ascii(&text).map_err(|source| LoadError::Map { path: path.to_owned(), source })
}

pub fn load_weighted_map(path: &Path) -> Result<WeightedGridMap, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_owned(), source })?;
    WeightedGridMap::parse_ascii(&text).map_err(|source| LoadError::Map { path: path.to_owned(), source })
}

pub fn load_cost_table(path: &Path) -> Result<CostTable, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_owned(), source })?;
    CostTable::parse(&text).map_err(|source| LoadError::Costs { path: path.to_owned(), source })
}

pub fn check_map_size(scen_path: &Path, map_path: &Path, decl_w: u32, decl_h: u32, map_w: u32, map_h: u32) -> Result<(), LoadError> {
    if decl_w != map_w || decl_h != map_h {
        return Err(LoadError::MapSizeMismatch {
            scen: scen_path.to_owned(),
            map_path: map_path.to_owned(),
            decl_w,
            decl_h,
            map_w,
            map_h,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_scenario() {
        let text = "version 1\n0\tmaze.map\t8\t4\t0\t0\t7\t0\t7.00000000\n";
        let scen = parse_scen(Path::new("x.scen"), text).unwrap();
        assert_eq!(scen.queries.len(), 1);
        assert_eq!(scen.queries[0].start, (0, 0));
        assert_eq!(scen.queries[0].goal, (7, 0));
        assert_eq!(scen.queries[0].optimal_distance, 7.0);
    }

    #[test]
    fn rejects_bad_version() {
        let text = "version 2\n";
        assert!(parse_scen(Path::new("x.scen"), text).is_err());
    }

    #[test]
    fn precision_inferred_from_decimal_digits() {
        let text = "version 1\n0\tm.map\t8\t4\t0\t1\t6\t1\t6.828427\n";
        let scen = parse_scen(Path::new("x.scen"), text).unwrap();
        assert_eq!(inferred_precision(&scen), 6);
    }
}
