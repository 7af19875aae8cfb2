//! Terrain-code to movement-cost lookup.
//!
//! No direct teacher analogue; ported from `original_source/include/
//! warthog/util/cost_table.h` and its `.cpp` in this crate's idiom: a
//! fixed `[f64; 256]` table, `Result`-returning parse instead of
//! `exit(1)`, `0.0` reserved for "impassable" and `NaN` for "unspecified".

use std::fmt;

#[derive(Debug)]
pub enum CostTableError {
    InvalidLine(String),
    NegativeCost { terrain: char, cost: f64 },
    DuplicateTerrain(char),
}

impl fmt::Display for CostTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostTableError::InvalidLine(line) => write!(f, "invalid cost table line: {line:?}"),
            CostTableError::NegativeCost { terrain, cost } => {
                write!(f, "negative cost {cost} for terrain {terrain:?}")
            }
            CostTableError::DuplicateTerrain(terrain) => {
                write!(f, "terrain {terrain:?} defined more than once")
            }
        }
    }
}

impl std::error::Error for CostTableError {}

pub struct CostTable {
    costs: [f64; 256],
}

impl Default for CostTable {
    fn default() -> Self {
        let mut costs = [f64::NAN; 256];
        costs[0] = 0.0;
        CostTable { costs }
    }
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, terrain: u8, cost: f64) {
        self.costs[terrain as usize] = cost;
    }

    pub fn get(&self, terrain: u8) -> f64 {
        self.costs[terrain as usize]
    }

    /// Parses `<char> <cost>` lines (blank lines and `#`-prefixed comments
    /// ignored). Terrain code `0` is reserved (always costs `0.0`,
    /// impassable) and cannot be redefined.
    pub fn parse(text: &str) -> Result<CostTable, CostTableError> {
        let mut table = CostTable::new();
        let mut seen = [false; 256];
        seen[0] = true;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let ch = parts.next().unwrap_or("");
            let cost_str = parts.next().unwrap_or("").trim();
            let terrain = ch.chars().next().filter(|_| ch.chars().count() == 1);
            let cost: Option<f64> = cost_str.parse().ok();
            let (terrain, cost) = match (terrain, cost) {
                (Some(t), Some(c)) => (t, c),
                _ => return Err(CostTableError::InvalidLine(line.to_string())),
            };
            if terrain as u32 > 255 {
                return Err(CostTableError::InvalidLine(line.to_string()));
            }
            let code = terrain as u8;
            if seen[code as usize] {
                return Err(CostTableError::DuplicateTerrain(terrain));
            }
            if cost < 0.0 {
                return Err(CostTableError::NegativeCost { terrain, cost });
            }
            seen[code as usize] = true;
            table.set(code, cost);
        }
        Ok(table)
    }

    /// The smallest finite, positive cost of any terrain code that
    /// actually appears on `map`, or `NaN` if any cell's terrain code has
    /// no defined cost. `None` if the map has no traversable cells at all.
    pub fn lowest_cost(&self, map: &super::WeightedGridMap) -> Option<f64> {
        let mut lowest = f64::INFINITY;
        for y in 0..map.height() {
            for x in 0..map.width() {
                let code = map.terrain_at(x, y);
                let cost = self.get(code);
                if cost.is_nan() {
                    return Some(f64::NAN);
                }
                if cost > 0.0 && cost < lowest {
                    lowest = cost;
                }
            }
        }
        if lowest.is_finite() {
            Some(lowest)
        } else {
            None
        }
    }

    /// The terrain code of the first cell on `map` whose cost is
    /// unspecified, for error reporting once `lowest_cost` has flagged one.
    pub fn first_unspecified(&self, map: &super::WeightedGridMap) -> Option<char> {
        for y in 0..map.height() {
            for x in 0..map.width() {
                let code = map.terrain_at(x, y);
                if self.get(code).is_nan() {
                    return Some(code as char);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unspecified_except_zero() {
        let t = CostTable::new();
        assert_eq!(t.get(0), 0.0);
        assert!(t.get(1).is_nan());
    }

    #[test]
    fn parse_rejects_duplicate_and_negative() {
        assert!(matches!(
            CostTable::parse(". 1.0\n. 2.0\n"),
            Err(CostTableError::DuplicateTerrain('.'))
        ));
        assert!(matches!(
            CostTable::parse("~ -1.0\n"),
            Err(CostTableError::NegativeCost { .. })
        ));
    }

    #[test]
    fn parse_accepts_basic_table() {
        let t = CostTable::parse(". 1.0\n~ 5.0\n# comment\n").unwrap();
        assert_eq!(t.get(b'.'), 1.0);
        assert_eq!(t.get(b'~'), 5.0);
    }
}
