//! Byte-per-cell terrain grid, paired with a `CostTable` to turn terrain
//! codes into movement costs.
//!
//! Padding scheme and neighbourhood capture are adapted from the teacher's
//! `WeightedGrid<V>` (`weighted_grid/map.rs`): same padded-border idea as
//! `GridMap`, but one terrain byte per cell rather than packed bits, since
//! there is no fixed bit width to exploit and plain byte indexing is both
//! simpler and exactly as fast here.

use crate::ids::{PackedId, PaddedId};
use crate::neighbourhood::Neighbourhood;
use crate::padding::{self, PADDING_ROWS};

pub struct WeightedGridMap {
    width: u32,
    height: u32,
    padded_width: u32,
    padded_height: u32,
    cells: Box<[u8]>,
}

impl WeightedGridMap {
    /// An all-zero (impassable, by `CostTable`'s convention) `width x
    /// height` map.
    pub fn new(width: u32, height: u32) -> Self {
        let padded_width = width + 1;
        let padded_height = height + 2 * PADDING_ROWS;
        WeightedGridMap {
            width,
            height,
            padded_width,
            padded_height,
            cells: vec![0u8; padded_width as usize * padded_height as usize].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn padded_width(&self) -> u32 {
        self.padded_width
    }

    pub fn xy_to_packed(&self, x: u32, y: u32) -> PackedId {
        debug_assert!(x < self.width && y < self.height);
        PackedId(y * self.width + x)
    }

    pub fn packed_to_xy(&self, id: PackedId) -> (u32, u32) {
        (id.0 % self.width, id.0 / self.width)
    }

    pub fn to_padded(&self, id: PackedId) -> PaddedId {
        PaddedId(padding::to_padded(id.0, self.width, self.padded_width))
    }

    pub fn to_packed(&self, id: PaddedId) -> PackedId {
        PackedId(padding::to_packed(id.0, self.width, self.padded_width))
    }

    pub fn terrain(&self, id: PaddedId) -> u8 {
        self.cells[id.0 as usize]
    }

    pub fn terrain_at(&self, x: u32, y: u32) -> u8 {
        self.terrain(self.to_padded(self.xy_to_packed(x, y)))
    }

    pub fn set(&mut self, x: u32, y: u32, terrain: u8) {
        let padded = self.to_padded(self.xy_to_packed(x, y));
        self.cells[padded.0 as usize] = terrain;
    }

    pub fn neighbourhood(&self, p: PaddedId) -> Neighbourhood<u8> {
        let stride = self.padded_width as i64;
        let id = p.0 as i64;
        let at = |off: i64| self.cells[(id + off) as usize];
        Neighbourhood {
            nw: at(-stride - 1),
            n: at(-stride),
            ne: at(-stride + 1),
            w: at(-1),
            c: at(0),
            e: at(1),
            sw: at(stride - 1),
            s: at(stride),
            se: at(stride + 1),
        }
    }

    /// Parses a GPPC-style octile map where each character is used
    /// directly as the terrain code for `CostTable::get`.
    pub fn parse_ascii(text: &str) -> Result<WeightedGridMap, crate::gridmap::GridMapError> {
        use crate::gridmap::GridMapError;

        let mut lines = text.lines();
        let mut width = None;
        let mut height = None;
        for line in &mut lines {
            let line = line.trim_end();
            if line == "map" {
                break;
            }
            if let Some(v) = line.strip_prefix("type ") {
                let _ = v;
            } else if let Some(v) = line.strip_prefix("height ") {
                height = Some(v.trim().parse().map_err(|_| GridMapError::InvalidHeader(line.to_string()))?);
            } else if let Some(v) = line.strip_prefix("width ") {
                width = Some(v.trim().parse().map_err(|_| GridMapError::InvalidHeader(line.to_string()))?);
            } else {
                return Err(GridMapError::InvalidHeader(line.to_string()));
            }
        }
        let width: u32 = width.ok_or(GridMapError::MissingHeader("width"))?;
        let height: u32 = height.ok_or(GridMapError::MissingHeader("height"))?;

        let mut map = WeightedGridMap::new(width, height);
        for row in 0..height {
            let line = lines.next().ok_or(GridMapError::UnexpectedEof)?;
            let line = line.trim_end_matches(['\r', '\n']);
            let bytes = line.as_bytes();
            if bytes.len() as u32 != width {
                return Err(GridMapError::RowLengthMismatch {
                    row,
                    expected: width,
                    actual: bytes.len() as u32,
                });
            }
            for (col, &b) in bytes.iter().enumerate() {
                map.set(col as u32, row, b);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighted::CostTable;

    #[test]
    fn terrain_round_trip() {
        let mut map = WeightedGridMap::new(4, 3);
        map.set(2, 1, b'~');
        assert_eq!(map.terrain_at(2, 1), b'~');
    }

    #[test]
    fn neighbourhood_matches_direct_lookups() {
        let mut map = WeightedGridMap::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                map.set(x, y, (b'a' + (x + y) as u8) as u8);
            }
        }
        let p = map.to_padded(map.xy_to_packed(2, 2));
        let nb = map.neighbourhood(p);
        assert_eq!(nb.c, map.terrain_at(2, 2));
        assert_eq!(nb.n, map.terrain_at(2, 1));
        assert_eq!(nb.se, map.terrain_at(3, 3));
    }

    #[test]
    fn lowest_cost_flags_unspecified_terrain() {
        let mut map = WeightedGridMap::new(2, 1);
        map.set(0, 0, b'.');
        map.set(1, 0, b'~');
        let mut costs = CostTable::new();
        costs.set(b'.', 1.0);
        assert!(costs.lowest_cost(&map).unwrap().is_nan());
        costs.set(b'~', 4.0);
        assert_eq!(costs.lowest_cost(&map), Some(1.0));
    }
}
