//! Padded bitmap of traversable/impassable cells.
//!
//! Storage and the unaligned-word neighbourhood reads are adapted from the
//! teacher's `BitGrid` (`domains/bitgrid.rs`), with the truthiness
//! convention inverted: here a set bit means *traversable*, so the padding
//! border (left permanently zero) reads as impassable without needing a
//! separate "is this a real cell" check.

use std::fmt;

use crate::bittable::BitTable;
use crate::ids::{PackedId, PaddedId};
use crate::padding::{self, PADDING_ROWS};

#[derive(Debug)]
pub enum GridMapError {
    MissingHeader(&'static str),
    InvalidHeader(String),
    RowLengthMismatch { row: u32, expected: u32, actual: u32 },
    UnknownTerrain { row: u32, col: u32, ch: char },
    UnexpectedEof,
}

impl fmt::Display for GridMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridMapError::MissingHeader(field) => write!(f, "missing `{field}` header line"),
            GridMapError::InvalidHeader(line) => write!(f, "invalid header line: {line:?}"),
            GridMapError::RowLengthMismatch { row, expected, actual } => write!(
                f,
                "row {row} has {actual} columns, expected {expected}"
            ),
            GridMapError::UnknownTerrain { row, col, ch } => {
                write!(f, "unrecognized terrain character {ch:?} at ({col}, {row})")
            }
            GridMapError::UnexpectedEof => write!(f, "unexpected end of map data"),
        }
    }
}

impl std::error::Error for GridMapError {}

#[derive(Debug)]
pub struct GridMap {
    width: u32,
    height: u32,
    padded_width: u32,
    padded_height: u32,
    bits: BitTable,
    traversable_count: u64,
}

impl GridMap {
    /// An all-impassable `width x height` map.
    pub fn new(width: u32, height: u32) -> Self {
        let padded_width = round_up_pow2_multiple(width + 1, 64);
        let padded_height = height + 2 * PADDING_ROWS;
        GridMap {
            width,
            height,
            padded_width,
            padded_height,
            bits: BitTable::new(padded_width, padded_height, 1),
            traversable_count: 0,
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

    pub fn padded_height(&self) -> u32 {
        self.padded_height
    }

    pub fn traversable_count(&self) -> u64 {
        self.traversable_count
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

    pub fn is_traversable(&self, x: u32, y: u32) -> bool {
        let padded = self.to_padded(self.xy_to_packed(x, y));
        self.get_label(padded)
    }

    pub fn get_label(&self, id: PaddedId) -> bool {
        self.bits.get(id.0 as u64) != 0
    }

    pub fn set_traversable(&mut self, x: u32, y: u32, traversable: bool) {
        let padded = self.to_padded(self.xy_to_packed(x, y));
        let was = self.get_label(padded);
        if was != traversable {
            self.bits.set(padded.0 as u64, traversable as u64);
            if traversable {
                self.traversable_count += 1;
            } else {
                self.traversable_count -= 1;
            }
        }
    }

    /// Three 3-bit windows `(above, row, below)`, each laid out as
    /// `bit0 = west-ish, bit1 = centre-ish, bit2 = east-ish` relative to
    /// `p`: `above = (NW, N, NE)`, `row = (W, C, E)`, `below = (SW, S, SE)`.
    /// This layout is internal to this crate (no downstream consumer needs
    /// a particular bit order); `ExpansionPolicy` packs it into a single
    /// 9-bit mask for the corner-cutting checks.
    pub fn get_neighbours_3x3(&self, p: PaddedId) -> (u8, u8, u8) {
        let stride = self.padded_width as u64;
        let id = p.0 as u64;
        debug_assert!(id >= stride + 1);
        let above = self.bits.span_read(id - stride - 1, 3) as u8;
        let row = self.bits.span_read(id - 1, 3) as u8;
        let below = self.bits.span_read(id + stride - 1, 3) as u8;
        (above, row, below)
    }

    /// 32 contiguous cells in `p`'s row, `p` at bit 0.
    pub fn get_neighbours_32bit(&self, p: PaddedId) -> u32 {
        self.bits.read_bits(p.0 as u64, 32) as u32
    }

    /// 32 contiguous cells in `p`'s row, `p` at bit 31.
    pub fn get_neighbours_upper_32bit(&self, p: PaddedId) -> u32 {
        debug_assert!(p.0 >= 31);
        self.bits.read_bits(p.0 as u64 - 31, 32) as u32
    }

    /// The 64-bit word of the backing bit table that contains `p`, aligned
    /// to a 64-bit boundary (not centred on `p`).
    pub fn get_neighbours_64bit(&self, p: PaddedId) -> u64 {
        let aligned = (p.0 as u64 / 64) * 64;
        self.bits.read_bits(aligned, 64)
    }

    /// Parses a GPPC-style octile map: a `type`/`height`/`width`/`map`
    /// header followed by `height` rows of `width` characters. `.` and `G`
    /// are traversable; `@ O S T W` and any other non-whitespace character
    /// are impassable, except that an unrecognized character is a hard
    /// parse error (stricter than treating it as silently passable).
    pub fn parse_ascii(text: &str) -> Result<GridMap, GridMapError> {
        let mut lines = text.lines();
        let mut width = None;
        let mut height = None;
        for line in &mut lines {
            let line = line.trim_end();
            if line == "map" {
                break;
            }
            if let Some(v) = line.strip_prefix("type ") {
                let _ = v; // octile/patch/other, not otherwise validated
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

        let mut map = GridMap::new(width, height);
        for row in 0..height {
            let line = lines.next().ok_or(GridMapError::UnexpectedEof)?;
            let line = line.trim_end_matches(['\r', '\n']);
            let chars: Vec<char> = line.chars().collect();
            if chars.len() as u32 != width {
                return Err(GridMapError::RowLengthMismatch {
                    row,
                    expected: width,
                    actual: chars.len() as u32,
                });
            }
            for (col, &ch) in chars.iter().enumerate() {
                let traversable = match ch {
                    '.' | 'G' => true,
                    '@' | 'O' | 'S' | 'T' | 'W' => false,
                    other => {
                        return Err(GridMapError::UnknownTerrain { row, col: col as u32, ch: other })
                    }
                };
                map.set_traversable(col as u32, row, traversable);
            }
        }
        Ok(map)
    }
}

fn round_up_pow2_multiple(v: u32, multiple: u32) -> u32 {
    debug_assert!(multiple.is_power_of_two());
    (v + multiple - 1) & !(multiple - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand_pcg::Pcg64;

    #[test]
    fn padding_reads_impassable() {
        let map = GridMap::new(5, 4);
        for x in 0..5 {
            assert!(!map.is_traversable(x, 0));
        }
    }

    #[test]
    fn packed_padded_round_trip() {
        let map = GridMap::new(9, 7);
        for y in 0..7 {
            for x in 0..9 {
                let packed = map.xy_to_packed(x, y);
                let padded = map.to_padded(packed);
                assert_eq!(map.to_packed(padded), packed);
            }
        }
    }

    #[test]
    fn neighbours_3x3_matches_brute_force() {
        let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7a);
        let (w, h) = (23u32, 13u32);
        let mut board = vec![vec![false; w as usize]; h as usize];
        let mut map = GridMap::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let t = rng.gen_bool(0.7);
                board[y as usize][x as usize] = t;
                map.set_traversable(x, y, t);
            }
        }
        let at = |x: i64, y: i64| -> bool {
            if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                false
            } else {
                board[y as usize][x as usize]
            }
        };
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let p = map.to_padded(map.xy_to_packed(x, y));
                let (above, row, below) = map.get_neighbours_3x3(p);
                let (x, y) = (x as i64, y as i64);
                assert_eq!(above & 1 != 0, at(x - 1, y - 1));
                assert_eq!(above & 2 != 0, at(x, y - 1));
                assert_eq!(above & 4 != 0, at(x + 1, y - 1));
                assert_eq!(row & 1 != 0, at(x - 1, y));
                assert_eq!(row & 2 != 0, at(x, y));
                assert_eq!(row & 4 != 0, at(x + 1, y));
                assert_eq!(below & 1 != 0, at(x - 1, y + 1));
                assert_eq!(below & 2 != 0, at(x, y + 1));
                assert_eq!(below & 4 != 0, at(x + 1, y + 1));
            }
        }
    }

    #[test]
    fn parse_ascii_rejects_unknown_terrain() {
        let text = "type octile\nheight 1\nwidth 3\nmap\n.X.\n";
        match GridMap::parse_ascii(text) {
            Err(GridMapError::UnknownTerrain { ch: 'X', .. }) => {}
            other => panic!("expected UnknownTerrain, got {other:?}"),
        }
    }

    #[test]
    fn parse_ascii_accepts_all_blockers() {
        let text = "type octile\nheight 1\nwidth 5\nmap\n@OSTW\n";
        let map = GridMap::parse_ascii(text).unwrap();
        for x in 0..5 {
            assert!(!map.is_traversable(x, 0));
        }
    }
}
