//! Admissible distance estimates consumed by `UnidirectionalSearch`.
//!
//! `h` itself is grounded on the teacher's `util::octile_heuristic`/
//! `manhattan_heuristic`/`zero_heuristic`. The bulk `h_bulk` form and
//! `HeuristicValue` are supplemented from `original_source/include/
//! warthog/heuristic/heuristic_value.h`: none of the three heuristics this
//! crate ships ever know of a concrete sub-path to the target, so they all
//! report `feasible = false` and leave `ub`/`ub_path` untouched, the
//! default `h_bulk` implementation. A heuristic that *could* shortcut
//! (e.g. a goal-bounding table) would override `h_bulk` directly.

use std::f64::consts::SQRT_2;

use crate::gridmap::GridMap;
use crate::ids::PackedId;
use crate::weighted::WeightedGridMap;

#[derive(Clone, Copy, Debug)]
pub struct HeuristicValue {
    pub from: PackedId,
    pub to: PackedId,
    pub lb: f64,
    pub ub: f64,
    pub feasible: bool,
}

pub trait Heuristic {
    fn h(&self, from: PackedId, to: PackedId) -> f64;

    fn h_bulk(&self, hv: &mut HeuristicValue) {
        hv.lb = self.h(hv.from, hv.to);
        hv.ub = f64::INFINITY;
        hv.feasible = false;
    }

    /// Appends a concrete path fragment from `from` to `to` onto `path`,
    /// used to complete an incumbent solution that stopped short of the
    /// target because this heuristic reported `feasible = true` somewhere
    /// along the way. The default heuristics never do this.
    fn append_path(&self, _from: PackedId, _to: PackedId, _path: &mut Vec<PackedId>) {}
}

pub struct OctileHeuristic<'m> {
    map: &'m GridMap,
    scale: f64,
}

impl<'m> OctileHeuristic<'m> {
    pub fn new(map: &'m GridMap) -> Self {
        OctileHeuristic { map, scale: 1.0 }
    }

    /// `scale` should be `CostTable::lowest_cost`'s result on a weighted
    /// map, so the heuristic stays admissible against the cheapest terrain
    /// actually present.
    pub fn with_scale(map: &'m GridMap, scale: f64) -> Self {
        OctileHeuristic { map, scale }
    }
}

impl Heuristic for OctileHeuristic<'_> {
    fn h(&self, from: PackedId, to: PackedId) -> f64 {
        let (x1, y1) = self.map.packed_to_xy(from);
        let (x2, y2) = self.map.packed_to_xy(to);
        let dx = (x1 as i64 - x2 as i64).unsigned_abs();
        let dy = (y1 as i64 - y2 as i64).unsigned_abs();
        let diag = dx.min(dy);
        let ortho = dx.max(dy) - diag;
        self.scale * (ortho as f64 + SQRT_2 * diag as f64)
    }
}

/// Octile distance against a `WeightedGridMap`'s packed coordinates,
/// scaled by the map's cheapest terrain cost.
pub struct WeightedOctileHeuristic<'m> {
    map: &'m WeightedGridMap,
    scale: f64,
}

impl<'m> WeightedOctileHeuristic<'m> {
    pub fn new(map: &'m WeightedGridMap, scale: f64) -> Self {
        WeightedOctileHeuristic { map, scale }
    }
}

impl Heuristic for WeightedOctileHeuristic<'_> {
    fn h(&self, from: PackedId, to: PackedId) -> f64 {
        let (x1, y1) = self.map.packed_to_xy(from);
        let (x2, y2) = self.map.packed_to_xy(to);
        let dx = (x1 as i64 - x2 as i64).unsigned_abs();
        let dy = (y1 as i64 - y2 as i64).unsigned_abs();
        let diag = dx.min(dy);
        let ortho = dx.max(dy) - diag;
        self.scale * (ortho as f64 + SQRT_2 * diag as f64)
    }
}

pub struct ManhattanHeuristic<'m> {
    map: &'m GridMap,
    scale: f64,
}

impl<'m> ManhattanHeuristic<'m> {
    pub fn new(map: &'m GridMap) -> Self {
        ManhattanHeuristic { map, scale: 1.0 }
    }
}

impl Heuristic for ManhattanHeuristic<'_> {
    fn h(&self, from: PackedId, to: PackedId) -> f64 {
        let (x1, y1) = self.map.packed_to_xy(from);
        let (x2, y2) = self.map.packed_to_xy(to);
        let dx = (x1 as i64 - x2 as i64).unsigned_abs();
        let dy = (y1 as i64 - y2 as i64).unsigned_abs();
        self.scale * (dx + dy) as f64
    }
}

pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn h(&self, _from: PackedId, _to: PackedId) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octile_matches_diagonal_formula() {
        let map = GridMap::new(10, 10);
        let h = OctileHeuristic::new(&map);
        let a = map.xy_to_packed(0, 0);
        let b = map.xy_to_packed(3, 5);
        assert!((h.h(a, b) - (2.0 * SQRT_2 + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_heuristic_is_always_zero() {
        let h = ZeroHeuristic;
        assert_eq!(h.h(PackedId::from(0), PackedId::from(99)), 0.0);
    }
}
