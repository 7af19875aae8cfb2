//! Uniform-cost (unweighted) grid expansion, 4- or 8-connected.
//!
//! The corner-cutting rule is grounded on the teacher's
//! `bitgrid/no_corner_cutting.rs` (an `EnumSet<Direction>` test per
//! diagonal move), restructured into the explicit 9-bit window mask
//! spec's expansion policy table specifies: a diagonal move is only
//! generated when both adjacent cardinal cells and the diagonal cell
//! itself are traversable.

use std::f64::consts::SQRT_2;

use super::{ExpansionPolicy, Successor};
use crate::gridmap::GridMap;
use crate::ids::{PackedId, PaddedId};
use crate::node_pool::NodePool;

const NW: u16 = 1 << 0;
const N: u16 = 1 << 1;
const NE: u16 = 1 << 2;
const W: u16 = 1 << 3;
const E: u16 = 1 << 5;
const SW: u16 = 1 << 6;
const S: u16 = 1 << 7;
const SE: u16 = 1 << 8;

pub struct UniformCostExpansionPolicy<'m> {
    map: &'m GridMap,
    allow_diagonals: bool,
    pool: NodePool,
    buf: Vec<Successor>,
}

impl<'m> UniformCostExpansionPolicy<'m> {
    pub fn new(map: &'m GridMap, allow_diagonals: bool) -> Self {
        let max_id = map.padded_width() * map.padded_height();
        UniformCostExpansionPolicy {
            map,
            allow_diagonals,
            pool: NodePool::new(max_id),
            buf: Vec::with_capacity(8),
        }
    }

    fn window(&self, p: PaddedId) -> u16 {
        let (above, row, below) = self.map.get_neighbours_3x3(p);
        above as u16 | (row as u16) << 3 | (below as u16) << 6
    }

    fn push(&mut self, node: PaddedId, cost: f64) {
        self.pool.generate(node);
        self.buf.push(Successor { node, cost });
    }
}

impl ExpansionPolicy for UniformCostExpansionPolicy<'_> {
    fn pool(&self) -> &NodePool {
        &self.pool
    }

    fn pool_mut(&mut self) -> &mut NodePool {
        &mut self.pool
    }

    fn to_padded(&self, id: PackedId) -> PaddedId {
        self.map.to_padded(id)
    }

    fn to_packed(&self, id: PaddedId) -> PackedId {
        self.map.to_packed(id)
    }

    fn generate_start_node(&mut self, start: PackedId) -> Option<PaddedId> {
        let padded = self.map.to_padded(start);
        if self.map.get_label(padded) {
            self.pool.generate(padded);
            Some(padded)
        } else {
            None
        }
    }

    fn generate_target_node(&mut self, target: PackedId) -> Option<PaddedId> {
        self.generate_start_node(target)
    }

    fn expand(&mut self, current: PaddedId) {
        self.buf.clear();
        let w = self.window(current);
        let stride = self.map.padded_width();
        let id = current.raw();

        if w & N != 0 {
            self.push(PaddedId::from(id - stride), 1.0);
        }
        if w & S != 0 {
            self.push(PaddedId::from(id + stride), 1.0);
        }
        if w & W != 0 {
            self.push(PaddedId::from(id - 1), 1.0);
        }
        if w & E != 0 {
            self.push(PaddedId::from(id + 1), 1.0);
        }
        if self.allow_diagonals {
            if w & (N | W | NW) == (N | W | NW) {
                self.push(PaddedId::from(id - stride - 1), SQRT_2);
            }
            if w & (N | E | NE) == (N | E | NE) {
                self.push(PaddedId::from(id - stride + 1), SQRT_2);
            }
            if w & (S | W | SW) == (S | W | SW) {
                self.push(PaddedId::from(id + stride - 1), SQRT_2);
            }
            if w & (S | E | SE) == (S | E | SE) {
                self.push(PaddedId::from(id + stride + 1), SQRT_2);
            }
        }
    }

    fn successors(&self) -> &[Successor] {
        &self.buf
    }

    fn mem(&self) -> usize {
        self.pool.mem()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn interior_cell_has_eight_successors() {
        let map = open_map(5, 5);
        let mut policy = UniformCostExpansionPolicy::new(&map, true);
        let centre = map.to_padded(map.xy_to_packed(2, 2));
        policy.expand(centre);
        assert_eq!(policy.successors().len(), 8);
    }

    #[test]
    fn manhattan_mode_has_four_successors() {
        let map = open_map(5, 5);
        let mut policy = UniformCostExpansionPolicy::new(&map, false);
        let centre = map.to_padded(map.xy_to_packed(2, 2));
        policy.expand(centre);
        assert_eq!(policy.successors().len(), 4);
        assert!(policy.successors().iter().all(|s| s.cost == 1.0));
    }

    #[test]
    fn corner_cutting_is_forbidden() {
        let mut map = open_map(3, 3);
        map.set_traversable(1, 0, false); // block N of centre
        let mut policy = UniformCostExpansionPolicy::new(&map, true);
        let centre = map.to_padded(map.xy_to_packed(1, 1));
        policy.expand(centre);
        let stride = map.padded_width();
        let nw = PaddedId::from(centre.raw() - stride - 1);
        let ne = PaddedId::from(centre.raw() - stride + 1);
        assert!(policy.successors().iter().all(|s| s.node != nw && s.node != ne));
    }
}
