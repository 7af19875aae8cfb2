//! Weighted-terrain octile expansion: cardinal edges cost the average of
//! the two endpoints' terrain costs, diagonal edges cost the average of
//! the four cells straddled by the move, scaled by `sqrt(2)`.
//!
//! Formulas are ported verbatim from the teacher's
//! `weighted_grid/avg_four.rs`.

use std::f64::consts::SQRT_2;

use super::{ExpansionPolicy, Successor};
use crate::ids::{PackedId, PaddedId};
use crate::node_pool::NodePool;
use crate::weighted::{CostTable, WeightedGridMap};

pub struct WeightedExpansionPolicy<'m> {
    map: &'m WeightedGridMap,
    costs: &'m CostTable,
    pool: NodePool,
    buf: Vec<Successor>,
}

impl<'m> WeightedExpansionPolicy<'m> {
    pub fn new(map: &'m WeightedGridMap, costs: &'m CostTable) -> Self {
        let max_id = map.padded_width() * padded_height_of(map);
        WeightedExpansionPolicy {
            map,
            costs,
            pool: NodePool::new(max_id),
            buf: Vec::with_capacity(8),
        }
    }
}

fn padded_height_of(map: &WeightedGridMap) -> u32 {
    map.height() + 2 * crate::padding::PADDING_ROWS
}

impl ExpansionPolicy for WeightedExpansionPolicy<'_> {
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
        if self.costs.get(self.map.terrain(padded)) > 0.0 {
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
        let nb = self.map.neighbourhood(current);
        let stride = self.map.padded_width();
        let id = current.raw();

        let c = self.costs.get(nb.c);
        let n = self.costs.get(nb.n);
        let s = self.costs.get(nb.s);
        let w = self.costs.get(nb.w);
        let e = self.costs.get(nb.e);
        let nw = self.costs.get(nb.nw);
        let ne = self.costs.get(nb.ne);
        let sw = self.costs.get(nb.sw);
        let se = self.costs.get(nb.se);

        if passable(c) && passable(n) {
            self.pool.generate(PaddedId::from(id - stride));
            self.buf.push(Successor { node: PaddedId::from(id - stride), cost: (c + n) / 2.0 });
        }
        if passable(c) && passable(s) {
            self.pool.generate(PaddedId::from(id + stride));
            self.buf.push(Successor { node: PaddedId::from(id + stride), cost: (c + s) / 2.0 });
        }
        if passable(c) && passable(w) {
            self.pool.generate(PaddedId::from(id - 1));
            self.buf.push(Successor { node: PaddedId::from(id - 1), cost: (c + w) / 2.0 });
        }
        if passable(c) && passable(e) {
            self.pool.generate(PaddedId::from(id + 1));
            self.buf.push(Successor { node: PaddedId::from(id + 1), cost: (c + e) / 2.0 });
        }
        if passable(c) && passable(n) && passable(w) && passable(nw) {
            let cost = (c + n + w + nw) * SQRT_2 / 4.0;
            self.pool.generate(PaddedId::from(id - stride - 1));
            self.buf.push(Successor { node: PaddedId::from(id - stride - 1), cost });
        }
        if passable(c) && passable(n) && passable(e) && passable(ne) {
            let cost = (c + n + e + ne) * SQRT_2 / 4.0;
            self.pool.generate(PaddedId::from(id - stride + 1));
            self.buf.push(Successor { node: PaddedId::from(id - stride + 1), cost });
        }
        if passable(c) && passable(s) && passable(w) && passable(sw) {
            let cost = (c + s + w + sw) * SQRT_2 / 4.0;
            self.pool.generate(PaddedId::from(id + stride - 1));
            self.buf.push(Successor { node: PaddedId::from(id + stride - 1), cost });
        }
        if passable(c) && passable(s) && passable(e) && passable(se) {
            let cost = (c + s + e + se) * SQRT_2 / 4.0;
            self.pool.generate(PaddedId::from(id + stride + 1));
            self.buf.push(Successor { node: PaddedId::from(id + stride + 1), cost });
        }
    }

    fn successors(&self) -> &[Successor] {
        &self.buf
    }

    fn mem(&self) -> usize {
        self.pool.mem()
    }
}

/// `0.0` is the reserved impassable sentinel; `NaN` (unspecified terrain)
/// is treated as impassable too rather than silently propagating into a
/// path cost.
fn passable(cost: f64) -> bool {
    cost > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map(w: u32, h: u32, terrain: u8) -> (WeightedGridMap, CostTable) {
        let mut map = WeightedGridMap::new(w, h);
        for y in 0..h {
            for x in 0..w {
                map.set(x, y, terrain);
            }
        }
        let mut costs = CostTable::new();
        costs.set(terrain, 1.0);
        (map, costs)
    }

    #[test]
    fn flat_terrain_matches_uniform_cost() {
        let (map, costs) = flat_map(5, 5, b'.');
        let mut policy = WeightedExpansionPolicy::new(&map, &costs);
        let centre = map.to_padded(map.xy_to_packed(2, 2));
        policy.expand(centre);
        assert_eq!(policy.successors().len(), 8);
        let diag = policy.successors().iter().find(|s| s.cost > 1.0).unwrap();
        assert!((diag.cost - SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn mismatched_diagonal_terrain_averages_four_cells() {
        let mut map = WeightedGridMap::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                map.set(x, y, b'.');
            }
        }
        map.set(2, 0, b'~'); // NE of centre
        let mut costs = CostTable::new();
        costs.set(b'.', 1.0);
        costs.set(b'~', 5.0);
        let policy_map = &map;
        let mut policy = WeightedExpansionPolicy::new(policy_map, &costs);
        let centre = map.to_padded(map.xy_to_packed(1, 1));
        policy.expand(centre);
        let stride = map.padded_width();
        let ne = PaddedId::from(centre.raw() - stride + 1);
        let succ = policy.successors().iter().find(|s| s.node == ne).unwrap();
        assert!((succ.cost - (1.0 + 1.0 + 5.0 + 1.0) * SQRT_2 / 4.0).abs() < 1e-9);
    }
}
