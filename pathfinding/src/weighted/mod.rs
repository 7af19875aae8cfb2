mod cost_table;
mod map;

pub use cost_table::{CostTable, CostTableError};
pub use map::WeightedGridMap;
