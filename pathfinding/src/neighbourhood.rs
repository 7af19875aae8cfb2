//! A captured 3x3 window of cell values, shared between `GridMap` and
//! `WeightedGridMap`. Grounded on the teacher's `Neighborhood<T>`
//! (`weighted_grid/map.rs`), kept verbatim since the rotation/reflection
//! helpers are exactly what the diagonal-cost formulas need.

#[derive(Copy, Clone, Debug)]
pub struct Neighbourhood<T> {
    pub nw: T,
    pub n: T,
    pub ne: T,
    pub w: T,
    pub c: T,
    pub e: T,
    pub sw: T,
    pub s: T,
    pub se: T,
}

impl<T: Copy> Neighbourhood<T> {
    /// Rotate the window clockwise by 90 degrees.
    pub fn rotate_cw(self) -> Self {
        Neighbourhood {
            c: self.c,
            ne: self.nw,
            e: self.n,
            se: self.ne,
            s: self.e,
            sw: self.se,
            w: self.s,
            nw: self.sw,
            n: self.w,
        }
    }
}
