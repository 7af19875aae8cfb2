//! Packed (logical grid) and padded (storage grid) cell identifiers.
//!
//! The two id spaces are related by [`crate::padding`]'s conversion
//! functions. Keeping them as distinct types instead of bare `u32`s is what
//! stops a packed id from being handed to a method that expects a padded
//! one, or vice versa.

use std::fmt;

macro_rules! id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Sentinel value used where "no such cell" is a valid state
            /// (the root of a path, an unset parent pointer).
            pub const NONE: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn is_none(self) -> bool {
                self.0 == u32::MAX
            }

            #[inline(always)]
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                $name(v)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_none() {
                    write!(f, concat!(stringify!($name), "(none)"))
                } else {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                }
            }
        }
    };
}

id_type!(PackedId, "Index into the logical `W x H` grid: `id = y*W + x`.");
id_type!(
    PaddedId,
    "Index into the zero-padded storage grid a `GridMap`/`WeightedGridMap` keeps internally."
);
