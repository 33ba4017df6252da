//! Geometry types shared across the wavegrid workspace.
//!
//! Grid addresses ([`Point`]), rectangular extents ([`Range`]) and the eight
//! compass [`Direction`]s used for backpointers.

pub mod direction;
pub mod geom;

pub use direction::Direction;
pub use geom::{Point, Range, RangeIter};
