pub mod coord;
pub mod geometry;
pub mod srid;

pub use coord::{Axis, Coord, CoordSeq};
pub use geometry::{Geometry, Polygon, Shape};
pub use srid::SridCopyPolicy;
