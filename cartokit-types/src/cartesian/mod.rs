//! Types and functions on geometries in cartesian coordinates.

mod orient;
mod point;
mod rect;
mod simplify;

pub use orient::Orientation;
pub use point::{CartesianPoint2d, Point2};
pub use rect::Rect;
pub use simplify::{reduce, simplify, snap};

/// Point with `f64` coordinates.
pub type Point2d = Point2<f64>;

/// Integer cell of a raster grid, produced by [`snap`] and [`simplify`].
pub type Cell = Point2<i64>;
