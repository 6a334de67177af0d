//! Geometry primitives used by the cartokit codecs.
//!
//! * [`cartesian`] - points, raster cells, bounding rectangles and the ring simplifier.
//! * [`Contour`] - an open polyline or an implicitly closed ring.
//! * [`geo`] - helpers for longitude/latitude coordinates.

pub mod cartesian;
pub mod geo;

mod contour;
pub use contour::Contour;
