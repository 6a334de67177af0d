//! Contour is a sequence of points.
//!
//! Contours can be:
//! * **open** - the first and the last points of the contour are not connected, e.g. a road or a river.
//! * **closed** - the first and the last points are connected, e.g. a shoreline or an administrative boundary.
//!
//! A closed contour does not repeat its first point at the end. The closing segment is implicit, and
//! [`Contour::iter_points_closing`] can be used when it must be visited explicitly.

use serde::{Deserialize, Serialize};

use crate::cartesian::{self, CartesianPoint2d, Cell, Rect};

/// Open or closed sequence of points. See module level documentation for details.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Contour<Point> {
    points: Vec<Point>,
    is_closed: bool,
}

impl<Point> std::ops::Deref for Contour<Point> {
    type Target = Vec<Point>;

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl<Point> AsRef<[Point]> for Contour<Point> {
    fn as_ref(&self) -> &[Point] {
        &self.points
    }
}

impl<Point> std::ops::DerefMut for Contour<Point> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.points
    }
}

impl<Point> Contour<Point> {
    /// Creates a new contour.
    pub fn new(points: Vec<Point>, is_closed: bool) -> Self {
        Self { points, is_closed }
    }

    /// Creates a new open contour.
    pub fn open(points: Vec<Point>) -> Self {
        Self::new(points, false)
    }

    /// Creates a new closed contour. If the last point repeats the first one, it is removed.
    pub fn closed(mut points: Vec<Point>) -> Self
    where
        Point: PartialEq,
    {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        Self::new(points, true)
    }

    /// Whether the contour is closed.
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Consumes the contour returning its points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Iterates over the points, repeating the first point at the end for closed contours.
    pub fn iter_points_closing(&self) -> impl Iterator<Item = &Point> {
        let closing = if self.is_closed {
            self.points.first()
        } else {
            None
        };
        self.points.iter().chain(closing)
    }
}

impl<P: CartesianPoint2d<Num = f64>> Contour<P> {
    /// Bounding rectangle of the contour.
    pub fn bounding_rect(&self) -> Rect {
        Rect::from_points(&self.points)
    }

    /// Simplifies the contour on a raster with cells of size `scale`. See [`cartesian::simplify`].
    ///
    /// The resulting contour has the same closedness and is expressed in raster cells.
    pub fn simplify(&self, scale: f64) -> Contour<Cell> {
        Contour {
            points: cartesian::simplify(&self.points, scale, self.is_closed),
            is_closed: self.is_closed,
        }
    }
}
