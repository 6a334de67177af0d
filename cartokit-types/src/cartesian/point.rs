pub use nalgebra::Point2;
use nalgebra::Scalar;
use num_traits::{Bounded, Float, FromPrimitive, Num};

/// Point in a 2d cartesian space.
///
/// Ring points are `Point2<f64>`. Raster cells produced by the simplifier are `Point2<i64>`, which are `Eq + Hash`.
pub trait CartesianPoint2d {
    /// Numeric type of the coordinates.
    type Num: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Squared euclidean distance between two points.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        dx * dx + dy * dy
    }

    /// Euclidean distance between two points.
    fn distance(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num
    where
        Self::Num: Float,
    {
        self.distance_sq(other).sqrt()
    }
}

impl<Num: num_traits::Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive> CartesianPoint2d
    for Point2<Num>
{
    type Num = Num;

    fn x(&self) -> Num {
        self.x
    }
    fn y(&self) -> Num {
        self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn distance_between_points() {
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(4.0, 5.0);
        assert_eq!(a.distance_sq(&b), 25.0);
        assert_abs_diff_eq!(a.distance(&b), 5.0);

        let cell = Point2::new(-2i64, 3);
        assert_eq!(cell.distance_sq(&Point2::new(1, -1)), 25);
    }

    #[test]
    fn integer_points_are_hashable_cells() {
        let mut set = std::collections::HashSet::new();
        set.insert(Point2::new(1i64, 2));
        set.insert(Point2::new(1i64, 2));
        set.insert(Point2::from([2i64, 1]));
        assert_eq!(set.len(), 2);
    }
}
