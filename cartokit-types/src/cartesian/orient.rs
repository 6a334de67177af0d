use crate::cartesian::CartesianPoint2d;
use serde::{Deserialize, Serialize};

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    ///
    /// With integer coordinates the result is exact, which is what the ring simplifier relies on.
    pub fn triplet<Num: num_traits::Num + PartialOrd>(
        p: &impl CartesianPoint2d<Num = Num>,
        q: &impl CartesianPoint2d<Num = Num>,
        r: &impl CartesianPoint2d<Num = Num>,
    ) -> Self {
        let lhs = (q.y() - p.y()) * (r.x() - q.x());
        let rhs = (q.x() - p.x()) * (r.y() - q.y());
        if lhs == rhs {
            Self::Collinear
        } else if lhs > rhs {
            Self::Clockwise
        } else {
            Self::Counterclockwise
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::Point2;

    #[test]
    fn triplet_orientation() {
        let a = Point2::new(0i128, 0);
        let b = Point2::new(1i128, 0);
        assert_eq!(
            Orientation::triplet(&a, &b, &Point2::new(1, 1)),
            Orientation::Counterclockwise
        );
        assert_eq!(
            Orientation::triplet(&a, &b, &Point2::new(1, -1)),
            Orientation::Clockwise
        );
        assert_eq!(
            Orientation::triplet(&a, &b, &Point2::new(5, 0)),
            Orientation::Collinear
        );
        // Folding back onto the same line is collinear too.
        assert_eq!(
            Orientation::triplet(&a, &b, &Point2::new(-3, 0)),
            Orientation::Collinear
        );
    }
}
