use nalgebra::Scalar;
use num_traits::{Bounded, Float, FromPrimitive, Num};
use serde::{Deserialize, Serialize};

use crate::cartesian::{CartesianPoint2d, Point2};

/// Axis aligned bounding rectangle.
///
/// A rectangle with `x_min > x_max` or `y_min > y_max` is empty. [`Rect::empty`] returns the canonical empty
/// rectangle, which is the identity element of [`Rect::merge`]: merging it with any rectangle returns that
/// rectangle unchanged. Empty rectangles have zero width, height and area.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    /// Minimum x coordinate.
    pub x_min: N,
    /// Minimum y coordinate.
    pub y_min: N,
    /// Maximum x coordinate.
    pub x_max: N,
    /// Maximum y coordinate.
    pub y_max: N,
}

impl<N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive> Rect<N> {
    /// Creates a new rectangle from its bounds.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Rectangle that contains nothing.
    pub fn empty() -> Self {
        Self {
            x_min: N::max_value(),
            y_min: N::max_value(),
            x_max: N::min_value(),
            y_max: N::min_value(),
        }
    }

    /// Returns true if the rectangle does not contain any point.
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    /// Width of the rectangle, zero for an empty one.
    pub fn width(&self) -> N {
        if self.is_empty() {
            N::zero()
        } else {
            self.x_max - self.x_min
        }
    }

    /// Height of the rectangle, zero for an empty one.
    pub fn height(&self) -> N {
        if self.is_empty() {
            N::zero()
        } else {
            self.y_max - self.y_min
        }
    }

    /// Area of the rectangle.
    pub fn area(&self) -> N {
        self.width() * self.height()
    }

    /// Rectangle containing a single point.
    pub fn from_point(p: &impl CartesianPoint2d<Num = N>) -> Self {
        Self {
            x_min: p.x(),
            x_max: p.x(),
            y_min: p.y(),
            y_max: p.y(),
        }
    }

    /// Smallest rectangle containing all the points. Returns an empty rectangle if the iterator is empty.
    pub fn from_points<'a, P: CartesianPoint2d<Num = N> + 'a>(
        points: impl IntoIterator<Item = &'a P>,
    ) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |rect, p| rect.merge(Self::from_point(p)))
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: min(self.x_min, other.x_min),
            y_min: min(self.y_min, other.y_min),
            x_max: max(self.x_max, other.x_max),
            y_max: max(self.y_max, other.y_max),
        }
    }

    /// Overlapping part of two rectangles. If the overlap has no area, the result is empty.
    pub fn intersection(&self, other: Self) -> Self {
        let x_min = max(self.x_min, other.x_min);
        let y_min = max(self.y_min, other.y_min);
        let x_max = min(self.x_max, other.x_max);
        let y_max = min(self.y_max, other.y_max);

        if x_min >= x_max || y_min >= y_max {
            Self::empty()
        } else {
            Self::new(x_min, y_min, x_max, y_max)
        }
    }

    /// Returns true if the point lies inside the rectangle or on its border.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = N>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// Returns true if `other` lies completely inside `self`. An empty rectangle is contained by any rectangle.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.is_empty()
            || (self.x_min <= other.x_min
                && self.y_min <= other.y_min
                && self.x_max >= other.x_max
                && self.y_max >= other.y_max)
    }

    /// Returns true if two rectangles have at least one common point.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x_min <= other.x_max
            && other.x_min <= self.x_max
            && self.y_min <= other.y_max
            && other.y_min <= self.y_max
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Point2<N> {
        let two = N::one() + N::one();
        Point2::new(
            (self.x_min + self.x_max) / two,
            (self.y_min + self.y_max) / two,
        )
    }

    /// Copy of the rectangle moved by the given offsets.
    pub fn translate(&self, dx: N, dy: N) -> Self {
        Self {
            x_min: self.x_min + dx,
            y_min: self.y_min + dy,
            x_max: self.x_max + dx,
            y_max: self.y_max + dy,
        }
    }

    /// Copy of the rectangle scaled by `factor` around its center.
    pub fn scale(&self, factor: N) -> Self {
        let two = N::one() + N::one();
        let center = self.center();
        let half_width = self.width() / two * factor;
        let half_height = self.height() / two * factor;
        Self {
            x_min: center.x() - half_width,
            x_max: center.x() + half_width,
            y_min: center.y() - half_height,
            y_max: center.y() + half_height,
        }
    }
}

impl<N: Float + Bounded + Scalar + FromPrimitive> Rect<N> {
    /// Length of the diagonal.
    pub fn diagonal(&self) -> N {
        self.width().hypot(self.height())
    }
}

impl<N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive> Default for Rect<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive> FromIterator<Rect<N>> for Rect<N> {
    fn from_iter<T: IntoIterator<Item = Rect<N>>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |curr, rect| curr.merge(rect))
    }
}

fn min<N: PartialOrd>(a: N, b: N) -> N {
    if a < b {
        a
    } else {
        b
    }
}

fn max<N: PartialOrd>(a: N, b: N) -> N {
    if a > b {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn base() -> Rect {
        Rect::new(20.0, 30.0, 50.0, 40.0)
    }

    #[test]
    fn bounding_circle_points() {
        let (cx, cy, r) = (10.0, -20.0, 50.0);
        let n = 1000;
        let points: Vec<Point2<f64>> = (0..n)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / n as f64;
                Point2::new(cx + r * t.cos(), cy + r * t.sin())
            })
            .collect();
        let rect = Rect::from_points(&points);
        assert_abs_diff_eq!(rect.x_min, cx - r, epsilon = 1e-9);
        assert_abs_diff_eq!(rect.x_max, cx + r, epsilon = 1e-9);
        assert_abs_diff_eq!(rect.y_min, cy - r, epsilon = 1e-3);
        assert_abs_diff_eq!(rect.y_max, cy + r, epsilon = 1e-3);
    }

    #[test]
    fn empty_is_union_identity() {
        let empty = Rect::<f64>::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.area(), 0.0);
        assert_eq!(empty.merge(base()), base());
        assert_eq!(base().merge(empty), base());
        assert!(Rect::<f64>::from_points(&[] as &[Point2<f64>]).is_empty());
        let collected: Rect = Vec::<Rect>::new().into_iter().collect();
        assert!(collected.is_empty());
    }

    #[test]
    fn scale_keeps_center_and_multiplies_area() {
        let scaled = base().scale(2.0);
        assert_eq!(scaled.center(), base().center());
        assert_eq!(scaled.area(), base().area() * 4.0);
    }

    #[test]
    fn translated_union_and_intersection() {
        let b = base().scale(2.0);
        let c = b.translate(b.width() / 2.0, 0.0);
        assert_eq!(b.merge(c).area(), b.area() * 1.5);
        assert_eq!(b.intersection(c).area(), b.area() / 2.0);
        assert!(b.intersects(&c));
        assert!(b.intersection(b.translate(b.width(), 0.0)).is_empty());
    }

    #[test]
    fn containment() {
        let a = base();
        let b = a.scale(2.0);
        assert!(a.contains(&a.center()));
        assert!(a.contains(&Point2::new(a.x_max, a.y_max)));
        assert!(!a.contains(&Point2::new(a.x_max + 1.0, a.y_max)));
        assert!(b.contains_rect(&a));
        assert!(!a.contains_rect(&b));
        assert!(a.contains_rect(&Rect::empty()));
    }

    #[test]
    fn diagonal_length() {
        assert_abs_diff_eq!(Rect::new(0.0, 0.0, 3.0, 4.0).diagonal(), 5.0);
    }
}
