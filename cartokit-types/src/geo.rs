//! Helpers for geographic coordinates, where `x` is the longitude and `y` is the latitude, both in degrees.

use crate::cartesian::{CartesianPoint2d, Point2};

/// Mean radius of the Earth in meters (IUGG).
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// Folds a longitude into `[-180, 180]` by adding or subtracting whole turns.
pub fn normalize_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Folds a latitude into `[-90, 90]` by adding or subtracting multiples of 180 degrees.
pub fn normalize_lat(lat: f64) -> f64 {
    if (-90.0..=90.0).contains(&lat) {
        lat
    } else {
        (lat + 90.0).rem_euclid(180.0) - 90.0
    }
}

/// Returns the point with both coordinates folded into their canonical ranges.
pub fn normalize(point: &impl CartesianPoint2d<Num = f64>) -> Point2<f64> {
    Point2::new(normalize_lon(point.x()), normalize_lat(point.y()))
}

/// Great-circle distance in meters between two points on a sphere with [`EARTH_MEAN_RADIUS`].
pub fn haversine(a: &impl CartesianPoint2d<Num = f64>, b: &impl CartesianPoint2d<Num = f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let d_lat = (b.y() - a.y()).to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    2.0 * EARTH_MEAN_RADIUS * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}
