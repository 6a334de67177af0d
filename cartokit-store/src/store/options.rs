use cartokit_types::cartesian::Rect;
use serde::{Deserialize, Serialize};

use crate::var::ByteWidth;

/// Configuration of a geometry store.
///
/// The reader of a file must use the same [`GlobalRaster`] as the writer did, because the raster is not stored in
/// the file. The coordinate width is stored in the file, so readers ignore [`StoreOptions::coord_width`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Width of each quantized coordinate.
    pub coord_width: ByteWidth,
    /// Raster the entity bounding boxes are snapped to.
    pub raster: GlobalRaster,
    /// Coordinates are longitudes and latitudes in degrees.
    ///
    /// Geographic coordinates are folded into `[-180, 180]` and `[-90, 90]` before they are checked against the
    /// raster domain, and reconstruction errors are great-circle distances in meters. Otherwise coordinates are
    /// taken as they are and errors are euclidean distances in coordinate units.
    #[serde(default = "geographic_default")]
    pub geographic: bool,
}

fn geographic_default() -> bool {
    true
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            coord_width: ByteWidth::default(),
            raster: GlobalRaster::default(),
            geographic: geographic_default(),
        }
    }
}

impl StoreOptions {
    /// Options with the given coordinate width and the default raster.
    pub fn with_coord_width(coord_width: ByteWidth) -> Self {
        Self {
            coord_width,
            ..Default::default()
        }
    }

    /// Options for planar coordinates in the domain of the given raster. Coordinates are not folded.
    pub fn planar(raster: GlobalRaster, coord_width: ByteWidth) -> Self {
        Self {
            coord_width,
            raster,
            geographic: false,
        }
    }
}

/// Bounding box in the cells of a [`GlobalRaster`].
///
/// A valid box has `x0 < x1` and `y0 < y1`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RasterBox {
    /// Left edge.
    pub x0: u16,
    /// Right edge.
    pub x1: u16,
    /// Bottom edge.
    pub y0: u16,
    /// Top edge.
    pub y1: u16,
}

/// Coarse raster covering the whole coordinate domain, used to store entity bounding boxes in 2 bytes per bound.
///
/// Default raster covers longitudes `[-180, 180]` and latitudes `[-90, 90]` with 65535 steps on each axis.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalRaster {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    steps: u16,
}

impl Default for GlobalRaster {
    fn default() -> Self {
        Self {
            x_min: -180.0,
            x_max: 180.0,
            y_min: -90.0,
            y_max: 90.0,
            steps: u16::MAX,
        }
    }
}

impl GlobalRaster {
    /// Creates a raster over the domain with `steps` cells on each axis.
    ///
    /// # Panics
    ///
    /// Panics if the domain is empty or not finite, or if `steps` is zero.
    pub fn new(domain: Rect, steps: u16) -> Self {
        assert!(
            domain.x_min.is_finite()
                && domain.y_min.is_finite()
                && domain.x_max.is_finite()
                && domain.y_max.is_finite()
                && domain.x_max > domain.x_min
                && domain.y_max > domain.y_min,
            "invalid raster domain {domain:?}"
        );
        assert!(steps > 0, "raster must have at least one step");

        Self {
            x_min: domain.x_min,
            x_max: domain.x_max,
            y_min: domain.y_min,
            y_max: domain.y_max,
            steps,
        }
    }

    /// Domain covered by the raster.
    pub fn domain(&self) -> Rect {
        Rect::new(self.x_min, self.y_min, self.x_max, self.y_max)
    }

    /// Number of steps on each axis.
    pub fn steps(&self) -> u16 {
        self.steps
    }

    /// Snaps the rectangle outwards: the returned box always contains the part of `rect` inside the raster domain
    /// and always has non-zero width and height. An empty rectangle is snapped to the first cell of the raster.
    pub fn snap_outward(&self, rect: &Rect) -> RasterBox {
        if rect.is_empty() {
            return RasterBox {
                x0: 0,
                x1: 1,
                y0: 0,
                y1: 1,
            };
        }

        let (x0, x1) = snap_axis(rect.x_min, rect.x_max, self.x_min, self.x_max, self.steps);
        let (y0, y1) = snap_axis(rect.y_min, rect.y_max, self.y_min, self.y_max, self.steps);
        RasterBox { x0, x1, y0, y1 }
    }

    /// Rectangle covered by the raster box.
    pub fn to_rect(&self, raster_box: &RasterBox) -> Rect {
        Rect::new(
            cell_value(raster_box.x0, self.x_min, self.x_max, self.steps),
            cell_value(raster_box.y0, self.y_min, self.y_max, self.steps),
            cell_value(raster_box.x1, self.x_min, self.x_max, self.steps),
            cell_value(raster_box.y1, self.y_min, self.y_max, self.steps),
        )
    }

    /// Returns true if the box is a valid box of this raster.
    pub fn is_valid(&self, raster_box: &RasterBox) -> bool {
        raster_box.x0 < raster_box.x1
            && raster_box.y0 < raster_box.y1
            && raster_box.x1 <= self.steps
            && raster_box.y1 <= self.steps
    }
}

fn cell_value(cell: u16, min: f64, max: f64, steps: u16) -> f64 {
    if cell >= steps {
        max
    } else {
        min + f64::from(cell) * (max - min) / f64::from(steps)
    }
}

fn cell_of(v: f64, min: f64, max: f64, steps: u16) -> f64 {
    (v - min) * f64::from(steps) / (max - min)
}

fn snap_axis(lo: f64, hi: f64, min: f64, max: f64, steps: u16) -> (u16, u16) {
    let clamp = |cell: f64| cell.clamp(0.0, f64::from(steps)) as u16;
    let mut c0 = clamp(cell_of(lo, min, max, steps).floor());
    let mut c1 = clamp(cell_of(hi, min, max, steps).ceil());

    // Rounding in `cell_value` must not move the edges inside the original extent.
    while c0 > 0 && cell_value(c0, min, max, steps) > lo {
        c0 -= 1;
    }
    while c1 < steps && cell_value(c1, min, max, steps) < hi {
        c1 += 1;
    }

    if c0 >= c1 {
        if c1 < steps {
            c1 = c0 + 1;
        } else {
            c0 = c1 - 1;
        }
    }

    (c0, c1)
}
