//! Geometry store.
//!
//! A geometry store file keeps a set of named entities, each a list of rings (open polylines or implicitly closed
//! polygon boundaries) in longitude/latitude coordinates. The layout is:
//!
//! ```text
//! signature        2 bytes  "PF"
//! version          1 byte   0x00
//! coord_width      1 byte   one of {1, 2, 4, 8}
//! total_points     varint
//! entity_count     varint
//! repeat entity_count times:
//!   name            null-terminated UTF-8 string
//!   ring_count      varint
//!   box_x0,x1,y0,y1 4 x 2-byte big-endian unsigned (global raster cells)
//!   ring_lengths    ring_count x varint
//! coordinate section:
//! repeat total_points times (per entity, per ring, in index order):
//!   x, y            2 x coord_width-byte big-endian unsigned
//! ```
//!
//! Every entity's bounding box is snapped outwards to a coarse [`GlobalRaster`], and the points of the entity are
//! quantized relative to that snapped box. The snapped box is the only per-entity metadata needed to restore the
//! coordinates, and it always contains the original points.
//!
//! Files are written once by a [`Writer`] and then read any number of times by independent [`Reader`]s.

use cartokit_types::cartesian::Rect;
use serde::{Deserialize, Serialize};

mod options;
mod quality;
mod reader;
mod writer;

pub use options::{GlobalRaster, RasterBox, StoreOptions};
pub use quality::QualityReport;
pub use reader::Reader;
pub use writer::Writer;

pub(crate) const SIGNATURE: &[u8; 2] = b"PF";
pub(crate) const VERSION: u8 = 0;

/// Index record of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    name: String,
    raster_box: RasterBox,
    bbox: Rect,
    ring_lengths: Vec<u64>,
}

impl IndexEntry {
    /// Name of the entity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bounding box snapped to the global raster, as stored in the file.
    pub fn raster_box(&self) -> RasterBox {
        self.raster_box
    }

    /// Bounding box in coordinates. Contains all the points of the entity.
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Number of points in every ring of the entity.
    pub fn ring_lengths(&self) -> &[u64] {
        &self.ring_lengths
    }

    /// Total number of points of the entity.
    pub fn point_count(&self) -> u64 {
        self.ring_lengths.iter().sum()
    }
}
