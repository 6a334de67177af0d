//! Binary codecs and file formats for geographic entities.
//!
//! * [`varint`] - self-delimiting variable length integers used by all the formats.
//! * [`var`] - fixed width quantization of bounded scalar values and fixed size rows built from them.
//! * [`store`] - the geometry store: named multi-part polygons and polylines with coordinates quantized relative
//!   to each entity's bounding box.
//! * [`grid`] - the row grid: fixed size rows with a self-describing schema, grouped into named entities.
//!
//! All the operations are synchronous. Writers buffer what they need and produce a valid file only after a
//! successful `close()`; readers load the whole index on open and then give random access to entities.

mod cstr;
pub mod error;
pub mod grid;
pub mod store;
pub mod var;
pub mod varint;

pub use error::StoreError;
pub use grid::{Row, RowGridReader, RowGridWriter, Segment};
pub use store::{GlobalRaster, IndexEntry, QualityReport, RasterBox, Reader, StoreOptions, Writer};
pub use var::{ByteWidth, IntVar, RealVar, Schema, StrVar, Value, Var};
