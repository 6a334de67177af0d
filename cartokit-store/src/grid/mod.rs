//! Row grid.
//!
//! A row grid file keeps rows of a fixed [`Schema`] grouped into entities. Every entity has a unique id and consists
//! of one or more segments, each a sequence of rows. The schema is stored in the header, so a file can be read
//! without any external description. The layout is:
//!
//! ```text
//! signature        2 bytes  "RG"
//! version          1 byte   0x01
//! column_count     1 byte
//! row_count        4-byte big-endian unsigned
//! repeat column_count times:
//!   name            null-terminated UTF-8 string
//!   kind            1 byte   0 integer, 1 real, 2 string
//!   nullable        1 byte   0 or 1
//!   width           varint
//!   min, max        integer: 2 x signed varint; real: 2 x 8-byte big-endian IEEE-754; string: absent
//! rows:
//!   row_count x row_size bytes, entity by entity, segment by segment
//! index:
//!   entity_count    varint
//!   repeat entity_count times:
//!     id              null-terminated UTF-8 string
//!     segment_count   varint
//!     segment_lengths segment_count x varint (rows)
//! index_offset     8-byte big-endian unsigned
//! ```

use std::io::Read;

use bytes::{Buf, BufMut};

use crate::cstr;
use crate::error::StoreError;
use crate::var::{ByteWidth, IntVar, RealVar, Schema, StrVar, Value, Var};
use crate::varint;

mod reader;
mod writer;

pub use reader::RowGridReader;
pub use writer::RowGridWriter;

pub(crate) const SIGNATURE: &[u8; 2] = b"RG";
pub(crate) const VERSION: u8 = 1;

/// Size of the fixed part of the header.
pub(crate) const HEADER_SIZE: u64 = 8;

const KIND_INT: u8 = 0;
const KIND_REAL: u8 = 1;
const KIND_STR: u8 = 2;

/// Values of one row.
pub type Row = Vec<Value>;

/// Sequence of rows of an entity.
pub type Segment = Vec<Row>;

/// Index record of one entity of a row grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GridEntry {
    pub(crate) id: String,
    pub(crate) segment_lengths: Vec<u64>,
}

impl GridEntry {
    pub(crate) fn row_count(&self) -> u64 {
        self.segment_lengths.iter().sum()
    }
}

pub(crate) fn put_schema(buf: &mut impl BufMut, schema: &Schema) -> Result<(), StoreError> {
    for var in schema.vars() {
        cstr::put(buf, var.name())?;
        match var {
            Var::Int(var) => {
                buf.put_u8(KIND_INT);
                buf.put_u8(u8::from(var.nullable()));
                varint::put_uvarint(buf, var.width().bytes() as u128);
                varint::put_svarint(buf, i128::from(var.min()));
                varint::put_svarint(buf, i128::from(var.max()));
            }
            Var::Real(var) => {
                buf.put_u8(KIND_REAL);
                buf.put_u8(u8::from(var.nullable()));
                varint::put_uvarint(buf, var.width().bytes() as u128);
                buf.put_f64(var.min());
                buf.put_f64(var.max());
            }
            Var::Str(var) => {
                buf.put_u8(KIND_STR);
                buf.put_u8(u8::from(var.nullable()));
                varint::put_uvarint(buf, var.width() as u128);
            }
        }
    }

    Ok(())
}

pub(crate) fn read_schema(source: &mut impl Read, column_count: u8) -> Result<Schema, StoreError> {
    let mut vars = Vec::with_capacity(usize::from(column_count));
    for _ in 0..column_count {
        vars.push(read_var(source)?);
    }

    Ok(Schema::new(vars))
}

fn read_var(source: &mut impl Read) -> Result<Var, StoreError> {
    let name = cstr::read(source)?;
    let mut flags = [0u8; 2];
    source.read_exact(&mut flags)?;
    let [kind, nullable] = flags;
    let nullable = match nullable {
        0 => false,
        1 => true,
        v => {
            return Err(StoreError::CorruptData(format!(
                "invalid nullable flag {v} of column '{name}'"
            )))
        }
    };
    let width = usize::try_from(varint::read_u64(source)?)
        .map_err(|_| StoreError::CorruptData(format!("invalid width of column '{name}'")))?;

    match kind {
        KIND_INT => {
            let min = read_i64(source)?;
            let max = read_i64(source)?;
            if max <= min {
                return Err(corrupt_domain(&name));
            }
            let var = IntVar::new(name, min, max, nullable)?;
            if var.width().bytes() != width {
                return Err(StoreError::CorruptData(format!(
                    "width {width} of column '{}' does not match its domain",
                    var.name()
                )));
            }
            Ok(var.into())
        }
        KIND_REAL => {
            let width = ByteWidth::from_bytes(width).ok_or_else(|| {
                StoreError::CorruptData(format!("invalid width {width} of column '{name}'"))
            })?;
            let mut bounds = [0u8; 16];
            source.read_exact(&mut bounds)?;
            let mut bounds = &bounds[..];
            let min = bounds.get_f64();
            let max = bounds.get_f64();
            if !(min.is_finite() && max.is_finite() && max > min) {
                return Err(corrupt_domain(&name));
            }
            Ok(RealVar::new(name, min, max, width, nullable).into())
        }
        KIND_STR => {
            if width == 0 || width > u32::MAX as usize {
                return Err(StoreError::CorruptData(format!(
                    "invalid width {width} of column '{name}'"
                )));
            }
            Ok(StrVar::new(name, width, nullable).into())
        }
        kind => Err(StoreError::CorruptData(format!(
            "unknown kind {kind} of column '{name}'"
        ))),
    }
}

fn read_i64(source: &mut impl Read) -> Result<i64, StoreError> {
    let v = varint::read_svarint(source)?;
    i64::try_from(v).map_err(|_| StoreError::CorruptData(format!("varint {v} does not fit 64 bits")))
}

fn corrupt_domain(name: &str) -> StoreError {
    StoreError::CorruptData(format!("invalid domain of column '{name}'"))
}
