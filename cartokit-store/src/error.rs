//! Error type used by the crate.

use thiserror::Error;

/// Errors of the codecs and file formats.
///
/// `DomainTooLarge`, `OutOfDomain`, `NotNullable`, `ValueTooLong`, `TypeMismatch` and `SchemaMismatch` are results
/// of a misuse of a codec by the caller. `TruncatedInput`, `CorruptData` and `UnsupportedFormat` mean that the
/// persisted data is malformed. `NotFound` is returned for lookups of entities that are not in a file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The domain (or count) is too large to be represented in the format.
    #[error("domain of '{0}' is too large")]
    DomainTooLarge(String),

    /// The value lies outside of the domain of the field.
    #[error("value {value} is outside of the domain of field '{field}'")]
    OutOfDomain {
        /// Name of the field.
        field: String,
        /// Rejected value.
        value: String,
    },

    /// Null value given for a field that is not nullable.
    #[error("field '{0}' is not nullable")]
    NotNullable(String),

    /// String value is longer than the field width.
    #[error("value of {len} bytes does not fit into field '{field}' of {width} bytes")]
    ValueTooLong {
        /// Name of the field.
        field: String,
        /// Length of the encoded value.
        len: usize,
        /// Width of the field.
        width: usize,
    },

    /// Value of a wrong kind given for a field.
    #[error("field '{field}' expects {expected} value")]
    TypeMismatch {
        /// Name of the field.
        field: String,
        /// Kind of values the field accepts.
        expected: &'static str,
    },

    /// Number of values in a row does not match the schema.
    #[error("row has {found} values, but the schema has {expected} fields")]
    SchemaMismatch {
        /// Number of fields in the schema.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },

    /// Input ended in the middle of a value.
    #[error("unexpected end of input")]
    TruncatedInput,

    /// Input is inconsistent.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// Signature or version of the input is not supported.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Requested entity is not in the file.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Entity with the same name was already written.
    #[error("duplicate entity name: {0}")]
    DuplicateName(String),

    /// Entity name cannot be stored.
    #[error("invalid entity name: {0:?}")]
    InvalidName(String),

    /// Error reading or writing the underlying stream.
    #[error("i/o error: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::TruncatedInput,
            _ => Self::Io(value),
        }
    }
}
