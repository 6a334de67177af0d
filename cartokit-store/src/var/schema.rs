use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::var::{Value, Var};

/// Ordered list of fields describing a fixed size row.
///
/// A row is encoded as the concatenation of the codes of its values, with no padding in between, so every row of a
/// schema has the same [`Schema::row_size`] and the `n`-th row of a homogeneous stream starts at
/// [`Schema::row_offset`]`(n)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Var>", into = "Vec<Var>")]
pub struct Schema {
    vars: Vec<Var>,
    row_size: usize,
}

impl Schema {
    /// Creates a new schema.
    pub fn new(vars: Vec<Var>) -> Self {
        let row_size = vars.iter().map(Var::size).sum();
        Self { vars, row_size }
    }

    /// Fields of the schema.
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Size of an encoded row in bytes.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// Byte offset of the `n`-th row in a stream of rows, or `None` if it does not fit in 64 bits.
    pub fn row_offset(&self, n: u64) -> Option<u64> {
        n.checked_mul(self.row_size as u64)
    }

    /// Position of the field with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.vars.iter().position(|var| var.name() == name)
    }

    /// Appends the encoded row to the buffer.
    ///
    /// Nothing is written if any of the values cannot be encoded.
    pub fn encode_into(&self, values: &[Value], buf: &mut impl BufMut) -> Result<(), StoreError> {
        let row = self.encode(values)?;
        buf.put_slice(&row);
        Ok(())
    }

    /// Encodes the row.
    pub fn encode(&self, values: &[Value]) -> Result<Vec<u8>, StoreError> {
        if values.len() != self.vars.len() {
            return Err(StoreError::SchemaMismatch {
                expected: self.vars.len(),
                found: values.len(),
            });
        }

        let mut row = Vec::with_capacity(self.row_size);
        for (var, value) in self.vars.iter().zip(values) {
            var.encode(value, &mut row)?;
        }

        debug_assert_eq!(row.len(), self.row_size);
        Ok(row)
    }

    /// Decodes a row of exactly [`Schema::row_size`] bytes.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<Value>, StoreError> {
        if data.len() != self.row_size {
            return Err(StoreError::TruncatedInput);
        }

        let mut buf = data;
        self.vars.iter().map(|var| var.decode(&mut buf)).collect()
    }
}

impl From<Vec<Var>> for Schema {
    fn from(value: Vec<Var>) -> Self {
        Self::new(value)
    }
}

impl From<Schema> for Vec<Var> {
    fn from(value: Schema) -> Self {
        value.vars
    }
}
