use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use bytes::{BufMut, BytesMut};

use crate::cstr;
use crate::error::StoreError;
use crate::grid::{put_schema, GridEntry, HEADER_SIZE, SIGNATURE, VERSION};
use crate::var::{Schema, Value};
use crate::varint;

/// Writes entities of rows into a row grid file.
///
/// The header is written when the writer is created, rows are streamed to the sink as entities are added, and
/// the index is appended by [`RowGridWriter::close`], which also patches the row count in the header.
pub struct RowGridWriter<W: Write + Seek> {
    sink: Option<W>,
    schema: Schema,
    start: u64,
    row_count: u64,
    entries: Vec<GridEntry>,
    ids: HashSet<String>,
}

impl RowGridWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and writes the header for `schema`.
    pub fn create(path: impl AsRef<Path>, schema: Schema) -> Result<Self, StoreError> {
        let file = File::create(path.as_ref())?;
        log::debug!("Creating row grid {}", path.as_ref().display());
        Self::new(BufWriter::new(file), schema)
    }
}

impl<W: Write + Seek> RowGridWriter<W> {
    /// Writes the header for `schema` at the current position of `sink`.
    pub fn new(mut sink: W, schema: Schema) -> Result<Self, StoreError> {
        let column_count = u8::try_from(schema.len())
            .map_err(|_| StoreError::DomainTooLarge("column count".into()))?;

        let mut header = BytesMut::new();
        header.put_slice(SIGNATURE);
        header.put_u8(VERSION);
        header.put_u8(column_count);
        header.put_u32(0);
        put_schema(&mut header, &schema)?;

        let start = sink.stream_position()?;
        sink.write_all(&header)?;

        Ok(Self {
            sink: Some(sink),
            schema,
            start,
            row_count: 0,
            entries: vec![],
            ids: HashSet::new(),
        })
    }

    /// Schema of the rows.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows written so far.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Appends an entity. On error nothing is written.
    pub fn write<S, R>(
        &mut self,
        id: &str,
        segments: impl IntoIterator<Item = S>,
    ) -> Result<(), StoreError>
    where
        S: AsRef<[R]>,
        R: AsRef<[Value]>,
    {
        if id.contains('\0') {
            return Err(StoreError::InvalidName(id.to_owned()));
        }
        if self.ids.contains(id) {
            return Err(StoreError::DuplicateName(id.to_owned()));
        }

        let mut data = BytesMut::new();
        let mut segment_lengths = vec![];
        for segment in segments {
            let segment = segment.as_ref();
            for row in segment {
                self.schema.encode_into(row.as_ref(), &mut data)?;
            }
            segment_lengths.push(segment.len() as u64);
        }

        let rows: u64 = segment_lengths.iter().sum();
        if self.row_count + rows > u64::from(u32::MAX) {
            return Err(StoreError::DomainTooLarge("row count".into()));
        }

        let Some(sink) = self.sink.as_mut() else {
            return Err(closed());
        };
        sink.write_all(&data)?;

        log::debug!(
            "Added entity {id:?} to row grid: {} segments, {rows} rows",
            segment_lengths.len()
        );

        self.row_count += rows;
        self.ids.insert(id.to_owned());
        self.entries.push(GridEntry {
            id: id.to_owned(),
            segment_lengths,
        });

        Ok(())
    }

    /// Writes the index, patches the header and returns the sink positioned at the end of the file.
    pub fn close(mut self) -> Result<W, StoreError> {
        let mut sink = self.sink.take().ok_or_else(closed)?;

        let index_offset = sink.stream_position()?;
        let mut index = BytesMut::new();
        varint::put_uvarint(&mut index, self.entries.len() as u128);
        for entry in &self.entries {
            cstr::put(&mut index, &entry.id)?;
            varint::put_uvarint(&mut index, entry.segment_lengths.len() as u128);
            for &len in &entry.segment_lengths {
                varint::put_uvarint(&mut index, u128::from(len));
            }
        }
        index.put_u64(index_offset - self.start);
        sink.write_all(&index)?;

        let end = sink.stream_position()?;
        sink.seek(SeekFrom::Start(self.start + HEADER_SIZE - 4))?;
        // The count is checked against u32::MAX on every write.
        sink.write_all(&(self.row_count as u32).to_be_bytes())?;
        sink.seek(SeekFrom::Start(end))?;
        sink.flush()?;

        log::info!(
            "Row grid closed: {} entities, {} rows",
            self.entries.len(),
            self.row_count
        );

        Ok(sink)
    }
}

impl<W: Write + Seek> Drop for RowGridWriter<W> {
    fn drop(&mut self) {
        if self.sink.is_some() {
            log::warn!(
                "Row grid writer dropped without close, the file has no index ({} entities)",
                self.entries.len()
            );
        }
    }
}

fn closed() -> StoreError {
    StoreError::Io(std::io::Error::other("writer is already closed"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;
    use crate::var::{IntVar, StrVar, Var};

    fn schema() -> Schema {
        Schema::new(vec![
            IntVar::new("level", 0, 10, false).unwrap().into(),
            StrVar::new("tag", 3, true).into(),
        ])
    }

    #[test]
    fn patches_row_count() {
        let mut writer = RowGridWriter::new(Cursor::new(Vec::<u8>::new()), schema()).unwrap();
        writer
            .write(
                "a",
                [vec![
                    vec![Value::Int(1), Value::from("x")],
                    vec![Value::Int(2), Value::Null],
                ]],
            )
            .unwrap();
        assert_eq!(writer.row_count(), 2);

        let bytes = writer.close().unwrap().into_inner();
        assert_eq!(&bytes[..4], b"RG\x01\x02");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 2]);

        let index_offset = u64::from_be_bytes(bytes[bytes.len() - 8..].try_into().unwrap());
        // entity count, "a\0", one segment of two rows
        assert_eq!(
            &bytes[index_offset as usize..bytes.len() - 8],
            &[1, b'a', 0, 1, 2]
        );
    }

    #[test]
    fn failed_write_leaves_no_trace() {
        let mut writer = RowGridWriter::new(Cursor::new(Vec::<u8>::new()), schema()).unwrap();
        let result = writer.write(
            "a",
            [vec![
                vec![Value::Int(1), Value::from("x")],
                vec![Value::Int(11), Value::Null],
            ]],
        );
        assert_matches!(result, Err(StoreError::OutOfDomain { .. }));
        assert_eq!(writer.row_count(), 0);

        writer
            .write("a", [vec![vec![Value::Int(1), Value::Null]]])
            .unwrap();
        assert_matches!(
            writer.write("a", [vec![vec![Value::Int(1), Value::Null]]]),
            Err(StoreError::DuplicateName(_))
        );
    }

    #[test]
    fn too_many_columns() {
        let vars = (0..256)
            .map(|i| Var::from(StrVar::new(format!("c{i}"), 1, false)))
            .collect::<Vec<_>>();
        assert_matches!(
            RowGridWriter::new(Cursor::new(Vec::<u8>::new()), Schema::new(vars)).err(),
            Some(StoreError::DomainTooLarge(_))
        );
    }
}
