use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Buf;

use crate::cstr;
use crate::error::StoreError;
use crate::grid::{read_schema, GridEntry, Segment, HEADER_SIZE, SIGNATURE, VERSION};
use crate::var::Schema;
use crate::varint;

/// Random access reader of a row grid file.
pub struct RowGridReader<R: Read + Seek> {
    source: R,
    schema: Schema,
    row_count: u64,
    rows_start: u64,
    entries: Vec<GridEntry>,
    first_rows: Vec<u64>,
    next: usize,
}

impl RowGridReader<BufReader<File>> {
    /// Opens the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = File::open(path.as_ref())?;
        log::debug!("Opening row grid {}", path.as_ref().display());
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> RowGridReader<R> {
    /// Reads the header and the index of the row grid starting at the current position of `source`.
    pub fn new(mut source: R) -> Result<Self, StoreError> {
        let start = source.stream_position()?;

        let mut header = [0u8; HEADER_SIZE as usize];
        source.read_exact(&mut header)?;
        if &header[..2] != SIGNATURE {
            return Err(StoreError::UnsupportedFormat(format!(
                "invalid signature {:?}",
                &header[..2]
            )));
        }
        if header[2] != VERSION {
            return Err(StoreError::UnsupportedFormat(format!(
                "unknown version {}",
                header[2]
            )));
        }
        let column_count = header[3];
        let row_count = u64::from((&header[4..]).get_u32());

        let schema = read_schema(&mut source, column_count)?;
        let rows_start = source.stream_position()?;
        let rows_end = (schema.row_size() as u64)
            .checked_mul(row_count)
            .and_then(|len| len.checked_add(rows_start))
            .ok_or_else(|| StoreError::CorruptData("row section is too large".into()))?;

        let end = source.seek(SeekFrom::End(0))?;
        if end < rows_end.saturating_add(8) {
            return Err(StoreError::TruncatedInput);
        }
        source.seek(SeekFrom::End(-8))?;
        let mut index_offset = [0u8; 8];
        source.read_exact(&mut index_offset)?;
        let index_offset = u64::from_be_bytes(index_offset);
        if start.checked_add(index_offset) != Some(rows_end) {
            return Err(StoreError::CorruptData(format!(
                "index offset {index_offset} does not follow {row_count} rows"
            )));
        }

        source.seek(SeekFrom::Start(rows_end))?;
        let entity_count = varint::read_u64(&mut source)?;
        let mut entries = vec![];
        let mut first_rows = vec![];
        let mut first_row = 0u64;
        for _ in 0..entity_count {
            let id = cstr::read(&mut source)?;
            let segment_count = varint::read_u64(&mut source)?;
            let mut segment_lengths = vec![];
            for _ in 0..segment_count {
                segment_lengths.push(varint::read_u64(&mut source)?);
            }

            let entry = GridEntry {
                id,
                segment_lengths,
            };
            first_rows.push(first_row);
            first_row = entry
                .segment_lengths
                .iter()
                .try_fold(first_row, |acc, &len| acc.checked_add(len))
                .ok_or_else(|| StoreError::CorruptData("row count overflow".into()))?;
            entries.push(entry);
        }

        if first_row != row_count {
            return Err(StoreError::CorruptData(format!(
                "index lists {first_row} rows, header declares {row_count}"
            )));
        }
        if source.stream_position()? != end - 8 {
            return Err(StoreError::CorruptData(
                "index does not end at the index offset".into(),
            ));
        }

        log::debug!(
            "Row grid index read: {} columns, {} entities, {row_count} rows",
            schema.len(),
            entries.len()
        );

        Ok(Self {
            source,
            schema,
            row_count,
            rows_start,
            entries,
            first_rows,
            next: 0,
        })
    }

    /// Schema of the rows.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Total number of rows.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the file has no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of the entities in file order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    /// Reads segments of the entity with the given id.
    pub fn read(&mut self, id: &str) -> Result<Vec<Segment>, StoreError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
        self.read_at(index)
    }

    /// Reads the entity following the last one returned by this method, or `None` after the last entity.
    pub fn next_entity(&mut self) -> Result<Option<(String, Vec<Segment>)>, StoreError> {
        if self.next >= self.entries.len() {
            return Ok(None);
        }

        let index = self.next;
        self.next += 1;
        let segments = self.read_at(index)?;
        Ok(Some((self.entries[index].id.clone(), segments)))
    }

    fn read_at(&mut self, index: usize) -> Result<Vec<Segment>, StoreError> {
        let entry = &self.entries[index];
        let row_size = self.schema.row_size();
        let too_large = || StoreError::CorruptData(format!("entity '{}' is too large", entry.id));
        let len = self
            .schema
            .row_offset(entry.row_count())
            .and_then(|len| usize::try_from(len).ok())
            .ok_or_else(too_large)?;
        let start = self
            .schema
            .row_offset(self.first_rows[index])
            .and_then(|offset| self.rows_start.checked_add(offset))
            .ok_or_else(too_large)?;

        let mut data = vec![0u8; len];
        self.source.seek(SeekFrom::Start(start))?;
        self.source.read_exact(&mut data)?;

        let mut rows = data.chunks_exact(row_size.max(1));
        let mut segments = Vec::with_capacity(entry.segment_lengths.len());
        for &segment_len in &entry.segment_lengths {
            let mut segment = Vec::with_capacity(segment_len as usize);
            for _ in 0..segment_len {
                let row = if row_size == 0 {
                    &[][..]
                } else {
                    rows.next().ok_or(StoreError::TruncatedInput)?
                };
                segment.push(self.schema.decode(row)?);
            }
            segments.push(segment);
        }

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;
    use crate::grid::RowGridWriter;
    use crate::var::{ByteWidth, IntVar, RealVar, Value};

    fn grid() -> Vec<u8> {
        let schema = Schema::new(vec![
            IntVar::new("depth", -100, 100, true).unwrap().into(),
            RealVar::new("t", 0.0, 1.0, ByteWidth::Two, false).into(),
        ]);
        let mut writer = RowGridWriter::new(Cursor::new(Vec::<u8>::new()), schema).unwrap();
        writer
            .write(
                "first",
                [
                    vec![vec![Value::Int(-100), Value::Real(0.0)]],
                    vec![
                        vec![Value::Null, Value::Real(0.5)],
                        vec![Value::Int(100), Value::Real(1.0)],
                    ],
                ],
            )
            .unwrap();
        writer
            .write("second", [vec![vec![Value::Int(7), Value::Real(0.25)]]])
            .unwrap();
        writer.close().unwrap().into_inner()
    }

    #[test]
    fn reads_by_id() {
        let mut reader = RowGridReader::new(Cursor::new(grid())).unwrap();
        assert_eq!(reader.row_count(), 4);
        assert_eq!(reader.ids().collect::<Vec<_>>(), ["first", "second"]);

        let second = reader.read("second").unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0][0][0], Value::Int(7));

        let first = reader.read("first").unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1][0][0], Value::Null);
        assert_eq!(first[1][1][0], Value::Int(100));

        assert_matches!(reader.read("third"), Err(StoreError::NotFound(_)));
    }

    #[test]
    fn reads_in_order() {
        let mut reader = RowGridReader::new(Cursor::new(grid())).unwrap();
        let (id, _) = reader.next_entity().unwrap().unwrap();
        assert_eq!(id, "first");
        let (id, segments) = reader.next_entity().unwrap().unwrap();
        assert_eq!(id, "second");
        assert_eq!(segments[0].len(), 1);
        assert!(reader.next_entity().unwrap().is_none());
    }

    #[test]
    fn rejects_malformed_files() {
        let bytes = grid();

        let mut bad_version = bytes.clone();
        bad_version[2] = 2;
        assert_matches!(
            RowGridReader::new(Cursor::new(bad_version)).err(),
            Some(StoreError::UnsupportedFormat(_))
        );

        let mut bad_count = bytes.clone();
        bad_count[7] = 5;
        assert_matches!(
            RowGridReader::new(Cursor::new(bad_count)).err(),
            Some(StoreError::CorruptData(_))
        );

        let truncated = bytes[..bytes.len() - 1].to_vec();
        assert_matches!(
            RowGridReader::new(Cursor::new(truncated)).err(),
            Some(StoreError::CorruptData(_))
        );

        assert_matches!(
            RowGridReader::new(Cursor::new(bytes[..6].to_vec())).err(),
            Some(StoreError::TruncatedInput)
        );
    }
}
