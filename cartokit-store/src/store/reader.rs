use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Buf;
use cartokit_types::cartesian::{Point2d, Rect};

use crate::cstr;
use crate::error::StoreError;
use crate::store::{IndexEntry, RasterBox, StoreOptions, SIGNATURE, VERSION};
use crate::var::{ByteWidth, RealVar};
use crate::varint;

/// Random access reader of a geometry store.
///
/// The index is read and validated when the reader is created. Entities are then read from the source on demand.
pub struct Reader<R: Read + Seek> {
    source: R,
    coord_width: ByteWidth,
    entries: Vec<IndexEntry>,
    offsets: Vec<u64>,
    total_points: u64,
    coords_start: u64,
}

impl Reader<BufReader<File>> {
    /// Opens the file at `path`.
    ///
    /// The raster of `options` must be the one the file was written with.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self, StoreError> {
        let file = File::open(path.as_ref())?;
        log::debug!("Opening geometry store {}", path.as_ref().display());
        Self::new(BufReader::new(file), options)
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Reads the index of the store from `source`.
    pub fn new(mut source: R, options: StoreOptions) -> Result<Self, StoreError> {
        let mut header = [0u8; 4];
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
        let coord_width = ByteWidth::from_bytes(usize::from(header[3])).ok_or_else(|| {
            StoreError::UnsupportedFormat(format!("invalid coordinate width {}", header[3]))
        })?;

        let total_points = varint::read_u64(&mut source)?;
        let entity_count = varint::read_u64(&mut source)?;

        let mut entries = vec![];
        let mut offsets = vec![];
        let mut offset = 0u64;
        for _ in 0..entity_count {
            let entry = read_entry(&mut source, &options)?;
            offsets.push(offset);
            offset = entry
                .ring_lengths
                .iter()
                .try_fold(offset, |acc, &len| acc.checked_add(len))
                .ok_or_else(|| StoreError::CorruptData("point count overflow".into()))?;
            entries.push(entry);
        }

        if offset != total_points {
            return Err(StoreError::CorruptData(format!(
                "index lists {offset} points, header declares {total_points}"
            )));
        }

        let coords_start = source.stream_position()?;
        let coords_len = total_points
            .checked_mul(2 * coord_width.bytes() as u64)
            .ok_or_else(|| StoreError::CorruptData("coordinate section is too large".into()))?;
        let expected_len = coords_start
            .checked_add(coords_len)
            .ok_or_else(|| StoreError::CorruptData("coordinate section is too large".into()))?;
        let actual_len = source.seek(SeekFrom::End(0))?;
        if actual_len < expected_len {
            return Err(StoreError::CorruptData(format!(
                "coordinate section is {} bytes short",
                expected_len - actual_len
            )));
        }
        if actual_len > expected_len {
            return Err(StoreError::CorruptData(format!(
                "{} trailing bytes after the coordinate section",
                actual_len - expected_len
            )));
        }

        log::debug!(
            "Geometry store index read: {} entities, {total_points} points, {}-byte coordinates",
            entries.len(),
            coord_width.bytes()
        );

        Ok(Self {
            source,
            coord_width,
            entries,
            offsets,
            total_points,
            coords_start,
        })
    }

    /// Number of entities in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store has no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index records of the entities, in file order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Total number of points in the store.
    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    /// Width of the quantized coordinates.
    pub fn coord_width(&self) -> ByteWidth {
        self.coord_width
    }

    /// Position of the entity with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Bounding box of the entity `index`. Contains all the points of the entity.
    pub fn entity_bbox(&self, index: usize) -> Result<Rect, StoreError> {
        self.entry(index).map(IndexEntry::bbox)
    }

    /// Reads rings of the entity `index`.
    pub fn read(&mut self, index: usize) -> Result<Vec<Vec<Point2d>>, StoreError> {
        let entry = self.entry(index)?;
        let bbox = entry.bbox;
        let ring_lengths = entry.ring_lengths.clone();

        let width = self.coord_width;
        let point_size = 2 * width.bytes() as u64;
        let start = self.coords_start + self.offsets[index] * point_size;
        let len = usize::try_from(entry.point_count() * point_size)
            .map_err(|_| StoreError::CorruptData("entity is too large".into()))?;

        let mut data = vec![0u8; len];
        self.source.seek(SeekFrom::Start(start))?;
        self.source.read_exact(&mut data)?;

        let x_var = RealVar::new("x", bbox.x_min, bbox.x_max, width, false);
        let y_var = RealVar::new("y", bbox.y_min, bbox.y_max, width, false);

        let mut buf = &data[..];
        let mut rings = Vec::with_capacity(ring_lengths.len());
        for ring_len in ring_lengths {
            let mut ring = Vec::with_capacity(ring_len as usize);
            for _ in 0..ring_len {
                let x = x_var.value(width.get_code(&mut buf)?)?.unwrap_or_default();
                let y = y_var.value(width.get_code(&mut buf)?)?.unwrap_or_default();
                ring.push(Point2d::new(x, y));
            }
            rings.push(ring);
        }

        debug_assert!(!buf.has_remaining());
        Ok(rings)
    }

    /// Reads rings of the entity with the given name.
    pub fn get(&mut self, name: &str) -> Result<Vec<Vec<Point2d>>, StoreError> {
        let index = self
            .position(name)
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))?;
        self.read(index)
    }

    /// Reads all the entities in file order.
    pub fn read_all(&mut self) -> Result<Vec<(String, Vec<Vec<Point2d>>)>, StoreError> {
        (0..self.len())
            .map(|index| Ok((self.entries[index].name.clone(), self.read(index)?)))
            .collect()
    }

    /// Returns the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn entry(&self, index: usize) -> Result<&IndexEntry, StoreError> {
        self.entries
            .get(index)
            .ok_or_else(|| StoreError::NotFound(format!("#{index}")))
    }
}

fn read_entry(source: &mut impl Read, options: &StoreOptions) -> Result<IndexEntry, StoreError> {
    let name = cstr::read(source)?;
    let ring_count = varint::read_u64(source)?;

    let mut bounds = [0u8; 8];
    source.read_exact(&mut bounds)?;
    let mut bounds = &bounds[..];
    let raster_box = RasterBox {
        x0: bounds.get_u16(),
        x1: bounds.get_u16(),
        y0: bounds.get_u16(),
        y1: bounds.get_u16(),
    };
    if !options.raster.is_valid(&raster_box) {
        return Err(StoreError::CorruptData(format!(
            "invalid bounding box {raster_box:?} of entity '{name}'"
        )));
    }

    let mut ring_lengths = vec![];
    for _ in 0..ring_count {
        ring_lengths.push(varint::read_u64(source)?);
    }

    Ok(IndexEntry {
        name,
        raster_box,
        bbox: options.raster.to_rect(&raster_box),
        ring_lengths,
    })
}
