use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bytes::{BufMut, BytesMut};
use cartokit_types::cartesian::{CartesianPoint2d, Point2d, Rect};
use cartokit_types::geo;

use crate::cstr;
use crate::error::StoreError;
use crate::store::{IndexEntry, QualityReport, StoreOptions, SIGNATURE, VERSION};
use crate::var::RealVar;
use crate::varint;

/// Writes entities into a geometry store.
///
/// Entities are added with [`Writer::write`] in the order they will appear in the file. Nothing is written to the
/// sink until [`Writer::close`]: the header starts with the total number of points, which is only known at the end,
/// so the index and the coordinate section are kept in memory. A writer dropped without a successful `close` leaves
/// the sink without a valid store.
pub struct Writer<W: Write> {
    sink: Option<W>,
    options: StoreOptions,
    entries: Vec<IndexEntry>,
    names: HashSet<String>,
    coords: BytesMut,
    quality: QualityReport,
}

impl Writer<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and returns a writer for it.
    pub fn create(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self, StoreError> {
        let file = File::create(path.as_ref())?;
        log::debug!("Creating geometry store {}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file), options))
    }
}

impl<W: Write> Writer<W> {
    /// Creates a writer that will write the store into `sink` on close.
    pub fn new(sink: W, options: StoreOptions) -> Self {
        Self {
            sink: Some(sink),
            options,
            entries: vec![],
            names: HashSet::new(),
            coords: BytesMut::new(),
            quality: QualityReport::default(),
        }
    }

    /// Options of the writer.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Number of entities written so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entities were written yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconstruction errors of all the points written so far.
    pub fn quality(&self) -> &QualityReport {
        &self.quality
    }

    /// Adds an entity with the given name and rings.
    ///
    /// With [`StoreOptions::geographic`] coordinates are longitudes and latitudes in degrees, folded into
    /// `[-180, 180]` and `[-90, 90]`. Every point must then lie inside the raster domain, otherwise
    /// [`StoreError::OutOfDomain`] is returned. A ring that repeats its first point at the end loses the repeated
    /// point. On error nothing is added.
    pub fn write<R, P>(
        &mut self,
        name: &str,
        parts: impl IntoIterator<Item = R>,
    ) -> Result<(), StoreError>
    where
        R: AsRef<[P]>,
        P: CartesianPoint2d<Num = f64>,
    {
        if name.contains('\0') {
            return Err(StoreError::InvalidName(name.to_owned()));
        }
        if self.names.contains(name) {
            return Err(StoreError::DuplicateName(name.to_owned()));
        }

        let geographic = self.options.geographic;
        let parts: Vec<Vec<Point2d>> = parts
            .into_iter()
            .map(|part| normalize_part(part.as_ref(), geographic))
            .collect();

        let raster = self.options.raster;
        let domain = raster.domain();
        for p in parts.iter().flatten() {
            if !(domain.x_min..=domain.x_max).contains(&p.x) {
                return Err(StoreError::OutOfDomain {
                    field: format!("{name}.x"),
                    value: p.x.to_string(),
                });
            }
            if !(domain.y_min..=domain.y_max).contains(&p.y) {
                return Err(StoreError::OutOfDomain {
                    field: format!("{name}.y"),
                    value: p.y.to_string(),
                });
            }
        }

        let bbox = parts
            .iter()
            .map(|part| Rect::from_points(part))
            .collect::<Rect>();
        let raster_box = raster.snap_outward(&bbox);
        let local = raster.to_rect(&raster_box);

        let width = self.options.coord_width;
        let x_var = RealVar::new("x", local.x_min, local.x_max, width, false);
        let y_var = RealVar::new("y", local.y_min, local.y_max, width, false);

        let point_count: usize = parts.iter().map(Vec::len).sum();
        let mut coords = BytesMut::with_capacity(point_count * 2 * width.bytes());
        let mut errors = Vec::with_capacity(point_count);
        for p in parts.iter().flatten() {
            let x = x_var.index(Some(p.x))?;
            let y = y_var.index(Some(p.y))?;
            width.put_code(&mut coords, x);
            width.put_code(&mut coords, y);

            let restored = Point2d::new(
                x_var.value(x)?.unwrap_or_default(),
                y_var.value(y)?.unwrap_or_default(),
            );
            errors.push(if geographic {
                geo::haversine(p, &restored)
            } else {
                p.distance(&restored)
            });
        }

        for error in errors {
            self.quality.record(error);
        }
        self.coords.unsplit(coords);

        log::debug!(
            "Added entity {name:?}: {} rings, {point_count} points, box {raster_box:?}",
            parts.len()
        );

        self.names.insert(name.to_owned());
        self.entries.push(IndexEntry {
            name: name.to_owned(),
            raster_box,
            bbox: local,
            ring_lengths: parts.iter().map(|part| part.len() as u64).collect(),
        });

        Ok(())
    }

    /// Writes the store into the sink and returns the sink.
    pub fn close(mut self) -> Result<W, StoreError> {
        let mut header = BytesMut::new();
        header.put_slice(SIGNATURE);
        header.put_u8(VERSION);
        header.put_u8(self.options.coord_width.bytes() as u8);

        let total_points: u64 = self.entries.iter().map(IndexEntry::point_count).sum();
        varint::put_uvarint(&mut header, u128::from(total_points));
        varint::put_uvarint(&mut header, self.entries.len() as u128);

        for entry in &self.entries {
            cstr::put(&mut header, &entry.name)?;
            varint::put_uvarint(&mut header, entry.ring_lengths.len() as u128);
            let raster_box = entry.raster_box;
            for bound in [raster_box.x0, raster_box.x1, raster_box.y0, raster_box.y1] {
                header.put_u16(bound);
            }
            for &len in &entry.ring_lengths {
                varint::put_uvarint(&mut header, u128::from(len));
            }
        }

        let Some(mut sink) = self.sink.take() else {
            return Err(StoreError::Io(std::io::Error::other("writer is already closed")));
        };
        sink.write_all(&header)?;
        sink.write_all(&self.coords)?;
        sink.flush()?;

        log::info!(
            "Geometry store closed: {} entities, {total_points} points, mean error {:.3} m, max error {:.3} m",
            self.entries.len(),
            self.quality.mean(),
            self.quality.max(),
        );

        Ok(sink)
    }
}

impl<W: Write> Drop for Writer<W> {
    fn drop(&mut self) {
        if self.sink.is_some() {
            log::warn!(
                "Geometry store writer dropped without close, {} entities are lost",
                self.entries.len()
            );
        }
    }
}

fn normalize_part<P: CartesianPoint2d<Num = f64>>(part: &[P], geographic: bool) -> Vec<Point2d> {
    let mut points: Vec<Point2d> = part
        .iter()
        .map(|p| {
            if geographic {
                geo::normalize(p)
            } else {
                Point2d::new(p.x(), p.y())
            }
        })
        .collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    points
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use std::io::Cursor;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::store::{GlobalRaster, Reader};
    use crate::var::ByteWidth;

    fn square() -> Vec<Point2d> {
        vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 1.0),
            Point2d::new(0.0, 0.0),
        ]
    }

    #[test]
    fn header_layout() {
        let mut writer = Writer::new(Vec::<u8>::new(), StoreOptions::with_coord_width(ByteWidth::One));
        writer.write("sq", [square()]).unwrap();
        let bytes = writer.close().unwrap();

        assert_eq!(&bytes[..4], b"PF\x00\x01");
        // 4 points (closing point dropped), 1 entity, name, 1 ring
        assert_eq!(&bytes[4..10], &[4, 1, b's', b'q', 0, 1]);
        // box (8 bytes) + ring length + 4 points of 2 bytes
        assert_eq!(bytes.len(), 10 + 8 + 1 + 8);
        assert_eq!(bytes[18], 4);
    }

    #[test]
    fn duplicate_and_invalid_names() {
        let mut writer = Writer::new(Vec::<u8>::new(), StoreOptions::default());
        writer.write("a", [square()]).unwrap();
        assert_matches!(writer.write("a", [square()]), Err(StoreError::DuplicateName(_)));
        assert_matches!(writer.write("a\0b", [square()]), Err(StoreError::InvalidName(_)));
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn coordinates_are_folded() {
        let parts = [vec![Point2d::new(190.0, 10.0), Point2d::new(-170.5, 11.0)]];
        let mut writer = Writer::new(Vec::<u8>::new(), StoreOptions::default());
        writer.write("wrapped", parts).unwrap();
        assert_eq!(writer.entries[0].ring_lengths, vec![2]);
        assert!(writer.entries[0].bbox.contains(&Point2d::new(-170.0, 10.0)));
    }

    #[test]
    fn quality_is_tracked() {
        let mut writer = Writer::new(Vec::<u8>::new(), StoreOptions::with_coord_width(ByteWidth::Two));
        writer.write("sq", [square()]).unwrap();
        assert_eq!(writer.quality().count(), 4);
        assert!(writer.quality().max() < 10.0);
    }

    #[test]
    fn planar_coordinates_are_kept() {
        let raster = GlobalRaster::new(Rect::new(0.0, 0.0, 1000.0, 1000.0), 1000);
        let options = StoreOptions::planar(raster, ByteWidth::Two);
        let ring = vec![Point2d::new(500.0, 500.0), Point2d::new(510.0, 520.0)];

        let mut writer = Writer::new(Vec::<u8>::new(), options);
        writer.write("plot", [ring.clone()]).unwrap();
        assert!(writer.quality().max() < 1e-3);
        let bytes = writer.close().unwrap();

        let mut reader = Reader::new(Cursor::new(bytes), options).unwrap();
        assert_eq!(reader.entity_bbox(0).unwrap(), Rect::new(500.0, 500.0, 510.0, 520.0));
        let restored = reader.read(0).unwrap();
        assert_eq!(restored[0].len(), 2);
        for (restored, original) in restored[0].iter().zip(&ring) {
            assert_abs_diff_eq!(*restored, *original, epsilon = 1e-3);
        }
    }

    #[test]
    fn points_outside_raster_are_rejected() {
        let raster = GlobalRaster::new(Rect::new(-100.0, -100.0, 100.0, 100.0), 200);
        let mut writer = Writer::new(Vec::<u8>::new(), StoreOptions::planar(raster, ByteWidth::Four));

        let ring = vec![Point2d::new(0.0, 0.0), Point2d::new(150.0, 10.0)];
        assert_matches!(
            writer.write("far", [ring]),
            Err(StoreError::OutOfDomain { field, value }) if field == "far.x" && value == "150"
        );
        assert!(writer.is_empty());
        assert_eq!(writer.quality().count(), 0);

        // The name is still free after a rejected write.
        writer
            .write("far", [vec![Point2d::new(0.0, 0.0), Point2d::new(99.0, 10.0)]])
            .unwrap();
        assert_eq!(writer.len(), 1);

        // Folding keeps geographic points in the default domain, but a planar default raster rejects them.
        let options = StoreOptions::planar(GlobalRaster::default(), ByteWidth::Two);
        let mut writer = Writer::new(Vec::<u8>::new(), options);
        assert_matches!(
            writer.write("east", [vec![Point2d::new(190.0, 10.0)]]),
            Err(StoreError::OutOfDomain { .. })
        );
        assert_matches!(
            writer.write("nan", [vec![Point2d::new(0.0, f64::NAN)]]),
            Err(StoreError::OutOfDomain { field, .. }) if field == "nan.y"
        );
    }
}
