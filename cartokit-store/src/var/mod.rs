//! Quantized fields.
//!
//! A [`Var`] describes how one scalar channel is stored as a fixed width code:
//! * [`IntVar`] - an integer in `[min, max]`, stored exactly as `value - min` in the smallest byte width that fits
//!   the domain.
//! * [`RealVar`] - a real number in `[min, max]`, linearly quantized onto the codes of an explicitly chosen width.
//! * [`StrVar`] - a UTF-8 string padded with zero bytes to a fixed width.
//!
//! Nullable numeric fields reserve the largest code of their width for null; nullable string fields use a value
//! of all `0xff` bytes, which is never valid UTF-8.
//!
//! Numeric codes are stored big-endian.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

mod schema;
pub use schema::Schema;

/// Byte width of a numeric code.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ByteWidth {
    /// 1 byte.
    One,
    /// 2 bytes.
    Two,
    /// 4 bytes.
    #[default]
    Four,
    /// 8 bytes.
    Eight,
}

impl ByteWidth {
    /// All the widths from the narrowest.
    pub const ALL: [ByteWidth; 4] = [Self::One, Self::Two, Self::Four, Self::Eight];

    /// Width with the given number of bytes, if supported.
    pub fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    /// Number of bytes.
    pub fn bytes(&self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Largest code representable with this width.
    pub fn max_code(&self) -> u64 {
        match self {
            Self::Eight => u64::MAX,
            _ => (1u64 << (8 * self.bytes())) - 1,
        }
    }

    /// Number of distinct codes of this width.
    pub fn code_count(&self) -> u128 {
        u128::from(self.max_code()) + 1
    }

    pub(crate) fn put_code(&self, buf: &mut impl BufMut, code: u64) {
        buf.put_uint(code, self.bytes());
    }

    pub(crate) fn get_code(&self, buf: &mut impl Buf) -> Result<u64, StoreError> {
        if buf.remaining() < self.bytes() {
            return Err(StoreError::TruncatedInput);
        }

        Ok(buf.get_uint(self.bytes()))
    }
}

/// Value of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing value.
    Null,
    /// Integer value.
    Int(i64),
    /// Real value.
    Real(f64),
    /// String value.
    Str(String),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer value, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Real value, if it is a number.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String value, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Integer field.
///
/// Deserialization goes through [`IntVar::new`], so a stored width must be the one the domain needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntVarFields")]
pub struct IntVar {
    name: String,
    min: i64,
    max: i64,
    width: ByteWidth,
    nullable: bool,
}

impl IntVar {
    /// Creates a field for integers in `[min, max]` using the narrowest width that fits all the values (and the
    /// null code if `nullable`).
    ///
    /// # Panics
    ///
    /// Panics if `max <= min`.
    pub fn new(
        name: impl Into<String>,
        min: i64,
        max: i64,
        nullable: bool,
    ) -> Result<Self, StoreError> {
        assert!(max > min, "empty integer domain [{min}, {max}]");
        let name = name.into();
        let distinct = (max as i128 - min as i128 + 1) as u128 + u128::from(nullable);
        let width = ByteWidth::ALL
            .into_iter()
            .find(|width| distinct <= width.code_count())
            .ok_or_else(|| StoreError::DomainTooLarge(name.clone()))?;

        Ok(Self {
            name,
            min,
            max,
            width,
            nullable,
        })
    }

    /// Name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Smallest value of the domain.
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Largest value of the domain.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Width of the codes.
    pub fn width(&self) -> ByteWidth {
        self.width
    }

    /// Whether the field accepts nulls.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Code of the value. `None` stands for null.
    pub fn index(&self, value: Option<i64>) -> Result<u64, StoreError> {
        match value {
            None if self.nullable => Ok(self.width.max_code()),
            None => Err(StoreError::NotNullable(self.name.clone())),
            Some(v) if v < self.min || v > self.max => Err(StoreError::OutOfDomain {
                field: self.name.clone(),
                value: v.to_string(),
            }),
            Some(v) => Ok((v as i128 - self.min as i128) as u64),
        }
    }

    /// Value of the code. `None` stands for null.
    pub fn value(&self, index: u64) -> Result<Option<i64>, StoreError> {
        if self.nullable && index == self.width.max_code() {
            return Ok(None);
        }

        if i128::from(index) > self.max as i128 - self.min as i128 {
            return Err(StoreError::CorruptData(format!(
                "code {index} is outside of the domain of field '{}'",
                self.name
            )));
        }

        Ok(Some((self.min as i128 + i128::from(index)) as i64))
    }
}

/// Real number field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RealVarFields")]
pub struct RealVar {
    name: String,
    min: f64,
    max: f64,
    width: ByteWidth,
    nullable: bool,
}

impl RealVar {
    /// Creates a field for real numbers in `[min, max]` quantized onto codes of the given width.
    ///
    /// # Panics
    ///
    /// Panics if the bounds are not finite or `max <= min`.
    pub fn new(
        name: impl Into<String>,
        min: f64,
        max: f64,
        width: ByteWidth,
        nullable: bool,
    ) -> Self {
        assert!(
            min.is_finite() && max.is_finite() && max > min,
            "invalid real domain [{min}, {max}]"
        );

        Self {
            name: name.into(),
            min,
            max,
            width,
            nullable,
        }
    }

    /// Name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Smallest value of the domain.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest value of the domain.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the codes.
    pub fn width(&self) -> ByteWidth {
        self.width
    }

    /// Whether the field accepts nulls.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Largest code of a non-null value.
    pub fn span(&self) -> u64 {
        self.width.max_code() - u64::from(self.nullable)
    }

    /// Largest difference between a value and its decoded code.
    pub fn resolution(&self) -> f64 {
        (self.max - self.min) / self.span() as f64 / 2.0
    }

    /// Code of the value. `None` stands for null.
    pub fn index(&self, value: Option<f64>) -> Result<u64, StoreError> {
        let v = match value {
            None if self.nullable => return Ok(self.span() + 1),
            None => return Err(StoreError::NotNullable(self.name.clone())),
            Some(v) => v,
        };

        if !(self.min..=self.max).contains(&v) {
            return Err(StoreError::OutOfDomain {
                field: self.name.clone(),
                value: v.to_string(),
            });
        }

        let span = self.span();
        let index = ((v - self.min) * span as f64 / (self.max - self.min)).round() as u64;
        Ok(index.min(span))
    }

    /// Value of the code. `None` stands for null.
    pub fn value(&self, index: u64) -> Result<Option<f64>, StoreError> {
        let span = self.span();
        if index > span {
            return if self.nullable && index == span + 1 {
                Ok(None)
            } else {
                Err(StoreError::CorruptData(format!(
                    "code {index} is outside of the domain of field '{}'",
                    self.name
                )))
            };
        }

        Ok(Some(
            self.min + index as f64 * (self.max - self.min) / span as f64,
        ))
    }
}

#[derive(Deserialize)]
struct IntVarFields {
    name: String,
    min: i64,
    max: i64,
    #[serde(default)]
    width: Option<ByteWidth>,
    nullable: bool,
}

impl TryFrom<IntVarFields> for IntVar {
    type Error = StoreError;

    fn try_from(fields: IntVarFields) -> Result<Self, Self::Error> {
        if fields.max <= fields.min {
            return Err(StoreError::CorruptData(format!(
                "empty domain [{}, {}] of field '{}'",
                fields.min, fields.max, fields.name
            )));
        }

        let var = IntVar::new(fields.name, fields.min, fields.max, fields.nullable)?;
        match fields.width {
            Some(width) if width != var.width => Err(StoreError::CorruptData(format!(
                "field '{}' needs {} byte codes, not {}",
                var.name,
                var.width.bytes(),
                width.bytes()
            ))),
            _ => Ok(var),
        }
    }
}

#[derive(Deserialize)]
struct RealVarFields {
    name: String,
    min: f64,
    max: f64,
    width: ByteWidth,
    nullable: bool,
}

impl TryFrom<RealVarFields> for RealVar {
    type Error = StoreError;

    fn try_from(fields: RealVarFields) -> Result<Self, Self::Error> {
        if !(fields.min.is_finite() && fields.max.is_finite() && fields.max > fields.min) {
            return Err(StoreError::CorruptData(format!(
                "invalid domain [{}, {}] of field '{}'",
                fields.min, fields.max, fields.name
            )));
        }

        Ok(RealVar::new(
            fields.name,
            fields.min,
            fields.max,
            fields.width,
            fields.nullable,
        ))
    }
}

#[derive(Deserialize)]
struct StrVarFields {
    name: String,
    width: usize,
    nullable: bool,
}

impl TryFrom<StrVarFields> for StrVar {
    type Error = StoreError;

    fn try_from(fields: StrVarFields) -> Result<Self, Self::Error> {
        if fields.width == 0 {
            return Err(StoreError::CorruptData(format!(
                "string field '{}' has zero width",
                fields.name
            )));
        }

        Ok(StrVar::new(fields.name, fields.width, fields.nullable))
    }
}

/// Fixed width string field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StrVarFields")]
pub struct StrVar {
    name: String,
    width: usize,
    nullable: bool,
}

impl StrVar {
    /// Creates a field for strings of up to `width` bytes of UTF-8.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    pub fn new(name: impl Into<String>, width: usize, nullable: bool) -> Self {
        assert!(width > 0, "string field must be at least one byte wide");
        Self {
            name: name.into(),
            width,
            nullable,
        }
    }

    /// Name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the field in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the field accepts nulls.
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Writes the value padded to the field width. `None` stands for null.
    pub fn encode(&self, value: Option<&str>, buf: &mut impl BufMut) -> Result<(), StoreError> {
        match value {
            None if self.nullable => {
                buf.put_bytes(0xff, self.width);
                Ok(())
            }
            None => Err(StoreError::NotNullable(self.name.clone())),
            Some(s) if s.len() > self.width => Err(StoreError::ValueTooLong {
                field: self.name.clone(),
                len: s.len(),
                width: self.width,
            }),
            Some(s) => {
                buf.put_slice(s.as_bytes());
                buf.put_bytes(0, self.width - s.len());
                Ok(())
            }
        }
    }

    /// Decodes a value of exactly the field width. `None` stands for null.
    pub fn decode(&self, data: &[u8]) -> Result<Option<String>, StoreError> {
        if data.len() != self.width {
            return Err(StoreError::TruncatedInput);
        }

        if data.iter().all(|b| *b == 0xff) {
            return if self.nullable {
                Ok(None)
            } else {
                Err(StoreError::CorruptData(format!(
                    "null value in field '{}' that is not nullable",
                    self.name
                )))
            };
        }

        let len = data.iter().rposition(|b| *b != 0).map_or(0, |pos| pos + 1);
        let s = std::str::from_utf8(&data[..len]).map_err(|e| {
            StoreError::CorruptData(format!("invalid string in field '{}': {e}", self.name))
        })?;

        Ok(Some(s.to_owned()))
    }
}

/// Any field. See module documentation for details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Var {
    /// Integer field.
    Int(IntVar),
    /// Real field.
    Real(RealVar),
    /// String field.
    Str(StrVar),
}

impl Var {
    /// Name of the field.
    pub fn name(&self) -> &str {
        match self {
            Var::Int(v) => v.name(),
            Var::Real(v) => v.name(),
            Var::Str(v) => v.name(),
        }
    }

    /// Encoded size of the field in bytes.
    pub fn size(&self) -> usize {
        match self {
            Var::Int(v) => v.width().bytes(),
            Var::Real(v) => v.width().bytes(),
            Var::Str(v) => v.width(),
        }
    }

    /// Whether the field accepts nulls.
    pub fn nullable(&self) -> bool {
        match self {
            Var::Int(v) => v.nullable(),
            Var::Real(v) => v.nullable(),
            Var::Str(v) => v.nullable(),
        }
    }

    /// Writes the code of the value into the buffer.
    pub fn encode(&self, value: &Value, buf: &mut impl BufMut) -> Result<(), StoreError> {
        match (self, value) {
            (Var::Int(var), Value::Null) => var.width.put_code(buf, var.index(None)?),
            (Var::Int(var), Value::Int(v)) => var.width.put_code(buf, var.index(Some(*v))?),
            (Var::Int(var), _) => return Err(type_mismatch(&var.name, "an integer")),
            (Var::Real(var), Value::Null) => var.width.put_code(buf, var.index(None)?),
            (Var::Real(var), Value::Int(v)) => {
                var.width.put_code(buf, var.index(Some(*v as f64))?)
            }
            (Var::Real(var), Value::Real(v)) => var.width.put_code(buf, var.index(Some(*v))?),
            (Var::Real(var), _) => return Err(type_mismatch(&var.name, "a real")),
            (Var::Str(var), Value::Null) => var.encode(None, buf)?,
            (Var::Str(var), Value::Str(s)) => var.encode(Some(s), buf)?,
            (Var::Str(var), _) => return Err(type_mismatch(&var.name, "a string")),
        }

        Ok(())
    }

    /// Reads one value from the buffer.
    pub fn decode(&self, buf: &mut impl Buf) -> Result<Value, StoreError> {
        Ok(match self {
            Var::Int(var) => var.value(var.width.get_code(buf)?)?.into(),
            Var::Real(var) => var.value(var.width.get_code(buf)?)?.into(),
            Var::Str(var) => {
                if buf.remaining() < var.width {
                    return Err(StoreError::TruncatedInput);
                }
                let mut data = vec![0; var.width];
                buf.copy_to_slice(&mut data);
                var.decode(&data)?.into()
            }
        })
    }
}

impl From<IntVar> for Var {
    fn from(value: IntVar) -> Self {
        Self::Int(value)
    }
}

impl From<RealVar> for Var {
    fn from(value: RealVar) -> Self {
        Self::Real(value)
    }
}

impl From<StrVar> for Var {
    fn from(value: StrVar) -> Self {
        Self::Str(value)
    }
}

fn type_mismatch(field: &str, expected: &'static str) -> StoreError {
    StoreError::TypeMismatch {
        field: field.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn integer_width_is_minimal() {
        assert_eq!(IntVar::new("a", 0, 255, false).unwrap().width(), ByteWidth::One);
        assert_eq!(IntVar::new("a", 0, 255, true).unwrap().width(), ByteWidth::Two);
        assert_eq!(IntVar::new("a", -100, 154, true).unwrap().width(), ByteWidth::One);
        assert_eq!(IntVar::new("a", 0, 65_535, false).unwrap().width(), ByteWidth::Two);
        assert_eq!(IntVar::new("a", 0, 65_536, false).unwrap().width(), ByteWidth::Four);
        assert_eq!(
            IntVar::new("a", i64::MIN, i64::MAX, false).unwrap().width(),
            ByteWidth::Eight
        );
        assert_matches!(
            IntVar::new("a", i64::MIN, i64::MAX, true),
            Err(StoreError::DomainTooLarge(_))
        );
    }

    #[test]
    #[should_panic]
    fn integer_empty_domain_panics() {
        let _ = IntVar::new("a", 5, 5, false);
    }

    #[test]
    fn integer_roundtrip_is_exact() {
        for (min, max) in [(0, 10), (-300, 300), (-70_000, 5), (i64::MIN, i64::MAX)] {
            let var = IntVar::new("a", min, max, true).or_else(|_| IntVar::new("a", min, max, false));
            let var = var.unwrap();
            let samples = [min, max, min / 2 + max / 2, min.saturating_add(1), max - 1];
            for v in samples {
                assert_eq!(var.value(var.index(Some(v)).unwrap()).unwrap(), Some(v));
            }
        }

        let var = IntVar::new("a", -300, 300, false).unwrap();
        for v in -300..=300 {
            assert_eq!(var.value(var.index(Some(v)).unwrap()).unwrap(), Some(v));
        }
    }

    #[test]
    fn integer_errors() {
        let var = IntVar::new("a", 0, 10, false).unwrap();
        assert_matches!(var.index(Some(11)), Err(StoreError::OutOfDomain { .. }));
        assert_matches!(var.index(Some(-1)), Err(StoreError::OutOfDomain { .. }));
        assert_matches!(var.index(None), Err(StoreError::NotNullable(_)));
        assert_matches!(var.value(11), Err(StoreError::CorruptData(_)));
        assert_matches!(var.value(255), Err(StoreError::CorruptData(_)));

        let nullable = IntVar::new("a", 0, 10, true).unwrap();
        assert_eq!(nullable.index(None).unwrap(), 255);
        assert_eq!(nullable.value(255).unwrap(), None);
    }

    #[test]
    fn real_error_is_within_resolution() {
        for width in ByteWidth::ALL {
            for nullable in [false, true] {
                let var = RealVar::new("x", -180.0, 180.0, width, nullable);
                let bound = var.resolution() + 1e-9;
                for i in 0..=1000 {
                    let v = -180.0 + 360.0 * i as f64 / 1000.0;
                    let decoded = var.value(var.index(Some(v)).unwrap()).unwrap().unwrap();
                    assert!(
                        (decoded - v).abs() <= bound,
                        "{v} decoded as {decoded} with {width:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn real_bounds_map_to_extreme_codes() {
        let var = RealVar::new("x", 0.0, 1.0, ByteWidth::Eight, true);
        assert_eq!(var.index(Some(0.0)).unwrap(), 0);
        assert_eq!(var.index(Some(1.0)).unwrap(), var.span());
        assert_eq!(var.index(None).unwrap(), u64::MAX);
        assert_eq!(var.value(u64::MAX).unwrap(), None);
        assert_abs_diff_eq!(var.value(var.span()).unwrap().unwrap(), 1.0);
    }

    #[test]
    fn real_errors() {
        let var = RealVar::new("x", 0.0, 1.0, ByteWidth::One, false);
        assert_matches!(var.index(Some(1.5)), Err(StoreError::OutOfDomain { .. }));
        assert_matches!(var.index(Some(f64::NAN)), Err(StoreError::OutOfDomain { .. }));
        assert_matches!(var.index(None), Err(StoreError::NotNullable(_)));
        assert_eq!(var.value(255).unwrap(), Some(1.0));

        let nullable = RealVar::new("x", 0.0, 1.0, ByteWidth::One, true);
        assert_eq!(nullable.index(Some(1.0)).unwrap(), 254);
        assert_eq!(nullable.value(255).unwrap(), None);
    }

    #[test]
    fn strings() {
        let var = StrVar::new("name", 8, true);
        let mut buf: Vec<u8> = vec![];
        var.encode(Some("São"), &mut buf).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(var.decode(&buf).unwrap().as_deref(), Some("São"));

        buf.clear();
        var.encode(None, &mut buf).unwrap();
        assert_eq!(buf, [0xffu8; 8]);
        assert_eq!(var.decode(&buf).unwrap(), None);

        assert_matches!(
            var.encode(Some("too long value"), &mut buf),
            Err(StoreError::ValueTooLong { len: 14, width: 8, .. })
        );

        let strict = StrVar::new("name", 2, false);
        assert_matches!(strict.encode(None, &mut Vec::<u8>::new()), Err(StoreError::NotNullable(_)));
        assert_matches!(strict.decode(&[0xff, 0xff]), Err(StoreError::CorruptData(_)));
        assert_matches!(strict.decode(&[0xc3, 0x28]), Err(StoreError::CorruptData(_)));
        assert_eq!(strict.decode(&[0, 0]).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn var_rejects_wrong_kind() {
        let var = Var::from(IntVar::new("a", 0, 10, false).unwrap());
        assert_matches!(
            var.encode(&Value::from("x"), &mut Vec::<u8>::new()),
            Err(StoreError::TypeMismatch { .. })
        );

        let real = Var::from(RealVar::new("r", 0.0, 10.0, ByteWidth::Two, false));
        let mut buf: Vec<u8> = vec![];
        real.encode(&Value::Int(5), &mut buf).unwrap();
        assert_abs_diff_eq!(
            real.decode(&mut &buf[..]).unwrap().as_real().unwrap(),
            5.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn deserialized_vars_are_validated() {
        let var = IntVar::new("population", 0, 1_000_000, true).unwrap();
        let json = serde_json::to_string(&var).unwrap();
        assert_eq!(serde_json::from_str::<IntVar>(&json).unwrap(), var);

        let narrow = r#"{"name":"population","min":0,"max":1000000,"width":"One","nullable":false}"#;
        assert!(serde_json::from_str::<IntVar>(narrow).is_err());
        let empty = r#"{"name":"n","min":5,"max":5,"nullable":false}"#;
        assert!(serde_json::from_str::<IntVar>(empty).is_err());
        let without_width = r#"{"name":"n","min":0,"max":300,"nullable":false}"#;
        assert_eq!(
            serde_json::from_str::<IntVar>(without_width).unwrap().width(),
            ByteWidth::Two
        );

        let inverted = r#"{"name":"x","min":1.0,"max":-1.0,"width":"Two","nullable":false}"#;
        assert!(serde_json::from_str::<RealVar>(inverted).is_err());
        let real = RealVar::new("x", -1.0, 1.0, ByteWidth::Eight, true);
        let json = serde_json::to_string(&real).unwrap();
        assert_eq!(serde_json::from_str::<RealVar>(&json).unwrap(), real);

        let zero_width = r#"{"name":"s","width":0,"nullable":true}"#;
        assert!(serde_json::from_str::<StrVar>(zero_width).is_err());
    }
}
