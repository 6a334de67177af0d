//! Variable length integers.
//!
//! An unsigned value is split into groups of 7 bits. The groups are written most significant first, one per byte,
//! and every byte except the last one has the continuation bit (`0x80`) set. Encoding is minimal: no leading zero
//! groups are produced, and zero is a single `0x00` byte.
//!
//! A signed value is written as one sign byte (`0xff` for negative values, `0x00` otherwise) followed by the
//! unsigned encoding of its magnitude.
//!
//! Values are handled as `u128`/`i128`, so numbers wider than 64 bits survive a round trip.

use std::io::{Read, Write};

use bytes::{Buf, BufMut};

use crate::error::StoreError;

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7f;

const SIGN_POSITIVE: u8 = 0x00;
const SIGN_NEGATIVE: u8 = 0xff;

/// Number of bytes [`encode`] produces for the value.
pub fn encoded_len(v: u128) -> usize {
    let bits = 128 - v.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Writes the unsigned varint into the buffer.
pub fn put_uvarint(buf: &mut impl BufMut, v: u128) {
    let len = encoded_len(v);
    for group in (0..len).rev() {
        let digit = ((v >> (7 * group)) as u8) & PAYLOAD;
        if group > 0 {
            buf.put_u8(digit | CONTINUATION);
        } else {
            buf.put_u8(digit);
        }
    }
}

/// Writes the signed varint into the buffer.
pub fn put_svarint(buf: &mut impl BufMut, v: i128) {
    buf.put_u8(if v < 0 { SIGN_NEGATIVE } else { SIGN_POSITIVE });
    put_uvarint(buf, v.unsigned_abs());
}

/// Encodes the unsigned value.
pub fn encode(v: u128) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::with_capacity(encoded_len(v));
    put_uvarint(&mut buf, v);
    buf
}

/// Decodes an unsigned varint at the start of `bytes`, returning the value and the number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(u128, usize), StoreError> {
    let mut buf = bytes;
    let v = get_uvarint(&mut buf)?;
    Ok((v, bytes.len() - buf.len()))
}

/// Reads an unsigned varint from the buffer.
pub fn get_uvarint(buf: &mut impl Buf) -> Result<u128, StoreError> {
    let mut acc = Accumulator::default();
    loop {
        if !buf.has_remaining() {
            return Err(StoreError::TruncatedInput);
        }

        if let Some(v) = acc.push(buf.get_u8())? {
            return Ok(v);
        }
    }
}

/// Reads a signed varint from the buffer.
pub fn get_svarint(buf: &mut impl Buf) -> Result<i128, StoreError> {
    if !buf.has_remaining() {
        return Err(StoreError::TruncatedInput);
    }

    let sign = buf.get_u8();
    apply_sign(sign, get_uvarint(buf)?)
}

/// Reads an unsigned varint from a stream.
pub fn read_uvarint(reader: &mut impl Read) -> Result<u128, StoreError> {
    let mut acc = Accumulator::default();
    loop {
        if let Some(v) = acc.push(read_byte(reader)?)? {
            return Ok(v);
        }
    }
}

/// Reads an unsigned varint from a stream, failing with [`StoreError::CorruptData`] if it does not fit `u64`.
pub fn read_u64(reader: &mut impl Read) -> Result<u64, StoreError> {
    let v = read_uvarint(reader)?;
    u64::try_from(v).map_err(|_| StoreError::CorruptData(format!("varint {v} does not fit 64 bits")))
}

/// Reads a signed varint from a stream.
pub fn read_svarint(reader: &mut impl Read) -> Result<i128, StoreError> {
    let sign = read_byte(reader)?;
    apply_sign(sign, read_uvarint(reader)?)
}

/// Writes the unsigned varint into a stream, returning the number of bytes written.
pub fn write_uvarint(writer: &mut impl Write, v: u128) -> Result<usize, StoreError> {
    let bytes = encode(v);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Writes the signed varint into a stream, returning the number of bytes written.
pub fn write_svarint(writer: &mut impl Write, v: i128) -> Result<usize, StoreError> {
    let mut bytes: Vec<u8> = Vec::with_capacity(encoded_len(v.unsigned_abs()) + 1);
    put_svarint(&mut bytes, v);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

#[derive(Default)]
struct Accumulator {
    value: u128,
}

impl Accumulator {
    fn push(&mut self, byte: u8) -> Result<Option<u128>, StoreError> {
        if self.value > u128::MAX >> 7 {
            return Err(StoreError::CorruptData("varint overflows 128 bits".into()));
        }

        self.value = (self.value << 7) | u128::from(byte & PAYLOAD);
        if byte & CONTINUATION == 0 {
            Ok(Some(self.value))
        } else {
            Ok(None)
        }
    }
}

fn apply_sign(sign: u8, magnitude: u128) -> Result<i128, StoreError> {
    match sign {
        SIGN_POSITIVE => i128::try_from(magnitude)
            .map_err(|_| StoreError::CorruptData("signed varint overflows 128 bits".into())),
        SIGN_NEGATIVE => {
            if magnitude == i128::MIN.unsigned_abs() {
                Ok(i128::MIN)
            } else {
                i128::try_from(magnitude)
                    .map(|v| -v)
                    .map_err(|_| StoreError::CorruptData("signed varint overflows 128 bits".into()))
            }
        }
        other => Err(StoreError::CorruptData(format!(
            "invalid varint sign byte {other:#04x}"
        ))),
    }
}

fn read_byte(reader: &mut impl Read) -> Result<u8, StoreError> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte)?;
    Ok(byte[0])
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), [0x00]);
        assert_eq!(encode(127), [0x7f]);
        assert_eq!(encode(128), [0x81, 0x00]);
        assert_eq!(encode(300), [0x82, 0x2c]);
        assert_eq!(encode(16_383), [0xff, 0x7f]);
        assert_eq!(encode(16_384), [0x81, 0x80, 0x00]);
    }

    #[test]
    fn decode_reports_consumed_bytes() {
        assert_eq!(decode(&[0x82, 0x2c, 0xaa]).unwrap(), (300, 2));
        assert_eq!(decode(&[0x05]).unwrap(), (5, 1));
    }

    #[test]
    fn roundtrip_is_minimal() {
        let mut values = vec![0u128, 1, 127, 128, 255, 256, (1 << 63) - 1];
        values.extend((0..63).map(|shift| 1u128 << shift));
        values.extend((1..63).map(|shift| (1u128 << shift) - 1));

        for v in values {
            let bytes = encode(v);
            assert_eq!(bytes.len(), encoded_len(v));
            assert_ne!(bytes[0], CONTINUATION, "overlong encoding for {v}");
            assert_eq!(decode(&bytes).unwrap(), (v, bytes.len()));
        }
    }

    #[test]
    fn values_wider_than_64_bits() {
        for v in [u64::MAX as u128 + 1, u128::MAX / 3, u128::MAX] {
            assert_eq!(decode(&encode(v)).unwrap(), (v, encoded_len(v)));
        }
    }

    #[test]
    fn truncated_input() {
        assert_matches!(decode(&[]), Err(StoreError::TruncatedInput));
        assert_matches!(decode(&[0x81, 0x80]), Err(StoreError::TruncatedInput));
        assert_matches!(
            read_uvarint(&mut &[0x81u8][..]),
            Err(StoreError::TruncatedInput)
        );
    }

    #[test]
    fn overflow_is_corrupt() {
        let bytes = vec![0xffu8; 20];
        assert_matches!(decode(&bytes), Err(StoreError::CorruptData(_)));
        assert_matches!(
            read_u64(&mut &encode(u64::MAX as u128 + 1)[..]),
            Err(StoreError::CorruptData(_))
        );
    }

    #[test]
    fn signed_values() {
        for v in [0i128, 1, -1, 300, -300, i64::MIN as i128, i128::MAX, i128::MIN] {
            let mut buf: Vec<u8> = vec![];
            put_svarint(&mut buf, v);
            assert_eq!(buf[0], if v < 0 { 0xff } else { 0x00 });
            assert_eq!(get_svarint(&mut &buf[..]).unwrap(), v);
            assert_eq!(read_svarint(&mut &buf[..]).unwrap(), v);
        }
    }

    #[test]
    fn invalid_sign_byte() {
        assert_matches!(
            get_svarint(&mut &[0x01u8, 0x05][..]),
            Err(StoreError::CorruptData(_))
        );
    }

    #[test]
    fn stream_roundtrip() {
        let mut out: Vec<u8> = vec![];
        write_uvarint(&mut out, 1_000_000).unwrap();
        write_svarint(&mut out, -42).unwrap();
        let mut input = &out[..];
        assert_eq!(read_uvarint(&mut input).unwrap(), 1_000_000);
        assert_eq!(read_svarint(&mut input).unwrap(), -42);
        assert!(input.is_empty());
    }
}
