//! Null-terminated UTF-8 strings used for names in the file formats.

use std::io::Read;

use bytes::BufMut;

use crate::error::StoreError;

pub(crate) fn put(buf: &mut impl BufMut, s: &str) -> Result<(), StoreError> {
    if s.contains('\0') {
        return Err(StoreError::InvalidName(s.to_owned()));
    }

    buf.put_slice(s.as_bytes());
    buf.put_u8(0);
    Ok(())
}

pub(crate) fn read(source: &mut impl Read) -> Result<String, StoreError> {
    let mut bytes = vec![];
    let mut byte = [0u8; 1];
    loop {
        source.read_exact(&mut byte)?;
        if byte[0] == 0 {
            break;
        }
        bytes.push(byte[0]);
    }

    String::from_utf8(bytes).map_err(|err| StoreError::CorruptData(format!("invalid name: {err}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn names() {
        let mut buf = Vec::<u8>::new();
        put(&mut buf, "Île").unwrap();
        assert_eq!(buf.last(), Some(&0));
        assert_eq!(read(&mut &buf[..]).unwrap(), "Île");

        assert_matches!(put(&mut buf, "a\0"), Err(StoreError::InvalidName(_)));
        assert_matches!(read(&mut &b"abc"[..]), Err(StoreError::TruncatedInput));
        assert_matches!(read(&mut &[0xffu8, 0][..]), Err(StoreError::CorruptData(_)));
    }
}
