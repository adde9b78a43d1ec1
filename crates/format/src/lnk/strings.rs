//! String primitives shared by `link_info`, `string_data`, and the extra-data bodies (§4.1 of the
//! format notes).

use shlink_core::data::{DataCursorRef, SeekFrom};
use shlink_core::prelude::*;

use crate::codepage::Codepage;

/// Slices exactly `len` bytes off `input` and hands them back as an independent cursor that
/// cannot read past them, regardless of what the body decoder run against it does. `input`
/// itself always advances by `len` bytes, whether or not the sub-reader consumes all of it.
pub fn bounded<'a, T: DataCursorTrait>(
    input: &'a mut T,
    len: usize,
) -> Result<DataCursorRef<'a>, shlink_core::data::Error> {
    let endian = input.endian();
    let slice = input.get_slice(len)?;
    Ok(DataCursorRef::new(slice, endian))
}

/// Seeks to `offset` and reads a null-terminated ANSI string, decoding it with `codepage`.
///
/// Returns `None` if the seek/read runs out of bounds; decoding itself never fails (malformed
/// byte sequences are replaced per `codepage`'s decoder), matching §9's framing of
/// `DecodeFailure` as "the string field becomes absent" only for bounds failures.
pub fn read_cstring_at<T: DataCursorTrait + EndianRead>(
    input: &mut T,
    offset: usize,
    codepage: Codepage,
) -> Option<String> {
    input.seek(SeekFrom::Start(offset)).ok()?;
    let mut bytes = Vec::new();
    loop {
        match input.read_u8() {
            Ok(0) => break,
            Ok(byte) => bytes.push(byte),
            Err(_) => break,
        }
    }
    Some(codepage.decode(&bytes))
}

/// Seeks to `offset` and reads a null-terminated UTF-16LE string.
pub fn read_ucstring_at<T: DataCursorTrait + EndianRead>(
    input: &mut T,
    offset: usize,
) -> Option<String> {
    input.seek(SeekFrom::Start(offset)).ok()?;
    let mut units = Vec::new();
    loop {
        match input.read_u16() {
            Ok(0) => break,
            Ok(unit) => units.push(unit),
            Err(_) => break,
        }
    }
    Some(String::from_utf16_lossy(&units))
}

/// Reads a `{CharCount: u16, Chars: UTF-16LE[CharCount]}` structure from the current position,
/// consuming exactly `2 + 2 * CharCount` bytes.
pub fn read_len_prefixed_utf16<T: DataCursorTrait + EndianRead>(
    input: &mut T,
) -> Result<String, shlink_core::data::Error> {
    let char_count = usize::from(input.read_u16()?);
    let mut units = Vec::with_capacity(char_count);
    for _ in 0..char_count {
        units.push(input.read_u16()?);
    }
    Ok(String::from_utf16_lossy(&units))
}

/// Reads a fixed-size buffer and decodes an embedded, null-terminated ANSI string from its front.
pub fn read_fixed_cstring<T: DataCursorTrait + EndianRead>(
    input: &mut T,
    buffer_len: usize,
    codepage: Codepage,
) -> Result<String, shlink_core::data::Error> {
    let mut buffer = vec![0u8; buffer_len];
    input.read_length(&mut buffer)?;
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    Ok(codepage.decode(&buffer[..end]))
}

/// Reads a fixed-size buffer of UTF-16LE code units and decodes the null-terminated string at its
/// front. `buffer_len` is in bytes, not code units.
pub fn read_fixed_ucstring<T: DataCursorTrait + EndianRead>(
    input: &mut T,
    buffer_len: usize,
) -> Result<String, shlink_core::data::Error> {
    let unit_count = buffer_len / 2;
    let mut units = Vec::with_capacity(unit_count);
    for _ in 0..unit_count {
        units.push(input.read_u16()?);
    }
    let end = units.iter().position(|&unit| unit == 0).unwrap_or(units.len());
    Ok(String::from_utf16_lossy(&units[..end]))
}

#[cfg(test)]
mod tests {
    use shlink_core::data::{DataCursorRef, Endian};

    use super::*;

    #[test]
    fn reads_cstring_at_offset() {
        let mut bytes = vec![0xFFu8; 4];
        bytes.extend_from_slice(b"hi\0");
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let value = read_cstring_at(&mut cursor, 4, Codepage::default()).unwrap();
        assert_eq!(value, "hi");
    }

    #[test]
    fn reads_len_prefixed_utf16() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&3u16.to_le_bytes());
        for ch in "abc".encode_utf16() {
            bytes.extend_from_slice(&ch.to_le_bytes());
        }
        let mut cursor = DataCursorRef::new(&bytes, Endian::Little);
        let value = read_len_prefixed_utf16(&mut cursor).unwrap();
        assert_eq!(value, "abc");
        assert_eq!(cursor.position(), bytes.len());
    }
}
