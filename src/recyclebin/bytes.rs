//! Bounds-checked field readers.
//!
//! Every recycle bin structure is a run of little-endian integers and
//! fixed-width strings. These helpers read one field at a byte offset and
//! report [`RbinError::OutOfRange`] instead of panicking when the buffer is
//! too short.

use byteorder::{ByteOrder, LittleEndian};

use crate::RbinError;

/// Borrow `len` bytes starting at `offset`.
pub fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8], RbinError> {
    let end = offset.checked_add(len).ok_or(RbinError::OutOfRange {
        offset,
        len,
        available: data.len(),
    })?;
    data.get(offset..end).ok_or(RbinError::OutOfRange {
        offset,
        len,
        available: data.len(),
    })
}

/// Read a little-endian `i32` at `offset`.
pub fn read_i32(data: &[u8], offset: usize) -> Result<i32, RbinError> {
    Ok(LittleEndian::read_i32(slice(data, offset, 4)?))
}

/// Read a little-endian `i64` at `offset`.
pub fn read_i64(data: &[u8], offset: usize) -> Result<i64, RbinError> {
    Ok(LittleEndian::read_i64(slice(data, offset, 8)?))
}

/// Read a fixed-width single-byte string, stopping at the first NUL.
///
/// Bytes are mapped as Latin-1, so names written with an OEM code page keep
/// their high characters instead of becoming `?`.
pub fn read_ansi_string(data: &[u8], offset: usize, len: usize) -> Result<String, RbinError> {
    let raw = slice(data, offset, len)?;
    Ok(raw
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect())
}

/// Read `units` UTF-16LE code units, stopping at the first NUL unit.
///
/// Unpaired surrogates decode to U+FFFD.
pub fn read_utf16_string(data: &[u8], offset: usize, units: usize) -> Result<String, RbinError> {
    let byte_len = units.checked_mul(2).ok_or(RbinError::OutOfRange {
        offset,
        len: usize::MAX,
        available: data.len(),
    })?;
    let raw = slice(data, offset, byte_len)?;
    let name_u16: Vec<u16> = raw
        .chunks_exact(2)
        .map(LittleEndian::read_u16)
        .take_while(|&unit| unit != 0)
        .collect();
    Ok(String::from_utf16_lossy(&name_u16))
}
