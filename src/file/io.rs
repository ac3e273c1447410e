//! Low-level byte order and safe reading/writing utilities for class-file parsing.
//!
//! Class files store every multi-byte quantity in big-endian order. This module provides the
//! bounds-checked primitives the rest of the crate builds on:
//!
//! - [`crate::file::io::ByteIO`] - endian-aware conversion for primitive types
//! - [`crate::file::io::read_be`] / [`crate::file::io::read_be_at`] - big-endian reads
//! - [`crate::file::io::write_be_at`] - big-endian writes into a fixed slice
//! - [`crate::file::io::read_le_at`] - little-endian reads, kept for archive headers and tests
//! - [`crate::file::io::decode_modified_utf8`] - the string encoding used by `CONSTANT_Utf8`
//!
//! # Examples
//!
//! ```rust
//! use jvmscope::file::io::read_be_at;
//!
//! let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34];
//! let mut offset = 0;
//!
//! let magic: u32 = read_be_at(&data, &mut offset)?;
//! let major: u16 = read_be_at(&data, &mut offset)?;
//!
//! assert_eq!(magic, 0xCAFEBABE);
//! assert_eq!(major, 52);
//! assert_eq!(offset, 6);
//! # Ok::<(), jvmscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All reading and writing functions return [`crate::Result<T>`] and fail with
//! [`crate::Error::OutOfBounds`] if there are insufficient bytes to complete the operation.

use crate::{Error, Result};

/// Trait for implementing type specific safe readers and writers.
///
/// Implemented for every fixed-width primitive a class file can contain.
pub trait ByteIO: Sized {
    /// Fixed-size byte representation of the type
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Decode from big-endian bytes
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
    /// Encode as little-endian bytes
    fn to_le_bytes(self) -> Self::Bytes;
    /// Encode as big-endian bytes
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_byte_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl ByteIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_byte_io!(
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
);

/// Safely reads a big-endian value from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_be<T: ByteIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Safely reads a big-endian value at `offset` and advances the offset past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_be_at<T: ByteIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len).filter(|end| *end <= data.len()) else {
        return Err(out_of_bounds_error!(*offset, data.len(), type_len));
    };

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!(*offset, data.len(), type_len));
    };

    *offset = end;

    Ok(T::from_be_bytes(read))
}

/// Safely reads a little-endian value at `offset` and advances the offset past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: ByteIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len).filter(|end| *end <= data.len()) else {
        return Err(out_of_bounds_error!(*offset, data.len(), type_len));
    };

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!(*offset, data.len(), type_len));
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Writes `value` big-endian at `offset` and advances the offset past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the slice is too short.
pub fn write_be_at<T: ByteIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()>
where
    T::Bytes: AsRef<[u8]>,
{
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len).filter(|end| *end <= data.len()) else {
        return Err(out_of_bounds_error!(*offset, data.len(), type_len));
    };

    data[*offset..end].copy_from_slice(value.to_be_bytes().as_ref());
    *offset = end;

    Ok(())
}

/// Decodes the "modified UTF-8" encoding used by `CONSTANT_Utf8` entries.
///
/// Differences from standard UTF-8: NUL is written as `C0 80`, and supplementary characters are
/// stored as two 3-byte encoded UTF-16 surrogates. Four-byte forms never appear.
///
/// # Errors
/// Returns [`crate::Error::InvalidModifiedUtf8`] with the byte offset of the first malformed
/// sequence.
pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    if bytes.iter().all(|b| *b != 0 && *b < 0x80) {
        // Plain ASCII, the overwhelmingly common case for names and descriptors
        return String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidModifiedUtf8(0));
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        let lead = bytes[index];
        match lead {
            0x01..=0x7F => {
                units.push(u16::from(lead));
                index += 1;
            }
            0xC0..=0xDF => {
                let Some(&next) = bytes.get(index + 1) else {
                    return Err(Error::InvalidModifiedUtf8(index));
                };
                if next & 0xC0 != 0x80 {
                    return Err(Error::InvalidModifiedUtf8(index));
                }
                units.push((u16::from(lead & 0x1F) << 6) | u16::from(next & 0x3F));
                index += 2;
            }
            0xE0..=0xEF => {
                let (Some(&second), Some(&third)) = (bytes.get(index + 1), bytes.get(index + 2))
                else {
                    return Err(Error::InvalidModifiedUtf8(index));
                };
                if second & 0xC0 != 0x80 || third & 0xC0 != 0x80 {
                    return Err(Error::InvalidModifiedUtf8(index));
                }
                units.push(
                    (u16::from(lead & 0x0F) << 12)
                        | (u16::from(second & 0x3F) << 6)
                        | u16::from(third & 0x3F),
                );
                index += 3;
            }
            _ => return Err(Error::InvalidModifiedUtf8(index)),
        }
    }

    String::from_utf16(&units).map_err(|_| Error::InvalidModifiedUtf8(bytes.len()))
}

/// Encodes `value` as modified UTF-8.
#[must_use]
pub fn encode_modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_be_types() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

        assert_eq!(read_be::<u8>(&data).unwrap(), 0x01);
        assert_eq!(read_be::<u16>(&data).unwrap(), 0x0102);
        assert_eq!(read_be::<u32>(&data).unwrap(), 0x0102_0304);
        assert_eq!(read_be::<u64>(&data).unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(read_be::<i16>(&[0xFF, 0xFE]).unwrap(), -2);
    }

    #[test]
    fn test_read_be_at_advances() {
        let data = [0x00, 0x01, 0x00, 0x00, 0x00, 0x02];
        let mut offset = 0;

        assert_eq!(read_be_at::<u16>(&data, &mut offset).unwrap(), 1);
        assert_eq!(read_be_at::<u32>(&data, &mut offset).unwrap(), 2);
        assert_eq!(offset, 6);
    }

    #[test]
    fn test_read_out_of_bounds() {
        let data = [0x00, 0x01, 0x02];
        let mut offset = 1;

        match read_be_at::<u32>(&data, &mut offset) {
            Err(Error::OutOfBounds {
                offset,
                len,
                requested,
            }) => {
                assert_eq!(offset, 1);
                assert_eq!(len, 3);
                assert_eq!(requested, 4);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(offset, 1);
    }

    #[test]
    fn test_floats() {
        let mut data = [0u8; 12];
        let mut offset = 0;
        write_be_at(&mut data, &mut offset, 1.5f32).unwrap();
        write_be_at(&mut data, &mut offset, -2.25f64).unwrap();

        let mut offset = 0;
        assert_eq!(read_be_at::<f32>(&data, &mut offset).unwrap(), 1.5);
        assert_eq!(read_be_at::<f64>(&data, &mut offset).unwrap(), -2.25);
    }

    #[test]
    fn test_read_le_at() {
        let data = [0x50, 0x4B, 0x03, 0x04];
        let mut offset = 0;
        assert_eq!(read_le_at::<u32>(&data, &mut offset).unwrap(), 0x0403_4B50);
    }

    #[test]
    fn test_modified_utf8_ascii() {
        assert_eq!(
            decode_modified_utf8(b"java/lang/Object").unwrap(),
            "java/lang/Object"
        );
    }

    #[test]
    fn test_modified_utf8_nul_and_multibyte() {
        let encoded = [0x61, 0xC0, 0x80, 0xC3, 0xA9];
        assert_eq!(decode_modified_utf8(&encoded).unwrap(), "a\u{0}\u{e9}");
        assert_eq!(encode_modified_utf8("a\u{0}\u{e9}"), encoded);
    }

    #[test]
    fn test_modified_utf8_supplementary() {
        let value = "x\u{1F600}";
        let encoded = encode_modified_utf8(value);
        assert_eq!(encoded.len(), 1 + 6);
        assert_eq!(decode_modified_utf8(&encoded).unwrap(), value);
    }

    #[test]
    fn test_modified_utf8_truncated() {
        assert!(matches!(
            decode_modified_utf8(&[0x41, 0xE2, 0x82]),
            Err(Error::InvalidModifiedUtf8(1))
        ));
        assert!(matches!(
            decode_modified_utf8(&[0xF0, 0x9F, 0x98, 0x80]),
            Err(Error::InvalidModifiedUtf8(0))
        ));
    }
}
