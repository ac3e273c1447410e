//! Growable byte buffer with an explicit cursor.
//!
//! [`crate::file::buffer::Buffer`] is the transient container that type loaders fill and the
//! class-file decoders consume. Reads and writes share a single position: reads fail when they
//! would pass the end of the written data, writes overwrite in place and grow the buffer as
//! needed. All multi-byte accessors are big-endian, matching the class-file format.
//!
//! A buffer is owned by exactly one operation at a time; loaders receive it by `&mut` and the
//! caller resets it before reusing it.
//!
//! # Examples
//!
//! ```rust
//! use jvmscope::file::Buffer;
//!
//! let mut buffer = Buffer::new();
//! buffer.write_be(0xCAFE_BABEu32);
//! buffer.write_be(52u16);
//!
//! buffer.rewind();
//! assert_eq!(buffer.read_be::<u32>()?, 0xCAFE_BABE);
//! assert_eq!(buffer.read_be::<u16>()?, 52);
//! assert_eq!(buffer.remaining(), 0);
//! # Ok::<(), jvmscope::Error>(())
//! ```

use std::io::Read;

use crate::{
    file::io::{decode_modified_utf8, read_be_at, ByteIO},
    Result,
};

/// A growable, big-endian byte buffer with a shared read/write position.
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    data: Vec<u8>,
    position: usize,
}

impl Buffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Buffer::default()
    }

    /// Create an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Buffer {
            data: Vec::with_capacity(capacity),
            position: 0,
        }
    }

    /// Number of bytes written to the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes between the cursor and the end of the written data.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `position` lies beyond the written data.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(out_of_bounds_error!(position, self.data.len(), 0));
        }

        self.position = position;
        Ok(())
    }

    /// Move the cursor back to the start, keeping the contents.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Discard all contents and move the cursor to the start.
    pub fn reset(&mut self) {
        self.data.clear();
        self.position = 0;
    }

    /// The written contents.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the written contents.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Read a big-endian value at the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the value extends past the written data.
    pub fn read_be<T: ByteIO>(&mut self) -> Result<T> {
        read_be_at(&self.data, &mut self.position)
    }

    /// Borrow the next `length` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&[u8]> {
        if length > self.remaining() {
            return Err(out_of_bounds_error!(self.position, self.data.len(), length));
        }

        let start = self.position;
        self.position += length;
        Ok(&self.data[start..start + length])
    }

    /// Skip `length` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn skip(&mut self, length: usize) -> Result<()> {
        self.read_bytes(length).map(|_| ())
    }

    /// Read a `u2` length followed by that many bytes of modified UTF-8.
    ///
    /// # Errors
    /// Fails on truncated input or an invalid encoding.
    pub fn read_utf8(&mut self) -> Result<String> {
        let length = usize::from(self.read_be::<u16>()?);
        let bytes = self.read_bytes(length)?;
        decode_modified_utf8(bytes)
    }

    /// Write a big-endian value at the cursor, growing the buffer as needed.
    pub fn write_be<T: ByteIO>(&mut self, value: T)
    where
        T::Bytes: AsRef<[u8]>,
    {
        let bytes = value.to_be_bytes();
        self.write_bytes(bytes.as_ref());
    }

    /// Write raw bytes at the cursor, growing the buffer as needed.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }

        self.data[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    /// Append everything `reader` produces to the end of the buffer.
    ///
    /// The cursor does not move. Returns the number of bytes appended.
    ///
    /// # Errors
    /// Returns any I/O error raised by `reader`; bytes read before the error stay in the buffer.
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> std::io::Result<usize> {
        reader.read_to_end(&mut self.data)
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Buffer { data, position: 0 }
    }
}

impl From<&[u8]> for Buffer {
    fn from(data: &[u8]) -> Self {
        Buffer::from(data.to_vec())
    }
}
