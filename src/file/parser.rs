//! Borrowing cursor used to decode attribute payloads.
//!
//! [`crate::file::parser::Parser`] walks a borrowed byte slice and never copies it. The class
//! decoder first splits a class file into raw attribute blobs, then hands each blob to a
//! `Parser` to decode the attributes it understands.
//!
//! # Examples
//!
//! ```rust
//! use jvmscope::Parser;
//!
//! let data = [0x00, 0x02, 0xAB, 0xCD];
//! let mut parser = Parser::new(&data);
//!
//! let count = parser.read_be::<u16>()?;
//! let rest = parser.read_bytes(usize::from(count))?;
//!
//! assert_eq!(rest, &[0xAB, 0xCD]);
//! assert!(!parser.has_more_data());
//! # Ok::<(), jvmscope::Error>(())
//! ```

use crate::{
    file::io::{read_be_at, ByteIO},
    Result,
};

/// A read-only cursor over a borrowed byte slice.
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total number of bytes in the underlying slice.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Current read position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// The full underlying slice.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move the cursor to `pos`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` lies beyond the end of the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(out_of_bounds_error!(pos, self.data.len(), 0));
        }

        self.position = pos;
        Ok(())
    }

    /// Skip `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `step` bytes remain.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(out_of_bounds_error!(self.position, self.data.len(), step));
        }

        self.position += step;
        Ok(())
    }

    /// Peek at the next byte without consuming it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or_else(|| out_of_bounds_error!(self.position, self.data.len(), 1))
    }

    /// Read a big-endian value and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the value does not fit in the remaining data.
    pub fn read_be<T: ByteIO>(&mut self) -> Result<T> {
        read_be_at(self.data, &mut self.position)
    }

    /// Borrow the next `length` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        if length > self.remaining() {
            return Err(out_of_bounds_error!(self.position, self.data.len(), length));
        }

        let slice = &self.data[self.position..self.position + length];
        self.position += length;
        Ok(slice)
    }
}
