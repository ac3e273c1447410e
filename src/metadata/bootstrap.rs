//! Lightweight class-file header parsing.
//!
//! [`ClassFileHeader`] reads just enough of a class file to name the type it declares: the
//! magic number, the version pair, the constant pool, the access flags and the `this_class`
//! entry. Loaders use it to identify a block of bytes before handing it to the full decoder.
//!
//! # Examples
//!
//! ```rust
//! use jvmscope::{file::Buffer, metadata::bootstrap::ClassFileHeader};
//!
//! let mut buffer = Buffer::new();
//! buffer.write_be(0xCAFE_BABEu32);
//! buffer.write_be(0u16); // minor
//! buffer.write_be(52u16); // major
//! buffer.write_be(3u16); // constant_pool_count
//! buffer.write_be(1u8); // #1 Utf8 "a/B"
//! buffer.write_be(3u16);
//! buffer.write_bytes(b"a/B");
//! buffer.write_be(7u8); // #2 Class #1
//! buffer.write_be(1u16);
//! buffer.write_be(0x0021u16); // access flags
//! buffer.write_be(2u16); // this_class
//!
//! let header = ClassFileHeader::read(&mut buffer)?;
//! assert_eq!(header.name, "a/B");
//! assert_eq!(header.major_version, 52);
//! assert_eq!(buffer.position(), 0);
//! # Ok::<(), jvmscope::Error>(())
//! ```

use crate::{
    file::Buffer,
    metadata::{constantpool::ConstantPool, flags::Flags, token::Token},
    Error, Result,
};

/// The fixed first four bytes of every class file.
pub const CLASS_FILE_MAGIC: u32 = 0xCAFE_BABE;

/// The identifying prefix of a class file.
#[derive(Debug, Clone)]
pub struct ClassFileHeader {
    /// `minor_version`, not validated
    pub minor_version: u16,
    /// `major_version`, not validated
    pub major_version: u16,
    /// The decoded constant pool
    pub constant_pool: ConstantPool,
    /// The raw `access_flags`
    pub access_flags: Flags,
    /// Token of the `Class` entry naming this type
    pub this_class: Token,
    /// Internal name of the declared type
    pub name: String,
}

impl ClassFileHeader {
    /// Parse the header at the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidMagic`] if `data` does not start with `0xCAFEBABE`, and a
    /// decoding error for a truncated header or a broken `this_class` entry.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut buffer = Buffer::from(data);
        Self::read_prefix(&mut buffer)
    }

    /// Parse the header at the start of `buffer`, then move the cursor back to 0.
    ///
    /// The cursor is restored whether or not parsing succeeds, so a full decoder can start over
    /// from the beginning.
    ///
    /// # Errors
    /// See [`ClassFileHeader::parse`].
    pub fn read(buffer: &mut Buffer) -> Result<Self> {
        buffer.rewind();
        let header = Self::read_prefix(buffer);
        buffer.rewind();
        header
    }

    /// Read only the declared internal name, restoring the cursor afterwards.
    ///
    /// # Errors
    /// See [`ClassFileHeader::parse`].
    pub fn sniff_name(buffer: &mut Buffer) -> Result<String> {
        Self::read(buffer).map(|header| header.name)
    }

    /// Parse the header from the cursor, leaving it on the `super_class` field.
    pub(crate) fn read_prefix(buffer: &mut Buffer) -> Result<Self> {
        let magic = buffer.read_be::<u32>()?;
        if magic != CLASS_FILE_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let minor_version = buffer.read_be::<u16>()?;
        let major_version = buffer.read_be::<u16>()?;
        let constant_pool = ConstantPool::read(buffer)?;
        let access_flags = Flags::from_access(buffer.read_be::<u16>()?);
        let this_class = Token(buffer.read_be::<u16>()?);
        let name = constant_pool.class_name(this_class)?.to_string();

        Ok(ClassFileHeader {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            name,
        })
    }
}
