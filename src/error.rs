use std::sync::Arc;

use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    ($offset:expr, $len:expr, $requested:expr) => {
        crate::Error::OutOfBounds {
            offset: $offset,
            len: $len,
            requested: $requested,
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Failures are grouped into three families:
///
/// ## Binary decoding
/// - [`Error::OutOfBounds`] - A read ran past the end of the available bytes
/// - [`Error::Malformed`] - Corrupted or structurally invalid class-file content
/// - [`Error::InvalidMagic`] - The input does not start with the class-file magic number
/// - [`Error::InvalidToken`] / [`Error::UnexpectedTag`] - Broken constant-pool references
/// - [`Error::InvalidModifiedUtf8`] - A `CONSTANT_Utf8` entry could not be decoded
///
/// ## Descriptors and signatures
/// - [`Error::InvalidDescriptor`] - A descriptor or generic signature failed to parse
///
/// ## Loading and resolution
/// - [`Error::FileError`] / [`Error::ArchiveError`] - I/O failures
/// - [`Error::LoaderParse`] - A cached header parse failure re-raised by a strict accessor
/// - [`Error::TypeNotFound`] - A requested type could not be loaded
/// - [`Error::RecursionLimit`] - On-demand loading nested too deeply
///
/// Programming errors (mutating a frozen collection, building an empty loader chain) are not
/// represented here; they panic.
///
/// # Examples
///
/// ```rust
/// use jvmscope::{Error, metadata::bootstrap::ClassFileHeader};
///
/// match ClassFileHeader::parse(&[0xDE, 0xAD, 0xBE, 0xEF]) {
///     Err(Error::InvalidMagic(magic)) => assert_eq!(magic, 0xDEADBEEF),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading binary data.
    #[error("Out of bound read at offset {offset} (length {len}, requested {requested})")]
    OutOfBounds {
        /// Position at which the read was attempted
        offset: usize,
        /// Total number of bytes available
        len: usize,
        /// Number of bytes the read required
        requested: usize,
    },

    /// The first four bytes are not `0xCAFEBABE`.
    #[error("Invalid class file magic - 0x{0:08X}")]
    InvalidMagic(u32),

    /// A constant-pool token is zero, out of range, or points at the unusable second slot of a
    /// `Long`/`Double` entry.
    #[error("Invalid constant pool token - {0}")]
    InvalidToken(Token),

    /// A constant-pool entry exists but has a different kind than the caller required.
    #[error("Constant pool entry {token} is {found}, expected {expected}")]
    UnexpectedTag {
        /// The token that was looked up
        token: Token,
        /// The kind the caller asked for
        expected: &'static str,
        /// The kind actually stored at `token`
        found: &'static str,
    },

    /// Unknown constant-pool tag byte.
    #[error("Unknown constant pool tag {tag} at index {index}")]
    UnknownTag {
        /// The tag byte
        tag: u8,
        /// The pool index being decoded
        index: u16,
    },

    /// A `CONSTANT_Utf8` payload is not valid modified UTF-8.
    #[error("Invalid modified UTF-8 sequence at byte {0}")]
    InvalidModifiedUtf8(usize),

    /// A type descriptor or generic signature could not be parsed.
    #[error("Invalid descriptor '{descriptor}' at position {position}")]
    InvalidDescriptor {
        /// The full text being parsed
        descriptor: String,
        /// Character offset at which parsing failed
        position: usize,
    },

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// A jar or zip archive on the classpath could not be read.
    #[error("{0}")]
    ArchiveError(#[from] zip::result::ZipError),

    /// A cached parse failure re-raised by a strict accessor.
    ///
    /// The fixed-buffer loader sniffs its declared name once and keeps the outcome; asking for
    /// the name again returns the original error wrapped in this variant.
    #[error("Failed to read the class name declared by the buffer: {source}")]
    LoaderParse {
        /// The original parse failure
        source: Arc<Error>,
    },

    /// A type could not be found by any configured loader.
    #[error("Type not found - {0}")]
    TypeNotFound(String),

    /// Recursion limit reached while loading types on demand.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
