//! Binary input primitives.
//!
//! - [`crate::file::io`] - endian-aware, bounds-checked reads and writes plus modified UTF-8
//! - [`crate::file::buffer`] - the growable [`Buffer`] that loaders fill and decoders consume
//! - [`crate::file::parser`] - the borrowing [`Parser`] used for attribute payloads

pub mod buffer;
pub mod io;
pub mod parser;

pub use buffer::Buffer;
pub use parser::Parser;
