//! Type loaders: where class-file bytes come from.
//!
//! The resolver never touches the file system directly. It asks a [`TypeLoader`] to copy the
//! bytes of a class, identified by its internal name (`java/lang/String`), into a
//! [`crate::file::Buffer`], and then decodes whatever the loader produced.
//!
//! # Loaders
//! - [`ClasspathTypeLoader`] - directories and jar/zip archives, in classpath order
//! - [`BufferTypeLoader`] - one fixed, pre-supplied class file
//! - [`CompositeTypeLoader`] - an ordered chain of other loaders with fallback
//!
//! # Examples
//!
//! ```rust,no_run
//! use jvmscope::{
//!     file::Buffer,
//!     metadata::loader::{ClasspathTypeLoader, CompositeTypeLoader, TypeLoader},
//! };
//!
//! let loader = CompositeTypeLoader::new(vec![
//!     Box::new(ClasspathTypeLoader::new(["build/classes"])),
//!     Box::new(ClasspathTypeLoader::from_env()),
//! ]);
//!
//! let mut buffer = Buffer::new();
//! if loader.try_load("com/example/Main", &mut buffer) {
//!     println!("{} bytes", buffer.len());
//! }
//! ```

mod buffer;
mod classpath;
mod composite;

pub use buffer::BufferTypeLoader;
pub use classpath::{ClasspathEntry, ClasspathTypeLoader};
pub use composite::CompositeTypeLoader;

use std::sync::Arc;

use crate::file::Buffer;

/// A source of class-file bytes.
pub trait TypeLoader: Send + Sync {
    /// Copy the class file for `internal_name` into `buffer`.
    ///
    /// The caller passes an empty buffer. On success the loaded bytes start at position 0 and
    /// the cursor is at 0. On failure the buffer contents are unspecified and the caller resets
    /// it before reuse. Loaders report missing types and I/O failures alike as `false`.
    ///
    /// ## Arguments
    /// * 'internal_name' - Slash-separated binary name, e.g. `java/util/Map$Entry`
    /// * 'buffer'        - Destination for the class-file bytes
    fn try_load(&self, internal_name: &str, buffer: &mut Buffer) -> bool;
}

impl<T: TypeLoader + ?Sized> TypeLoader for Box<T> {
    fn try_load(&self, internal_name: &str, buffer: &mut Buffer) -> bool {
        (**self).try_load(internal_name, buffer)
    }
}

impl<T: TypeLoader + ?Sized> TypeLoader for Arc<T> {
    fn try_load(&self, internal_name: &str, buffer: &mut Buffer) -> bool {
        (**self).try_load(internal_name, buffer)
    }
}
