//! Class-file metadata and the JVM type model built from it.
//!
//! This module turns class-file bytes into a navigable graph of types, members and generic
//! signatures, resolving referenced classes on demand through a [`loader::TypeLoader`].
//!
//! # Key Components
//!
//! - [`resolver::MetadataSystem`] - Owns the type graph, drives loading and resolution
//! - [`typesystem`] - Type references, definitions and the arena-backed [`typesystem::TypeRegistry`]
//! - [`algebra`] - Subtyping, erasure, substitution, capture and conversions
//! - [`classfile`] - Class-file decoding and constant-pool scopes
//! - [`signatures`] - Descriptor and generic signature parsing
//! - [`loader`] - Byte sources: buffers, directories, jars and chains of them
//! - [`bootstrap`] - Header sniffing to name a class before it is fully decoded
//!
//! # Examples
//!
//! ```rust,no_run
//! use jvmscope::metadata::{loader::ClasspathTypeLoader, resolver::MetadataSystem};
//!
//! let mut system = MetadataSystem::new(ClasspathTypeLoader::new(["rt.jar", "app.jar"]));
//! let id = system.load_type("com/example/Service")?;
//! let definition = system.types().definition(id).expect("loaded");
//! println!("{} declares {} methods", system.types().full_name(id), definition.methods.len());
//! # Ok::<(), jvmscope::Error>(())
//! ```

/// Subtyping, erasure, substitution and conversion rules
pub mod algebra;
/// Class-file header parsing
pub mod bootstrap;
/// Class-file structure and decoding into definitions
pub mod classfile;
/// Reader options and resolver configuration
pub mod config;
/// Constant pool entries and typed lookups
pub mod constantpool;
/// Access flags and model markers
pub mod flags;
/// Sources of class-file bytes
pub mod loader;
/// Fields, methods, parameters and references to them
pub mod members;
/// Loading, binding and resolution of types and members
pub mod resolver;
/// Descriptor and generic signature grammar
pub mod signatures;
/// Constant pool indices
pub mod token;
/// The type model
pub mod typesystem;
