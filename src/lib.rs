// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! # jvmscope
//!
//! A metadata model for JVM class files. `jvmscope` decodes class files into a graph of types,
//! members and generic signatures, loads referenced classes on demand from directories and
//! jars, and answers the questions a Java compiler asks about types: subtyping, erasure,
//! substitution, wildcard capture and conversions.
//!
//! ## Features
//!
//! - **Lazy resolution** - classes are decoded the first time something needs them
//! - **Full generics** - class and method signatures bind to type variables, wildcards,
//!   captured types and intersections
//! - **Type algebra** - [`metadata::algebra::TypeAlgebra`] implements the subtyping,
//!   containment, erasure and conversion rules of the Java language
//! - **Obfuscation repair** - [`deobfuscation::AnonymousEnumPass`] reattaches enum-constant
//!   bodies that lost their `InnerClasses` entries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jvmscope::prelude::*;
//!
//! let mut system = MetadataSystem::new(ClasspathTypeLoader::new(["rt.jar", "app.jar"]));
//! let list = system.parse_type_signature("Ljava/util/List<Ljava/lang/String;>;")?;
//! let collection = system.parse_type_signature("Ljava/util/Collection<+Ljava/lang/Object;>;")?;
//!
//! let mut algebra = system.algebra();
//! assert!(algebra.is_sub_type(&list, &collection));
//! println!("{}", algebra.erase(&list).signature(algebra.types()));
//! # Ok::<(), jvmscope::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`metadata`] - class-file decoding, the type model, resolution and the type algebra
//! - [`disassembler`] - length-correct walking of method bytecode
//! - [`deobfuscation`] - repairs for obfuscated type graphs
//! - [`file`] - bounds-checked binary input
//! - [`prelude`] - the most commonly used types in one import

#![doc(html_no_source)]
#![deny(missing_docs)]

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Bounds-checked binary readers and buffers
pub mod file;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use jvmscope::prelude::*;
///
/// let mut system = MetadataSystem::new(ClasspathTypeLoader::new(["app.jar"]));
/// let id = system.load_type("com/example/Main")?;
/// println!("{}", system.types().full_name(id));
/// # Ok::<(), jvmscope::Error>(())
/// ```
pub mod prelude;

/// Walking JVM bytecode instruction by instruction
///
/// Used to locate specific instructions, such as object construction sites, without
/// interpreting the code.
///
/// # Examples
///
/// ```rust
/// use jvmscope::{disassembler::decode_instruction, Parser};
///
/// let bytecode = &[0x2A, 0xB1]; // aload_0, return
/// let mut parser = Parser::new(bytecode);
/// let instruction = decode_instruction(&mut parser)?;
/// assert_eq!(instruction.mnemonic, "aload_0");
/// # Ok::<(), jvmscope::Error>(())
/// ```
pub mod disassembler;

/// Repairs for type graphs damaged by obfuscators
pub mod deobfuscation;

/// Class-file metadata, the JVM type model and its algebra
///
/// # Key Components
///
/// ## Loading
/// - [`metadata::resolver::MetadataSystem`] - owns the type graph and resolves on demand
/// - [`metadata::loader`] - buffer, classpath and composite loaders
/// - [`metadata::classfile`] - decoding of class files into definitions
///
/// ## Type Model
/// - [`metadata::typesystem`] - type references, definitions and the registry
/// - [`metadata::signatures`] - descriptor and generic signature grammar
/// - [`metadata::members`] - fields, methods and parameters
///
/// ## Type Algebra
/// - [`metadata::algebra`] - subtyping, erasure, substitution and conversions
pub mod metadata;

/// `jvmscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust,no_run
/// use jvmscope::{metadata::resolver::MetadataSystem, Result};
///
/// fn load(system: &mut MetadataSystem, name: &str) -> Result<()> {
///     system.load_type(name)?;
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `jvmscope` Error type
///
/// Every fallible operation of the crate returns this error. Decoding problems carry the
/// location that detected them; resolution problems name the missing class.
pub use error::Error;

/// Borrowing big-endian parser over a byte slice
pub use file::{parser::Parser, Buffer};

/// The owner of the type graph
pub use metadata::resolver::MetadataSystem;

/// Resolver configuration
pub use metadata::config::{MetadataConfig, ReaderOptions};
