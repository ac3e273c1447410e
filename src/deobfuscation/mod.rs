//! Repairs for type graphs damaged by obfuscators.
//!
//! Passes run against a loaded [`crate::metadata::resolver::MetadataSystem`] and restore
//! structure that obfuscation tools strip from class files. Each pass implements
//! [`DeobfuscationPass`] and marks what it processed so repeated runs are harmless.
//!
//! # Available passes
//!
//! - [`AnonymousEnumPass`] - reattaches enum-constant bodies to their enum. The resolver runs it
//!   on every decoded enum when
//!   [`crate::metadata::config::MetadataConfig::fix_anonymous_enums`] is set.

mod anonymous_enum;
mod pass;

pub use anonymous_enum::AnonymousEnumPass;
pub use pass::DeobfuscationPass;
