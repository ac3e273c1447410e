//! The trait every type-graph repair pass implements.

use crate::{
    metadata::{resolver::MetadataSystem, typesystem::ClassId},
    Result,
};

/// A repair applied to one resolved type and, where the repair requires it, to the types it
/// depends on.
///
/// Passes mutate the type graph through the [`MetadataSystem`] that owns it and must be
/// idempotent: a second run over an already repaired type changes nothing and reports
/// `false`.
pub trait DeobfuscationPass {
    /// Unique name for logging and debugging.
    fn name(&self) -> &'static str;

    /// Run the pass on the type `id`.
    ///
    /// Returns `true` if the type graph changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a type the pass needs fails to load.
    fn run(&self, system: &mut MetadataSystem, id: ClassId) -> Result<bool>;
}
