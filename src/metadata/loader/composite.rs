use tracing::trace;

use crate::{file::Buffer, metadata::loader::TypeLoader};

/// Tries a list of loaders in order and returns the first hit.
///
/// The shared buffer is reset before every attempt and after a complete miss, so bytes written
/// by a loader that ultimately failed never reach the next loader or the caller.
pub struct CompositeTypeLoader {
    loaders: Vec<Box<dyn TypeLoader>>,
}

impl CompositeTypeLoader {
    /// Create a chain from `loaders`, tried in the given order.
    ///
    /// # Panics
    /// Panics if `loaders` is empty.
    #[must_use]
    pub fn new(loaders: Vec<Box<dyn TypeLoader>>) -> Self {
        assert!(
            !loaders.is_empty(),
            "a composite type loader needs at least one loader"
        );
        CompositeTypeLoader { loaders }
    }

    /// Number of loaders in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Always `false`; a chain is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl TypeLoader for CompositeTypeLoader {
    fn try_load(&self, internal_name: &str, buffer: &mut Buffer) -> bool {
        for (index, loader) in self.loaders.iter().enumerate() {
            buffer.reset();
            if loader.try_load(internal_name, buffer) {
                trace!(internal_name, index, "type loaded by chained loader");
                return true;
            }
        }

        buffer.reset();
        false
    }
}
