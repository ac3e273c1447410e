//! Shared fixtures for unit tests: class-file builders and loader helpers.


pub use builder::*;

use crate::metadata::loader::{BufferTypeLoader, CompositeTypeLoader, TypeLoader};

// Helper function to create a loader chain serving the given class files
pub fn class_loader(classes: Vec<Vec<u8>>) -> CompositeTypeLoader {
    let mut loaders: Vec<Box<dyn TypeLoader>> = classes
        .into_iter()
        .map(|bytes| Box::new(BufferTypeLoader::new(bytes)) as Box<dyn TypeLoader>)
        .collect();
    if loaders.is_empty() {
        loaders.push(Box::new(BufferTypeLoader::new(Vec::new())));
    }
    CompositeTypeLoader::new(loaders)
}
