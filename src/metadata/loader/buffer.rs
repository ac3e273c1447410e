use std::sync::{Arc, OnceLock};

use tracing::trace;

use crate::{
    file::Buffer,
    metadata::{bootstrap::ClassFileHeader, loader::TypeLoader},
    Error, Result,
};

/// A loader serving exactly one pre-supplied class file.
///
/// The name the bytes declare is read from their header on first use and cached together with
/// any parse failure, so the header is parsed at most once. Two accessors expose the cached
/// outcome: [`BufferTypeLoader::declared_name`] re-raises a parse failure, while the
/// [`TypeLoader`] implementation treats it as "no match".
pub struct BufferTypeLoader {
    data: Vec<u8>,
    declared: OnceLock<std::result::Result<String, Arc<Error>>>,
}

impl BufferTypeLoader {
    /// Wrap `data`, which is expected to hold a complete class file.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        BufferTypeLoader {
            data: data.into(),
            declared: OnceLock::new(),
        }
    }

    fn sniff(&self) -> &std::result::Result<String, Arc<Error>> {
        self.declared.get_or_init(|| {
            ClassFileHeader::parse(&self.data)
                .map(|header| header.name)
                .map_err(Arc::new)
        })
    }

    /// The internal name the wrapped bytes declare.
    ///
    /// # Errors
    /// Returns [`crate::Error::LoaderParse`] wrapping the cached header failure when the bytes
    /// are not a readable class file.
    pub fn declared_name(&self) -> Result<&str> {
        match self.sniff() {
            Ok(name) => Ok(name),
            Err(error) => Err(Error::LoaderParse {
                source: Arc::clone(error),
            }),
        }
    }

    /// The internal name the wrapped bytes declare, or `None` if the header is unreadable.
    #[must_use]
    pub fn try_declared_name(&self) -> Option<&str> {
        self.sniff().as_ref().ok().map(String::as_str)
    }

    /// The wrapped bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl TypeLoader for BufferTypeLoader {
    fn try_load(&self, internal_name: &str, buffer: &mut Buffer) -> bool {
        if self.try_declared_name() != Some(internal_name) {
            trace!(internal_name, "fixed buffer does not declare type");
            return false;
        }

        buffer.write_bytes(&self.data);
        buffer.rewind();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ClassFileBuilder;

    #[test]
    fn test_matches_declared_name() {
        let bytes = ClassFileBuilder::new("a/B").build();
        let loader = BufferTypeLoader::new(bytes.clone());
        let mut buffer = Buffer::new();

        assert_eq!(loader.declared_name().unwrap(), "a/B");
        assert!(!loader.try_load("a/C", &mut buffer));
        assert!(buffer.is_empty());
        assert!(loader.try_load("a/B", &mut buffer));
        assert_eq!(buffer.as_slice(), bytes.as_slice());
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn test_parse_failure_is_cached() {
        let loader = BufferTypeLoader::new(vec![0xCA, 0xFE]);
        let mut buffer = Buffer::new();

        assert!(!loader.try_load("a/B", &mut buffer));
        assert!(loader.try_declared_name().is_none());

        let first = loader.declared_name().unwrap_err();
        let second = loader.declared_name().unwrap_err();
        match (first, second) {
            (Error::LoaderParse { source: a }, Error::LoaderParse { source: b }) => {
                assert!(Arc::ptr_eq(&a, &b));
                assert!(matches!(*a, Error::OutOfBounds { .. }));
            }
            other => panic!("unexpected errors: {other:?}"),
        }
    }
}
