//! Reader options and resolver configuration.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Controls how much of each class file the decoder materializes
    pub struct ReaderOptions: u32 {
        /// Decode `Code` attributes into method bodies (bytes, exception table, local variables)
        const PROCESS_CODE = 0x0001;
        /// Keep every attribute, including the ones the model already consumed, on definitions
        const RETAIN_ATTRIBUTES = 0x0002;
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions::PROCESS_CODE | ReaderOptions::RETAIN_ATTRIBUTES
    }
}

/// Configuration for a [`crate::metadata::resolver::MetadataSystem`].
///
/// # Examples
///
/// ```rust
/// use jvmscope::metadata::config::{MetadataConfig, ReaderOptions};
///
/// let config = MetadataConfig {
///     options: ReaderOptions::empty(),
///     fix_anonymous_enums: true,
///     ..MetadataConfig::default()
/// };
/// assert_eq!(config.max_resolution_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataConfig {
    /// Decoder options applied to every class the resolver loads
    pub options: ReaderOptions,
    /// How deeply on-demand loads may nest before failing with
    /// [`crate::Error::RecursionLimit`]
    pub max_resolution_depth: usize,
    /// Run the anonymous-enum pass on every enum the resolver decodes
    pub fix_anonymous_enums: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig {
            options: ReaderOptions::default(),
            max_resolution_depth: 64,
            fix_anonymous_enums: false,
        }
    }
}
