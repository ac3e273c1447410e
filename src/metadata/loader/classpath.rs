use std::{
    fs::File,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};
use zip::{result::ZipError, ZipArchive};

use crate::{file::Buffer, metadata::loader::TypeLoader, Result};

/// One root on a classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    /// A directory holding `pkg/Name.class` files
    Directory(PathBuf),
    /// A jar or zip archive holding `pkg/Name.class` entries
    Archive(PathBuf),
}

impl ClasspathEntry {
    /// Classify `path` as an archive (`.jar` or `.zip`) or a directory.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_archive = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| {
                extension.eq_ignore_ascii_case("jar") || extension.eq_ignore_ascii_case("zip")
            });

        if is_archive && !path.is_dir() {
            ClasspathEntry::Archive(path)
        } else {
            ClasspathEntry::Directory(path)
        }
    }

    /// The file-system location of this entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ClasspathEntry::Directory(path) | ClasspathEntry::Archive(path) => path,
        }
    }

    fn load(&self, internal_name: &str, buffer: &mut Buffer) -> Result<bool> {
        let resource = format!("{internal_name}.class");

        match self {
            ClasspathEntry::Directory(root) => {
                let path = root.join(&resource);
                if !path.is_file() {
                    return Ok(false);
                }

                let mut file = File::open(&path)?;
                buffer.read_from(&mut file)?;
                Ok(true)
            }
            ClasspathEntry::Archive(archive) => {
                let mut archive = ZipArchive::new(File::open(archive)?)?;
                let mut entry = match archive.by_name(&resource) {
                    Ok(entry) => entry,
                    Err(ZipError::FileNotFound) => return Ok(false),
                    Err(error) => return Err(error.into()),
                };

                buffer.read_from(&mut entry)?;
                Ok(true)
            }
        }
    }
}

/// Loads classes from directories and jar archives, first match wins.
///
/// Any I/O or archive failure while reading an entry counts as "not found" for that entry and
/// the search continues with the next one.
#[derive(Debug, Clone, Default)]
pub struct ClasspathTypeLoader {
    entries: Vec<ClasspathEntry>,
}

impl ClasspathTypeLoader {
    /// Create a loader searching `paths` in order.
    ///
    /// Paths ending in `.jar` or `.zip` are opened as archives, everything else as a directory.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ClasspathTypeLoader {
            entries: paths.into_iter().map(ClasspathEntry::from_path).collect(),
        }
    }

    /// Create a loader from the `CLASSPATH` environment variable.
    ///
    /// The variable is split with the platform's path-list separator. An unset variable gives
    /// a loader that finds nothing.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var_os("CLASSPATH") {
            Some(value) => ClasspathTypeLoader::new(
                std::env::split_paths(&value).filter(|path| !path.as_os_str().is_empty()),
            ),
            None => ClasspathTypeLoader::default(),
        }
    }

    /// The classpath roots, in search order.
    #[must_use]
    pub fn entries(&self) -> &[ClasspathEntry] {
        &self.entries
    }
}

impl TypeLoader for ClasspathTypeLoader {
    fn try_load(&self, internal_name: &str, buffer: &mut Buffer) -> bool {
        for entry in &self.entries {
            match entry.load(internal_name, buffer) {
                Ok(true) => {
                    buffer.rewind();
                    debug!(internal_name, root = %entry.path().display(), "loaded class from classpath");
                    return true;
                }
                Ok(false) => {}
                Err(error) => {
                    trace!(internal_name, root = %entry.path().display(), %error, "classpath entry failed");
                    buffer.reset();
                }
            }
        }

        trace!(internal_name, "type not found on classpath");
        false
    }
}
