//! Filesystem handles the file store acts through.
//!
//! Store operations take the handle explicitly so tests can swap the real
//! disk for [`MemoryFileSystem`].
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub mod local;
pub mod memory;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;

/// Primitive filesystem operations used by the file store.
///
/// Paths handed to these methods are already absolute and normalized.
pub trait FileSystem {
    /// Base for resolving relative target directories.
    fn current_dir(&self) -> io::Result<PathBuf>;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Create a single directory. Fails when the parent is missing or the
    /// path already exists.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Write `contents` to a file, creating or truncating it.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Copy everything from `reader` into a created or truncated file.
    fn copy_from(&self, path: &Path, reader: &mut dyn Read) -> io::Result<u64>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Immediate entries of a directory. Symlinks are reported as
    /// themselves, not as their targets.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }
}

/// Directory entry returned by [`FileSystem::read_dir`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirEntry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

impl DirEntry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path,
            name,
            is_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry name, lossily converted to UTF-8.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}
