use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::{DirEntry, FileSystem};

/// [`FileSystem`] backed by `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn copy_from(&self, path: &Path, reader: &mut dyn Read) -> io::Result<u64> {
        let mut file = File::create(path)?;
        io::copy(reader, &mut file)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        fs::read_dir(path)?
            .map(|entry| -> io::Result<DirEntry> {
                let entry = entry?;
                let is_dir = entry.file_type()?.is_dir();
                Ok(DirEntry::new(entry.path(), is_dir))
            })
            .collect()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_dir_is_single_level() {
        let dir = tempdir().unwrap();
        let fs = LocalFileSystem;

        let nested = dir.path().join("a").join("b");
        let err = fs.create_dir(&nested).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        fs.create_dir(&dir.path().join("a")).unwrap();
        fs.create_dir(&nested).unwrap();
        assert!(fs.is_dir(&nested));
    }

    #[test]
    fn copy_from_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let fs = LocalFileSystem;
        let path = dir.path().join("note.txt");
        fs.write(&path, b"a much longer original body").unwrap();

        let copied = fs.copy_from(&path, &mut Cursor::new(b"short")).unwrap();

        assert_eq!(copied, 5);
        assert_eq!(std::fs::read(&path).unwrap(), b"short");
    }

    #[test]
    #[cfg(unix)]
    fn read_dir_does_not_follow_symlinks() {
        let dir = tempdir().unwrap();
        let fs = LocalFileSystem;
        std::fs::create_dir(dir.path().join("folder")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("folder"), dir.path().join("link")).unwrap();

        let entries = fs.read_dir(dir.path()).unwrap();
        let link = entries.iter().find(|e| e.name() == "link").unwrap();

        assert!(!link.is_dir());
    }

    #[test]
    fn read_dir_reports_files_and_directories() {
        let dir = tempdir().unwrap();
        let fs = LocalFileSystem;
        std::fs::create_dir(dir.path().join("folder")).unwrap();
        std::fs::write(dir.path().join("file.txt"), b"x").unwrap();

        let mut entries = fs.read_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name().cmp(b.name()));

        let summary: Vec<(&str, bool)> = entries.iter().map(|e| (e.name(), e.is_dir())).collect();
        assert_eq!(summary, vec![("file.txt", false), ("folder", true)]);
    }
}
