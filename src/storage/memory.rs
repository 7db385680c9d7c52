use std::collections::BTreeMap;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{DirEntry, FileSystem};

#[derive(Clone, Debug)]
enum Node {
    Directory,
    File(Vec<u8>),
}

/// In-process [`FileSystem`] holding a tree of directories and files.
///
/// The root `/` always exists. Relative targets resolve against the working
/// directory given at construction.
#[derive(Debug)]
pub struct MemoryFileSystem {
    cwd: PathBuf,
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::with_current_dir(PathBuf::from("/"))
    }

    /// Filesystem whose working directory is `cwd`. Missing ancestors of
    /// `cwd` are created.
    pub fn with_current_dir(cwd: PathBuf) -> Self {
        let mut nodes = BTreeMap::new();
        for ancestor in cwd.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                nodes.insert(ancestor.to_path_buf(), Node::Directory);
            }
        }
        nodes.insert(PathBuf::from("/"), Node::Directory);

        Self {
            cwd,
            nodes: Mutex::new(nodes),
        }
    }

    /// Contents of the file at `path`, if there is one.
    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        match self.nodes().get(path) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    fn nodes(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_file(&self, path: &Path, contents: Vec<u8>) -> io::Result<()> {
        let mut nodes = self.nodes();
        ensure_parent(&nodes, path)?;
        if let Some(Node::Directory) = nodes.get(path) {
            return Err(io::Error::new(
                ErrorKind::IsADirectory,
                format!("{} is a directory", path.display()),
            ));
        }
        nodes.insert(path.to_path_buf(), Node::File(contents));
        Ok(())
    }
}

fn ensure_parent(nodes: &BTreeMap<PathBuf, Node>, path: &Path) -> io::Result<()> {
    match path.parent().map(|parent| nodes.get(parent)) {
        Some(Some(Node::Directory)) => Ok(()),
        _ => Err(io::Error::new(
            ErrorKind::NotFound,
            format!("parent of {} does not exist", path.display()),
        )),
    }
}

impl FileSystem for MemoryFileSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes().get(path), Some(Node::Directory))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.nodes().get(path), Some(Node::File(_)))
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let mut nodes = self.nodes();
        if nodes.contains_key(path) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        ensure_parent(&nodes, path)?;
        nodes.insert(path.to_path_buf(), Node::Directory);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.insert_file(path, contents.to_vec())
    }

    fn copy_from(&self, path: &Path, reader: &mut dyn Read) -> io::Result<u64> {
        let mut contents = Vec::new();
        let copied = reader.read_to_end(&mut contents)?;
        self.insert_file(path, contents)?;
        Ok(copied as u64)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut nodes = self.nodes();
        match nodes.get(path) {
            Some(Node::File(_)) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Directory) => Err(io::Error::new(
                ErrorKind::IsADirectory,
                format!("{} is a directory", path.display()),
            )),
            None => Err(io::Error::new(
                ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let nodes = self.nodes();
        match nodes.get(path) {
            Some(Node::Directory) => Ok(nodes
                .iter()
                .filter(|(child, _)| child.parent() == Some(path))
                .map(|(child, node)| DirEntry::new(child.clone(), matches!(node, Node::Directory)))
                .collect()),
            Some(Node::File(_)) => Err(io::Error::new(
                ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            )),
            None => Err(io::Error::new(
                ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn root_and_cwd_exist() {
        let fs = MemoryFileSystem::with_current_dir(PathBuf::from("/work/app"));

        assert!(fs.is_dir(Path::new("/")));
        assert!(fs.is_dir(Path::new("/work")));
        assert!(fs.is_dir(Path::new("/work/app")));
        assert_eq!(fs.current_dir().unwrap(), PathBuf::from("/work/app"));
    }

    #[test]
    fn create_dir_requires_parent() {
        let fs = MemoryFileSystem::new();

        let err = fs.create_dir(Path::new("/a/b")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        fs.create_dir(Path::new("/a")).unwrap();
        fs.create_dir(Path::new("/a/b")).unwrap();
        let err = fs.create_dir(Path::new("/a/b")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn write_and_copy_replace_contents() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/note.txt");

        fs.write(path, b"first").unwrap();
        let copied = fs.copy_from(path, &mut Cursor::new(b"second")).unwrap();

        assert_eq!(copied, 6);
        assert_eq!(fs.read(path).unwrap(), b"second");
    }

    #[test]
    fn write_over_directory_fails() {
        let fs = MemoryFileSystem::new();
        fs.create_dir(Path::new("/folder")).unwrap();

        let err = fs.write(Path::new("/folder"), b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IsADirectory);
    }

    #[test]
    fn read_dir_lists_immediate_children_only() {
        let fs = MemoryFileSystem::new();
        fs.create_dir(Path::new("/a")).unwrap();
        fs.create_dir(Path::new("/a/inner")).unwrap();
        fs.write(Path::new("/a/one.txt"), b"1").unwrap();
        fs.write(Path::new("/a/inner/two.txt"), b"2").unwrap();

        let names: Vec<String> = fs
            .read_dir(Path::new("/a"))
            .unwrap()
            .into_iter()
            .map(|e| e.name().to_string())
            .collect();

        assert_eq!(names, vec!["inner".to_string(), "one.txt".to_string()]);
    }

    #[test]
    fn remove_file_rejects_missing_and_directories() {
        let fs = MemoryFileSystem::new();
        fs.create_dir(Path::new("/a")).unwrap();

        assert_eq!(
            fs.remove_file(Path::new("/missing")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            fs.remove_file(Path::new("/a")).unwrap_err().kind(),
            ErrorKind::IsADirectory
        );
    }
}
