use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::domain::{self, FileName, StorageStatus, TargetDirectory};
use crate::services::{StoreError, StoreResult, settle};
use crate::storage::{FileSystem, LocalFileSystem};

/// Readable upload content together with the length its producer reported.
#[derive(Debug)]
pub struct UploadStream<R> {
    reader: R,
    content_length: u64,
}

impl<R: Read> UploadStream<R> {
    pub fn new(reader: R, content_length: u64) -> Self {
        Self {
            reader,
            content_length,
        }
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn is_empty(&self) -> bool {
        self.content_length == 0
    }
}

impl UploadStream<File> {
    /// Stream the whole file, sized by its metadata.
    pub fn from_file(mut file: File) -> io::Result<Self> {
        let content_length = file.metadata()?.len();
        file.rewind()?;
        Ok(Self::new(file, content_length))
    }
}

impl UploadStream<NamedTempFile> {
    /// Stream a spooled upload, sized by its metadata.
    pub fn from_temp_file(mut file: NamedTempFile) -> io::Result<Self> {
        let content_length = file.as_file().metadata()?.len();
        file.rewind()?;
        Ok(Self::new(file, content_length))
    }
}

impl<R: Read> Read for UploadStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Saves and deletes files by name inside caller-chosen directories.
///
/// Every operation validates its input, resolves the target to an absolute
/// path, acts on the filesystem and reports a [`StorageStatus`]. Nothing is
/// cached between calls. Paths are not confined to any root.
#[derive(Clone, Debug, Default)]
pub struct FileStore<F = LocalFileSystem> {
    fs: F,
}

impl FileStore<LocalFileSystem> {
    /// Store acting on the real filesystem.
    pub fn local() -> Self {
        Self::new(LocalFileSystem)
    }
}

impl<F: FileSystem> FileStore<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Write `content` to `file_name` inside `target_directory`.
    ///
    /// With `directory_overwrite` a missing directory is created (one level
    /// only). With `file_overwrite` an existing file is replaced.
    pub fn save_bytes(
        &self,
        target_directory: &str,
        directory_overwrite: bool,
        file_name: &str,
        content: &[u8],
        file_overwrite: bool,
    ) -> StorageStatus {
        let (directory, name) = match Self::validate(target_directory, file_name) {
            Ok(inputs) => inputs,
            Err(status) => return status,
        };
        if content.is_empty() {
            return StorageStatus::EmptyFile;
        }

        let outcome = self.place(
            &directory,
            directory_overwrite,
            &name,
            file_overwrite,
            |fs, path| fs.write(path, content).map(|()| content.len() as u64),
        );
        settle("save file", outcome)
    }

    /// Copy `source` into `file_name` inside `target_directory`.
    ///
    /// Same policy as [`FileStore::save_bytes`]; emptiness is judged by the
    /// stream's reported length. The stream is dropped before this returns.
    pub fn save_stream<R: Read>(
        &self,
        target_directory: &str,
        directory_overwrite: bool,
        file_name: &str,
        mut source: UploadStream<R>,
        file_overwrite: bool,
    ) -> StorageStatus {
        let (directory, name) = match Self::validate(target_directory, file_name) {
            Ok(inputs) => inputs,
            Err(status) => return status,
        };
        if source.is_empty() {
            return StorageStatus::EmptyFile;
        }

        let outcome = self.place(
            &directory,
            directory_overwrite,
            &name,
            file_overwrite,
            |fs, path| fs.copy_from(path, &mut source),
        );
        settle("save stream", outcome)
    }

    /// Delete files named by `file_name` inside `target_directory`.
    ///
    /// With `extension_option` only the exact name is removed. Without it
    /// every non-directory entry whose name starts with the stem of
    /// `file_name` is removed, symlinks included, so `report.pdf` also takes
    /// `report_v2.txt` and `reports.csv` with it.
    /// The stem mode reports success even when nothing matched.
    pub fn delete_file(
        &self,
        target_directory: &str,
        file_name: &str,
        extension_option: bool,
    ) -> StorageStatus {
        let (directory, name) = match Self::validate(target_directory, file_name) {
            Ok(inputs) => inputs,
            Err(status) => return status,
        };

        let outcome = if extension_option {
            self.delete_exact(&directory, &name)
        } else {
            self.delete_by_stem(&directory, &name)
        };
        settle("delete file", outcome)
    }

    /// Lower-cased extension of `file_name`, or an empty string.
    pub fn extract_extension(file_name: &str) -> String {
        domain::extract_extension(file_name)
    }

    /// `file_name` without its last extension.
    pub fn strip_extension(file_name: &str) -> &str {
        domain::strip_extension(file_name)
    }

    fn validate(
        target_directory: &str,
        file_name: &str,
    ) -> Result<(TargetDirectory, FileName), StorageStatus> {
        let directory = TargetDirectory::try_from_str(target_directory)?;
        let name = FileName::try_from_str(file_name)?;
        Ok((directory, name))
    }

    fn resolve_dir(&self, directory: &TargetDirectory) -> StoreResult<PathBuf> {
        let cwd = self.fs.current_dir()?;
        Ok(directory.resolve(&cwd))
    }

    fn resolve(
        &self,
        directory: &TargetDirectory,
        name: &FileName,
    ) -> StoreResult<(PathBuf, PathBuf)> {
        let dir_path = self.resolve_dir(directory)?;
        let file_path = name.resolve_in(&dir_path).ok_or_else(|| {
            StoreError::Unknown(format!(
                "`{name}` does not name a file inside {}",
                dir_path.display()
            ))
        })?;
        Ok((dir_path, file_path))
    }

    fn place<W>(
        &self,
        directory: &TargetDirectory,
        directory_overwrite: bool,
        name: &FileName,
        file_overwrite: bool,
        write: W,
    ) -> StoreResult<StorageStatus>
    where
        W: FnOnce(&F, &Path) -> io::Result<u64>,
    {
        let (dir_path, file_path) = self.resolve(directory, name)?;

        if !self.fs.is_dir(&dir_path) {
            if !directory_overwrite {
                return Ok(StorageStatus::PathDoesNotExist);
            }
            self.fs.create_dir(&dir_path)?;
            info!("Created directory {}", dir_path.display());
        }

        if !file_overwrite && self.fs.exists(&file_path) {
            return Ok(StorageStatus::FileAlreadyExists);
        }

        let written = write(&self.fs, &file_path)?;
        info!("Saved {written} bytes to {}", file_path.display());
        Ok(StorageStatus::Success)
    }

    fn delete_exact(
        &self,
        directory: &TargetDirectory,
        name: &FileName,
    ) -> StoreResult<StorageStatus> {
        let (_, file_path) = self.resolve(directory, name)?;
        if !self.fs.is_file(&file_path) {
            return Ok(StorageStatus::FileDoesNotExist);
        }

        self.fs.remove_file(&file_path)?;
        info!("Deleted {}", file_path.display());
        Ok(StorageStatus::Success)
    }

    fn delete_by_stem(
        &self,
        directory: &TargetDirectory,
        name: &FileName,
    ) -> StoreResult<StorageStatus> {
        let (dir_path, _) = self.resolve(directory, name)?;
        let stem = name.stem();

        let mut removed = 0usize;
        for entry in self.fs.read_dir(&dir_path)? {
            if !entry.name().starts_with(stem) {
                continue;
            }
            if entry.is_dir() {
                debug!("Skipping directory {}", entry.path().display());
                continue;
            }
            self.fs.remove_file(entry.path())?;
            removed += 1;
        }

        info!(
            "Deleted {removed} file(s) starting with `{stem}` in {}",
            dir_path.display()
        );
        Ok(StorageStatus::Success)
    }
}
