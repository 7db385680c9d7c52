//! Strongly-typed domain structures for file handling.
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Outcome of every save or delete operation.
///
/// Failures never escape a store call; they are classified into one of these
/// codes instead. `IoError` and `UnknownError` absorb filesystem and
/// unexpected failures respectively.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageStatus {
    Success,
    InvalidPath,
    InvalidFileName,
    PathDoesNotExist,
    FileDoesNotExist,
    EmptyFile,
    /// Reserved for path-escape detection; nothing produces it yet.
    SecurityIssue,
    FileAlreadyExists,
    IoError,
    UnknownError,
    /// Reserved; nothing produces it yet.
    NoExtension,
}

impl StorageStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StorageStatus::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageStatus::Success => "success",
            StorageStatus::InvalidPath => "invalid_path",
            StorageStatus::InvalidFileName => "invalid_file_name",
            StorageStatus::PathDoesNotExist => "path_does_not_exist",
            StorageStatus::FileDoesNotExist => "file_does_not_exist",
            StorageStatus::EmptyFile => "empty_file",
            StorageStatus::SecurityIssue => "security_issue",
            StorageStatus::FileAlreadyExists => "file_already_exists",
            StorageStatus::IoError => "io_error",
            StorageStatus::UnknownError => "unknown_error",
            StorageStatus::NoExtension => "no_extension",
        }
    }
}

impl fmt::Display for StorageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TypeConstraintError> for StorageStatus {
    fn from(value: TypeConstraintError) -> Self {
        match value {
            TypeConstraintError::InvalidPath => StorageStatus::InvalidPath,
            TypeConstraintError::InvalidFileName => StorageStatus::InvalidFileName,
        }
    }
}

/// Directory a caller wants to store into, relative or absolute. Never blank.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetDirectory(String);

impl TargetDirectory {
    pub fn try_from_str(input: &str) -> Result<Self, TypeConstraintError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::InvalidPath);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Absolute, normalized form of the directory using `cwd` as the base for
    /// relative input.
    pub fn resolve(&self, cwd: &Path) -> PathBuf {
        normalize(&cwd.join(self.as_path()))
    }
}

impl fmt::Display for TargetDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Trimmed, non-blank file name. Separators are not rejected.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FileName(String);

impl FileName {
    pub fn try_from_str(value: &str) -> Result<Self, TypeConstraintError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::InvalidFileName);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with its last extension removed. See [`strip_extension`].
    pub fn stem(&self) -> &str {
        strip_extension(&self.0)
    }

    /// Lower-cased extension. See [`extract_extension`].
    pub fn extension(&self) -> String {
        extract_extension(&self.0)
    }

    /// Absolute file path inside `directory`, or `None` when the name does
    /// not denote an entry below it (`.`, `..`, `/`).
    pub fn resolve_in(&self, directory: &Path) -> Option<PathBuf> {
        let path = normalize(&directory.join(&self.0));
        if directory.starts_with(&path) {
            None
        } else {
            Some(path)
        }
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lexically collapse `.` and `..` components without touching the disk.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Lower-cased text after the last `.` of the trimmed name, or an empty
/// string when there is none.
///
/// A leading dot counts as an extension separator here, so `.gitignore`
/// yields `gitignore`. [`strip_extension`] deliberately treats the same name
/// as having no extension.
pub fn extract_extension(file_name: &str) -> String {
    let trimmed = file_name.trim();
    match trimmed.rfind('.') {
        Some(index) => trimmed[index + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Name up to its last `.`. Names without a dot, or whose only separator is
/// the leading character, are returned unchanged.
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) if index > 0 => &file_name[..index],
        _ => file_name,
    }
}

#[derive(Debug, Error)]
pub enum TypeConstraintError {
    #[error("invalid path")]
    InvalidPath,
    #[error("invalid file name")]
    InvalidFileName,
}
