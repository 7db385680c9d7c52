//! Application services orchestrating domain logic and side effects.
use log::error;

use crate::domain::StorageStatus;

pub mod files;

/// Convenience alias for service results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures absorbed at the file store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl StoreError {
    /// Status code reported to callers for this failure.
    pub fn status(&self) -> StorageStatus {
        match self {
            StoreError::Io(_) => StorageStatus::IoError,
            StoreError::Unknown(_) => StorageStatus::UnknownError,
        }
    }
}

/// Collapse an operation outcome into a status, logging failures.
pub(crate) fn settle(operation: &str, outcome: StoreResult<StorageStatus>) -> StorageStatus {
    match outcome {
        Ok(status) => status,
        Err(err) => {
            error!("Failed to {operation}: {err}");
            err.status()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_catch_all_statuses() {
        let io = StoreError::from(std::io::Error::other("disk full"));
        let unknown = StoreError::Unknown("odd".into());

        assert_eq!(settle("save file", Err(io)), StorageStatus::IoError);
        assert_eq!(
            settle("save file", Err(unknown)),
            StorageStatus::UnknownError
        );
        assert_eq!(
            settle("save file", Ok(StorageStatus::FileAlreadyExists)),
            StorageStatus::FileAlreadyExists
        );
    }
}
