//! Save uploaded content into directories and delete it again by name.
//!
//! [`FileStore`] reports every outcome as a [`StorageStatus`] instead of an
//! error; the filesystem it acts on is pluggable through
//! [`storage::FileSystem`].
pub mod domain;
pub mod models;
pub mod services;
pub mod storage;

pub use domain::StorageStatus;
pub use services::files::{FileStore, UploadStream};
