//! File storage port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// File storage errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Failed to list directory: {0}")]
    ListFailed(String),

    #[error("Failed to read file info: {0}")]
    InfoFailed(String),

    #[error("Failed to copy file: {0}")]
    CopyFailed(String),

    #[error("Failed to move file: {0}")]
    MoveFailed(String),

    #[error("Failed to delete file: {0}")]
    DeleteFailed(String),

    #[error("Failed to create directory: {0}")]
    CreateDirFailed(String),
}

/// Metadata for a stored file.
///
/// `modified` is the raw epoch value as reported by the backend. Backends
/// disagree on units (seconds vs. milliseconds), so consumers normalize
/// through `Timestamp::from_epoch_raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileInfo {
    pub exists: bool,
    pub size: u64,
    pub modified: Option<u64>,
}

/// Port for file storage operations
#[async_trait]
pub trait FileStore: Send + Sync {
    /// List the entry names of a directory.
    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, StoreError>;

    /// Read metadata for a path. A missing file is reported through
    /// `FileInfo::exists`, not as an error.
    async fn info(&self, path: &Path) -> Result<FileInfo, StoreError>;

    /// Copy a file, overwriting the destination.
    async fn copy(&self, from: &Path, to: &Path) -> Result<(), StoreError>;

    /// Move a file within the store.
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StoreError>;

    /// Remove a file. With `idempotent`, removing a missing file succeeds.
    async fn remove(&self, path: &Path, idempotent: bool) -> Result<(), StoreError>;

    /// Create a directory and any missing intermediates.
    async fn create_dir_all(&self, path: &Path) -> Result<(), StoreError>;
}
