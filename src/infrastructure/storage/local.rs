//! Local filesystem store adapter

use std::io::ErrorKind;
use std::path::Path;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{FileInfo, FileStore, StoreError};

/// File store over the local filesystem
pub struct LocalFileStore;

impl LocalFileStore {
    /// Create a new local file store
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, StoreError> {
        let mut entries = fs::read_dir(path)
            .await
            .map_err(|e| StoreError::ListFailed(format!("{}: {e}", path.display())))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::ListFailed(format!("{}: {e}", path.display())))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    async fn info(&self, path: &Path) -> Result<FileInfo, StoreError> {
        match fs::metadata(path).await {
            Ok(metadata) => {
                let modified = metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_millis() as u64);
                Ok(FileInfo {
                    exists: true,
                    size: metadata.len(),
                    modified,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FileInfo::default()),
            Err(e) => Err(StoreError::InfoFailed(format!("{}: {e}", path.display()))),
        }
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<(), StoreError> {
        fs::copy(from, to)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::CopyFailed(format!("{} -> {}: {e}", from.display(), to.display())))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StoreError> {
        fs::rename(from, to)
            .await
            .map_err(|e| StoreError::MoveFailed(format!("{} -> {}: {e}", from.display(), to.display())))
    }

    async fn remove(&self, path: &Path, idempotent: bool) -> Result<(), StoreError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if idempotent && e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::DeleteFailed(format!("{}: {e}", path.display()))),
        }
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| StoreError::CreateDirFailed(format!("{}: {e}", path.display())))
    }
}
