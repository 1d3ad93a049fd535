//! Note lifecycle operations
//!
//! Initialization, save-new-recording, rename, and delete. Each operation ends
//! by refreshing the catalog; a refresh failure after a successful file
//! operation is logged and left for the next refresh to converge.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::domain::note::{note_name, Timestamp, VoiceNote};

use super::catalog::{Catalog, RefreshError, Snapshot};
use super::playback::PlaybackController;
use super::ports::{FileStore, StoreError};

/// Errors from initializing the note storage
#[derive(Debug, Clone, Error)]
pub enum InitError {
    #[error("Failed to prepare recordings directory: {0}")]
    Prepare(#[from] StoreError),

    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// Errors from the save-new-recording operation
#[derive(Debug, Clone, Error)]
pub enum SaveError {
    #[error("Recording file is missing or empty: {0}")]
    SourceInvalid(String),

    #[error("Failed to store recording: {0}")]
    Transfer(StoreError),

    #[error("Saved recording failed verification (missing or empty): {0}")]
    VerifyFailed(String),
}

/// Errors from the rename operation
#[derive(Debug, Clone, Error)]
pub enum RenameError {
    #[error("Note name cannot be empty")]
    EmptyName,

    #[error("A note named \"{0}\" already exists")]
    NameTaken(String),

    #[error("Failed to rename note: {0}")]
    MoveFailed(#[from] StoreError),
}

/// Errors from the delete operation
#[derive(Debug, Clone, Error)]
pub enum DeleteError {
    #[error("Failed to delete note: {0}")]
    Remove(#[from] StoreError),
}

/// Application service for the note lifecycle
pub struct NotesService {
    store: Arc<dyn FileStore>,
    catalog: Arc<Catalog>,
    playback: Option<Arc<PlaybackController>>,
}

impl NotesService {
    /// Create the service over a store and catalog
    pub fn new(store: Arc<dyn FileStore>, catalog: Arc<Catalog>) -> Self {
        Self {
            store,
            catalog,
            playback: None,
        }
    }

    /// Attach a playback controller so delete can stop an in-flight playback
    pub fn with_playback(mut self, playback: Arc<PlaybackController>) -> Self {
        self.playback = Some(playback);
        self
    }

    /// The catalog this service operates on
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Prepare the storage directory, drop stale duplicates, and load the
    /// first snapshot. The cleanup pass handles its own failures.
    pub async fn init(&self) -> Result<Snapshot, InitError> {
        self.store.create_dir_all(self.catalog.root()).await?;

        if let Err(e) = self.catalog.cleanup_duplicates().await {
            warn!("duplicate cleanup failed: {e}");
        }

        Ok(self.catalog.refresh().await?)
    }

    /// Move the recorder's temporary output into the storage directory under a
    /// generated collision-resistant name. A failed move falls back to
    /// copy-then-remove-source; the destination must exist with non-zero size
    /// before the save counts as successful.
    pub async fn save_recording(&self, temp: &Path) -> Result<VoiceNote, SaveError> {
        let source = self.store.info(temp).await.map_err(SaveError::Transfer)?;
        if !source.exists || source.size == 0 {
            return Err(SaveError::SourceInvalid(temp.display().to_string()));
        }

        let file_name = note_name::generate(Timestamp::now(), &note_name::fresh_suffix());
        let dest = self.catalog.root().join(&file_name);

        if let Err(move_err) = self.store.rename(temp, &dest).await {
            warn!(
                "move failed for {}, copying instead: {move_err}",
                temp.display()
            );
            self.store
                .copy(temp, &dest)
                .await
                .map_err(SaveError::Transfer)?;
            if let Err(e) = self.store.remove(temp, true).await {
                warn!("failed to remove temp recording {}: {e}", temp.display());
            }
        }

        let info = self.store.info(&dest).await.map_err(SaveError::Transfer)?;
        if !info.exists || info.size == 0 {
            return Err(SaveError::VerifyFailed(dest.display().to_string()));
        }

        self.refresh_after("save").await;

        let created_at = info
            .modified
            .map(Timestamp::from_epoch_raw)
            .unwrap_or_else(Timestamp::now);
        Ok(VoiceNote::from_file(
            &file_name, dest, created_at, info.size, None,
        ))
    }

    /// Rename a note to a user-chosen display name. The name is trimmed,
    /// path separators are replaced, and the audio extension appended when
    /// missing. Fails on an empty name or a destination collision; the
    /// original file and catalog entry are left unchanged on failure.
    pub async fn rename(&self, note: &VoiceNote, new_name: &str) -> Result<(), RenameError> {
        let file_name =
            note_name::sanitize_display_name(new_name).map_err(|_| RenameError::EmptyName)?;
        let dest = self.catalog.root().join(&file_name);

        if dest == note.path {
            return Ok(());
        }

        let existing = self.store.info(&dest).await?;
        if existing.exists {
            return Err(RenameError::NameTaken(
                note_name::display_name(&file_name).to_string(),
            ));
        }

        self.store.rename(&note.path, &dest).await?;
        self.refresh_after("rename").await;
        Ok(())
    }

    /// Delete a note. Playback of the note is stopped first; removing an
    /// already-missing file is not an error.
    pub async fn delete(&self, note: &VoiceNote) -> Result<(), DeleteError> {
        if let Some(playback) = &self.playback {
            playback.stop_if_playing(&note.path).await;
        }

        self.store.remove(&note.path, true).await?;
        self.refresh_after("delete").await;
        Ok(())
    }

    async fn refresh_after(&self, operation: &str) {
        if let Err(e) = self.catalog.refresh().await {
            warn!("refresh after {operation} failed: {e}");
        }
    }
}
