//! Voice note entity

use std::path::PathBuf;

use crate::domain::note::{note_name, Timestamp};

/// A voice note backed by one audio file in the storage directory.
///
/// Entries are rebuilt wholesale on every catalog refresh; the file system is
/// the only persisted state. The backing file is owned by the file store and
/// only referenced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceNote {
    /// Unique within one load cycle: file name plus modification time
    pub id: String,
    /// Display name: file name with the audio extension stripped
    pub name: String,
    /// Absolute path of the backing audio file
    pub path: PathBuf,
    /// File modification time, normalized to epoch milliseconds
    pub created_at: Timestamp,
    /// Playback length, when a decode probe supplied one
    pub duration_ms: Option<u64>,
    /// Backing file size in bytes
    pub size: u64,
}

impl VoiceNote {
    /// Build a note from a directory entry and its metadata
    pub fn from_file(
        file_name: &str,
        path: PathBuf,
        created_at: Timestamp,
        size: u64,
        duration_ms: Option<u64>,
    ) -> Self {
        Self {
            id: format!("{}-{}", file_name, created_at.as_millis()),
            name: note_name::display_name(file_name).to_string(),
            path,
            created_at,
            duration_ms,
            size,
        }
    }

    /// Case-insensitive substring match against the display name
    pub fn matches_query(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
