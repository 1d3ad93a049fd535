//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod file_store;
pub mod notifier;
pub mod player;
pub mod recorder;

// Re-export common types
pub use config::ConfigStore;
pub use file_store::{FileInfo, FileStore, StoreError};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use player::{
    AudioPlayer, PlaybackError, PlaybackStatus, Sound, StatusCallback, StatusSubscription,
};
pub use recorder::{RecordingError, VoiceRecorder};
