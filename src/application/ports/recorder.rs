//! Voice capture port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Microphone permission is required to record")]
    PermissionDenied,

    #[error("Recording is not supported on this platform")]
    NotSupported,

    #[error("ffmpeg not found. Install ffmpeg to enable recording")]
    CaptureToolMissing,

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Failed to stop recording: {0}")]
    StopFailed(String),
}

/// Port for microphone capture.
///
/// At most one capture resource may be active per recorder; `stop` yields the
/// temporary file that the save operation moves into the storage directory.
#[async_trait]
pub trait VoiceRecorder: Send + Sync {
    /// Ask for microphone access. `Ok(false)` means the user declined.
    async fn request_permission(&self) -> Result<bool, RecordingError>;

    /// Start capturing from the default input device.
    async fn start(&self) -> Result<(), RecordingError>;

    /// Stop capturing and return the temporary output file.
    async fn stop(&self) -> Result<PathBuf, RecordingError>;

    /// Check if currently recording
    fn is_recording(&self) -> bool;

    /// Get elapsed recording time in milliseconds
    fn elapsed_ms(&self) -> u64;
}
