//! Audio playback port interfaces

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Failed to load audio file: {0}")]
    LoadFailed(String),

    #[error("No audio output device available: {0}")]
    NoOutputDevice(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Periodic playback status delivered through a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackStatus {
    pub position_ms: u64,
    pub duration_ms: Option<u64>,
    pub is_loaded: bool,
    pub did_just_finish: bool,
}

/// Callback type for playback status updates
pub type StatusCallback = Arc<dyn Fn(PlaybackStatus) + Send + Sync>;

/// Subscription to playback status updates.
/// Dropping it unsubscribes; the consumer owns unsubscribe-on-stop.
pub struct StatusSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl StatusSubscription {
    /// Wrap the cancellation action to run when the subscription drops
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for StatusSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// A loaded sound resource.
/// Dropping the handle releases the decoder and output resources.
pub trait Sound: Send {
    /// Start or resume playback.
    fn play(&self) -> Result<(), PlaybackError>;

    /// Stop playback. Safe to call on an already stopped sound.
    fn stop(&self);

    /// Playback length, when the decoder reports one.
    fn duration_ms(&self) -> Option<u64>;

    /// Subscribe to periodic status updates. One subscriber at a time; a new
    /// subscription replaces the previous one.
    fn subscribe(&self, callback: StatusCallback) -> StatusSubscription;
}

/// Port for loading audio files into playable handles
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Decode-load an audio file. Also used by the catalog to probe durations,
    /// where the handle is dropped immediately after reading `duration_ms`.
    async fn load(&self, path: &Path) -> Result<Box<dyn Sound>, PlaybackError>;
}
