//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the local filesystem, ffmpeg, rodio, and the desktop.

pub mod config;
pub mod notification;
pub mod playback;
pub mod recording;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use notification::NotifyRustNotifier;
pub use playback::RodioPlayer;
pub use recording::FfmpegRecorder;
pub use storage::LocalFileStore;
