//! VoiceNotes - local voice-memo manager
//!
//! This crate provides the core functionality for recording voice memos from
//! the microphone and managing them as audio files in a storage directory:
//! list, search, play, rename, delete. The directory contents are the only
//! persisted state.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: The recordings catalog, note lifecycle services, and
//!   port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (local filesystem, ffmpeg,
//!   rodio, desktop notifications, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
