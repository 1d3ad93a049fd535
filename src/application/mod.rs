//! Application layer - Services and port interfaces
//!
//! Contains the catalog and note-lifecycle operations and trait definitions
//! for external system interactions.

pub mod catalog;
pub mod notes;
pub mod playback;
pub mod ports;

// Re-export services
pub use catalog::{Catalog, RefreshError, Snapshot};
pub use notes::{DeleteError, InitError, NotesService, RenameError, SaveError};
pub use playback::{PlayOutcome, PlaybackController};
