//! Voice-note domain types
//!
//! The entity, the timestamp value object, and the shared
//! generated-file-name scheme.

pub mod note_name;
pub mod timestamp;
pub mod voice_note;

pub use timestamp::Timestamp;
pub use voice_note::VoiceNote;
