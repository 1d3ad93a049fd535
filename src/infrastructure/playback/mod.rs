//! Audio playback adapters

pub mod rodio;

pub use self::rodio::RodioPlayer;
