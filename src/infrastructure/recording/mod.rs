//! Microphone capture adapters

pub mod ffmpeg;

pub use ffmpeg::FfmpegRecorder;
