//! FFmpeg-based microphone capture adapter
//!
//! Records mono AAC into a temporary `.m4a` file. Stopping sends SIGINT so
//! ffmpeg finalizes the MP4 container before exiting; a killed process leaves
//! an unreadable file behind.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::{interval, Duration as TokioDuration};

use crate::application::ports::{RecordingError, VoiceRecorder};
use crate::domain::note::note_name::AUDIO_EXTENSION;

/// Capture input arguments for the current platform, or None where ffmpeg has
/// no usable default microphone source.
#[cfg(target_os = "linux")]
fn input_args() -> Option<[&'static str; 4]> {
    Some(["-f", "pulse", "-i", "default"])
}

#[cfg(target_os = "macos")]
fn input_args() -> Option<[&'static str; 4]> {
    Some(["-f", "avfoundation", "-i", ":0"])
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn input_args() -> Option<[&'static str; 4]> {
    None
}

/// Temporary output path for a capture session
fn temp_output_path() -> PathBuf {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    std::env::temp_dir().join(format!("voice-notes-{timestamp}.{AUDIO_EXTENSION}"))
}

/// FFmpeg recorder for signal-controlled capture
pub struct FfmpegRecorder {
    /// Current FFmpeg process
    process: Arc<Mutex<Option<Child>>>,
    /// Current temp file path
    output_path: Arc<Mutex<Option<PathBuf>>>,
    /// Recording state
    is_recording: Arc<AtomicBool>,
    /// Recording start time (for elapsed tracking)
    start_time: Arc<Mutex<Option<Instant>>>,
    /// Elapsed time in milliseconds
    elapsed_ms: Arc<AtomicU64>,
}

impl FfmpegRecorder {
    /// Create a new FFmpeg recorder
    pub fn new() -> Self {
        Self {
            process: Arc::new(Mutex::new(None)),
            output_path: Arc::new(Mutex::new(None)),
            is_recording: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(Mutex::new(None)),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build FFmpeg args for a capture session
    fn build_ffmpeg_args(output_path: &Path) -> Result<Vec<String>, RecordingError> {
        let input = input_args().ok_or(RecordingError::NotSupported)?;

        let mut args: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        args.extend(
            [
                "-ar", "44100", // Sample rate
                "-ac", "1", // Mono
                "-c:a", "aac", // AAC in an MP4 container
                "-b:a", "96k", // Bitrate
                "-y", // Overwrite output
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        args.push(output_path.to_string_lossy().to_string());

        Ok(args)
    }

    /// Spawn FFmpeg process
    async fn spawn_ffmpeg(args: Vec<String>) -> Result<Child, RecordingError> {
        Command::new("ffmpeg")
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecordingError::CaptureToolMissing
                } else {
                    RecordingError::StartFailed(e.to_string())
                }
            })
    }

    /// Ask ffmpeg to finish writing and exit. A terminal Ctrl-C reaches the
    /// child too, so an already-exited process is not an error.
    #[cfg(unix)]
    fn send_stop_signal(child: &Child) -> Result<(), RecordingError> {
        use nix::errno::Errno;
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        if let Some(id) = child.id() {
            match signal::kill(Pid::from_raw(id as i32), Signal::SIGINT) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => {
                    return Err(RecordingError::StopFailed(format!("signal failed: {e}")))
                }
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn send_stop_signal(_child: &Child) -> Result<(), RecordingError> {
        Err(RecordingError::NotSupported)
    }
}

impl Default for FfmpegRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceRecorder for FfmpegRecorder {
    async fn request_permission(&self) -> Result<bool, RecordingError> {
        if input_args().is_none() {
            return Err(RecordingError::NotSupported);
        }

        // Microphone access itself is mediated by the audio server when the
        // capture starts; what can be checked up front is the capture tool.
        match Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) if status.success() => Ok(true),
            Ok(_) => Ok(false),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RecordingError::CaptureToolMissing)
            }
            Err(e) => Err(RecordingError::StartFailed(e.to_string())),
        }
    }

    async fn start(&self) -> Result<(), RecordingError> {
        let mut process_guard = self.process.lock().await;
        if process_guard.is_some() {
            return Err(RecordingError::AlreadyRecording);
        }

        let output_path = temp_output_path();
        let args = Self::build_ffmpeg_args(&output_path)?;
        let child = Self::spawn_ffmpeg(args).await?;

        {
            let mut path_guard = self.output_path.lock().await;
            *path_guard = Some(output_path);
        }

        *process_guard = Some(child);
        self.is_recording.store(true, Ordering::SeqCst);

        {
            let mut start_guard = self.start_time.lock().await;
            *start_guard = Some(Instant::now());
        }

        // Elapsed time updater
        let elapsed_ms = Arc::clone(&self.elapsed_ms);
        let start_time = Arc::clone(&self.start_time);
        let is_recording = Arc::clone(&self.is_recording);

        tokio::spawn(async move {
            let mut ticker = interval(TokioDuration::from_millis(100));
            while is_recording.load(Ordering::SeqCst) {
                ticker.tick().await;
                if let Some(start) = *start_time.lock().await {
                    elapsed_ms.store(start.elapsed().as_millis() as u64, Ordering::SeqCst);
                }
            }
        });

        Ok(())
    }

    async fn stop(&self) -> Result<PathBuf, RecordingError> {
        let mut process_guard = self.process.lock().await;
        let child = process_guard.take().ok_or(RecordingError::NotRecording)?;

        self.is_recording.store(false, Ordering::SeqCst);

        // SIGINT lets ffmpeg finalize the container
        Self::send_stop_signal(&child)?;
        let _ = child.wait_with_output().await;

        let output_path = {
            let mut path_guard = self.output_path.lock().await;
            path_guard
                .take()
                .ok_or_else(|| RecordingError::StopFailed("output path not set".to_string()))?
        };

        Ok(output_path)
    }

    fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_output_uses_audio_extension() {
        let path = temp_output_path();
        assert_eq!(
            path.extension().unwrap().to_string_lossy(),
            AUDIO_EXTENSION
        );
    }

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    #[test]
    fn ffmpeg_args_end_with_output_path() {
        let out = PathBuf::from("/tmp/out.m4a");
        let args = FfmpegRecorder::build_ffmpeg_args(&out).unwrap();
        assert_eq!(args.last().unwrap(), "/tmp/out.m4a");
        assert!(args.contains(&"aac".to_string()));
        assert!(args.contains(&"-y".to_string()));
    }

    #[tokio::test]
    async fn stop_without_start_reports_not_recording() {
        let recorder = FfmpegRecorder::new();
        let result = recorder.stop().await;
        assert!(matches!(result, Err(RecordingError::NotRecording)));
    }

    #[test]
    fn fresh_recorder_is_idle() {
        let recorder = FfmpegRecorder::new();
        assert!(!recorder.is_recording());
        assert_eq!(recorder.elapsed_ms(), 0);
    }
}
