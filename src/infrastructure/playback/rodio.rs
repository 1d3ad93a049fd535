//! Rodio-based playback adapter
//!
//! rodio's output stream is not Send, so every loaded sound owns a dedicated
//! thread holding the stream and sink. Commands flow in over a channel and
//! status updates flow out through the subscription callback on a fixed tick.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink, Source};
use tokio::sync::oneshot;
use tracing::debug;

use crate::application::ports::{
    AudioPlayer, PlaybackError, PlaybackStatus, Sound, StatusCallback, StatusSubscription,
};

const STATUS_INTERVAL: Duration = Duration::from_millis(200);

enum Command {
    Play,
    Stop,
}

type CallbackSlot = Arc<Mutex<Option<StatusCallback>>>;

/// Playback adapter using rodio
pub struct RodioPlayer;

impl RodioPlayer {
    /// Create a new rodio-based player
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn load(&self, path: &Path) -> Result<Box<dyn Sound>, PlaybackError> {
        let path = path.to_path_buf();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let callback: CallbackSlot = Arc::new(Mutex::new(None));
        let thread_callback = Arc::clone(&callback);

        thread::spawn(move || sound_thread(path, ready_tx, cmd_rx, thread_callback));

        let duration_ms = ready_rx
            .await
            .map_err(|_| PlaybackError::LoadFailed("playback thread exited".to_string()))??;

        Ok(Box::new(RodioSound {
            duration_ms,
            cmd_tx,
            callback,
        }))
    }
}

struct RodioSound {
    duration_ms: Option<u64>,
    cmd_tx: mpsc::Sender<Command>,
    callback: CallbackSlot,
}

impl Sound for RodioSound {
    fn play(&self) -> Result<(), PlaybackError> {
        self.cmd_tx
            .send(Command::Play)
            .map_err(|_| PlaybackError::PlaybackFailed("playback thread exited".to_string()))
    }

    fn stop(&self) {
        let _ = self.cmd_tx.send(Command::Stop);
    }

    fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    fn subscribe(&self, callback: StatusCallback) -> StatusSubscription {
        if let Ok(mut slot) = self.callback.lock() {
            *slot = Some(callback);
        }
        let slot = Arc::clone(&self.callback);
        StatusSubscription::new(move || {
            if let Ok(mut slot) = slot.lock() {
                *slot = None;
            }
        })
    }
}

impl Drop for RodioSound {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(Command::Stop);
    }
}

/// Decode the file and prepare a paused sink on the default output
fn open_sink(path: &Path) -> Result<(OutputStream, Sink, Option<u64>), PlaybackError> {
    let file = File::open(path).map_err(|e| PlaybackError::LoadFailed(e.to_string()))?;
    let decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::LoadFailed(e.to_string()))?;
    let duration_ms = decoder.total_duration().map(|d| d.as_millis() as u64);

    let (stream, handle) =
        OutputStream::try_default().map_err(|e| PlaybackError::NoOutputDevice(e.to_string()))?;
    let sink =
        Sink::try_new(&handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

    sink.pause();
    sink.append(decoder);

    Ok((stream, sink, duration_ms))
}

fn emit(callback: &CallbackSlot, status: PlaybackStatus) {
    let cb = callback.lock().ok().and_then(|slot| slot.clone());
    if let Some(cb) = cb {
        cb(status);
    }
}

fn sound_thread(
    path: PathBuf,
    ready_tx: oneshot::Sender<Result<Option<u64>, PlaybackError>>,
    cmd_rx: mpsc::Receiver<Command>,
    callback: CallbackSlot,
) {
    let (stream, sink, duration_ms) = match open_sink(&path) {
        Ok(loaded) => loaded,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };
    // The stream must outlive the sink for audio to reach the device
    let _stream = stream;

    if ready_tx.send(Ok(duration_ms)).is_err() {
        return;
    }

    let mut playing_since: Option<Instant> = None;

    loop {
        match cmd_rx.recv_timeout(STATUS_INTERVAL) {
            Ok(Command::Play) => {
                sink.play();
                playing_since = Some(Instant::now());
            }
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => {
                sink.stop();
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                let Some(started) = playing_since else {
                    continue;
                };

                let did_just_finish = sink.empty();
                let elapsed = started.elapsed().as_millis() as u64;
                let position_ms = match duration_ms {
                    Some(total) => elapsed.min(total),
                    None => elapsed,
                };

                emit(
                    &callback,
                    PlaybackStatus {
                        position_ms,
                        duration_ms,
                        is_loaded: true,
                        did_just_finish,
                    },
                );

                if did_just_finish {
                    break;
                }
            }
        }
    }

    debug!("playback thread for {} finished", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_of_missing_file_fails() {
        let player = RodioPlayer::new();
        let result = player.load(Path::new("/definitely/not/here.m4a")).await;
        assert!(matches!(result, Err(PlaybackError::LoadFailed(_))));
    }

    // Note: playback tests require audio hardware and decodable fixtures;
    // they are marked as ignored by default

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn load_play_stop_cycle() {
        let player = RodioPlayer::new();
        let sound = player.load(Path::new("fixtures/sample.m4a")).await.unwrap();
        sound.play().unwrap();
        sound.stop();
    }
}
