//! Playback controller
//!
//! Owns the single active playback resource. Starting a new playback stops and
//! releases the previous one; playing the note that is already playing toggles
//! it off. The controller replaces the ambient "currently playing" global of a
//! typical recorder app with an explicit object passed to the operations that
//! need it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::ports::{AudioPlayer, PlaybackError, Sound, StatusCallback, StatusSubscription};

/// Result of a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback of the requested note started
    Started,
    /// The requested note was already playing and has been stopped
    Stopped,
}

struct ActivePlayback {
    path: PathBuf,
    sound: Box<dyn Sound>,
    finished: Arc<AtomicBool>,
    _subscription: StatusSubscription,
}

/// Single-slot playback controller
pub struct PlaybackController {
    player: Arc<dyn AudioPlayer>,
    active: Mutex<Option<ActivePlayback>>,
}

impl PlaybackController {
    /// Create a controller over a player port
    pub fn new(player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            player,
            active: Mutex::new(None),
        }
    }

    /// Path of the note currently playing, if any
    pub async fn current(&self) -> Option<PathBuf> {
        let active = self.active.lock().await;
        active
            .as_ref()
            .filter(|a| !a.finished.load(Ordering::SeqCst))
            .map(|a| a.path.clone())
    }

    /// Play the given note, or stop it when it is the one already playing.
    /// Any other active playback is stopped and released first.
    pub async fn toggle(
        &self,
        path: &Path,
        on_status: Option<StatusCallback>,
    ) -> Result<PlayOutcome, PlaybackError> {
        let mut active = self.active.lock().await;

        if let Some(current) = active.as_ref() {
            if current.path == path && !current.finished.load(Ordering::SeqCst) {
                Self::release(&mut active);
                return Ok(PlayOutcome::Stopped);
            }
        }

        Self::release(&mut active);

        let sound = self.player.load(path).await?;

        let finished = Arc::new(AtomicBool::new(false));
        let finished_flag = Arc::clone(&finished);
        let caller = on_status;
        let callback: StatusCallback = Arc::new(move |status| {
            if status.did_just_finish {
                finished_flag.store(true, Ordering::SeqCst);
            }
            if let Some(cb) = &caller {
                cb(status);
            }
        });

        let subscription = sound.subscribe(callback);
        sound.play()?;

        *active = Some(ActivePlayback {
            path: path.to_path_buf(),
            sound,
            finished,
            _subscription: subscription,
        });

        Ok(PlayOutcome::Started)
    }

    /// Stop and release the active playback, if any
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        Self::release(&mut active);
    }

    /// Stop playback only when the given note is the one playing.
    /// Returns true when something was stopped.
    pub async fn stop_if_playing(&self, path: &Path) -> bool {
        let mut active = self.active.lock().await;
        let matches = active.as_ref().is_some_and(|a| a.path == path);
        if matches {
            Self::release(&mut active);
        }
        matches
    }

    // Dropping the sound releases the decoder; dropping the subscription
    // unsubscribes.
    fn release(active: &mut Option<ActivePlayback>) {
        if let Some(playback) = active.take() {
            playback.sound.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::PlaybackStatus;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct Counters {
        plays: AtomicUsize,
        stops: AtomicUsize,
    }

    struct MockSound {
        counters: Arc<Counters>,
        callback: Arc<StdMutex<Option<StatusCallback>>>,
    }

    impl Sound for MockSound {
        fn play(&self) -> Result<(), PlaybackError> {
            self.counters.plays.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn stop(&self) {
            self.counters.stops.fetch_add(1, Ordering::SeqCst);
        }
        fn duration_ms(&self) -> Option<u64> {
            Some(5000)
        }
        fn subscribe(&self, callback: StatusCallback) -> StatusSubscription {
            *self.callback.lock().unwrap() = Some(callback);
            let slot = Arc::clone(&self.callback);
            StatusSubscription::new(move || {
                *slot.lock().unwrap() = None;
            })
        }
    }

    #[derive(Default)]
    struct MockPlayer {
        counters: Arc<Counters>,
        /// Callback slot of the most recently loaded sound
        last_callback: Arc<StdMutex<Option<StatusCallback>>>,
    }

    impl MockPlayer {
        fn fire(&self, status: PlaybackStatus) {
            let cb = self.last_callback.lock().unwrap().clone();
            if let Some(cb) = cb {
                cb(status);
            }
        }
    }

    #[async_trait]
    impl AudioPlayer for MockPlayer {
        async fn load(&self, _path: &Path) -> Result<Box<dyn Sound>, PlaybackError> {
            Ok(Box::new(MockSound {
                counters: Arc::clone(&self.counters),
                callback: Arc::clone(&self.last_callback),
            }))
        }
    }

    fn controller() -> (Arc<MockPlayer>, PlaybackController) {
        let player = Arc::new(MockPlayer::default());
        let controller = PlaybackController::new(Arc::clone(&player) as Arc<dyn AudioPlayer>);
        (player, controller)
    }

    #[tokio::test]
    async fn toggle_starts_playback() {
        let (player, controller) = controller();
        let outcome = controller.toggle(Path::new("/notes/a.m4a"), None).await.unwrap();

        assert_eq!(outcome, PlayOutcome::Started);
        assert_eq!(player.counters.plays.load(Ordering::SeqCst), 1);
        assert_eq!(
            controller.current().await,
            Some(PathBuf::from("/notes/a.m4a"))
        );
    }

    #[tokio::test]
    async fn toggle_same_note_stops_it() {
        let (player, controller) = controller();
        let path = Path::new("/notes/a.m4a");

        controller.toggle(path, None).await.unwrap();
        let outcome = controller.toggle(path, None).await.unwrap();

        assert_eq!(outcome, PlayOutcome::Stopped);
        assert_eq!(player.counters.stops.load(Ordering::SeqCst), 1);
        assert_eq!(controller.current().await, None);
    }

    #[tokio::test]
    async fn new_note_stops_previous_first() {
        let (player, controller) = controller();

        controller.toggle(Path::new("/notes/a.m4a"), None).await.unwrap();
        let outcome = controller.toggle(Path::new("/notes/b.m4a"), None).await.unwrap();

        assert_eq!(outcome, PlayOutcome::Started);
        assert_eq!(player.counters.stops.load(Ordering::SeqCst), 1);
        assert_eq!(player.counters.plays.load(Ordering::SeqCst), 2);
        assert_eq!(
            controller.current().await,
            Some(PathBuf::from("/notes/b.m4a"))
        );
    }

    #[tokio::test]
    async fn finished_note_is_no_longer_current_and_replays() {
        let (player, controller) = controller();
        let path = Path::new("/notes/a.m4a");

        controller.toggle(path, None).await.unwrap();
        player.fire(PlaybackStatus {
            position_ms: 5000,
            duration_ms: Some(5000),
            is_loaded: true,
            did_just_finish: true,
        });

        assert_eq!(controller.current().await, None);

        // Toggling the finished note starts it again instead of stopping
        let outcome = controller.toggle(path, None).await.unwrap();
        assert_eq!(outcome, PlayOutcome::Started);
    }

    #[tokio::test]
    async fn stop_if_playing_only_matches_active_path() {
        let (player, controller) = controller();
        controller.toggle(Path::new("/notes/a.m4a"), None).await.unwrap();

        assert!(!controller.stop_if_playing(Path::new("/notes/b.m4a")).await);
        assert_eq!(player.counters.stops.load(Ordering::SeqCst), 0);

        assert!(controller.stop_if_playing(Path::new("/notes/a.m4a")).await);
        assert_eq!(player.counters.stops.load(Ordering::SeqCst), 1);
        assert_eq!(controller.current().await, None);
    }

    #[tokio::test]
    async fn status_updates_reach_the_subscriber() {
        let (player, controller) = controller();
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let cb: StatusCallback = Arc::new(move |status| sink.lock().unwrap().push(status));
        controller
            .toggle(Path::new("/notes/a.m4a"), Some(cb))
            .await
            .unwrap();

        player.fire(PlaybackStatus {
            position_ms: 1000,
            duration_ms: Some(5000),
            is_loaded: true,
            did_just_finish: false,
        });

        let statuses = seen.lock().unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].position_ms, 1000);
    }

    #[tokio::test]
    async fn stop_unsubscribes() {
        let (player, controller) = controller();
        controller.toggle(Path::new("/notes/a.m4a"), None).await.unwrap();
        assert!(player.last_callback.lock().unwrap().is_some());

        controller.stop().await;
        assert!(player.last_callback.lock().unwrap().is_none());
    }
}
