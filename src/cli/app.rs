//! Command runners wiring the adapters into the note services

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use tokio::time::{interval, Duration as TokioDuration};

use crate::application::ports::{
    AudioPlayer, ConfigStore, FileStore, NotificationIcon, Notifier, RecordingError,
    StatusCallback, VoiceRecorder,
};
use crate::application::{Catalog, NotesService, PlayOutcome, PlaybackController};
use crate::domain::config::AppConfig;
use crate::domain::note::VoiceNote;
use crate::infrastructure::{
    FfmpegRecorder, LocalFileStore, NotifyRustNotifier, RodioPlayer, XdgConfigStore,
};

use super::presenter::{format_clock, Presenter};
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Application context: owns the storage root, the services, and the playback
/// handle, and passes them to every operation.
pub struct App {
    config: AppConfig,
    presenter: Presenter,
    notes: NotesService,
    catalog: Arc<Catalog>,
    playback: Arc<PlaybackController>,
    notifier: NotifyRustNotifier,
}

impl App {
    /// Wire the default adapters for the given configuration
    pub fn new(config: AppConfig) -> Self {
        let store: Arc<dyn FileStore> = Arc::new(LocalFileStore::new());
        let player: Arc<dyn AudioPlayer> = Arc::new(RodioPlayer::new());

        let mut catalog = Catalog::new(Arc::clone(&store), config.storage_dir_or_default());
        if config.probe_duration_or_default() {
            catalog = catalog.with_duration_probe(Arc::clone(&player));
        }
        let catalog = Arc::new(catalog);

        let playback = Arc::new(PlaybackController::new(player));
        let notes = NotesService::new(store, Arc::clone(&catalog))
            .with_playback(Arc::clone(&playback));

        Self {
            config,
            presenter: Presenter::new(),
            notes,
            catalog,
            playback,
            notifier: NotifyRustNotifier::new(),
        }
    }

    /// Prepare storage and load the first catalog snapshot
    async fn init(&self) -> Result<(), ExitCode> {
        self.notes.init().await.map(|_| ()).map_err(|e| {
            self.presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        })
    }

    /// Record a new note until Ctrl-C, then save it into the catalog
    pub async fn run_record(&mut self) -> ExitCode {
        if self.init().await.is_err() {
            return ExitCode::from(EXIT_ERROR);
        }

        let recorder = FfmpegRecorder::new();
        match recorder.request_permission().await {
            Ok(true) => {}
            Ok(false) => {
                self.presenter
                    .error(&RecordingError::PermissionDenied.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            Err(e) => {
                self.presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        }

        let shutdown = ShutdownSignal::new();
        shutdown.setup();

        if let Err(e) = recorder.start().await {
            self.presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }

        self.notify(
            "Recording",
            "Press Ctrl-C to stop and save",
            NotificationIcon::Recording,
        )
        .await;

        self.presenter
            .start_spinner("Recording... press Ctrl-C to stop");

        let mut ticker = interval(TokioDuration::from_millis(200));
        loop {
            ticker.tick().await;
            if shutdown.is_shutdown() {
                break;
            }
            self.presenter
                .update_spinner(&format!("Recording... {}", format_clock(recorder.elapsed_ms())));
        }

        let temp = match recorder.stop().await {
            Ok(path) => path,
            Err(e) => {
                self.presenter.spinner_fail("Recording failed");
                self.presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        };

        self.presenter.update_spinner("Saving...");
        match self.notes.save_recording(&temp).await {
            Ok(note) => {
                self.presenter
                    .spinner_success(&format!("Saved \"{}\"", note.name));
                self.notify("Voice note saved", &note.name, NotificationIcon::Success)
                    .await;
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                self.presenter.spinner_fail("Could not save recording");
                self.presenter.error(&e.to_string());
                self.notify(
                    "Could not save recording",
                    &e.to_string(),
                    NotificationIcon::Error,
                )
                .await;
                ExitCode::from(EXIT_ERROR)
            }
        }
    }

    /// List all notes, newest first
    pub async fn run_list(&self) -> ExitCode {
        if self.init().await.is_err() {
            return ExitCode::from(EXIT_ERROR);
        }

        let snapshot = self.catalog.snapshot().await;
        if snapshot.is_empty() {
            self.presenter
                .info("No recordings yet. Run 'voice-notes record' to create one.");
            return ExitCode::from(EXIT_SUCCESS);
        }

        for note in snapshot.iter() {
            self.presenter.note_row(note);
        }
        ExitCode::from(EXIT_SUCCESS)
    }

    /// List notes whose display name contains the query
    pub async fn run_search(&self, query: &str) -> ExitCode {
        if self.init().await.is_err() {
            return ExitCode::from(EXIT_ERROR);
        }

        let hits = self.catalog.search(query).await;
        if hits.is_empty() {
            self.presenter
                .info(&format!("No voice notes matching \"{}\"", query));
            return ExitCode::from(EXIT_SUCCESS);
        }

        for note in &hits {
            self.presenter.note_row(note);
        }
        ExitCode::from(EXIT_SUCCESS)
    }

    /// Play a note to completion (or Ctrl-C)
    pub async fn run_play(&mut self, name: &str) -> ExitCode {
        if self.init().await.is_err() {
            return ExitCode::from(EXIT_ERROR);
        }

        let note = match self.find_note(name).await {
            Some(note) => note,
            None => return ExitCode::from(EXIT_ERROR),
        };

        let (status_tx, mut status_rx) = tokio::sync::mpsc::unbounded_channel();
        let callback: StatusCallback = Arc::new(move |status| {
            let _ = status_tx.send(status);
        });

        let outcome = match self.playback.toggle(&note.path, Some(callback)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.presenter.error(&e.to_string());
                self.notify("Playback error", &e.to_string(), NotificationIcon::Error)
                    .await;
                return ExitCode::from(EXIT_ERROR);
            }
        };

        if outcome == PlayOutcome::Stopped {
            return ExitCode::from(EXIT_SUCCESS);
        }

        self.presenter.start_spinner(&format!("Playing \"{}\"", note.name));

        let mut interrupted = false;
        loop {
            tokio::select! {
                received = status_rx.recv() => match received {
                    Some(status) => {
                        self.presenter.update_spinner(&format!(
                            "Playing \"{}\"  {}",
                            note.name,
                            self.presenter.format_playback(status.position_ms, status.duration_ms)
                        ));
                        if status.did_just_finish {
                            self.playback.stop().await;
                            break;
                        }
                    }
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    self.playback.stop().await;
                    interrupted = true;
                    break;
                }
            }
        }

        if interrupted {
            self.presenter.stop_spinner();
            self.presenter.info("Stopped");
        } else {
            self.presenter.spinner_success("Done");
        }
        ExitCode::from(EXIT_SUCCESS)
    }

    /// Rename a note
    pub async fn run_rename(&self, name: &str, new_name: &str) -> ExitCode {
        if self.init().await.is_err() {
            return ExitCode::from(EXIT_ERROR);
        }

        let note = match self.find_note(name).await {
            Some(note) => note,
            None => return ExitCode::from(EXIT_ERROR),
        };

        match self.notes.rename(&note, new_name).await {
            Ok(()) => {
                self.presenter
                    .success(&format!("Renamed \"{}\" to \"{}\"", note.name, new_name.trim()));
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                self.presenter.error(&e.to_string());
                ExitCode::from(EXIT_ERROR)
            }
        }
    }

    /// Delete a note, stopping its playback first
    pub async fn run_delete(&self, name: &str, yes: bool) -> ExitCode {
        if self.init().await.is_err() {
            return ExitCode::from(EXIT_ERROR);
        }

        let note = match self.find_note(name).await {
            Some(note) => note,
            None => return ExitCode::from(EXIT_ERROR),
        };

        if !yes && !confirm(&format!("Delete \"{}\"?", note.name)) {
            self.presenter.info("Cancelled");
            return ExitCode::from(EXIT_SUCCESS);
        }

        match self.notes.delete(&note).await {
            Ok(()) => {
                self.presenter.success(&format!("Deleted \"{}\"", note.name));
                self.notify("Voice note deleted", &note.name, NotificationIcon::Info)
                    .await;
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                self.presenter.error(&e.to_string());
                self.notify("Delete failed", &e.to_string(), NotificationIcon::Error)
                    .await;
                ExitCode::from(EXIT_ERROR)
            }
        }
    }

    /// Resolve a note by display name (exact first, then case-insensitive)
    async fn find_note(&self, name: &str) -> Option<VoiceNote> {
        let snapshot = self.catalog.snapshot().await;

        if let Some(note) = snapshot.iter().find(|n| n.name == name) {
            return Some(note.clone());
        }

        let lowered = name.to_lowercase();
        let mut candidates = snapshot.iter().filter(|n| n.name.to_lowercase() == lowered);
        match (candidates.next(), candidates.next()) {
            (Some(note), None) => Some(note.clone()),
            (Some(_), Some(_)) => {
                self.presenter.error(&format!(
                    "Several notes match \"{}\" ignoring case; use the exact name",
                    name
                ));
                None
            }
            _ => {
                self.presenter.error(&format!(
                    "No voice note named \"{}\". Try 'voice-notes search {}'",
                    name, name
                ));
                None
            }
        }
    }

    /// Desktop notification, when enabled. Failures are non-fatal.
    async fn notify(&self, title: &str, message: &str, icon: NotificationIcon) {
        if self.config.notify_or_default() {
            let _ = self.notifier.notify(title, message, icon).await;
        }
    }
}

/// Blocking y/N prompt on stderr
fn confirm(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        storage_dir: std::env::var("VOICE_NOTES_DIR").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
