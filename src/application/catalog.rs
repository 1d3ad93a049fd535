//! Recordings catalog: a de-duplicated, time-ordered view of the storage directory
//!
//! The storage directory is the only persisted state. Every refresh rebuilds
//! the snapshot wholesale from directory contents; nothing is written here
//! except by the duplicate-cleanup pass.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::note::{note_name, Timestamp, VoiceNote};

use super::ports::{AudioPlayer, FileStore, StoreError};

/// Errors from catalog operations
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    #[error("Failed to scan recordings directory: {0}")]
    Scan(#[from] StoreError),
}

/// An immutable catalog snapshot, shared by reference.
///
/// When a refresh produces a list structurally equal to the previous one, the
/// previous `Arc` is kept, so consumers can skip downstream work on pointer
/// equality.
pub type Snapshot = Arc<Vec<VoiceNote>>;

/// The recordings catalog service
pub struct Catalog {
    store: Arc<dyn FileStore>,
    probe: Option<Arc<dyn AudioPlayer>>,
    root: PathBuf,
    snapshot: RwLock<Snapshot>,
    refreshing: AtomicBool,
}

impl Catalog {
    /// Create a catalog over a storage directory
    pub fn new(store: Arc<dyn FileStore>, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            probe: None,
            root: root.into(),
            snapshot: RwLock::new(Arc::new(Vec::new())),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Enable playback-duration probing through the given player
    pub fn with_duration_probe(mut self, player: Arc<dyn AudioPlayer>) -> Self {
        self.probe = Some(player);
        self
    }

    /// The storage directory this catalog scans
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The current snapshot
    pub async fn snapshot(&self) -> Snapshot {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Whether a refresh is currently in flight
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Rebuild the snapshot from directory contents.
    ///
    /// A refresh requested while one is in flight is dropped (not queued) and
    /// returns the existing snapshot. Any listing or metadata error aborts the
    /// whole pass, keeps the prior snapshot, and is logged by the caller side
    /// as non-fatal.
    pub async fn refresh(&self) -> Result<Snapshot, RefreshError> {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("refresh already in flight, dropping request");
            return Ok(self.snapshot().await);
        }

        let rebuilt = self.rebuild().await;
        let result = match rebuilt {
            Ok(notes) => {
                let mut current = self.snapshot.write().await;
                if **current != notes {
                    *current = Arc::new(notes);
                }
                Ok(Arc::clone(&current))
            }
            Err(e) => {
                warn!("catalog refresh failed, keeping previous snapshot: {e}");
                Err(e)
            }
        };
        self.refreshing.store(false, Ordering::SeqCst);
        result
    }

    async fn rebuild(&self) -> Result<Vec<VoiceNote>, RefreshError> {
        let names = self.store.list_dir(&self.root).await?;

        // (file name, mtime) guards against a listing handing out the same
        // entry twice in one pass
        let mut seen_keys: HashSet<(String, u64)> = HashSet::new();
        let mut notes = Vec::new();

        for name in names {
            if !note_name::has_audio_extension(&name) {
                continue;
            }

            let path = self.root.join(&name);
            let info = self.store.info(&path).await?;
            if !info.exists {
                continue;
            }

            let created_at = info
                .modified
                .map(Timestamp::from_epoch_raw)
                .unwrap_or_else(Timestamp::now);

            if !seen_keys.insert((name.clone(), created_at.as_millis())) {
                continue;
            }

            let duration_ms = self.probe_duration(&path).await;
            notes.push(VoiceNote::from_file(
                &name, path, created_at, info.size, duration_ms,
            ));
        }

        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // Final pass: no two entries may share a backing path
        let mut seen_paths = HashSet::new();
        notes.retain(|n| seen_paths.insert(n.path.clone()));

        Ok(notes)
    }

    /// Briefly decode-load a file to read its playback length, releasing the
    /// decoder immediately. Probe failures leave the duration unset.
    async fn probe_duration(&self, path: &Path) -> Option<u64> {
        let player = self.probe.as_ref()?;
        match player.load(path).await {
            Ok(sound) => sound.duration_ms(),
            Err(e) => {
                debug!("duration probe failed for {}: {e}", path.display());
                None
            }
        }
    }

    /// Delete stale siblings left behind by interrupted saves.
    ///
    /// Files whose names parse to the same generated base pattern are grouped;
    /// in any group with more than one member, all but the most recently
    /// modified are removed. User-named files never parse and are never
    /// touched. Individual failures are logged and do not abort the pass.
    pub async fn cleanup_duplicates(&self) -> Result<(), RefreshError> {
        let names = self.store.list_dir(&self.root).await?;

        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for name in names {
            if let Some(base) = note_name::base_pattern(&name) {
                groups.entry(base.to_string()).or_default().push(name);
            }
        }

        for group in groups.into_values() {
            if group.len() < 2 {
                continue;
            }

            let mut with_mtime = Vec::new();
            for name in group {
                let path = self.root.join(&name);
                match self.store.info(&path).await {
                    Ok(info) => with_mtime.push((path, info.modified.unwrap_or(0))),
                    Err(e) => warn!("skipping {} during cleanup: {e}", path.display()),
                }
            }

            // Keep the newest member of the group
            with_mtime.sort_by(|a, b| b.1.cmp(&a.1));
            for (path, _) in with_mtime.into_iter().skip(1) {
                match self.store.remove(&path, true).await {
                    Ok(()) => debug!("removed stale duplicate {}", path.display()),
                    Err(e) => warn!("failed to remove duplicate {}: {e}", path.display()),
                }
            }
        }

        Ok(())
    }

    /// Filter the current snapshot by a case-insensitive name substring
    pub async fn search(&self, query: &str) -> Vec<VoiceNote> {
        self.snapshot()
            .await
            .iter()
            .filter(|n| n.matches_query(query))
            .cloned()
            .collect()
    }
}
