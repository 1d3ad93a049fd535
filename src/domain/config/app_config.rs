//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the recordings subdirectory under the platform data dir
const STORAGE_DIR_NAME: &str = "voice-notes";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage_dir: Option<String>,
    pub notify: Option<bool>,
    pub probe_duration: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            storage_dir: None,
            notify: Some(false),
            probe_duration: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            storage_dir: other.storage_dir.or(self.storage_dir),
            notify: other.notify.or(self.notify),
            probe_duration: other.probe_duration.or(self.probe_duration),
        }
    }

    /// Resolve the recordings directory: the configured path, or the
    /// `voice-notes` subdirectory of the platform data dir.
    pub fn storage_dir_or_default(&self) -> PathBuf {
        match self.storage_dir.as_deref() {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(STORAGE_DIR_NAME),
        }
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get duration-probe setting, or true if not set
    pub fn probe_duration_or_default(&self) -> bool {
        self.probe_duration.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.storage_dir.is_none());
        assert_eq!(config.notify, Some(false));
        assert_eq!(config.probe_duration, Some(true));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.storage_dir.is_none());
        assert!(config.notify.is_none());
        assert!(config.probe_duration.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            storage_dir: Some("/base".to_string()),
            notify: Some(false),
            ..Default::default()
        };

        let other = AppConfig {
            storage_dir: Some("/other".to_string()),
            notify: None, // Should not override
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.storage_dir, Some("/other".to_string()));
        assert_eq!(merged.notify, Some(false)); // Kept from base
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            storage_dir: Some("/base".to_string()),
            probe_duration: Some(false),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.storage_dir, Some("/base".to_string()));
        assert_eq!(merged.probe_duration, Some(false));
    }

    #[test]
    fn storage_dir_uses_configured_path() {
        let config = AppConfig {
            storage_dir: Some("/tmp/my-notes".to_string()),
            ..Default::default()
        };
        assert_eq!(config.storage_dir_or_default(), PathBuf::from("/tmp/my-notes"));
    }

    #[test]
    fn storage_dir_falls_back_when_unset_or_empty() {
        let unset = AppConfig::empty();
        assert!(unset
            .storage_dir_or_default()
            .ends_with(STORAGE_DIR_NAME));

        let empty = AppConfig {
            storage_dir: Some(String::new()),
            ..Default::default()
        };
        assert!(empty
            .storage_dir_or_default()
            .ends_with(STORAGE_DIR_NAME));
    }

    #[test]
    fn boolean_defaults() {
        let config = AppConfig::empty();
        assert!(!config.notify_or_default());
        assert!(config.probe_duration_or_default());
    }
}
