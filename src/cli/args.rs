//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// VoiceNotes - record and manage voice memos from the terminal
#[derive(Parser, Debug)]
#[command(name = "voice-notes")]
#[command(version)]
#[command(about = "Record and manage voice notes from the terminal")]
#[command(long_about = None)]
pub struct Cli {
    /// Override the recordings storage directory
    #[arg(long, value_name = "DIR", global = true)]
    pub storage_dir: Option<String>,

    /// Show desktop notifications for operation outcomes
    #[arg(short = 'n', long, global = true)]
    pub notify: bool,

    /// Skip decode-probing playback durations when listing
    #[arg(long, global = true)]
    pub no_probe: bool,

    /// Subcommand (defaults to `list`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new voice note (press Ctrl-C to stop and save)
    Record,
    /// List all voice notes, newest first
    List,
    /// List voice notes whose name contains the query
    Search {
        /// Substring to match (case-insensitive)
        query: String,
    },
    /// Play a voice note
    Play {
        /// Display name of the note
        name: String,
    },
    /// Rename a voice note
    Rename {
        /// Display name of the note
        name: String,
        /// New display name
        new_name: String,
    },
    /// Delete a voice note
    Delete {
        /// Display name of the note
        name: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["storage_dir", "notify", "probe_duration"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
