//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::note::VoiceNote;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print one catalog row to stdout
    pub fn note_row(&self, note: &VoiceNote) {
        let duration = note
            .duration_ms
            .map(format_clock)
            .unwrap_or_else(|| "-:--".to_string());

        println!(
            "{}  {}  {}  {}",
            note.name.bold(),
            duration.dimmed(),
            format_size(note.size).dimmed(),
            note.created_at.to_string().dimmed(),
        );
    }

    /// Playback progress line: `position / duration`
    pub fn format_playback(&self, position_ms: u64, duration_ms: Option<u64>) -> String {
        match duration_ms {
            Some(total) => format!("{} / {}", format_clock(position_ms), format_clock(total)),
            None => format_clock(position_ms),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format milliseconds as m:ss
pub fn format_clock(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Format a byte count as B / KB / MB
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_zero() {
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(5_000), "0:05");
        assert_eq!(format_clock(65_000), "1:05");
        assert_eq!(format_clock(600_000), "10:00");
    }

    #[test]
    fn clock_truncates_sub_second() {
        assert_eq!(format_clock(1_999), "0:01");
    }

    #[test]
    fn size_picks_sensible_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2_048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn playback_line_with_and_without_duration() {
        let presenter = Presenter::new();
        assert_eq!(presenter.format_playback(5_000, Some(65_000)), "0:05 / 1:05");
        assert_eq!(presenter.format_playback(5_000, None), "0:05");
    }
}
