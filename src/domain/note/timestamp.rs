//! Timestamp value object

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};

/// Raw epoch values below this are in seconds, not milliseconds.
const MILLIS_THRESHOLD: u64 = 1_000_000_000_000;

/// A point in time as milliseconds since the Unix epoch.
///
/// File-metadata sources disagree on units: some report seconds, some
/// milliseconds. [`Timestamp::from_epoch_raw`] normalizes either to
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    millis: u64,
}

impl Timestamp {
    /// Create a Timestamp from milliseconds since the epoch
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Normalize a raw epoch value of unknown unit.
    /// Values below 1e12 are treated as seconds and scaled to milliseconds.
    pub const fn from_epoch_raw(raw: u64) -> Self {
        if raw < MILLIS_THRESHOLD {
            Self { millis: raw * 1000 }
        } else {
            Self { millis: raw }
        }
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self { millis }
    }

    /// Milliseconds since the epoch
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Whole seconds since the epoch
    pub const fn as_secs(&self) -> u64 {
        self.millis / 1000
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Local.timestamp_millis_opt(self.millis as i64).single() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "{}ms", self.millis),
        }
    }
}
