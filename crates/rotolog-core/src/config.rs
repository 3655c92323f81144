//! Sink configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Interval used when the configured one cannot be parsed.
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Where rotated log files go and how often a new one is started.
///
/// Can be loaded from JSON:
///
/// ```json
/// { "directory": "/var/log/svc", "file_prefix": "svc", "rotation_interval": "1h" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Directory the log files are created in
    pub directory: PathBuf,
    /// Fixed prefix of every generated file name
    pub file_prefix: String,
    /// Human readable duration, e.g. "1h", "15m", "90s"
    pub rotation_interval: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_prefix: "app".to_string(),
            rotation_interval: "1h".to_string(),
        }
    }
}

impl SinkConfig {
    pub fn new(
        directory: impl Into<PathBuf>,
        file_prefix: impl Into<String>,
        rotation_interval: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: file_prefix.into(),
            rotation_interval: rotation_interval.into(),
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The rotation interval, falling back to one hour when unparsable.
    pub fn parsed_interval(&self) -> Duration {
        parse_interval(&self.rotation_interval)
    }
}

/// Parse a rotation interval.
///
/// Invalid or zero durations never fail; they yield
/// [`DEFAULT_ROTATION_INTERVAL`].
pub fn parse_interval(interval: &str) -> Duration {
    match humantime::parse_duration(interval.trim()) {
        Ok(d) if !d.is_zero() => d,
        Ok(_) => {
            tracing::warn!(
                interval,
                "Zero rotation interval, using default of {:?}",
                DEFAULT_ROTATION_INTERVAL
            );
            DEFAULT_ROTATION_INTERVAL
        }
        Err(e) => {
            tracing::warn!(
                interval,
                error = %e,
                "Invalid rotation interval, using default of {:?}",
                DEFAULT_ROTATION_INTERVAL
            );
            DEFAULT_ROTATION_INTERVAL
        }
    }
}
