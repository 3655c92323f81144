//! Error types for rotolog

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for logger and rotator construction
#[derive(Error, Debug)]
pub enum Error {
    /// Severity name did not match any known level
    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    /// Prefix flag name did not match any known flag
    #[error("Invalid prefix flag: {0}")]
    InvalidFlag(String),

    /// Log directory could not be created
    #[error("Failed to create log directory at {path}: {source}")]
    CreateDirectory {
        /// The directory that failed to be created
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },

    /// A rotation file could not be created
    #[error("Failed to create log file at {path}: {source}")]
    CreateFile {
        /// The file that failed to be created
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },

    /// The background rotation thread could not be spawned
    #[error("Failed to spawn rotation thread: {0}")]
    ThreadSpawn(std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using rotolog's Error
pub type Result<T> = std::result::Result<T, Error>;
