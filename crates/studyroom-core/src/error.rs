//! Core error types for studyroom-core.
//!
//! Validation failures are recoverable warnings: the operation that produced
//! one leaves every piece of state untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Timer driver errors
    #[error("Timer driver error: {0}")]
    Driver(#[from] DriverError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not determine or create the data directory
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// User-facing validation warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Focus cannot start without a topic.
    #[error("Select a subject before starting a focus session")]
    TopicRequired,

    /// Break phases have no topic.
    #[error("A topic cannot be selected during a break")]
    TopicDuringBreak,

    /// Subject name was empty after trimming.
    #[error("Subject name is required")]
    NameRequired,

    /// Weekly target outside the accepted range.
    #[error("Weekly target must be between {min} and {max} hours, got {got}")]
    TargetOutOfRange { min: u32, max: u32, got: u32 },

    /// Assistant input was empty.
    #[error("Enter the content to {action}")]
    TextRequired { action: &'static str },

    /// No subject matched the given id or name.
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    /// Two subjects share an id.
    #[error("Duplicate subject id: {0}")]
    DuplicateSubject(String),

    /// Malformed wall-clock time.
    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Errors talking to the timer driver task.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The driver task has shut down.
    #[error("timer driver is no longer running")]
    Closed,
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for DriverError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        DriverError::Closed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for DriverError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        DriverError::Closed
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
