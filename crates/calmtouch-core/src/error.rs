//! Core error types for calmtouch-core.
//!
//! The pure mapping functions (classifier, cadence) never fail; errors only
//! come from configuration, session lifecycle misuse, touch scripts and the
//! feedback capability.

use std::path::PathBuf;
use thiserror::Error;

use crate::gesture::TouchPhase;

/// Core error type for calmtouch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Gesture session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Dot-path key does not exist
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Gesture session lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A touch start arrived while another contact is still held.
    #[error("a touch is already active")]
    AlreadyActive,

    /// The pulse loop was asked to start while it is running.
    #[error("pulse loop is already running")]
    LoopAlreadyRunning,
}

/// Errors reported by a [`FeedbackSink`](crate::feedback::FeedbackSink).
///
/// The pulse loop logs and swallows these; they never interrupt a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// Haptics are not available on this device.
    #[error("haptics unavailable: {0}")]
    Unavailable(String),

    /// The platform refused the pulse (rate limited, busy, ...).
    #[error("pulse rejected: {0}")]
    Rejected(String),
}

/// Validation errors for externally supplied touch input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Screen dimensions must be positive.
    #[error("Invalid screen size {width}x{height}")]
    InvalidScreen { width: f64, height: f64 },

    /// Touch events must be ordered by timestamp.
    #[error("Touch event {index} at {at_ms}ms is earlier than the previous event")]
    OutOfOrder { index: usize, at_ms: u64 },

    /// A phase arrived that cannot follow the previous one.
    #[error("Touch event {index}: unexpected {phase:?}")]
    UnexpectedPhase { index: usize, phase: TouchPhase },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
