//! Error types for trace-debug operations
//!
//! The public trace/check/assert entry points never return these: a failed
//! write or a bad setting must not break a program that is being debugged.
//! They surface from the lower layers (`Sink::write`, `TraceConfig::from_env`,
//! `debug::install`) so those layers can be tested and composed directly.
//!
//! # Error Codes
//!
//! Each variant has a stable code (e.g., `SINK_IO`) for test harnesses and
//! log aggregation.

use thiserror::Error;

/// Result type alias for trace-debug operations
pub type Result<T> = std::result::Result<T, TraceError>;

/// Errors that can occur below the public entry points
#[derive(Error, Debug)]
pub enum TraceError {
    // ═══════════════════════════════════════════════════════════════════════
    // Output errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Writing or flushing an output channel failed
    #[error("IO error on {channel} channel: {source}")]
    Io {
        channel: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Rendering a record as JSON failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════
    // Configuration errors
    // ═══════════════════════════════════════════════════════════════════════

    /// An environment setting had a value we do not understand
    #[error("Invalid value '{value}' for {key}. Expected one of: {expected}.")]
    InvalidSetting {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The process-wide facility was already created or installed
    #[error("Trace facility already installed. Call install() before the first trace call.")]
    AlreadyInstalled,
}

impl TraceError {
    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TraceError::Io { .. } => "SINK_IO",
            TraceError::Json(_) => "JSON_ERROR",
            TraceError::InvalidSetting { .. } => "INVALID_SETTING",
            TraceError::AlreadyInstalled => "ALREADY_INSTALLED",
        }
    }

    /// Returns true if retrying the same operation might succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TraceError::Io { .. })
    }
}
