//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Dump Parsing Errors (file-level, fatal for that file)
    // ─────────────────────────────────────────────────────────────
    #[error("Dump file is empty")]
    EmptyInput,

    #[error("Frame table header not found (expected a line containing \"{marker}\")")]
    MissingTableHeader { marker: &'static str },

    #[error("No valid frame rows found in: {file_name}")]
    NoValidFrames { file_name: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Run Store Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Run not found: {id}")]
    RunNotFound { id: u64 },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn missing_table_header(marker: &'static str) -> Self {
        Self::MissingTableHeader { marker }
    }

    pub fn no_valid_frames(file_name: impl Into<String>) -> Self {
        Self::NoValidFrames {
            file_name: file_name.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn run_not_found(id: u64) -> Self {
        Self::RunNotFound { id }
    }

    /// Check if this error rejects a whole dump file.
    ///
    /// A batch counts these as failed files and moves on to the next one.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput | Error::MissingTableHeader { .. } | Error::NoValidFrames { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
