//! Error types for doxytag
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for doxytag operations
pub type DoxyResult<T> = Result<T, DoxyError>;

/// Main error type for doxytag operations
#[derive(Error, Debug)]
pub enum DoxyError {
    /// The source directory could not be listed. Aborts the run.
    #[error("source directory unavailable: {path}: {source}")]
    SourceDirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single candidate could not be opened or read.
    #[error("cannot read {path}: {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output artifact could not be created or written.
    #[error("cannot write {path}: {source}")]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file or merged settings are invalid
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DoxyError {
    /// Whether this error stops the whole batch rather than one file.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DoxyError::FileUnreadable { .. } | DoxyError::OutputWriteFailure { .. }
        )
    }
}
