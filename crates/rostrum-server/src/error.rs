//! Error handling for the rostrum server.
//!
//! A single `ServerError` enum covers everything that can go wrong outside
//! of rendering itself; render failures live in
//! [`rostrum_engine::EngineError`] and are mapped to HTTP statuses at the
//! handler. The [`ResultExt`] helpers attach paths and hints where the bare
//! error would leave the user guessing.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or merged
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// A configuration value is present but unusable
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidConfig {
        /// Name of the offending field
        field: String,
        /// The rejected value
        value: String,
        /// Guidance for a usable value
        hint: String,
    },

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A render input could not be read from disk
    #[error("Failed to read {}: {source}", .path.display())]
    Artifact {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A render input was read but cannot be parsed
    #[error("Artifact {} is malformed: {detail}", .path.display())]
    ArtifactFormat {
        /// Path of the unusable artifact
        path: PathBuf,
        /// Parse failure description
        detail: String,
    },

    /// Compiler process errors
    #[error("Compiler error: {0}")]
    Compiler(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `ServerError` as the default error type.
pub type Result<T, E = ServerError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<ServerError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: ServerError = e.into();
            ServerError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }
}

/// Convert a `ServerError` into a miette report for terminal display.
///
/// Startup failures are the errors users actually see, so the artifact
/// variants get an extra hint about where render inputs come from.
pub fn to_report(err: ServerError) -> miette::Report {
    match err {
        ServerError::Artifact { .. } | ServerError::ArtifactFormat { .. } => {
            miette::miette!(
                "{}\n\nHint: run the compilers once to produce fresh artifacts, or point \
                 `artifacts` at their output directory",
                err
            )
        }
        ServerError::FileNotFound(_) => {
            miette::miette!("{}\n\nHint: check the paths in rostrum.toml", err)
        }
        other => miette::miette!("{}", other),
    }
}
