//! Error handling for the classreach CLI.
//!
//! `CliError` wraps the library error enums via `#[from]` and adds the
//! CLI-only failure modes. Context helpers in [`ResultExt`] attach file paths
//! and hints. `main` converts the final error to a [`miette::Report`].
//!
//! # Example
//!
//! ```rust,no_run
//! use classreach_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_class(path: &Path) -> Result<Vec<u8>> {
//!     std::fs::read(path).with_path(path)
//! }
//! ```

mod report;

use std::path::PathBuf;

use classreach_config::ConfigError;
use classreach_graph::{ClasspathError, FilterError, ResolveError};
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or validating classreach.toml failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The traversal aborted
    #[error("Resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// A classpath root or class file could not be read
    #[error("Classpath error: {0}")]
    Classpath(#[from] ClasspathError),

    /// Filter patterns did not compile
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A ROOT given as a class name is not defined on the classpath
    #[error("Root class '{name}' was not found on the classpath")]
    RootNotFound { name: String },

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `--strict` run finished with error diagnostics
    #[error("Strict mode: closure has {count} error diagnostic(s)")]
    StrictFailure { count: usize },

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn an I/O `NotFound` into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}
