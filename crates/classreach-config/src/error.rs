//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors (for CLI use)
    #[error("classpath root not found: {path}")]
    RootNotFound { path: PathBuf },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("invalid config value for '{field}'")]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid profile override: {message}")]
    InvalidProfileOverride { message: String },

    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    // Schema validation errors (no filesystem checks)
    #[error("schema validation failed: {message}")]
    SchemaValidation { message: String, hint: Option<String> },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Suggested fix, when one is known.
    pub fn hint(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { hint, .. } | ConfigError::SchemaValidation { hint, .. } => {
                hint.as_deref()
            }
            ConfigError::NotFound => Some("Create a classreach.toml or pass --config <PATH>"),
            ConfigError::UnknownProfile { .. } => {
                Some("Define it under [profiles.<name>] in classreach.toml")
            }
            ConfigError::RootNotFound { .. } => {
                Some("Check [classpath] roots; paths are relative to the config file")
            }
            _ => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Load(Box::new(error))
    }
}
