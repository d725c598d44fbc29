//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::path::Path;

use crate::config::ClassreachConfig;
use crate::error::{ConfigError, Result};
use crate::settings::LOG_LEVELS;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &ClassreachConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use classreach_config::{ClassreachConfig, ConfigValidator, SchemaValidator};
///
/// let config = ClassreachConfig::default();
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ClassreachConfig) -> Result<()> {
        let filter = &config.filter;
        let prefixes = filter.include_prefixes.iter().chain(&filter.exclude_prefixes);
        for prefix in prefixes {
            if prefix.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "filter prefixes cannot be empty".to_string(),
                    hint: Some("Remove empty strings from include_prefixes / exclude_prefixes".to_string()),
                });
            }
        }

        config.name_filter().map_err(|err| ConfigError::SchemaValidation {
            message: err.to_string(),
            hint: Some("exclude_patterns use Rust regex syntax".to_string()),
        })?;

        if config.resolve.max_classes == 0 {
            return Err(ConfigError::SchemaValidation {
                message: "resolve.max_classes must be greater than 0".to_string(),
                hint: None,
            });
        }

        if config.settings.parallel_jobs == Some(0) {
            return Err(ConfigError::SchemaValidation {
                message: "settings.parallel_jobs must be greater than 0".to_string(),
                hint: Some("Leave it unset to use one worker per CPU".to_string()),
            });
        }

        if let Some(level) = &config.settings.log_level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigError::SchemaValidation {
                    message: format!("unknown log level '{level}'"),
                    hint: Some(format!("Use one of: {}", LOG_LEVELS.join(", "))),
                });
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that every classpath root exists.
/// Relative roots are resolved against the validator's root directory.
pub struct FsValidator {
    root: std::path::PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ClassreachConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        for root in &config.classpath.roots {
            let path = self.root.join(root);
            if !path.exists() {
                return Err(ConfigError::RootNotFound { path });
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &ClassreachConfig) -> Result<()> {
    SchemaValidator.validate(config)
}
