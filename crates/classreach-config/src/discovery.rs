//! File-based config discovery for CLI use
//!
//! Handles finding and loading `classreach.toml` from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ClassreachConfig;
use crate::error::{ConfigError, Result};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "classreach.toml";

/// File-based configuration discovery
///
/// Looks for `classreach.toml` in the given root directory. Relative
/// classpath roots in a loaded file are taken relative to the file's
/// directory.
///
/// # Example
///
/// ```no_run
/// use classreach_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find the config file in the root directory
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE_NAME);
        toml_path.is_file().then_some(toml_path)
    }

    /// Load config from discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<ClassreachConfig> {
        self.load_profile(None)
    }

    /// Load config with profile merging
    pub fn load_with_profile(&self, profile: &str) -> Result<ClassreachConfig> {
        self.load_profile(Some(profile))
    }

    fn load_profile(&self, profile: Option<&str>) -> Result<ClassreachConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        let config = parse_file(&path)?.materialize_profile(profile)?;
        Ok(anchor_roots(config, &path))
    }
}

/// Resolve relative classpath roots against the config file's directory.
pub(crate) fn anchor_roots(config: ClassreachConfig, path: &Path) -> ClassreachConfig {
    match path.parent() {
        Some(dir) => config.with_base_dir(dir),
        None => config,
    }
}

fn parse_file(path: &Path) -> Result<ClassreachConfig> {
    debug!(path = %path.display(), "loading config file");
    let content = fs::read_to_string(path)?;

    let toml_val: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "toml".to_string(),
        hint: Some(format!("Invalid TOML syntax: {e}")),
    })?;

    let value = serde_json::to_value(toml_val).map_err(|e| ConfigError::InvalidValue {
        field: "toml".to_string(),
        hint: Some(format!("TOML to JSON conversion failed: {e}")),
    })?;

    ClassreachConfig::from_value(value)
}
