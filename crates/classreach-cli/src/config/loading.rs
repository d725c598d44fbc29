use std::path::PathBuf;

use classreach_config::{ClassreachConfig, ConfigLoader, validate_schema};
use tracing::debug;

use crate::cli::GlobalArgs;
use crate::config::CliOverrides;
use crate::error::Result;

/// A layered configuration plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClassreachConfig,
    pub source: Option<PathBuf>,
}

/// Load configuration from multiple sources and validate its schema.
///
/// Priority: CLI args > environment variables > profile > config file > defaults.
/// `--config` must point at an existing file. Without it, `classreach.toml`
/// in the working directory is used when present.
pub fn load(global: &GlobalArgs, overrides: &CliOverrides) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir()?;
    let mut loader = ConfigLoader::new(&cwd).profile(global.profile.clone());
    if let Some(path) = &global.config {
        loader = loader.file(path);
    }

    let source = loader.config_path()?;
    debug!(source = ?source, profile = ?global.profile, "loading configuration");

    let config = loader.load_with(overrides)?;
    validate_schema(&config)?;

    Ok(LoadedConfig { config, source })
}
