//! Layered configuration loading.
//!
//! Priority, lowest first: built-in defaults, `classreach.toml`, the selected
//! profile, `CLASSREACH_*` environment variables, then caller overrides
//! (normally CLI flags). Environment keys use `__` between section and
//! field, e.g. `CLASSREACH_RESOLVE__MAX_CLASSES=5000`.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::Serialize;
use tracing::debug;

use crate::config::ClassreachConfig;
use crate::discovery::{ConfigDiscovery, anchor_roots};
use crate::error::{ConfigError, Result};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CLASSREACH_";

/// Builder for a fully layered [`ClassreachConfig`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    file: Option<PathBuf>,
    profile: Option<String>,
}

impl ConfigLoader {
    /// Discover `classreach.toml` under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file: None,
            profile: None,
        }
    }

    /// Use an explicit config file instead of discovery. The file must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn profile(mut self, profile: Option<impl Into<String>>) -> Self {
        self.profile = profile.map(Into::into);
        self
    }

    /// Config file that will be read, if any.
    pub fn config_path(&self) -> Result<Option<PathBuf>> {
        match &self.file {
            Some(path) if path.is_file() => Ok(Some(path.clone())),
            Some(_) => Err(ConfigError::NotFound),
            None => Ok(ConfigDiscovery::new(&self.root).find()),
        }
    }

    /// Load without caller overrides.
    pub fn load(&self) -> Result<ClassreachConfig> {
        self.load_with(&serde_json::Value::Object(Default::default()))
    }

    /// Load and apply `overrides` last. Only fields present in the serialized
    /// overrides take effect.
    pub fn load_with<T: Serialize>(&self, overrides: &T) -> Result<ClassreachConfig> {
        let path = self.config_path()?;

        let mut file_layer = Figment::new().merge(Serialized::defaults(ClassreachConfig::default()));
        if let Some(path) = &path {
            debug!(path = %path.display(), "merging config file");
            file_layer = file_layer.merge(Toml::file(path));
        }
        let base: ClassreachConfig = file_layer.extract()?;

        let mut materialized = base.materialize_profile(self.profile.as_deref())?;
        if let Some(path) = &path {
            materialized = anchor_roots(materialized, path);
        }
        let profiles = std::mem::take(&mut materialized.profiles);

        let mut config: ClassreachConfig = Figment::new()
            .merge(Serialized::defaults(materialized))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides))
            .extract()?;
        config.profiles = profiles;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert!(config.classpath.roots.is_empty());
        assert!(config.filter.default_excludes);
        assert!(config.resolve.parallel);
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = ConfigLoader::new(dir.path()).file(dir.path().join("nope.toml")).load();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("classreach.toml"),
            "[resolve]\nstrict = false\nmax_classes = 10\n",
        )
        .unwrap();

        let config = ConfigLoader::new(dir.path())
            .load_with(&json!({ "resolve": { "strict": true } }))
            .unwrap();
        assert!(config.resolve.strict);
        assert_eq!(config.resolve.max_classes, 10);
    }
}
