//! High-level configuration structure for classreach.
//!
//! This module provides the main `ClassreachConfig` struct and profile merging logic.
//! For file discovery, see the `discovery` module; for layered loading, see `loading`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use classreach_graph::{FilterError, FilterPolicy, NameFilter, ResolveOptions, DEFAULT_MAX_CLASSES};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::settings::GlobalSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassreachConfig {
    #[serde(default)]
    pub classpath: ClasspathConfig,

    #[serde(default)]
    pub filter: FilterPolicy,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub settings: GlobalSettings,

    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

/// Ordered classpath roots. Earlier roots shadow later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathConfig {
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    pub fail_fast: bool,
    pub parallel: bool,
    pub report_shadowed: bool,
    pub max_classes: usize,
    /// Treat parse failures and unresolved names as a failed run.
    pub strict: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            parallel: true,
            report_shadowed: false,
            max_classes: DEFAULT_MAX_CLASSES,
            strict: false,
        }
    }
}

impl ResolveConfig {
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            fail_fast: self.fail_fast,
            parallel: self.parallel,
            report_shadowed: self.report_shadowed,
            max_classes: self.max_classes,
        }
    }
}

/// Partial overrides applied on top of the base sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub classpath: Value,

    #[serde(default)]
    pub filter: Value,

    #[serde(default)]
    pub resolve: Value,

    #[serde(default)]
    pub settings: Value,
}

impl ClassreachConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use classreach_config::ClassreachConfig;
    /// use serde_json::json;
    ///
    /// let value = json!({
    ///     "classpath": { "roots": ["build/classes"] },
    ///     "filter": { "include_prefixes": ["com.example"] }
    /// });
    ///
    /// let config = ClassreachConfig::from_value(value).unwrap();
    /// assert_eq!(config.filter.include_prefixes, vec!["com.example".to_string()]);
    /// assert!(config.filter.default_excludes);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Compile the filter section.
    pub fn name_filter(&self) -> Result<NameFilter, FilterError> {
        NameFilter::new(&self.filter)
    }

    /// Make relative classpath roots relative to `base` instead of the process cwd.
    pub fn with_base_dir(mut self, base: &Path) -> Self {
        for root in &mut self.classpath.roots {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
        self
    }
}

impl ClassreachConfig {
    /// Merge the named profile's overrides into the base sections.
    ///
    /// `None` leaves the config untouched. A name with no matching
    /// `[profiles.<name>]` table is an error.
    pub fn materialize_profile(mut self, profile: Option<&str>) -> ConfigResult<Self> {
        let Some(name) = profile else {
            return Ok(self);
        };
        let profile_cfg = self
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
            })?;

        self.classpath = apply_override(&self.classpath, &profile_cfg.classpath)?;
        self.filter = apply_override(&self.filter, &profile_cfg.filter)?;
        self.resolve = apply_override(&self.resolve, &profile_cfg.resolve)?;
        self.settings = apply_override(&self.settings, &profile_cfg.settings)?;

        Ok(self)
    }
}

fn apply_override<T>(base: &T, overrides: &Value) -> ConfigResult<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Clone,
{
    if overrides.is_null() {
        return Ok(base.clone());
    }
    let mut merged = serde_json::to_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
        message: err.to_string(),
    })?;
    merge_values(&mut merged, overrides);
    serde_json::from_value(merged).map_err(|err| ConfigError::InvalidProfileOverride {
        message: err.to_string(),
    })
}

/// Deep-merge `update` into `target`. Objects merge key by key; arrays and
/// scalars replace.
pub(crate) fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "classpath": { "roots": ["build/classes", "lib/util.jar"] },
            "resolve": { "max_classes": 500 }
        });

        let config = ClassreachConfig::from_value(value).unwrap();
        assert_eq!(
            config.classpath.roots,
            vec![PathBuf::from("build/classes"), PathBuf::from("lib/util.jar")]
        );
        assert_eq!(config.resolve.max_classes, 500);
        assert!(config.resolve.parallel);
    }

    #[test]
    fn to_value_serializes_config() {
        let mut config = ClassreachConfig::default();
        config.resolve.strict = true;

        let value = config.to_value().unwrap();
        assert_eq!(value["resolve"]["strict"], json!(true));
        assert_eq!(value["filter"]["default_excludes"], json!(true));
    }

    #[test]
    fn profile_merging_works() {
        let value = json!({
            "filter": { "include_prefixes": ["com.example"] },
            "resolve": { "strict": false, "parallel": true },
            "profiles": {
                "ci": {
                    "resolve": { "strict": true, "parallel": false }
                }
            }
        });

        let config = ClassreachConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("ci"))
            .unwrap();

        assert!(config.resolve.strict);
        assert!(!config.resolve.parallel);
        assert_eq!(config.filter.include_prefixes, vec!["com.example".to_string()]);
    }

    #[test]
    fn unknown_profile_is_error() {
        let result = ClassreachConfig::default().materialize_profile(Some("nope"));
        assert!(matches!(result, Err(ConfigError::UnknownProfile { name }) if name == "nope"));
    }

    #[test]
    fn base_dir_applies_to_relative_roots_only() {
        let mut config = ClassreachConfig::default();
        config.classpath.roots = vec![PathBuf::from("classes"), PathBuf::from("/abs/lib.jar")];

        let config = config.with_base_dir(Path::new("/project"));
        assert_eq!(
            config.classpath.roots,
            vec![PathBuf::from("/project/classes"), PathBuf::from("/abs/lib.jar")]
        );
    }

    #[test]
    fn merge_values_replaces_arrays() {
        let mut base = json!({ "a": [1, 2], "b": { "c": 1, "d": 2 } });
        merge_values(&mut base, &json!({ "a": [3], "b": { "d": 5 } }));
        assert_eq!(base, json!({ "a": [3], "b": { "c": 1, "d": 5 } }));
    }
}
