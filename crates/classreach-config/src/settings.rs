//! Global configuration settings shared across profiles.

use serde::{Deserialize, Serialize};

/// Accepted values for [`GlobalSettings::log_level`].
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub log_level: Option<String>,

    /// Worker threads for parallel expansion; rayon's default when unset.
    #[serde(default)]
    pub parallel_jobs: Option<usize>,
}
