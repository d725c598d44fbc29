//! Namespace filtering.
//!
//! The filter decides, from the name alone, whether a referenced class is part
//! of the project and worth resolving. It never looks at the classpath, so a
//! name it lets through but that fails to resolve is reported as a missing
//! dependency rather than silently treated as external.

use regex::RegexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::class_name::ClassName;

/// Platform namespaces excluded when [`FilterPolicy::default_excludes`] is on.
pub const PLATFORM_PREFIXES: &[&str] = &[
    "java",
    "javax",
    "jdk",
    "sun",
    "com.sun",
    "org.w3c.dom",
    "org.xml.sax",
    "org.ietf.jgss",
    "org.omg",
];

/// Error building a [`NameFilter`].
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Exclusion policy, supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPolicy {
    /// When non-empty, only names under one of these prefixes are kept.
    pub include_prefixes: Vec<String>,
    /// Names under these prefixes are dropped.
    pub exclude_prefixes: Vec<String>,
    /// Names matching any of these regular expressions are dropped.
    pub exclude_patterns: Vec<String>,
    /// Also exclude [`PLATFORM_PREFIXES`].
    pub default_excludes: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            include_prefixes: Vec::new(),
            exclude_prefixes: Vec::new(),
            exclude_patterns: Vec::new(),
            default_excludes: true,
        }
    }
}

impl FilterPolicy {
    /// Policy that keeps only the given project namespaces.
    pub fn project<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include_prefixes: prefixes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn exclude(mut self, prefix: impl Into<String>) -> Self {
        self.exclude_prefixes.push(prefix.into());
        self
    }
}

/// Compiled, reusable predicate over class names.
#[derive(Debug, Clone)]
pub struct NameFilter {
    include_prefixes: Vec<String>,
    exclude_prefixes: Vec<String>,
    exclude_patterns: RegexSet,
}

impl NameFilter {
    pub fn new(policy: &FilterPolicy) -> Result<Self, FilterError> {
        let mut exclude_prefixes: Vec<String> = Vec::new();
        if policy.default_excludes {
            exclude_prefixes.extend(PLATFORM_PREFIXES.iter().map(|p| p.to_string()));
        }
        exclude_prefixes.extend(policy.exclude_prefixes.iter().cloned());

        Ok(Self {
            include_prefixes: policy.include_prefixes.clone(),
            exclude_prefixes,
            exclude_patterns: RegexSet::new(&policy.exclude_patterns)?,
        })
    }

    /// Filter that lets every loadable class through.
    pub fn allow_all() -> Self {
        Self {
            include_prefixes: Vec::new(),
            exclude_prefixes: Vec::new(),
            exclude_patterns: RegexSet::empty(),
        }
    }

    /// Decide whether a canonical name is a resolution candidate.
    pub fn include(&self, name: &ClassName) -> bool {
        if self.exclude_prefixes.iter().any(|p| name.is_under(p)) {
            return false;
        }
        if self.exclude_patterns.is_match(name.as_str()) {
            return false;
        }
        self.include_prefixes.is_empty() || self.include_prefixes.iter().any(|p| name.is_under(p))
    }

    /// Decide on a raw reference; primitive and array-of-primitive markers are rejected.
    pub fn include_raw(&self, raw: &str) -> bool {
        ClassName::from_reference(raw).is_some_and(|name| self.include(&name))
    }
}
