//! CLI flags -> partial config layer.
//!
//! Each override struct serializes only the fields a flag actually set, so
//! unset flags never mask values from the file, a profile or the environment.
//! Lists given on the command line replace configured lists.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{CheckArgs, FilterArgs, ImportsArgs, ResolveArgs};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classpath: Option<ClasspathOverride>,
    #[serde(skip_serializing_if = "FilterOverride::is_empty")]
    pub filter: FilterOverride,
    #[serde(skip_serializing_if = "ResolveOverride::is_empty")]
    pub resolve: ResolveOverride,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ClasspathOverride {
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FilterOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_prefixes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_prefixes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_excludes: Option<bool>,
}

impl FilterOverride {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ResolveOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_shadowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_classes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl ResolveOverride {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    (!values.is_empty()).then(|| values.to_vec())
}

/// Boolean flags can only switch a setting on.
fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl From<&FilterArgs> for FilterOverride {
    fn from(args: &FilterArgs) -> Self {
        Self {
            include_prefixes: non_empty(&args.include),
            exclude_prefixes: non_empty(&args.exclude),
            exclude_patterns: non_empty(&args.exclude_pattern),
            default_excludes: args.no_default_excludes.then_some(false),
        }
    }
}

fn classpath(roots: &[PathBuf]) -> Option<ClasspathOverride> {
    non_empty(roots).map(|roots| ClasspathOverride { roots })
}

impl From<&ImportsArgs> for CliOverrides {
    fn from(args: &ImportsArgs) -> Self {
        Self {
            filter: (&args.filter).into(),
            ..Self::default()
        }
    }
}

impl From<&ResolveArgs> for CliOverrides {
    fn from(args: &ResolveArgs) -> Self {
        Self {
            classpath: classpath(&args.classpath),
            filter: (&args.filter).into(),
            resolve: ResolveOverride {
                fail_fast: flag(args.fail_fast),
                parallel: args.jobs_sequential.then_some(false),
                report_shadowed: flag(args.show_shadowed),
                max_classes: args.max_classes,
                strict: flag(args.strict),
            },
        }
    }
}

impl From<&CheckArgs> for CliOverrides {
    fn from(args: &CheckArgs) -> Self {
        Self {
            classpath: classpath(&args.classpath),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use serde_json::json;

    fn resolve_args() -> ResolveArgs {
        ResolveArgs {
            roots: vec!["com.example.Main".to_string()],
            classpath: Vec::new(),
            filter: FilterArgs::default(),
            format: OutputFormat::Text,
            why: None,
            strict: false,
            fail_fast: false,
            jobs_sequential: false,
            show_shadowed: false,
            max_classes: None,
        }
    }

    #[test]
    fn unset_flags_serialize_to_empty_object() {
        let overrides = CliOverrides::from(&resolve_args());
        assert_eq!(serde_json::to_value(&overrides).unwrap(), json!({}));
    }

    #[test]
    fn set_flags_serialize_their_fields_only() {
        let mut args = resolve_args();
        args.classpath = vec![PathBuf::from("build/classes")];
        args.filter.exclude = vec!["com.example.gen".to_string()];
        args.filter.no_default_excludes = true;
        args.jobs_sequential = true;
        args.strict = true;
        args.max_classes = Some(10);

        let value = serde_json::to_value(CliOverrides::from(&args)).unwrap();
        assert_eq!(
            value,
            json!({
                "classpath": { "roots": ["build/classes"] },
                "filter": {
                    "exclude_prefixes": ["com.example.gen"],
                    "default_excludes": false
                },
                "resolve": { "parallel": false, "max_classes": 10, "strict": true }
            })
        );
    }

    #[test]
    fn check_only_overrides_classpath() {
        let args = CheckArgs {
            classpath: vec![PathBuf::from("lib/a.jar")],
        };
        let value = serde_json::to_value(CliOverrides::from(&args)).unwrap();
        assert_eq!(value, json!({ "classpath": { "roots": ["lib/a.jar"] } }));
    }
}
