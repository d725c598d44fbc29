//! Tests for configuration validation.

use classreach_config::{ClassreachConfig, ConfigError, ConfigValidator, FsValidator, SchemaValidator};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn validate_catches_missing_root() {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = ClassreachConfig::default();
    cfg.classpath.roots = vec![PathBuf::from("build/classes")];

    match FsValidator::new(dir.path()).validate(&cfg) {
        Err(ConfigError::RootNotFound { path }) => assert!(path.ends_with("build/classes")),
        other => panic!("expected RootNotFound error, got {other:?}"),
    }
}

#[test]
fn validate_succeeds_when_roots_exist() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir_all(dir.path().join("build/classes")).expect("create classes dir");
    fs::write(dir.path().join("util.jar"), b"").expect("write jar");

    let mut cfg = ClassreachConfig::default();
    cfg.classpath.roots = vec![PathBuf::from("build/classes"), PathBuf::from("util.jar")];

    assert!(FsValidator::new(dir.path()).validate(&cfg).is_ok());
}

#[test]
fn schema_rejects_empty_prefix() {
    let mut cfg = ClassreachConfig::default();
    cfg.filter.exclude_prefixes = vec!["  ".to_string()];
    assert!(matches!(
        SchemaValidator.validate(&cfg),
        Err(ConfigError::SchemaValidation { .. })
    ));
}

#[test]
fn schema_rejects_bad_pattern() {
    let mut cfg = ClassreachConfig::default();
    cfg.filter.exclude_patterns = vec!["[unclosed".to_string()];
    let err = SchemaValidator.validate(&cfg).unwrap_err();
    assert!(err.hint().is_some());
}

#[test]
fn schema_rejects_zero_limits() {
    let mut cfg = ClassreachConfig::default();
    cfg.resolve.max_classes = 0;
    assert!(SchemaValidator.validate(&cfg).is_err());

    let mut cfg = ClassreachConfig::default();
    cfg.settings.parallel_jobs = Some(0);
    assert!(SchemaValidator.validate(&cfg).is_err());
}

#[test]
fn schema_checks_log_level() {
    let mut cfg = ClassreachConfig::default();
    cfg.settings.log_level = Some("DEBUG".to_string());
    assert!(SchemaValidator.validate(&cfg).is_ok());

    cfg.settings.log_level = Some("loud".to_string());
    assert!(SchemaValidator.validate(&cfg).is_err());
}
