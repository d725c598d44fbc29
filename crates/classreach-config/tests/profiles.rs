//! Tests for configuration profiles and merging behavior.

use classreach_config::{ConfigDiscovery, ConfigError, ConfigLoader};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CONFIG: &str = r#"
[classpath]
roots = ["build/classes"]

[filter]
include_prefixes = ["com.example"]

[resolve]
strict = false
report_shadowed = false

[profiles.ci.resolve]
strict = true
report_shadowed = true

[profiles.release.classpath]
roots = ["build/release", "lib/runtime.jar"]
"#;

fn write_config(dir: &TempDir) {
    fs::write(dir.path().join("classreach.toml"), CONFIG).expect("write config");
}

#[test]
fn profile_overrides_resolve_options() {
    let dir = TempDir::new().expect("tempdir");
    write_config(&dir);

    let config = ConfigDiscovery::new(dir.path())
        .load_with_profile("ci")
        .expect("load with profile");

    assert!(config.resolve.strict);
    assert!(config.resolve.report_shadowed);
    assert_eq!(config.filter.include_prefixes, vec!["com.example".to_string()]);
}

#[test]
fn profile_replaces_classpath_roots() {
    let dir = TempDir::new().expect("tempdir");
    write_config(&dir);

    let config = ConfigDiscovery::new(dir.path())
        .load_with_profile("release")
        .expect("load with profile");

    // Profile arrays replace rather than append; paths stay relative to the file.
    assert_eq!(
        config.classpath.roots,
        vec![PathBuf::from("build/release"), PathBuf::from("lib/runtime.jar")]
            .into_iter()
            .map(|p| dir.path().join(p))
            .collect::<Vec<_>>()
    );
    assert!(!config.resolve.strict);
}

#[test]
fn loader_applies_profile() {
    let dir = TempDir::new().expect("tempdir");
    write_config(&dir);

    let config = ConfigLoader::new(dir.path())
        .profile(Some("ci"))
        .load()
        .expect("load");
    assert!(config.resolve.strict);
    assert_eq!(config.classpath.roots, vec![dir.path().join("build/classes")]);
    assert!(config.profiles.contains_key("ci"));
}

#[test]
fn unknown_profile_fails() {
    let dir = TempDir::new().expect("tempdir");
    write_config(&dir);

    let result = ConfigLoader::new(dir.path()).profile(Some("staging")).load();
    assert!(matches!(result, Err(ConfigError::UnknownProfile { .. })));
}
