//! End-to-end tests for the `classreach` binary.
//!
//! Every test builds a throwaway project in a temp dir with real class files
//! and runs the binary there, so no ambient classreach.toml or
//! `CLASSREACH_*` variable leaks in.

use assert_cmd::Command;
use classreach_graph::test_utils::{write_class, write_jar};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn classreach(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("classreach").unwrap();
    cmd.current_dir(cwd).env_remove("RUST_LOG").env("NO_COLOR", "1");
    for (key, _) in std::env::vars() {
        if key.starts_with("CLASSREACH_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

/// A -> {B, C}, B -> D, C -> D, D -> java.lang.String
fn project() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let classes = temp.path().join("classes");
    write_class(&classes, "com/example/A", &["com/example/B", "com/example/C"]);
    write_class(&classes, "com/example/B", &["com/example/D"]);
    write_class(&classes, "com/example/C", &["com/example/D"]);
    write_class(&classes, "com/example/D", &["java/lang/String"]);
    (temp, classes)
}

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn class_names(report: &Value) -> Vec<String> {
    report["classes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|class| class["class_name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn imports_lists_direct_references() {
    let (temp, classes) = project();

    classreach(temp.path())
        .args(["imports"])
        .arg(classes.join("com/example/A.class"))
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.B"))
        .stdout(predicate::str::contains("com.example.C"))
        .stdout(predicate::str::contains("com.example.D").not())
        .stdout(predicate::str::contains("java.lang.Object").not());
}

#[test]
fn imports_json_with_platform_classes() {
    let (temp, classes) = project();

    let output = classreach(temp.path())
        .args(["imports", "--no-default-excludes", "--format", "json"])
        .arg(classes.join("com/example/D.class"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = json_stdout(&output);
    let imports: Vec<&str> = report["imports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(imports.contains(&"java.lang.String"));
    assert!(imports.contains(&"com.example.D"));
}

#[test]
fn imports_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    classreach(temp.path())
        .args(["imports", "nope/A.class"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn imports_rejects_directory() {
    let (temp, classes) = project();
    classreach(temp.path())
        .arg("imports")
        .arg(classes.join("com/example"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a class file"));
}

#[test]
fn resolve_by_class_name_text() {
    let (temp, _) = project();

    classreach(temp.path())
        .args(["resolve", "com.example.A", "--classpath", "classes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.A\t"))
        .stdout(predicate::str::contains("com.example.D\t"))
        .stdout(predicate::str::contains("java.lang.String").not())
        .stderr(predicate::str::contains("Closure Summary"));
}

#[test]
fn resolve_class_file_root_json() {
    let (temp, classes) = project();

    let output = classreach(temp.path())
        .args(["resolve", "--format", "json"])
        .arg(classes.join("com/example/B.class"))
        .args(["-C", "classes"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report = json_stdout(&output);
    assert_eq!(class_names(&report), vec!["com.example.B", "com.example.D"]);
    assert_eq!(report["roots"], serde_json::json!(["com.example.B"]));
    assert_eq!(report["diagnostics"]["unresolved"], serde_json::json!([]));
}

#[test]
fn resolve_reports_unresolved_but_succeeds() {
    let (temp, classes) = project();
    fs::remove_file(classes.join("com/example/D.class")).unwrap();

    classreach(temp.path())
        .args(["resolve", "com.example.A", "-C", "classes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.D").not())
        .stderr(predicate::str::contains("com.example.D referenced from com.example.B"));
}

#[test]
fn strict_fails_on_unresolved() {
    let (temp, classes) = project();
    fs::remove_file(classes.join("com/example/D.class")).unwrap();

    classreach(temp.path())
        .args(["resolve", "com.example.A", "-C", "classes", "--strict"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("com.example.A"))
        .stderr(predicate::str::contains("strict mode"));
}

#[test]
fn strict_passes_when_clean() {
    let (temp, _) = project();

    classreach(temp.path())
        .args(["resolve", "com.example.A", "-C", "classes", "--strict", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn why_prints_shortest_chain() {
    let (temp, _) = project();

    classreach(temp.path())
        .args(["resolve", "com.example.A", "-C", "classes", "--why", "com.example.D"])
        .assert()
        .success()
        .stderr(predicate::str::contains("com.example.A -> com.example.B -> com.example.D"));

    let output = classreach(temp.path())
        .args(["resolve", "com.example.A", "-C", "classes", "--why", "com.example.D", "-f", "json"])
        .output()
        .unwrap();
    let report = json_stdout(&output);
    assert_eq!(report["why"]["target"], "com.example.D");
    assert_eq!(report["why"]["chain"]["depth"], 2);
}

#[test]
fn resolve_through_jar_roots() {
    let temp = TempDir::new().unwrap();
    write_class(&temp.path().join("classes"), "com/example/App", &["org/lib/Util"]);
    write_jar(
        &temp.path().join("lib/util.jar"),
        &[("org/lib/Util", &["org/lib/Helper"]), ("org/lib/Helper", &[])],
    );

    let output = classreach(temp.path())
        .args(["resolve", "com.example.App", "-C", "classes", "-C", "lib/util.jar", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = json_stdout(&output);
    assert_eq!(
        class_names(&report),
        vec!["com.example.App", "org.lib.Helper", "org.lib.Util"]
    );
    let helper = report["classes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|class| class["class_name"] == "org.lib.Helper")
        .unwrap();
    assert_eq!(helper["kind"], "archive");
    assert_eq!(helper["relative_path"], "org/lib/Helper.class");
}

#[test]
fn exclude_prunes_branch() {
    let (temp, _) = project();

    let output = classreach(temp.path())
        .args(["resolve", "com.example.A", "-C", "classes", "-x", "com.example.B", "-f", "json"])
        .output()
        .unwrap();
    let report = json_stdout(&output);
    assert_eq!(
        class_names(&report),
        vec!["com.example.A", "com.example.C", "com.example.D"]
    );
}

#[test]
fn unknown_root_class_fails() {
    let (temp, _) = project();

    classreach(temp.path())
        .args(["resolve", "com.example.Missing", "-C", "classes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found on the classpath"));
}

#[test]
fn max_classes_aborts() {
    let (temp, _) = project();

    classreach(temp.path())
        .args(["resolve", "com.example.A", "-C", "classes", "--max-classes", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max: 2"));
}

#[test]
fn config_file_supplies_classpath_and_profile() {
    let (temp, classes) = project();
    fs::remove_file(classes.join("com/example/D.class")).unwrap();
    fs::write(
        temp.path().join("classreach.toml"),
        r#"
[classpath]
roots = ["classes"]

[profiles.ci.resolve]
strict = true
"#,
    )
    .unwrap();

    classreach(temp.path())
        .args(["resolve", "com.example.A"])
        .assert()
        .success();

    classreach(temp.path())
        .args(["--profile", "ci", "resolve", "com.example.A"])
        .assert()
        .failure();

    classreach(temp.path())
        .args(["--profile", "nightly", "resolve", "com.example.A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown profile 'nightly'"));
}

#[test]
fn environment_overrides_config_file() {
    let (temp, classes) = project();
    fs::remove_file(classes.join("com/example/D.class")).unwrap();
    fs::write(temp.path().join("classreach.toml"), "[classpath]\nroots = [\"classes\"]\n").unwrap();

    classreach(temp.path())
        .env("CLASSREACH_RESOLVE__STRICT", "true")
        .args(["resolve", "com.example.A"])
        .assert()
        .failure();
}

#[test]
fn explicit_config_path_from_other_directory() {
    let (temp, _) = project();
    let config_dir = temp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("classreach.toml"), "[classpath]\nroots = [\"../classes\"]\n").unwrap();

    classreach(temp.path())
        .args(["--config", "config/classreach.toml", "resolve", "com.example.A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.D"));
}

#[test]
fn check_reports_classpath_stats() {
    let (temp, _) = project();
    write_jar(&temp.path().join("lib/util.jar"), &[("org/lib/Util", &[])]);
    fs::write(
        temp.path().join("classreach.toml"),
        "[classpath]\nroots = [\"classes\", \"lib/util.jar\"]\n",
    )
    .unwrap();

    classreach(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("directories\t1"))
        .stdout(predicate::str::contains("archives\t1"))
        .stdout(predicate::str::contains("directory classes\t4"))
        .stdout(predicate::str::contains("archive classes\t1"))
        .stderr(predicate::str::contains("Configuration is valid"));
}

#[test]
fn check_fails_on_missing_root() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("classreach.toml"), "[classpath]\nroots = [\"gone\"]\n").unwrap();

    classreach(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("classpath root not found"));
}

#[test]
fn check_hints_on_corrupt_archive() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("broken.jar"), b"not a zip").unwrap();
    fs::write(temp.path().join("classreach.toml"), "[classpath]\nroots = [\"broken.jar\"]\n").unwrap();

    classreach(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("archive error"))
        .stderr(predicate::str::contains("Hint: Check the classpath roots"));
}

#[test]
fn resolve_missing_class_file_root() {
    let (temp, _) = project();
    classreach(temp.path())
        .args(["resolve", "classes/com/example/Gone.class", "-C", "classes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn check_rejects_bad_pattern() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("classreach.toml"), "[filter]\nexclude_patterns = [\"(\"]\n").unwrap();

    classreach(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("schema validation failed"));
}
