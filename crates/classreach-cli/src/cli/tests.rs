use super::*;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn parses_resolve_with_all_flags() {
    let cli = Cli::try_parse_from([
        "classreach",
        "--profile",
        "ci",
        "resolve",
        "com.example.Main",
        "build/Other.class",
        "-C",
        "build/classes",
        "--classpath",
        "lib/util.jar",
        "--include",
        "com.example",
        "-x",
        "com.example.gen",
        "--no-default-excludes",
        "--format",
        "json",
        "--why",
        "com.example.Leaf",
        "--strict",
        "--fail-fast",
        "--jobs-sequential",
        "--show-shadowed",
        "--max-classes",
        "50",
    ])
    .unwrap();

    assert_eq!(cli.profile.as_deref(), Some("ci"));
    let Command::Resolve(args) = cli.command else {
        panic!("expected resolve");
    };
    assert_eq!(args.roots, vec!["com.example.Main", "build/Other.class"]);
    assert_eq!(
        args.classpath,
        vec![PathBuf::from("build/classes"), PathBuf::from("lib/util.jar")]
    );
    assert_eq!(args.filter.include, vec!["com.example"]);
    assert_eq!(args.filter.exclude, vec!["com.example.gen"]);
    assert!(args.filter.no_default_excludes);
    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.why.as_deref(), Some("com.example.Leaf"));
    assert!(args.strict && args.fail_fast && args.jobs_sequential && args.show_shadowed);
    assert_eq!(args.max_classes, Some(50));
}

#[test]
fn resolve_requires_a_root() {
    assert!(Cli::try_parse_from(["classreach", "resolve"]).is_err());
}

#[test]
fn quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["classreach", "-q", "-v", "check"]).is_err());
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["classreach", "check", "--config", "cfg/classreach.toml", "-q"]).unwrap();
    let global = cli.global();
    assert!(global.quiet);
    assert_eq!(global.config, Some(PathBuf::from("cfg/classreach.toml")));
}

#[test]
fn imports_defaults_to_text() {
    let cli = Cli::try_parse_from(["classreach", "imports", "A.class"]).unwrap();
    let Command::Imports(args) = cli.command else {
        panic!("expected imports");
    };
    assert_eq!(args.format, OutputFormat::Text);
    assert_eq!(args.class_file, PathBuf::from("A.class"));
}

#[test]
fn rejects_unknown_format() {
    assert!(Cli::try_parse_from(["classreach", "imports", "A.class", "--format", "yaml"]).is_err());
}
