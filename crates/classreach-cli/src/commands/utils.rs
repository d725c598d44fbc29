//! Shared utilities for command implementations.

use std::fs;
use std::path::{Path, PathBuf};

use classreach_graph::{ClassName, ClasspathIndex, ResolutionResult};
use tracing::debug;

use crate::config::LoadedConfig;
use crate::error::{CliError, Result, ResultExt};
use crate::{logger, ui};

/// Hint attached to classpath indexing failures.
pub const CLASSPATH_HINT: &str = "Check the classpath roots and --classpath entries";

pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to read the working directory")
}

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Apply the `[settings]` section to the running process.
pub fn apply_settings(loaded: &LoadedConfig) {
    let settings = &loaded.config.settings;
    logger::apply_config_level(settings.log_level.as_deref());
    configure_thread_pool(settings.parallel_jobs);
}

/// Size rayon's global pool. Only the first call in a process takes effect.
pub fn configure_thread_pool(jobs: Option<usize>) {
    let Some(jobs) = jobs else {
        return;
    };
    if let Err(err) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global() {
        debug!(%err, jobs, "rayon global pool already configured");
    }
}

/// Turn a ROOT argument into a root artifact.
///
/// Anything that names an existing file, or ends in `.class`, is read as a
/// class file. Everything else is a class name looked up on the classpath.
pub fn resolve_root(index: &ClasspathIndex, raw: &str, cwd: &Path) -> Result<ResolutionResult> {
    let path = resolve_path(Path::new(raw), cwd);
    if path.is_file() || raw.ends_with(".class") {
        fs::metadata(&path).with_path(&path)?;
        return Ok(ClasspathIndex::root_for_class_file(&path)?);
    }

    let name = ClassName::from_reference(raw)
        .ok_or_else(|| CliError::InvalidArgument(format!("'{raw}' is neither a class file nor a class name")))?;
    index
        .locate(&name)
        .ok_or_else(|| CliError::RootNotFound { name: name.to_string() })
}

pub fn resolve_roots(index: &ClasspathIndex, raw: &[String], cwd: &Path) -> Result<Vec<ResolutionResult>> {
    raw.iter().map(|root| resolve_root(index, root, cwd)).collect()
}

/// Warn about classpath entries the index could not use.
pub fn report_skipped_roots(index: &ClasspathIndex, quiet: bool) {
    if quiet {
        return;
    }
    for skipped in index.skipped_roots() {
        ui::warning(&format!(
            "Skipping classpath entry {} (not a directory, .jar or .zip)",
            skipped.display()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classreach_graph::test_utils::write_class;
    use tempfile::TempDir;

    #[test]
    fn resolve_path_keeps_absolute() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_path(Path::new("/abs/A.class"), cwd), PathBuf::from("/abs/A.class"));
        assert_eq!(resolve_path(Path::new("rel/A.class"), cwd), PathBuf::from("/work/rel/A.class"));
    }

    #[test]
    fn class_name_root_is_located() {
        let dir = TempDir::new().unwrap();
        write_class(dir.path(), "com/example/Main", &[]);
        let index = ClasspathIndex::new([dir.path()]).unwrap();

        let root = resolve_root(&index, "com.example.Main", dir.path()).unwrap();
        assert_eq!(root.class_name.as_str(), "com.example.Main");
    }

    #[test]
    fn class_file_root_needs_no_classpath() {
        let dir = TempDir::new().unwrap();
        let file = write_class(dir.path(), "com/example/Main", &["com/example/Helper"]);
        let index = ClasspathIndex::new(std::iter::empty::<&Path>()).unwrap();

        let root = resolve_root(&index, &file.display().to_string(), dir.path()).unwrap();
        assert_eq!(root.class_name.as_str(), "com.example.Main");
        assert_eq!(root.root, dir.path());
    }

    #[test]
    fn unknown_class_name_is_root_not_found() {
        let index = ClasspathIndex::new(std::iter::empty::<&Path>()).unwrap();
        let err = resolve_root(&index, "com.example.Gone", Path::new("/")).unwrap_err();
        assert!(matches!(err, CliError::RootNotFound { ref name } if name == "com.example.Gone"));
    }

    #[test]
    fn missing_class_file_is_file_not_found() {
        let index = ClasspathIndex::new(std::iter::empty::<&Path>()).unwrap();
        let err = resolve_root(&index, "build/Gone.class", Path::new("/nowhere")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
