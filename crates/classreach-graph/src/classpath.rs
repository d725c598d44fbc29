//! Classpath index: maps class names to the file that defines them.
//!
//! Roots are searched in the order they were supplied and the first hit
//! wins, which mirrors JVM classpath precedence. Directory roots are checked
//! on demand; archive roots have their member list read once up front and
//! keep an open handle for member reads.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use path_clean::PathClean;
use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::class_name::ClassName;
use crate::classfile::{ClassParseError, read_class_file};
use crate::resolution::{ResolutionResult, RootKind};

/// Error raised while indexing roots or reading artifacts.
#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("I/O error while reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive error while reading {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("class parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ClassParseError,
    },

    #[error("'{path}' defines {class_name} but is not laid out as {class_name}'s class file")]
    RootMismatch { path: PathBuf, class_name: String },
}

type ArchiveHandle = ZipArchive<BufReader<File>>;

struct ArchiveRoot {
    path: PathBuf,
    members: FxHashSet<String>,
    handle: Mutex<ArchiveHandle>,
}

enum Root {
    Directory(PathBuf),
    Archive(ArchiveRoot),
}

impl Root {
    fn path(&self) -> &Path {
        match self {
            Root::Directory(path) => path,
            Root::Archive(archive) => &archive.path,
        }
    }

    fn locate(&self, name: &ClassName) -> Option<ResolutionResult> {
        let relative = name.relative_path();
        match self {
            Root::Directory(root) => root
                .join(&relative)
                .is_file()
                .then(|| ResolutionResult::in_directory(name.clone(), root.clone())),
            Root::Archive(archive) => archive
                .members
                .contains(&relative)
                .then(|| ResolutionResult::in_archive(name.clone(), archive.path.clone())),
        }
    }
}

/// Root counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClasspathStats {
    pub directories: usize,
    pub archives: usize,
    /// Class entries across all archive roots.
    pub archive_classes: usize,
    pub skipped: usize,
}

/// Ordered set of classpath roots.
pub struct ClasspathIndex {
    roots: Vec<Root>,
    skipped: Vec<PathBuf>,
}

impl std::fmt::Debug for ClasspathIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClasspathIndex")
            .field("roots", &self.roots.iter().map(Root::path).collect::<Vec<_>>())
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl ClasspathIndex {
    /// Index the given roots, preserving their order.
    ///
    /// Roots that do not exist, or are files other than `.jar`/`.zip`, are
    /// skipped with a warning. An archive that exists but cannot be opened
    /// is an error.
    pub fn new<I, P>(roots: I) -> Result<Self, ClasspathError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut index = Self {
            roots: Vec::new(),
            skipped: Vec::new(),
        };

        for root in roots {
            let path = absolutize(root.as_ref())?;
            if path.is_dir() {
                debug!(root = %path.display(), "indexed directory root");
                index.roots.push(Root::Directory(path));
            } else if path.is_file() && is_archive(&path) {
                let archive = open_archive(&path)?;
                debug!(root = %path.display(), classes = archive.members.len(), "indexed archive root");
                index.roots.push(Root::Archive(archive));
            } else {
                warn!(root = %path.display(), "skipping classpath entry that is not a directory or archive");
                index.skipped.push(path);
            }
        }

        Ok(index)
    }

    /// Roots in precedence order.
    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(Root::path)
    }

    /// Entries that were dropped while indexing.
    pub fn skipped_roots(&self) -> &[PathBuf] {
        &self.skipped
    }

    pub fn stats(&self) -> ClasspathStats {
        let mut stats = ClasspathStats {
            skipped: self.skipped.len(),
            ..ClasspathStats::default()
        };
        for root in &self.roots {
            match root {
                Root::Directory(_) => stats.directories += 1,
                Root::Archive(archive) => {
                    stats.archives += 1;
                    stats.archive_classes += archive.members.len();
                }
            }
        }
        stats
    }

    /// First definition of `name` in classpath order.
    pub fn locate(&self, name: &ClassName) -> Option<ResolutionResult> {
        self.roots.iter().find_map(|root| root.locate(name))
    }

    /// Every definition of `name`, in classpath order.
    pub fn locate_all(&self, name: &ClassName) -> Vec<ResolutionResult> {
        self.roots.iter().filter_map(|root| root.locate(name)).collect()
    }

    /// Read the bytes of the artifact behind `result`.
    pub fn read(&self, result: &ResolutionResult) -> Result<Vec<u8>, ClasspathError> {
        match result.kind {
            RootKind::Directory => fs::read(&result.file).map_err(|source| ClasspathError::Io {
                path: result.file.clone(),
                source,
            }),
            RootKind::Archive => {
                let indexed = self.roots.iter().find_map(|root| match root {
                    Root::Archive(archive) if archive.path == result.file => Some(archive),
                    _ => None,
                });
                match indexed {
                    Some(archive) => {
                        let mut handle = archive.handle.lock();
                        read_member(&mut handle, &result.file, &result.relative_path)
                    }
                    None => {
                        let mut handle = open_handle(&result.file)?;
                        read_member(&mut handle, &result.file, &result.relative_path)
                    }
                }
            }
        }
    }

    /// Build a root result for a class file given by path.
    ///
    /// The class name is read from the file itself; the root is the directory
    /// that the class's package path hangs off. The file does not need to be
    /// on this classpath.
    pub fn root_for_class_file(path: &Path) -> Result<ResolutionResult, ClasspathError> {
        let path = absolutize(path)?;
        let references = read_class_file(&path)?;
        let mismatch = || ClasspathError::RootMismatch {
            path: path.clone(),
            class_name: references.this_class.replace('/', "."),
        };
        let class_name = references.class_name().ok_or_else(mismatch)?;

        let depth = class_name.relative_path().split('/').count();
        let root = path.ancestors().nth(depth).ok_or_else(mismatch)?.to_path_buf();
        let result = ResolutionResult::in_directory(class_name, root);
        if result.file != path {
            return Err(mismatch());
        }
        Ok(result)
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ClasspathError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf().clean());
    }
    let cwd = std::env::current_dir().map_err(|source| ClasspathError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path).clean())
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"))
}

fn open_handle(path: &Path) -> Result<ArchiveHandle, ClasspathError> {
    let file = File::open(path).map_err(|source| ClasspathError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(BufReader::new(file)).map_err(|source| ClasspathError::Zip {
        path: path.to_path_buf(),
        source,
    })
}

fn open_archive(path: &Path) -> Result<ArchiveRoot, ClasspathError> {
    let handle = open_handle(path)?;
    let members = handle
        .file_names()
        .filter(|name| name.ends_with(".class") && !name.starts_with("META-INF/"))
        .map(str::to_string)
        .collect();
    Ok(ArchiveRoot {
        path: path.to_path_buf(),
        members,
        handle: Mutex::new(handle),
    })
}

fn read_member(
    handle: &mut ArchiveHandle,
    archive: &Path,
    member: &str,
) -> Result<Vec<u8>, ClasspathError> {
    let mut entry = handle.by_name(member).map_err(|source| ClasspathError::Zip {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut buffer = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut buffer)
        .map_err(|source| ClasspathError::Io {
            path: archive.to_path_buf(),
            source,
        })?;
    Ok(buffer)
}
