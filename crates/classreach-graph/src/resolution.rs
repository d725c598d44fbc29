use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::class_name::ClassName;

/// Kind of classpath root a class was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootKind {
    /// A directory tree of `.class` files.
    Directory,
    /// A `.jar` or `.zip` archive; the class is a member of it.
    Archive,
}

/// One resolved dependency: a class name and the artifact that defines it.
///
/// Equality, hashing and ordering only look at [`ResolutionResult::class_name`],
/// so a `BTreeSet<ResolutionResult>` holds at most one definition per class
/// and iterates in class-name order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Canonical dotted class name.
    pub class_name: ClassName,
    /// Classpath root the class was found under.
    pub root: PathBuf,
    /// Absolute path of the defining file (the archive itself for archive members).
    pub file: PathBuf,
    /// Root-relative path with forward slashes, e.g. `com/example/Foo.class`.
    pub relative_path: String,
    pub kind: RootKind,
}

impl ResolutionResult {
    /// Result for a class stored as a plain file under a directory root.
    pub fn in_directory(class_name: ClassName, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let relative_path = class_name.relative_path();
        let file = root.join(&relative_path);
        Self {
            class_name,
            root,
            file,
            relative_path,
            kind: RootKind::Directory,
        }
    }

    /// Result for a class stored as a member of an archive root.
    pub fn in_archive(class_name: ClassName, archive: impl Into<PathBuf>) -> Self {
        let archive = archive.into();
        Self {
            relative_path: class_name.relative_path(),
            class_name,
            file: archive.clone(),
            root: archive,
            kind: RootKind::Archive,
        }
    }

    /// Human-readable location, `archive!/member` for archive members.
    pub fn location(&self) -> String {
        match self.kind {
            RootKind::Directory => self.file.display().to_string(),
            RootKind::Archive => format!("{}!/{}", self.file.display(), self.relative_path),
        }
    }
}

impl PartialEq for ResolutionResult {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name
    }
}

impl Eq for ResolutionResult {}

impl Hash for ResolutionResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class_name.hash(state);
    }
}

impl PartialOrd for ResolutionResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResolutionResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.class_name.cmp(&other.class_name)
    }
}
