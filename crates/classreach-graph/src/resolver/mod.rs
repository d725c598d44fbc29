//! Closure resolver.
//!
//! Drives the classfile reader, the name filter and the classpath index to a
//! fixed point: starting from a root set, every filtered, resolvable
//! reference is followed until no new class appears.

mod traversal;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classfile::{ClassParseError, ClassReferences, parse_class, read_class_file};
use crate::classpath::{ClasspathError, ClasspathIndex};
use crate::closure::Closure;
use crate::filter::NameFilter;
use crate::resolution::ResolutionResult;

/// Default cap on closure size.
pub const DEFAULT_MAX_CLASSES: usize = 100_000;

/// Error that aborts a resolution run.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Classpath(#[from] ClasspathError),

    #[error("Failed to parse '{location}': {source}")]
    Parse {
        location: String,
        #[source]
        source: ClassParseError,
    },

    #[error("Too many classes in closure: {count} classes (max: {max} allowed)")]
    TooManyClasses { count: usize, max: usize },
}

/// Knobs for one resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Abort on the first unreadable or malformed class instead of recording it.
    pub fail_fast: bool,
    /// Expand each BFS level on the rayon pool.
    pub parallel: bool,
    /// Look past the first matching root and report shadowed definitions.
    pub report_shadowed: bool,
    pub max_classes: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            fail_fast: false,
            parallel: true,
            report_shadowed: false,
            max_classes: DEFAULT_MAX_CLASSES,
        }
    }
}

/// Computes class closures against one classpath and one filter.
///
/// The resolver holds no per-run state, so a single instance can serve any
/// number of concurrent [`resolve_imported_classes`](Self::resolve_imported_classes) calls.
pub struct ClosureResolver<'a> {
    classpath: &'a ClasspathIndex,
    filter: NameFilter,
    options: ResolveOptions,
}

impl<'a> ClosureResolver<'a> {
    pub fn new(classpath: &'a ClasspathIndex, filter: NameFilter, options: ResolveOptions) -> Self {
        Self {
            classpath,
            filter,
            options,
        }
    }

    pub fn classpath(&self) -> &ClasspathIndex {
        self.classpath
    }

    pub fn filter(&self) -> &NameFilter {
        &self.filter
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Filtered, canonical names referenced by the class file at `path`.
    ///
    /// No recursion and no classpath lookups. The class's own name is part
    /// of the result when it passes the filter, since every class file
    /// names itself.
    pub fn find_imported_classes(&self, path: &Path) -> Result<BTreeSet<String>, ResolveError> {
        let references = read_class_file(path).map_err(|err| match err {
            ClasspathError::Parse { path, source } => ResolveError::Parse {
                location: path.display().to_string(),
                source,
            },
            other => ResolveError::Classpath(other),
        })?;
        Ok(self.filtered_names(&references))
    }

    /// Same as [`find_imported_classes`](Self::find_imported_classes), for any resolved artifact
    /// including archive members.
    pub fn find_imported_in(&self, result: &ResolutionResult) -> Result<BTreeSet<String>, ResolveError> {
        let bytes = self.classpath.read(result)?;
        self.imported_names(&bytes, &result.location())
    }

    fn imported_names(&self, bytes: &[u8], location: &str) -> Result<BTreeSet<String>, ResolveError> {
        let references = parse_class(bytes).map_err(|source| ResolveError::Parse {
            location: location.to_string(),
            source,
        })?;
        Ok(self.filtered_names(&references))
    }

    fn filtered_names(&self, references: &ClassReferences) -> BTreeSet<String> {
        references
            .canonical_names()
            .into_iter()
            .filter(|name| self.filter.include(name))
            .map(|name| name.as_str().to_string())
            .collect()
    }

    /// Transitive closure of `roots`.
    ///
    /// Roots are always members of the result, whether or not the filter
    /// would admit them. Recoverable problems land in
    /// [`Closure::diagnostics`]; only `fail_fast` parse failures, I/O
    /// errors on roots under `fail_fast`, and the size cap abort the run.
    pub fn resolve_imported_classes<I>(&self, roots: I) -> Result<Closure, ResolveError>
    where
        I: IntoIterator<Item = ResolutionResult>,
    {
        traversal::Traversal::new(self).run(roots.into_iter().collect())
    }
}
