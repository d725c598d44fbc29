//! Recoverable conditions collected during a closure computation.
//!
//! None of these abort the traversal. They are aggregated and handed back
//! next to the result set so the caller can decide whether a non-empty report
//! is fatal.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::class_name::ClassName;

/// An artifact that could not be read or parsed; it contributed no references.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParseFailure {
    pub class_name: ClassName,
    /// Where the bytes were read from (`archive!/member` for archive members).
    pub location: String,
    pub message: String,
}

/// A name that passed the filter but is defined on no classpath root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnresolvedDependency {
    pub name: ClassName,
    pub referenced_from: ClassName,
}

/// A class defined under more than one root. Informational only: the first
/// root in classpath order wins.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AmbiguousDefinition {
    pub name: ClassName,
    pub chosen: PathBuf,
    pub shadowed: Vec<PathBuf>,
}

/// Diagnostics report returned alongside a closure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub parse_failures: BTreeSet<ParseFailure>,
    pub unresolved: BTreeSet<UnresolvedDependency>,
    pub ambiguous: BTreeSet<AmbiguousDefinition>,
}

impl Diagnostics {
    /// True when nothing at all was reported, informational entries included.
    pub fn is_empty(&self) -> bool {
        self.parse_failures.is_empty() && self.unresolved.is_empty() && self.ambiguous.is_empty()
    }

    /// True when a strict caller should fail: parse failures or missing dependencies.
    pub fn has_errors(&self) -> bool {
        !self.parse_failures.is_empty() || !self.unresolved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parse_failures.len() + self.unresolved.len() + self.ambiguous.len()
    }

    /// Distinct names that could not be resolved, regardless of referrer.
    pub fn unresolved_names(&self) -> BTreeSet<&ClassName> {
        self.unresolved.iter().map(|u| &u.name).collect()
    }

    pub fn is_unresolved(&self, name: &str) -> bool {
        self.unresolved.iter().any(|u| u.name.as_str() == name)
    }

    pub(crate) fn merge(&mut self, other: Diagnostics) {
        self.parse_failures.extend(other.parse_failures);
        self.unresolved.extend(other.unresolved);
        self.ambiguous.extend(other.ambiguous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> ClassName {
        ClassName::from_reference(name).unwrap()
    }

    #[test]
    fn test_ambiguity_is_not_an_error() {
        let mut diagnostics = Diagnostics::default();
        assert!(diagnostics.is_empty());

        diagnostics.ambiguous.insert(AmbiguousDefinition {
            name: class("com.example.Dup"),
            chosen: PathBuf::from("/first"),
            shadowed: vec![PathBuf::from("/second")],
        });
        assert!(!diagnostics.is_empty());
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_unresolved_names_are_distinct() {
        let mut diagnostics = Diagnostics::default();
        for referrer in ["com.example.A", "com.example.B"] {
            diagnostics.unresolved.insert(UnresolvedDependency {
                name: class("com.example.Missing"),
                referenced_from: class(referrer),
            });
        }
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.unresolved_names().len(), 1);
        assert!(diagnostics.is_unresolved("com.example.Missing"));
    }
}
