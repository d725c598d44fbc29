//! The result of a closure computation.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::class_name::ClassName;
use crate::dependency_chain::{DependencyChain, shortest_chain};
use crate::diagnostics::Diagnostics;
use crate::resolution::ResolutionResult;

/// Transitive closure of a root set, with the reference edges that produced it.
///
/// `classes` is ordered by class name, so iterating or serializing a closure
/// is reproducible for a fixed input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Closure {
    /// Root class names, in the order they were supplied.
    pub roots: Vec<ClassName>,
    pub classes: BTreeSet<ResolutionResult>,
    /// Resolved, filtered references per expanded class.
    pub edges: BTreeMap<ClassName, BTreeSet<ClassName>>,
    pub diagnostics: Diagnostics,
}

impl Closure {
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class_names(&self) -> impl Iterator<Item = &ClassName> {
        self.classes.iter().map(|result| &result.class_name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ResolutionResult> {
        // Results compare by class name only, so any root works as the key.
        let key = ResolutionResult::in_directory(ClassName::from_reference(name)?, "");
        self.classes.get(&key)
    }

    /// Direct dependencies of `name` that are part of the closure.
    pub fn dependencies_of(&self, name: &ClassName) -> impl Iterator<Item = &ClassName> {
        self.edges.get(name).into_iter().flatten()
    }

    /// Classes in the closure that reference `name` directly.
    pub fn dependents_of<'a>(&'a self, name: &'a ClassName) -> impl Iterator<Item = &'a ClassName> {
        self.edges
            .iter()
            .filter(move |(_, dependencies)| dependencies.contains(name))
            .map(|(from, _)| from)
    }

    /// Shortest reference path from a root to `name`, answering "why is this here".
    pub fn chain_to(&self, name: &str) -> Option<DependencyChain> {
        let target = ClassName::from_reference(name)?;
        shortest_chain(&self.roots, &target, &self.edges)
    }
}
