//! Reference chains for explaining why a class is in a closure.
//!
//! A chain is one path through the reference graph, starting at a root and
//! ending at the class being asked about.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::class_name::ClassName;

/// A chain of references from a root to a target class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChain {
    /// Class names from root to target
    pub path: Vec<ClassName>,
    /// Number of reference hops (path length - 1)
    pub depth: usize,
}

impl DependencyChain {
    pub fn new(path: Vec<ClassName>) -> Self {
        let depth = path.len().saturating_sub(1);
        Self { path, depth }
    }

    /// The root the chain starts from.
    pub fn entry_point(&self) -> Option<&ClassName> {
        self.path.first()
    }

    pub fn target(&self) -> Option<&ClassName> {
        self.path.last()
    }

    /// Format the chain as a human-readable string.
    ///
    /// Example: "com.example.App -> com.example.Service -> com.example.Dao"
    pub fn format_chain(&self) -> String {
        self.path
            .iter()
            .map(ClassName::as_str)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Shortest chain from any of `roots` to `target` over `edges`.
///
/// Breadth-first with a predecessor map, so cycles in the reference graph are
/// harmless. Ties between equally short chains go to the earlier root, then
/// to the smaller class name.
pub(crate) fn shortest_chain(
    roots: &[ClassName],
    target: &ClassName,
    edges: &BTreeMap<ClassName, BTreeSet<ClassName>>,
) -> Option<DependencyChain> {
    let mut predecessor: FxHashMap<&ClassName, Option<&ClassName>> = FxHashMap::default();
    let mut queue = VecDeque::new();

    for root in roots {
        if predecessor.insert(root, None).is_none() {
            queue.push_back(root);
        }
    }

    while let Some(current) = queue.pop_front() {
        if current == target {
            let mut path = vec![current.clone()];
            let mut cursor = current;
            while let Some(&Some(previous)) = predecessor.get(cursor) {
                path.push(previous.clone());
                cursor = previous;
            }
            path.reverse();
            return Some(DependencyChain::new(path));
        }

        for dependency in edges.get(current).into_iter().flatten() {
            if !predecessor.contains_key(dependency) {
                predecessor.insert(dependency, Some(current));
                queue.push_back(dependency);
            }
        }
    }

    None
}
