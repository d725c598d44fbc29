//! Property-based tests for closure computation using proptest.
//!
//! Each case writes a small random reference graph to disk, so case counts
//! are kept low.
//!
//! Run with: cargo test --features proptest --package classreach-graph property_tests

#![cfg(feature = "proptest")]

use std::collections::BTreeSet;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use crate::test_utils::write_class;
use crate::{ClassName, ClasspathIndex, Closure, ClosureResolver, FilterPolicy, NameFilter, ResolveOptions};

const CLASSES: usize = 8;

fn internal(i: usize) -> String {
    format!("com/example/p{}/C{i}", i % 3)
}

/// Random graph: for each class, the indices of the classes it references.
fn graph_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..CLASSES, 0..4), CLASSES)
}

fn write_graph(root: &Path, graph: &[Vec<usize>], present: &[bool]) {
    for (i, refs) in graph.iter().enumerate() {
        if !present[i] {
            continue;
        }
        let refs: Vec<String> = refs.iter().map(|j| internal(*j)).collect();
        let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
        write_class(root, &internal(i), &refs);
    }
}

fn closure(root: &Path, policy: &FilterPolicy, parallel: bool) -> Closure {
    let index = ClasspathIndex::new([root]).unwrap();
    let filter = NameFilter::new(policy).unwrap();
    let resolver = ClosureResolver::new(
        &index,
        filter,
        ResolveOptions {
            parallel,
            ..ResolveOptions::default()
        },
    );
    let seed = index
        .locate(&ClassName::from_reference(&internal(0)).unwrap())
        .unwrap();
    resolver.resolve_imported_classes([seed]).unwrap()
}

fn names(closure: &Closure) -> BTreeSet<String> {
    closure.class_names().map(|n| n.as_str().to_string()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: excluding more never grows the closure.
    #[test]
    fn prop_exclusion_is_monotonic(graph in graph_strategy(), excluded in 0..3usize) {
        let temp = TempDir::new().unwrap();
        write_graph(temp.path(), &graph, &[true; CLASSES]);

        let base = closure(temp.path(), &FilterPolicy::default(), true);
        let narrowed_policy = FilterPolicy::default().exclude(format!("com.example.p{excluded}"));
        let narrowed = closure(temp.path(), &narrowed_policy, true);

        prop_assert!(names(&narrowed).is_subset(&names(&base)));
    }

    /// Property: re-resolving from every member yields the same class set.
    #[test]
    fn prop_closure_is_fixed_point(graph in graph_strategy()) {
        let temp = TempDir::new().unwrap();
        write_graph(temp.path(), &graph, &[true; CLASSES]);

        let result = closure(temp.path(), &FilterPolicy::default(), true);
        let members = names(&result);
        prop_assert!(members.contains(&internal(0).replace('/', ".")));
        prop_assert!(result.diagnostics.is_empty());

        let index = ClasspathIndex::new([temp.path()]).unwrap();
        let filter = NameFilter::new(&FilterPolicy::default()).unwrap();
        let resolver = ClosureResolver::new(&index, filter, ResolveOptions::default());
        let roots: Vec<_> = result.classes.iter().cloned().collect();
        let again = resolver.resolve_imported_classes(roots).unwrap();

        prop_assert_eq!(names(&again), members);
        prop_assert_eq!(&again.edges, &result.edges);
    }

    /// Property: parallel and sequential expansion produce the same closure.
    #[test]
    fn prop_parallel_matches_sequential(graph in graph_strategy(), present in prop::collection::vec(any::<bool>(), CLASSES)) {
        let mut present = present;
        present[0] = true;
        let temp = TempDir::new().unwrap();
        write_graph(temp.path(), &graph, &present);

        let sequential = closure(temp.path(), &FilterPolicy::default(), false);
        let parallel = closure(temp.path(), &FilterPolicy::default(), true);

        prop_assert_eq!(names(&sequential), names(&parallel));
        prop_assert_eq!(&sequential.edges, &parallel.edges);
        prop_assert_eq!(&sequential.diagnostics, &parallel.diagnostics);
    }
}
