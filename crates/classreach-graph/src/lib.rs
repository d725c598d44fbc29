//! # classreach-graph
//!
//! Transitive class-dependency closure over a JVM classpath.
//!
//! Given one or more compiled classes, this crate finds every other class
//! they reference, directly or through chains of references, drops names
//! outside the project's namespace, and maps each remaining name to the file
//! that defines it on an ordered classpath.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ClosureResolver                          │
//! │  (level-synchronous BFS, rayon per level)                   │
//! └────────────────────┬────────────────────────────────────────┘
//!                      │
//!          ┌───────────┼───────────────┐
//!          │           │               │
//!          ▼           ▼               ▼
//!    ┌───────────┐ ┌────────────┐ ┌────────────────┐
//!    │ classfile │ │ NameFilter │ │ ClasspathIndex │
//!    │ (reader)  │ │ (policy)   │ │ (dirs + jars)  │
//!    └───────────┘ └────────────┘ └────────────────┘
//!                      │
//!                      ▼
//!          ┌──────────────────────┐
//!          │   Closure            │
//!          │   classes, edges,    │
//!          │   diagnostics        │
//!          └──────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use classreach_graph::{ClasspathIndex, ClosureResolver, FilterPolicy, NameFilter, ResolveOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classpath = ClasspathIndex::new(["build/classes", "lib/util.jar"])?;
//! let filter = NameFilter::new(&FilterPolicy::project(["com.example"]))?;
//! let resolver = ClosureResolver::new(&classpath, filter, ResolveOptions::default());
//!
//! let root = ClasspathIndex::root_for_class_file("build/classes/com/example/App.class".as_ref())?;
//! let closure = resolver.resolve_imported_classes([root])?;
//!
//! for class in &closure.classes {
//!     println!("{} {}", class.class_name, class.location());
//! }
//! for missing in &closure.diagnostics.unresolved {
//!     eprintln!("missing {} (from {})", missing.name, missing.referenced_from);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Limitations
//!
//! References are found by static inspection of the class file. Classes
//! loaded by reflection or by names built at runtime are invisible.

pub mod class_name;
pub mod classfile;
pub mod classpath;
pub mod closure;
pub mod dependency_chain;
pub mod diagnostics;
pub mod filter;
pub mod resolution;
pub mod resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use class_name::ClassName;
pub use classfile::{ClassParseError, ClassReferences, parse_class, read_class_file};
pub use classpath::{ClasspathError, ClasspathIndex, ClasspathStats};
pub use closure::Closure;
pub use dependency_chain::DependencyChain;
pub use diagnostics::{AmbiguousDefinition, Diagnostics, ParseFailure, UnresolvedDependency};
pub use filter::{FilterError, FilterPolicy, NameFilter, PLATFORM_PREFIXES};
pub use resolution::{ResolutionResult, RootKind};
pub use resolver::{ClosureResolver, DEFAULT_MAX_CLASSES, ResolveError, ResolveOptions};

#[cfg(test)]
mod tests;
