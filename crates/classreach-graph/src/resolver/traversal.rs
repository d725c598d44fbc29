use std::collections::BTreeSet;

use dashmap::DashMap;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::{ClosureResolver, ResolveError};
use crate::class_name::ClassName;
use crate::classfile::parse_class;
use crate::closure::Closure;
use crate::diagnostics::{AmbiguousDefinition, Diagnostics, ParseFailure, UnresolvedDependency};
use crate::resolution::ResolutionResult;

/// What expanding one class produced.
struct Expansion {
    item: ResolutionResult,
    dependencies: BTreeSet<ClassName>,
    discovered: Vec<ResolutionResult>,
    diagnostics: Diagnostics,
}

/// Lookup outcome cached per class name for the duration of a run.
#[derive(Clone)]
struct Lookup {
    found: Option<ResolutionResult>,
    shadowed: Option<AmbiguousDefinition>,
}

/// One resolution run.
///
/// The frontier is processed a level at a time. The visited check and mark
/// happen on the calling thread between levels, so no class is read twice
/// even when a level is expanded in parallel.
pub(super) struct Traversal<'r, 'a> {
    resolver: &'r ClosureResolver<'a>,
    cache: DashMap<ClassName, Lookup>,
}

impl<'r, 'a> Traversal<'r, 'a> {
    pub(super) fn new(resolver: &'r ClosureResolver<'a>) -> Self {
        Self {
            resolver,
            cache: DashMap::new(),
        }
    }

    pub(super) fn run(self, roots: Vec<ResolutionResult>) -> Result<Closure, ResolveError> {
        let max = self.resolver.options.max_classes;
        let mut closure = Closure::default();
        let mut visited: FxHashSet<ClassName> = FxHashSet::default();
        let mut frontier = roots;

        for root in &frontier {
            if !closure.roots.contains(&root.class_name) {
                closure.roots.push(root.class_name.clone());
            }
        }

        let mut depth = 0usize;
        while !frontier.is_empty() {
            let level: Vec<ResolutionResult> = frontier
                .drain(..)
                .filter(|item| visited.insert(item.class_name.clone()))
                .collect();
            if level.is_empty() {
                break;
            }
            if visited.len() > max {
                return Err(ResolveError::TooManyClasses {
                    count: visited.len(),
                    max,
                });
            }
            debug!(depth, classes = level.len(), "expanding level");

            let expansions: Vec<Result<Expansion, ResolveError>> = if self.resolver.options.parallel {
                level.into_par_iter().map(|item| self.expand(item)).collect()
            } else {
                level.into_iter().map(|item| self.expand(item)).collect()
            };

            for expansion in expansions {
                let expansion = expansion?;
                frontier.extend(
                    expansion
                        .discovered
                        .into_iter()
                        .filter(|found| !visited.contains(&found.class_name)),
                );
                closure.diagnostics.merge(expansion.diagnostics);
                closure
                    .edges
                    .insert(expansion.item.class_name.clone(), expansion.dependencies);
                closure.classes.insert(expansion.item);
            }
            depth += 1;
        }

        info!(
            classes = closure.classes.len(),
            unresolved = closure.diagnostics.unresolved.len(),
            parse_failures = closure.diagnostics.parse_failures.len(),
            levels = depth,
            "resolved class closure"
        );
        Ok(closure)
    }

    fn expand(&self, item: ResolutionResult) -> Result<Expansion, ResolveError> {
        let mut expansion = Expansion {
            dependencies: BTreeSet::new(),
            discovered: Vec::new(),
            diagnostics: Diagnostics::default(),
            item,
        };
        let location = expansion.item.location();
        debug!(class = %expansion.item.class_name, %location, "expanding class");

        let parsed = self
            .resolver
            .classpath
            .read(&expansion.item)
            .map_err(ResolveError::from)
            .and_then(|bytes| {
                parse_class(&bytes).map_err(|source| ResolveError::Parse {
                    location: location.clone(),
                    source,
                })
            });
        let references = match parsed {
            Ok(references) => references,
            Err(error) if self.resolver.options.fail_fast => return Err(error),
            Err(error) => {
                warn!(%location, %error, "class contributes no references");
                expansion.diagnostics.parse_failures.insert(ParseFailure {
                    class_name: expansion.item.class_name.clone(),
                    location,
                    message: error.to_string(),
                });
                return Ok(expansion);
            }
        };

        for name in references.canonical_names() {
            if name == expansion.item.class_name || !self.resolver.filter.include(&name) {
                continue;
            }
            let lookup = self.lookup(&name);
            if let Some(shadowed) = lookup.shadowed {
                expansion.diagnostics.ambiguous.insert(shadowed);
            }
            match lookup.found {
                Some(found) => {
                    expansion.dependencies.insert(name);
                    expansion.discovered.push(found);
                }
                None => {
                    expansion.diagnostics.unresolved.insert(UnresolvedDependency {
                        name,
                        referenced_from: expansion.item.class_name.clone(),
                    });
                }
            }
        }

        Ok(expansion)
    }

    fn lookup(&self, name: &ClassName) -> Lookup {
        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }

        let classpath = self.resolver.classpath;
        let lookup = if self.resolver.options.report_shadowed {
            let mut all = classpath.locate_all(name).into_iter();
            let found = all.next();
            let shadowed: Vec<_> = all.map(|result| result.file).collect();
            Lookup {
                shadowed: match (&found, shadowed.is_empty()) {
                    (Some(chosen), false) => Some(AmbiguousDefinition {
                        name: name.clone(),
                        chosen: chosen.file.clone(),
                        shadowed,
                    }),
                    _ => None,
                },
                found,
            }
        } else {
            Lookup {
                found: classpath.locate(name),
                shadowed: None,
            }
        };

        self.cache.entry(name.clone()).or_insert(lookup).clone()
    }
}
