//! Execution-order resolution.
//!
//! Resolution is a pure computation over a registry snapshot: select the
//! candidate set for an optional group filter, validate every declared
//! dependency against the full registry, then place candidates one at a
//! time, always extracting the highest-priority fixture whose selected
//! dependencies are already placed. The result is a topological order of
//! the candidate subgraph that prefers high priority wherever dependencies
//! leave a choice.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::collection::FixtureRegistry;
use crate::error::ResolveError;

/// Resolves the execution order of registered fixtures.
pub struct OrderResolver;

impl OrderResolver {
    /// Create a new resolver.
    pub fn new() -> Self {
        Self
    }

    /// Resolve the execution order for an optional group filter.
    ///
    /// Returns the ordered identities; the caller maps them back to fixture
    /// handles through the registry. Every candidate appears exactly once.
    ///
    /// A dependency that is registered but falls outside `group` is skipped
    /// for this resolution: it neither runs nor constrains the order. A
    /// dependency missing from the full registry is a fatal
    /// [`ResolveError::UnknownDependency`] regardless of the filter, and a
    /// cycle among the candidates is a fatal
    /// [`ResolveError::CircularDependency`].
    ///
    /// Resolving twice over the same registry state and filter yields the
    /// same order: candidates are seeded in identity collation order and
    /// every tie in the placement pass breaks on that order.
    pub fn resolve(
        &self,
        registry: &FixtureRegistry,
        group: Option<&str>,
    ) -> Result<Vec<String>, ResolveError> {
        let graph = CandidateGraph::build(registry, group)?;
        graph.place()
    }
}

impl Default for OrderResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Heap key for the ready set: highest priority pops first, then the
/// earlier identity. Candidate slots are assigned in identity collation
/// order, so the smaller slot is the earlier identity.
#[derive(PartialEq, Eq)]
struct Ready {
    priority: i32,
    slot: usize,
}

impl Ord for Ready {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for Ready {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dependency graph restricted to one resolution's candidate set.
///
/// Candidates hold dense slot numbers; all traversal state lives in
/// per-slot arrays rather than keyed maps or recursion.
struct CandidateGraph<'a> {
    registry: &'a FixtureRegistry,
    /// Registry indices of the candidates, in identity collation order.
    members: Vec<usize>,
    /// slot -> slots that must be placed before it.
    deps: Vec<Vec<usize>>,
    /// slot -> slots waiting on it.
    dependents: Vec<Vec<usize>>,
}

impl<'a> CandidateGraph<'a> {
    fn build(registry: &'a FixtureRegistry, group: Option<&str>) -> Result<Self, ResolveError> {
        let mut members: Vec<usize> = (0..registry.entry_count())
            .filter(|&index| match group {
                None => true,
                Some(group) => registry.entry(index).meta.in_group(group),
            })
            .collect();
        members.sort_by(|&a, &b| registry.entry(a).identity.cmp(&registry.entry(b).identity));

        let mut slot_of = vec![None; registry.entry_count()];
        for (slot, &index) in members.iter().enumerate() {
            slot_of[index] = Some(slot);
        }

        let mut deps = vec![Vec::new(); members.len()];
        let mut dependents = vec![Vec::new(); members.len()];

        for (slot, &index) in members.iter().enumerate() {
            let entry = registry.entry(index);
            for dependency in &entry.meta.depends_on {
                let Some(dep_index) = registry.index_of(dependency) else {
                    return Err(ResolveError::UnknownDependency {
                        fixture: entry.identity.clone(),
                        dependency: dependency.clone(),
                    });
                };
                match slot_of[dep_index] {
                    Some(dep_slot) => deps[slot].push(dep_slot),
                    // Registered, but outside the requested group: the edge
                    // is dropped for this resolution.
                    None => debug!(
                        fixture = %entry.identity,
                        dependency = %dependency,
                        "dependency outside group filter, skipped"
                    ),
                }
            }
            // dependsOn is a set; collapse repeated declarations.
            deps[slot].sort_unstable();
            deps[slot].dedup();
        }

        for (slot, dep_list) in deps.iter().enumerate() {
            for &dep_slot in dep_list {
                dependents[dep_slot].push(slot);
            }
        }

        Ok(Self {
            registry,
            members,
            deps,
            dependents,
        })
    }

    /// Place every candidate, or report the cycle that prevents it.
    fn place(&self) -> Result<Vec<String>, ResolveError> {
        let mut pending: Vec<usize> = self.deps.iter().map(Vec::len).collect();

        let mut ready = BinaryHeap::new();
        for slot in 0..self.members.len() {
            if pending[slot] == 0 {
                ready.push(Ready {
                    priority: self.priority(slot),
                    slot,
                });
            }
        }

        let mut order = Vec::with_capacity(self.members.len());
        while let Some(next) = ready.pop() {
            order.push(self.identity(next.slot).to_string());
            for &dependent in &self.dependents[next.slot] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push(Ready {
                        priority: self.priority(dependent),
                        slot: dependent,
                    });
                }
            }
        }

        if order.len() < self.members.len() {
            return Err(ResolveError::CircularDependency {
                cycle: self.find_cycle(&pending),
            });
        }

        Ok(order)
    }

    /// Name an actual cycle among the slots the placement pass could not
    /// reach (those with dependencies still pending).
    ///
    /// Explicit work stack with three-state coloring; `path` mirrors the
    /// gray chain so the cycle can be cut out once a gray slot reappears.
    fn find_cycle(&self, pending: &[usize]) -> Vec<String> {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut color = vec![Color::White; self.members.len()];
        let mut path: Vec<usize> = Vec::new();
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for start in 0..self.members.len() {
            if pending[start] == 0 || color[start] != Color::White {
                continue;
            }
            color[start] = Color::Gray;
            path.push(start);
            stack.push((start, 0));

            while let Some((slot, edge)) = stack.pop() {
                if edge >= self.deps[slot].len() {
                    color[slot] = Color::Black;
                    path.pop();
                    continue;
                }
                stack.push((slot, edge + 1));

                let dep = self.deps[slot][edge];
                if pending[dep] == 0 {
                    // Already placed; cannot be part of the cycle.
                    continue;
                }
                match color[dep] {
                    Color::Gray => {
                        let first = path.iter().position(|&s| s == dep).unwrap_or(0);
                        return path[first..]
                            .iter()
                            .map(|&s| self.identity(s).to_string())
                            .collect();
                    }
                    Color::White => {
                        color[dep] = Color::Gray;
                        path.push(dep);
                        stack.push((dep, 0));
                    }
                    Color::Black => {}
                }
            }
        }

        Vec::new()
    }

    fn priority(&self, slot: usize) -> i32 {
        self.registry.entry(self.members[slot]).meta.priority
    }

    fn identity(&self, slot: usize) -> &str {
        &self.registry.entry(self.members[slot]).identity
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use seedbed_core::{Fixture, FixtureMeta};

    use super::*;

    struct Noop;

    #[async_trait::async_trait]
    impl Fixture for Noop {
        async fn load(&self) -> Result<(), anyhow::Error> {
            Ok(())
        }
    }

    /// Build a registry from (identity, priority, depends_on, groups).
    /// An empty group list means the default group.
    fn registry(specs: &[(&str, i32, &[&str], &[&str])]) -> FixtureRegistry {
        let mut registry = FixtureRegistry::new();
        for &(identity, priority, depends_on, groups) in specs {
            let meta = FixtureMeta {
                priority,
                depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
                groups: if groups.is_empty() {
                    FixtureMeta::default().groups
                } else {
                    groups.iter().map(|g| g.to_string()).collect()
                },
            };
            registry.register(identity, Arc::new(Noop), meta);
        }
        registry
    }

    fn resolve(registry: &FixtureRegistry, group: Option<&str>) -> Vec<String> {
        OrderResolver::new()
            .resolve(registry, group)
            .expect("resolution should succeed")
    }

    fn position(order: &[String], identity: &str) -> usize {
        order
            .iter()
            .position(|i| i == identity)
            .unwrap_or_else(|| panic!("{identity} missing from {order:?}"))
    }

    #[test]
    fn test_priority_wins_over_unrelated_dependency_chain() {
        // base must precede mid despite mid never beating base on priority;
        // high precedes both because nothing relates it to them.
        let registry = registry(&[
            ("base", 10, &[], &[]),
            ("mid", 5, &["base"], &[]),
            ("high", 20, &[], &[]),
        ]);

        let order = resolve(&registry, None);
        assert_eq!(order, vec!["high", "base", "mid"]);
    }

    #[test]
    fn test_dependencies_precede_dependents_transitively() {
        let registry = registry(&[
            ("c", 100, &["b"], &[]),
            ("b", 50, &["a"], &[]),
            ("a", 0, &[], &[]),
            ("d", 0, &["c"], &[]),
        ]);

        let order = resolve(&registry, None);
        assert!(position(&order, "a") < position(&order, "b"));
        assert!(position(&order, "b") < position(&order, "c"));
        assert!(position(&order, "c") < position(&order, "d"));
    }

    #[test]
    fn test_acyclic_registry_places_every_candidate_once() {
        let registry = registry(&[
            ("a", 1, &[], &[]),
            ("b", 2, &["a"], &[]),
            ("c", 3, &["a"], &[]),
            ("d", 4, &["b", "c"], &[]),
            ("e", 5, &[], &[]),
        ]);

        let order = resolve(&registry, None);
        assert_eq!(order.len(), 5);
        let unique: HashSet<&String> = order.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_unrelated_fixtures_order_by_descending_priority() {
        let registry = registry(&[
            ("low", -5, &[], &[]),
            ("mid", 0, &[], &[]),
            ("high", 99, &[], &[]),
        ]);

        let order = resolve(&registry, None);
        assert_eq!(order, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_equal_priority_ties_break_on_identity_order() {
        // Registered out of collation order on purpose.
        let registry = registry(&[
            ("cherry", 0, &[], &[]),
            ("apple", 0, &[], &[]),
            ("banana", 0, &[], &[]),
        ]);

        let order = resolve(&registry, None);
        assert_eq!(order, vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn test_group_filter_selects_members_only() {
        let registry = registry(&[
            ("a", 0, &[], &["demo"]),
            ("b", 0, &[], &[]),
            ("c", 0, &[], &["demo", "staging"]),
        ]);

        let order = resolve(&registry, Some("demo"));
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn test_out_of_group_dependency_is_skipped_not_required() {
        // b exists but is not in the group; a still resolves, and b never
        // appears in the output.
        let registry = registry(&[
            ("a", 0, &["b"], &["demo"]),
            ("b", 0, &[], &[]),
        ]);

        let order = resolve(&registry, Some("demo"));
        assert_eq!(order, vec!["a"]);
    }

    #[test]
    fn test_in_group_dependency_still_orders_filtered_run() {
        let registry = registry(&[
            ("seed", 0, &[], &["demo"]),
            ("grow", 100, &["seed"], &["demo"]),
        ]);

        let order = resolve(&registry, Some("demo"));
        assert_eq!(order, vec!["seed", "grow"]);
    }

    #[test]
    fn test_missing_dependency_fails_naming_both_sides() {
        let registry = registry(&[("a", 0, &["z"], &[])]);

        let err = OrderResolver::new()
            .resolve(&registry, None)
            .expect_err("unregistered dependency must fail");
        assert_eq!(
            err,
            ResolveError::UnknownDependency {
                fixture: "a".to_string(),
                dependency: "z".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_dependency_fails_even_under_group_filter() {
        let registry = registry(&[("a", 0, &["z"], &["demo"])]);

        let err = OrderResolver::new()
            .resolve(&registry, Some("demo"))
            .expect_err("unregistered dependency must fail regardless of filter");
        assert!(matches!(err, ResolveError::UnknownDependency { .. }));
    }

    #[test]
    fn test_cycle_fails_naming_its_members() {
        let registry = registry(&[
            ("a", 0, &["b"], &[]),
            ("b", 0, &["c"], &[]),
            ("c", 0, &["a"], &[]),
        ]);

        let err = OrderResolver::new()
            .resolve(&registry, None)
            .expect_err("cycle must fail");
        let ResolveError::CircularDependency { cycle } = err else {
            panic!("expected a circular dependency error");
        };
        let members: HashSet<String> = cycle.into_iter().collect();
        assert_eq!(
            members,
            ["a", "b", "c"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let registry = registry(&[("a", 0, &["a"], &[])]);

        let err = OrderResolver::new()
            .resolve(&registry, None)
            .expect_err("self dependency must fail");
        assert_eq!(
            err,
            ResolveError::CircularDependency {
                cycle: vec!["a".to_string()],
            }
        );
    }

    #[test]
    fn test_cycle_outside_candidate_set_is_not_traversed() {
        // The a <-> b cycle exists in the full registry, but b is filtered
        // out, so the filtered resolution never sees it.
        let registry = registry(&[
            ("a", 0, &["b"], &["demo"]),
            ("b", 0, &["a"], &[]),
        ]);

        let order = resolve(&registry, Some("demo"));
        assert_eq!(order, vec!["a"]);
    }

    #[test]
    fn test_cycle_error_does_not_hide_valid_prefix() {
        // Even with placeable fixtures present, a cycle aborts the whole
        // resolution rather than returning a partial order.
        let registry = registry(&[
            ("ok", 100, &[], &[]),
            ("a", 0, &["b"], &[]),
            ("b", 0, &["a"], &[]),
        ]);

        let err = OrderResolver::new()
            .resolve(&registry, None)
            .expect_err("cycle must abort resolution entirely");
        assert!(matches!(err, ResolveError::CircularDependency { .. }));
    }

    #[test]
    fn test_duplicate_dependency_declarations_collapse() {
        let registry = registry(&[
            ("a", 0, &["b", "b"], &[]),
            ("b", 0, &[], &[]),
        ]);

        let order = resolve(&registry, None);
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_diamond_prefers_priority_among_ready_fixtures() {
        let registry = registry(&[
            ("root", 0, &[], &[]),
            ("left", 10, &["root"], &[]),
            ("right", 20, &["root"], &[]),
            ("join", 0, &["left", "right"], &[]),
        ]);

        let order = resolve(&registry, None);
        assert_eq!(order, vec!["root", "right", "left", "join"]);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let registry = registry(&[
            ("a", 3, &[], &[]),
            ("b", 3, &["a"], &[]),
            ("c", 7, &[], &["demo"]),
            ("d", 1, &["a"], &["demo"]),
        ]);

        let first = resolve(&registry, None);
        let second = resolve(&registry, None);
        assert_eq!(first, second);

        let filtered_first = resolve(&registry, Some("demo"));
        let filtered_second = resolve(&registry, Some("demo"));
        assert_eq!(filtered_first, filtered_second);
    }

    #[test]
    fn test_unknown_group_resolves_empty() {
        let registry = registry(&[("a", 0, &[], &[])]);
        assert!(resolve(&registry, Some("nope")).is_empty());
    }

    #[test]
    fn test_empty_registry_resolves_empty() {
        let registry = FixtureRegistry::new();
        assert!(resolve(&registry, None).is_empty());
    }

    #[test]
    fn test_reregistration_affects_subsequent_resolution() {
        let mut registry = registry(&[
            ("a", 0, &[], &[]),
            ("b", 10, &[], &[]),
        ]);
        assert_eq!(resolve(&registry, None), vec!["b", "a"]);

        registry.register(
            "b",
            Arc::new(Noop),
            FixtureMeta {
                priority: 10,
                depends_on: vec!["a".to_string()],
                ..Default::default()
            },
        );
        assert_eq!(resolve(&registry, None), vec!["a", "b"]);
    }
}
