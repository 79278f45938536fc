//! Structural resolution failures.

use thiserror::Error;

/// Errors the resolver can report.
///
/// Both variants are fatal configuration errors: resolution aborts and no
/// partial order is ever returned. They are detected at resolution time,
/// not at registration time, because registration order is unconstrained
/// and forward references must be tolerated until the graph is complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A fixture names a dependency that is absent from the full registry.
    ///
    /// Raised regardless of any group filter: a dependency merely outside
    /// the requested group is skipped, not an error.
    #[error("fixture \"{fixture}\" depends on \"{dependency}\", but it is not registered")]
    UnknownDependency {
        /// The fixture declaring the dependency.
        fixture: String,
        /// The identity that is not registered.
        dependency: String,
    },

    /// The candidate dependency graph contains a cycle.
    #[error("circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency {
        /// Identities on the cycle, in dependency order.
        cycle: Vec<String>,
    },
}
