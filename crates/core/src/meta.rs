//! Ordering metadata attached to every registered fixture.

use serde::{Deserialize, Serialize};

/// Group every fixture belongs to unless it declares otherwise.
pub const DEFAULT_GROUP: &str = "default";

/// Immutable ordering metadata for a registered fixture.
///
/// Metadata is fixed once registered; re-registering the same identity
/// replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureMeta {
    /// Preference for earlier placement among fixtures with no dependency
    /// relationship to each other. Higher runs first.
    pub priority: i32,

    /// Identities that must load before this fixture.
    pub depends_on: Vec<String>,

    /// Labels used to select fixture subsets. Never an ordering signal.
    pub groups: Vec<String>,
}

impl FixtureMeta {
    /// Metadata with the given priority, no dependencies, default group.
    pub fn with_priority(priority: i32) -> Self {
        Self {
            priority,
            ..Default::default()
        }
    }

    /// Whether this fixture belongs to `group` (exact, case-sensitive).
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

impl Default for FixtureMeta {
    fn default() -> Self {
        Self {
            priority: 0,
            depends_on: Vec::new(),
            groups: vec![DEFAULT_GROUP.to_string()],
        }
    }
}
