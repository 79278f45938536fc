//! Fixture storage and lookup.

use std::collections::HashMap;
use std::sync::Arc;

use seedbed_core::{Fixture, FixtureMeta};

/// A registered fixture and its metadata.
pub(crate) struct FixtureEntry {
    pub(crate) identity: String,
    pub(crate) fixture: Arc<dyn Fixture>,
    pub(crate) meta: FixtureMeta,
}

/// Registry of fixtures keyed by identity.
///
/// Identities are interned to dense indices on first registration; the
/// resolver operates over those indices and translates back to identities
/// at the boundary. Registration order carries no ordering semantics.
///
/// Registration goes through `&mut self` and resolution through `&self`,
/// so the registry cannot change under a resolution request.
#[derive(Default)]
pub struct FixtureRegistry {
    entries: Vec<FixtureEntry>,
    by_identity: HashMap<String, usize>,
}

impl FixtureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the fixture registered under `identity`.
    ///
    /// No validation happens here: dependencies may reference identities
    /// that are not registered yet. The resolver validates the complete
    /// graph once resolution is requested.
    pub fn register(
        &mut self,
        identity: impl Into<String>,
        fixture: Arc<dyn Fixture>,
        meta: FixtureMeta,
    ) {
        let identity = identity.into();
        match self.by_identity.get(&identity) {
            Some(&index) => {
                let entry = &mut self.entries[index];
                entry.fixture = fixture;
                entry.meta = meta;
            }
            None => {
                let index = self.entries.len();
                self.by_identity.insert(identity.clone(), index);
                self.entries.push(FixtureEntry {
                    identity,
                    fixture,
                    meta,
                });
            }
        }
    }

    /// Look up the fixture handle registered under `identity`.
    pub fn get(&self, identity: &str) -> Option<Arc<dyn Fixture>> {
        self.index_of(identity)
            .map(|index| Arc::clone(&self.entries[index].fixture))
    }

    /// Look up the metadata registered under `identity`.
    pub fn lookup(&self, identity: &str) -> Option<&FixtureMeta> {
        self.index_of(identity).map(|index| &self.entries[index].meta)
    }

    /// Metadata for `identity`, defaulting for unknown identities.
    ///
    /// Display surfaces ask about fixtures they did not register; those get
    /// the default `{0, [], ["default"]}` rather than an error.
    pub fn metadata(&self, identity: &str) -> FixtureMeta {
        self.lookup(identity).cloned().unwrap_or_default()
    }

    /// Whether `identity` is registered.
    pub fn contains(&self, identity: &str) -> bool {
        self.by_identity.contains_key(identity)
    }

    /// Snapshot of every registered identity.
    pub fn identities(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.identity.clone()).collect()
    }

    /// Number of registered fixtures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn index_of(&self, identity: &str) -> Option<usize> {
        self.by_identity.get(identity).copied()
    }

    pub(crate) fn entry(&self, index: usize) -> &FixtureEntry {
        &self.entries[index]
    }

    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
