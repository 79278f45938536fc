//! Link-time fixture discovery.
//!
//! [`FixtureRegistry::register`] is the primary API. Crates that prefer the
//! declare-where-you-define style submit a [`FixtureReg`] instead, and the
//! binary collects every submission with
//! [`FixtureRegistry::from_inventory`]:
//!
//! ```rust,ignore
//! inventory::submit! {
//!     FixtureReg {
//!         ctor: || Registration {
//!             identity: "customers",
//!             fixture: Arc::new(CustomerFixture::default()),
//!             meta: FixtureMeta::with_priority(10),
//!         },
//!     }
//! }
//! ```

use std::sync::Arc;

use seedbed_core::{Fixture, FixtureMeta};

use crate::collection::FixtureRegistry;

/// A fixture produced by a discovery submission.
pub struct Registration {
    /// Unique identity for the registry.
    pub identity: &'static str,
    /// The fixture handle.
    pub fixture: Arc<dyn Fixture>,
    /// Ordering metadata.
    pub meta: FixtureMeta,
}

/// Inventory record holding a registration constructor.
///
/// The constructor runs when the registry is assembled, not at submission
/// site, so fixtures may allocate freely.
pub struct FixtureReg {
    /// Builds the registration when the registry is assembled.
    pub ctor: fn() -> Registration,
}

inventory::collect!(FixtureReg);

impl FixtureRegistry {
    /// Build a registry from every [`FixtureReg`] linked into the binary.
    pub fn from_inventory() -> Self {
        let mut registry = Self::new();
        for reg in inventory::iter::<FixtureReg> {
            let registration = (reg.ctor)();
            registry.register(registration.identity, registration.fixture, registration.meta);
        }
        registry
    }
}
