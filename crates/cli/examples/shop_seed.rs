//! End-to-end demo: a small shop-style fixture set loaded into an
//! in-memory stand-in for an external store.
//!
//! Run with:
//! ```text
//! cargo run --example shop_seed -- list
//! cargo run --example shop_seed -- load --group demo
//! ```

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use seedbed_cli::FixtureCli;
use seedbed_core::{Fixture, FixtureMeta};
use seedbed_registry::FixtureRegistry;
use tracing::Level;

/// Stand-in for an external database.
#[derive(Default)]
struct Store {
    rows: Mutex<Vec<String>>,
}

impl Store {
    fn upsert(&self, row: &str) {
        let mut rows = self.rows.lock().unwrap();
        if !rows.iter().any(|r| r == row) {
            rows.push(row.to_string());
        }
    }
}

/// Custom field sets other fixtures attach data to.
struct CustomFieldSets {
    store: Arc<Store>,
}

#[async_trait]
impl Fixture for CustomFieldSets {
    async fn load(&self) -> Result<()> {
        self.store.upsert("custom_field_set:customer_details");
        Ok(())
    }
}

/// Demo customers; needs the custom field sets in place first.
struct Customers {
    store: Arc<Store>,
}

#[async_trait]
impl Fixture for Customers {
    async fn load(&self) -> Result<()> {
        self.store.upsert("customer:jane@example.com");
        self.store.upsert("customer:john@example.com");
        Ok(())
    }
}

/// Storefront theme; independent of the data fixtures, loads early.
struct Theme {
    store: Arc<Store>,
}

#[async_trait]
impl Fixture for Theme {
    async fn load(&self) -> Result<()> {
        self.store.upsert("theme:storefront");
        Ok(())
    }
}

fn build_registry(store: Arc<Store>) -> FixtureRegistry {
    let mut registry = FixtureRegistry::new();
    registry.register(
        "custom-field-sets",
        Arc::new(CustomFieldSets {
            store: store.clone(),
        }),
        FixtureMeta::with_priority(10),
    );
    registry.register(
        "customers",
        Arc::new(Customers {
            store: store.clone(),
        }),
        FixtureMeta {
            priority: 0,
            depends_on: vec!["custom-field-sets".to_string()],
            groups: vec!["default".to_string(), "demo".to_string()],
        },
    );
    registry.register(
        "theme",
        Arc::new(Theme { store }),
        FixtureMeta::with_priority(20),
    );
    registry
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let store = Arc::new(Store::default());
    let registry = build_registry(store.clone());

    FixtureCli::new(registry).run().await?;

    for row in store.rows.lock().unwrap().iter() {
        println!("store row: {row}");
    }
    Ok(())
}
