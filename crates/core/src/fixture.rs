//! The fixture contract.

use async_trait::async_trait;

/// A loadable unit of seed data.
///
/// Implementations perform their own idempotent write against some external
/// store. The engine never inspects what a fixture does; it only decides
/// when the fixture runs relative to the others.
#[async_trait]
pub trait Fixture: Send + Sync {
    /// Write this fixture's data.
    ///
    /// Called exactly once per run, after every dependency selected by the
    /// current run has been loaded.
    async fn load(&self) -> Result<(), anyhow::Error>;
}
