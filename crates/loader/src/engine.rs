//! The load engine.

use seedbed_core::Fixture;
use seedbed_registry::{FixtureRegistry, OrderResolver, ResolveError};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::report::{LoadReport, LoadedFixture};

/// Error type for a load run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The registry's declarations are structurally invalid; nothing ran.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A fixture's load step failed. Everything after it was left un-run.
    #[error("fixture \"{fixture}\" failed to load: {source}")]
    FixtureFailed {
        /// Identity of the failing fixture.
        fixture: String,
        /// Underlying cause reported by the fixture.
        #[source]
        source: anyhow::Error,
    },
}

/// Configuration for a load run.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Restrict the run to fixtures in this group.
    pub group: Option<String>,
}

/// Runs fixtures in resolved order.
///
/// The order is computed once, up front, and treated as valid for the whole
/// run: the loader never retries a fixture or reorders around a failure.
pub struct FixtureLoader<'a> {
    registry: &'a FixtureRegistry,
    resolver: OrderResolver,
    config: LoaderConfig,
}

impl<'a> FixtureLoader<'a> {
    /// Create a loader over a fully registered registry.
    pub fn new(registry: &'a FixtureRegistry) -> Self {
        Self {
            registry,
            resolver: OrderResolver::default(),
            config: LoaderConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Restrict the run to one group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.config.group = Some(group.into());
        self
    }

    /// Resolve the execution order without running anything.
    pub fn plan(&self) -> Result<Vec<String>, ResolveError> {
        self.resolver
            .resolve(self.registry, self.config.group.as_deref())
    }

    /// Run every candidate fixture exactly once, in resolved order.
    ///
    /// A structural error aborts before any fixture executes. The first
    /// load failure aborts the rest of the run; fixtures after the failing
    /// one may depend on its effects and must not run.
    pub async fn run(&self) -> Result<LoadReport, LoadError> {
        let order = self.plan()?;
        let started_at = chrono::Utc::now();

        info!(
            fixtures = order.len(),
            group = self.config.group.as_deref(),
            "starting fixture load"
        );

        let mut loaded = Vec::with_capacity(order.len());
        for identity in order {
            // plan() only emits registered identities.
            let Some(fixture) = self.registry.get(&identity) else {
                continue;
            };

            debug!(fixture = %identity, "loading fixture");
            let step_start = std::time::Instant::now();

            if let Err(source) = fixture.load().await {
                error!(fixture = %identity, cause = %source, "fixture load failed, aborting run");
                return Err(LoadError::FixtureFailed {
                    fixture: identity,
                    source,
                });
            }

            loaded.push(LoadedFixture {
                identity,
                duration: step_start.elapsed(),
            });
        }

        let completed_at = chrono::Utc::now();
        info!(loaded = loaded.len(), "fixture load complete");

        Ok(LoadReport {
            group: self.config.group.clone(),
            loaded,
            started_at,
            completed_at,
        })
    }
}
