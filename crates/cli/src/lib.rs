//! Embeddable fixture command line.
//!
//! Unlike a service container there is no ambient place to discover an
//! application's fixtures from, so the host builds its
//! [`FixtureRegistry`] and hands it over:
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     tracing_subscriber::fmt().init();
//!     let registry = build_registry();
//!     FixtureCli::new(registry).run().await
//! }
//! ```

#![warn(missing_docs)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use seedbed_loader::{FixtureLoader, LoaderConfig};
use seedbed_registry::FixtureRegistry;

#[derive(Parser)]
#[command(name = "seedbed")]
#[command(about = "Deterministic fixture loading", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load fixtures into the backing store
    Load {
        /// Load only fixtures from a specific group
        #[arg(long, short = 'g')]
        group: Option<String>,
    },
    /// List fixtures and their execution order
    List {
        /// Filter fixtures by group
        #[arg(long, short = 'g')]
        group: Option<String>,
    },
}

/// Command-line front end over a registry.
pub struct FixtureCli {
    registry: FixtureRegistry,
}

impl FixtureCli {
    /// Wrap a fully registered registry.
    pub fn new(registry: FixtureRegistry) -> Self {
        Self { registry }
    }

    /// Parse `std::env::args` and run the selected command.
    pub async fn run(&self) -> Result<()> {
        self.dispatch(Cli::parse()).await
    }

    /// Run with explicit arguments. The first argument is the binary name.
    pub async fn run_from<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        self.dispatch(Cli::try_parse_from(args)?).await
    }

    async fn dispatch(&self, cli: Cli) -> Result<()> {
        match cli.command {
            Commands::Load { group } => self.load(group).await,
            Commands::List { group } => self.list(group),
        }
    }

    async fn load(&self, group: Option<String>) -> Result<()> {
        let loader = FixtureLoader::new(&self.registry).with_config(LoaderConfig { group });
        let report = loader.run().await?;

        if report.is_empty() {
            println!("No fixtures found to load.");
            return Ok(());
        }

        for fixture in &report.loaded {
            println!("Loaded {} ({:.1?})", fixture.identity, fixture.duration);
        }
        println!("Successfully loaded {} fixtures.", report.len());
        Ok(())
    }

    fn list(&self, group: Option<String>) -> Result<()> {
        let loader = FixtureLoader::new(&self.registry).with_config(LoaderConfig { group });
        let order = loader.plan()?;

        if order.is_empty() {
            println!("No fixtures found.");
            return Ok(());
        }

        println!(
            "{:<5}  {:<24}  {:>8}  {:<16}  {}",
            "Order", "Fixture", "Priority", "Groups", "Depends On"
        );
        for (index, identity) in order.iter().enumerate() {
            let meta = self.registry.metadata(identity);
            let depends_on = if meta.depends_on.is_empty() {
                "-".to_string()
            } else {
                meta.depends_on.join(", ")
            };
            println!(
                "{:<5}  {:<24}  {:>8}  {:<16}  {}",
                index + 1,
                identity,
                meta.priority,
                meta.groups.join(", "),
                depends_on
            );
        }
        Ok(())
    }
}
