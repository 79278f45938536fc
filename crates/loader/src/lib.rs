//! Fixture loading - drives fixtures through their load step in resolved
//! order, stopping at the first failure.

#![warn(missing_docs)]

pub mod engine;
pub mod report;

pub use engine::{FixtureLoader, LoadError, LoaderConfig};
pub use report::{LoadReport, LoadedFixture};
