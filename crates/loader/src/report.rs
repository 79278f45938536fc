//! Records of a completed load run.

use serde::{Deserialize, Serialize};

/// Timestamp type used in reports.
pub type Time = chrono::DateTime<chrono::Utc>;

/// One successfully loaded fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedFixture {
    /// Fixture identity.
    pub identity: String,

    /// Wall-clock time spent in the fixture's load step.
    pub duration: std::time::Duration,
}

/// Summary of a completed load run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// Group filter the run was resolved with.
    pub group: Option<String>,

    /// Fixtures in the order they were loaded.
    pub loaded: Vec<LoadedFixture>,

    /// When the run started.
    pub started_at: Time,

    /// When the run finished.
    pub completed_at: Time,
}

impl LoadReport {
    /// Number of fixtures loaded.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// True when the run loaded nothing.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}
