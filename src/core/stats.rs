use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Library-wide counters for a dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    // Files
    pub active_files: usize,
    pub trashed_files: usize,

    // Records
    pub problems: usize,
    pub progress_records: usize,

    // Study state
    pub completed_problems: usize,
    pub wrong_problems: usize,
    pub last_attempted_at: Option<DateTime<Utc>>,
}

impl LibraryStats {
    /// Share of stored problems marked completed, 0..=100.
    pub fn completion_percent(&self) -> u32 {
        if self.problems == 0 {
            return 0;
        }
        (self.completed_problems as f64 / self.problems as f64 * 100.0).round() as u32
    }
}
