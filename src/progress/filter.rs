use serde::{Deserialize, Serialize};

use crate::core::types::ProblemRecord;
use crate::progress::accounting::ProgressMap;

/// Study-page filter over a problem's progress. Several active filters are
/// OR-ed together; no filter at all keeps every problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressFilter {
    Wrong,
    Correct,
    Incomplete,
    Complete,
}

impl ProgressFilter {
    pub fn matches(&self, problem: &ProblemRecord, progress: &ProgressMap) -> bool {
        let record = progress.get(&problem.id);
        match self {
            ProgressFilter::Wrong => record.is_some_and(|r| r.has_wrong()),
            ProgressFilter::Correct => record.is_some_and(|r| r.is_correct == Some(true)),
            ProgressFilter::Incomplete => !record.is_some_and(|r| r.is_completed),
            ProgressFilter::Complete => record.is_some_and(|r| r.is_completed),
        }
    }
}

/// Keep the problems matching at least one filter, preserving order.
pub fn apply_filters(
    problems: &[ProblemRecord],
    progress: &ProgressMap,
    filters: &[ProgressFilter],
) -> Vec<ProblemRecord> {
    if filters.is_empty() {
        return problems.to_vec();
    }
    problems
        .iter()
        .filter(|p| filters.iter().any(|f| f.matches(p, progress)))
        .cloned()
        .collect()
}

/// Per-file counters shown next to each filter button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub total: usize,
    pub attempted: usize,
    pub completed: usize,
    pub correct: usize,
    pub wrong: usize,
}

impl FileStats {
    pub fn collect(problems: &[ProblemRecord], progress: &ProgressMap) -> Self {
        let mut stats = FileStats {
            total: problems.len(),
            ..Default::default()
        };
        for problem in problems {
            let Some(record) = progress.get(&problem.id) else {
                continue;
            };
            if record.last_attempted_at.is_some() || record.is_correct.is_some() {
                stats.attempted += 1;
            }
            if record.is_completed {
                stats.completed += 1;
            }
            if record.is_correct == Some(true) {
                stats.correct += 1;
            }
            if record.has_wrong() {
                stats.wrong += 1;
            }
        }
        stats
    }

    pub fn incomplete(&self) -> usize {
        self.total - self.completed
    }
}
