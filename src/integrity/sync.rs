use std::collections::HashSet;

use crate::core::error::Result;
use crate::core::types::{FileId, ProblemId, ProblemRecord};
use crate::integrity::catalog::FileCatalog;
use crate::integrity::cascade::remove_problems_with_progress;

/// Outcome of reconciling a file's stored problems with an edited list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub removed: Vec<ProblemId>,
    pub upserted: usize,
    pub progress_removed: usize,
}

impl FileCatalog {
    /// Make the stored problems of `file_id` equal to `problems`.
    ///
    /// Stored problems whose id is missing from the new list are removed
    /// together with their progress; every incoming problem is then upserted.
    /// Problems that survive keep their progress.
    pub async fn save_problems(&self, file_id: &FileId, problems: Vec<ProblemRecord>) -> Result<SyncReport> {
        let existing: Vec<ProblemId> = self
            .problems
            .values_where(&|p| &p.file_set_id == file_id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        let incoming: HashSet<&ProblemId> = problems.iter().map(|p| &p.id).collect();
        let removed: Vec<ProblemId> = existing.into_iter().filter(|id| !incoming.contains(id)).collect();

        let progress_removed =
            remove_problems_with_progress(self.problems.as_ref(), self.progress.as_ref(), &removed).await?;

        let upserted = problems.len();
        for mut problem in problems {
            problem.file_set_id = file_id.clone();
            let key = problem.id.to_string();
            self.problems.set(&key, problem).await?;
        }

        if !removed.is_empty() {
            log::debug!(
                "Synced file {}: removed {} problems ({} progress records), upserted {}",
                file_id,
                removed.len(),
                progress_removed,
                upserted
            );
        }

        Ok(SyncReport {
            removed,
            upserted,
            progress_removed,
        })
    }
}
