use std::collections::{HashMap, HashSet};

use crate::core::error::Result;
use crate::core::types::{ProblemId, ProblemRecord, ProgressRecord};
use crate::storage::store::RecordStore;

/// Progress keys grouped by the problem they belong to, for the given problems.
///
/// One scan of the progress store; the record's `problem_id` decides
/// ownership, not the key it happens to be stored under.
pub(crate) async fn progress_keys_by_problem(
    progress: &dyn RecordStore<ProgressRecord>,
    problems: &HashSet<ProblemId>,
) -> Result<HashMap<ProblemId, Vec<String>>> {
    let mut owned: HashMap<ProblemId, Vec<String>> = HashMap::new();
    if problems.is_empty() {
        return Ok(owned);
    }

    let mut visit = |key: &str, record: &ProgressRecord| {
        if problems.contains(&record.problem_id) {
            owned.entry(record.problem_id.clone()).or_default().push(key.to_string());
        }
    };
    progress.for_each(&mut visit).await?;
    Ok(owned)
}

/// Remove problems one by one, each preceded by its progress records.
///
/// Returns the number of progress records removed. A problem goes only
/// after its progress, so a run stopped halfway never leaves progress whose
/// problem is already gone; running it again finishes the job.
pub(crate) async fn remove_problems_with_progress(
    problems: &dyn RecordStore<ProblemRecord>,
    progress: &dyn RecordStore<ProgressRecord>,
    doomed: &[ProblemId],
) -> Result<usize> {
    let ids: HashSet<ProblemId> = doomed.iter().cloned().collect();
    let mut owned = progress_keys_by_problem(progress, &ids).await?;
    log::debug!(
        "Removing {} records from '{}' and their entries in '{}'",
        doomed.len(),
        problems.name(),
        progress.name()
    );

    let mut progress_removed = 0;
    for problem_id in doomed {
        for key in owned.remove(problem_id).unwrap_or_default() {
            progress.remove(&key).await?;
            progress_removed += 1;
        }
        problems.remove(problem_id.as_str()).await?;
    }
    Ok(progress_removed)
}
