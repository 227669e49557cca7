use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::types::{FileId, ProblemId, ProgressRecord};
use crate::storage::Stores;
use crate::storage::store::RecordStore;

/// Progress records keyed by the problem they describe.
pub type ProgressMap = HashMap<ProblemId, ProgressRecord>;

/// Result of one attempt.
///
/// `is_completed` left as `None` means completed, which is what the plain
/// boolean form (`Outcome::from(false)`) produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub is_correct: Option<bool>,
    pub is_completed: Option<bool>,
}

impl Outcome {
    pub fn new(is_correct: Option<bool>, is_completed: bool) -> Self {
        Outcome {
            is_correct,
            is_completed: Some(is_completed),
        }
    }
}

impl From<bool> for Outcome {
    fn from(is_correct: bool) -> Self {
        Outcome {
            is_correct: Some(is_correct),
            is_completed: None,
        }
    }
}

/// Progress carried in from an imported sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSeed {
    pub file_set_id: FileId,
    pub problem_id: ProblemId,
    pub is_completed: bool,
    pub wrong_count: u32,
}

/// Wrong counter after an attempt: becomes 1 on the first miss and then
/// never moves again until the record is reset.
pub fn next_wrong_count(existing: u32, is_correct: Option<bool>) -> u32 {
    if is_correct == Some(false) && existing == 0 {
        1
    } else {
        existing
    }
}

/// Reads and writes the progress store. Records are created lazily on the
/// first attempt or completion toggle and keyed by problem id.
#[derive(Clone)]
pub struct ProgressTracker {
    progress: Arc<dyn RecordStore<ProgressRecord>>,
}

impl ProgressTracker {
    pub fn new(stores: &Stores) -> Self {
        ProgressTracker {
            progress: stores.progress.clone(),
        }
    }

    pub async fn get(&self, problem_id: &ProblemId) -> Result<Option<ProgressRecord>> {
        self.progress.get(problem_id.as_str()).await
    }

    pub async fn save_result(
        &self,
        file_id: &FileId,
        problem_id: &ProblemId,
        outcome: impl Into<Outcome>,
    ) -> Result<ProgressRecord> {
        let outcome = outcome.into();
        let is_completed = outcome.is_completed.unwrap_or(true);
        let existing = self.progress.get(problem_id.as_str()).await?;
        let now = Utc::now();

        let (id, wrong_count, completed_at) = match existing {
            Some(prev) => {
                let completed_at = match (is_completed, prev.completed_at) {
                    (true, Some(at)) if prev.is_completed => Some(at),
                    (true, _) => Some(now),
                    (false, _) => None,
                };
                (prev.id, next_wrong_count(prev.wrong_count, outcome.is_correct), completed_at)
            }
            None => (
                Uuid::new_v4().to_string(),
                next_wrong_count(0, outcome.is_correct),
                is_completed.then_some(now),
            ),
        };

        let record = ProgressRecord {
            id,
            problem_id: problem_id.clone(),
            file_set_id: file_id.clone(),
            is_completed,
            is_correct: outcome.is_correct,
            wrong_count,
            last_attempted_at: Some(now),
            completed_at,
        };
        self.progress.set(problem_id.as_str(), record.clone()).await?;
        Ok(record)
    }

    /// Flip the completion flag without touching correctness.
    pub async fn toggle_complete(
        &self,
        file_id: &FileId,
        problem_id: &ProblemId,
        is_completed: bool,
    ) -> Result<ProgressRecord> {
        let mut record = self
            .progress
            .get(problem_id.as_str())
            .await?
            .unwrap_or_else(|| ProgressRecord::fresh(file_id.clone(), problem_id.clone()));

        record.file_set_id = file_id.clone();
        record.is_completed = is_completed;
        record.completed_at = is_completed.then(Utc::now);

        self.progress.set(problem_id.as_str(), record.clone()).await?;
        Ok(record)
    }

    /// Remove every progress record of a file. Returns how many went.
    pub async fn reset_file_progress(&self, file_id: &FileId) -> Result<usize> {
        let keys = self.progress.keys_where(&|r| &r.file_set_id == file_id).await?;
        for key in &keys {
            self.progress.remove(key).await?;
        }
        log::debug!("Reset {} progress records of file {}", keys.len(), file_id);
        Ok(keys.len())
    }

    pub async fn reset_problem_progress(&self, problem_id: &ProblemId) -> Result<()> {
        self.progress.remove(problem_id.as_str()).await
    }

    pub async fn load_all(&self) -> Result<ProgressMap> {
        self.load_where(&|_| true).await
    }

    pub async fn load_for_file(&self, file_id: &FileId) -> Result<ProgressMap> {
        self.load_where(&|r| &r.file_set_id == file_id).await
    }

    async fn load_where(&self, pred: &(dyn for<'v> Fn(&'v ProgressRecord) -> bool + Sync)) -> Result<ProgressMap> {
        let records = self.progress.values_where(pred).await?;
        Ok(records.into_iter().map(|r| (r.problem_id.clone(), r)).collect())
    }

    /// Write imported progress, replacing whatever is stored for those
    /// problems. Correctness is unknown until the next real attempt.
    pub async fn bulk_restore(&self, seeds: Vec<ProgressSeed>) -> Result<usize> {
        let count = seeds.len();
        for seed in seeds {
            let stamp = seed.is_completed.then(Utc::now);
            let record = ProgressRecord {
                id: Uuid::new_v4().to_string(),
                problem_id: seed.problem_id,
                file_set_id: seed.file_set_id,
                is_completed: seed.is_completed,
                is_correct: None,
                wrong_count: seed.wrong_count,
                last_attempted_at: stamp,
                completed_at: stamp,
            };
            let key = record.problem_id.to_string();
            self.progress.set(&key, record).await?;
        }
        Ok(count)
    }
}
