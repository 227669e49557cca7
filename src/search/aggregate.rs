use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::{FileId, ProblemId, ProblemRecord, ProgressRecord};
use crate::storage::Stores;
use crate::storage::store::RecordStore;

/// Virtual problem sets assembled from several files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    /// Problems whose last attempt was wrong.
    WrongReview,
    AllProblems,
}

impl AggregateKind {
    pub fn id(&self) -> &'static str {
        match self {
            AggregateKind::WrongReview => "aggregated-review",
            AggregateKind::AllProblems => "aggregated-all",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "aggregated-review" => Some(AggregateKind::WrongReview),
            "aggregated-all" => Some(AggregateKind::AllProblems),
            _ => None,
        }
    }

    /// Display title; the wording depends on whether a subset was chosen.
    pub fn title(&self, restricted: bool) -> &'static str {
        match (self, restricted) {
            (AggregateKind::WrongReview, false) => "전체 오답 노트",
            (AggregateKind::WrongReview, true) => "선택된 파일 오답 노트",
            (AggregateKind::AllProblems, false) => "전체 문제",
            (AggregateKind::AllProblems, true) => "선택된 파일 전체 문제",
        }
    }
}

/// Problems of one file or of an aggregate, ready to feed a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSet {
    pub id: FileId,
    pub title: String,
    pub problems: Vec<ProblemRecord>,
    pub is_review: bool,
}

/// Read-only queries spanning every file.
#[derive(Clone)]
pub struct Aggregator {
    pub(crate) problems: Arc<dyn RecordStore<ProblemRecord>>,
    pub(crate) progress: Arc<dyn RecordStore<ProgressRecord>>,
}

fn in_subset(file_ids: &[FileId], file_id: &FileId) -> bool {
    file_ids.is_empty() || file_ids.contains(file_id)
}

impl Aggregator {
    pub fn new(stores: &Stores) -> Self {
        Aggregator {
            problems: stores.problems.clone(),
            progress: stores.progress.clone(),
        }
    }

    /// Problems whose last recorded attempt was wrong, across `file_ids`
    /// (every file when empty).
    ///
    /// Two passes: progress yields the ids, then one problem scan picks them up.
    pub async fn wrong_problems(&self, file_ids: &[FileId]) -> Result<Vec<ProblemRecord>> {
        let mut wrong: HashSet<ProblemId> = HashSet::new();
        let mut collect = |_: &str, record: &ProgressRecord| {
            if record.is_correct == Some(false) && in_subset(file_ids, &record.file_set_id) {
                wrong.insert(record.problem_id.clone());
            }
        };
        self.progress.for_each(&mut collect).await?;

        if wrong.is_empty() {
            return Ok(Vec::new());
        }
        self.problems.values_where(&|p| wrong.contains(&p.id)).await
    }

    pub async fn all_problems(&self, file_ids: &[FileId]) -> Result<Vec<ProblemRecord>> {
        self.problems.values_where(&|p| in_subset(file_ids, &p.file_set_id)).await
    }

    /// Build the virtual set for `kind`, or `None` when it would be empty.
    pub async fn aggregated_set(&self, kind: AggregateKind, file_ids: &[FileId]) -> Result<Option<ProblemSet>> {
        let problems = match kind {
            AggregateKind::WrongReview => self.wrong_problems(file_ids).await?,
            AggregateKind::AllProblems => self.all_problems(file_ids).await?,
        };
        if problems.is_empty() {
            return Ok(None);
        }

        Ok(Some(ProblemSet {
            id: FileId::from(kind.id()),
            title: kind.title(!file_ids.is_empty()).to_string(),
            problems,
            is_review: kind == AggregateKind::WrongReview,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (Stores, Aggregator) {
        let stores = Stores::in_memory();
        for (file, id) in [("f1", "a"), ("f1", "b"), ("f2", "c")] {
            let problem = ProblemRecord::new(FileId::from(file), 1, "q", "a").with_id(id);
            stores.problems.set(id, problem).await.unwrap();
        }
        let aggregator = Aggregator::new(&stores);
        (stores, aggregator)
    }

    async fn mark(stores: &Stores, file: &str, id: &str, is_correct: bool) {
        let mut record = ProgressRecord::fresh(FileId::from(file), ProblemId::from(id));
        record.is_correct = Some(is_correct);
        stores.progress.set(id, record).await.unwrap();
    }

    #[tokio::test]
    async fn wrong_problems_respect_subset() {
        let (stores, aggregator) = seeded().await;
        mark(&stores, "f1", "a", false).await;
        mark(&stores, "f1", "b", true).await;
        mark(&stores, "f2", "c", false).await;

        assert_eq!(aggregator.wrong_problems(&[]).await.unwrap().len(), 2);

        let only_f2 = aggregator.wrong_problems(&[FileId::from("f2")]).await.unwrap();
        assert_eq!(only_f2.len(), 1);
        assert_eq!(only_f2[0].id.as_str(), "c");
    }

    #[test]
    fn kind_round_trips_through_reserved_id() {
        for kind in [AggregateKind::WrongReview, AggregateKind::AllProblems] {
            assert_eq!(AggregateKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(AggregateKind::from_id("f1"), None);
    }

    #[tokio::test]
    async fn empty_aggregate_is_none() {
        let (_stores, aggregator) = seeded().await;

        assert!(aggregator.aggregated_set(AggregateKind::WrongReview, &[]).await.unwrap().is_none());

        let all = aggregator
            .aggregated_set(AggregateKind::AllProblems, &[FileId::from("f1")])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(all.id.as_str(), "aggregated-all");
        assert_eq!(all.problems.len(), 2);
        assert!(!all.is_review);
        assert_eq!(all.title, "선택된 파일 전체 문제");
    }
}
