#![allow(dead_code)]

use std::collections::HashMap;

use learningmate::core::types::{FileId, FileRecord, ProblemId, ProblemRecord, ProgressRecord};
use learningmate::storage::Stores;
use learningmate::storage::store::RecordStore;

/// Snapshot of every store, for assertions.
pub struct Snapshot {
    pub files: HashMap<FileId, FileRecord>,
    pub problems: HashMap<ProblemId, ProblemRecord>,
    pub progress: HashMap<String, ProgressRecord>,
}

pub async fn snapshot(stores: &Stores) -> Snapshot {
    let files = stores.files.values_where(&|_| true).await.unwrap();
    let problems = stores.problems.values_where(&|_| true).await.unwrap();

    let mut progress = HashMap::new();
    let mut collect = |key: &str, record: &ProgressRecord| {
        progress.insert(key.to_string(), record.clone());
    };
    stores.progress.for_each(&mut collect).await.unwrap();

    Snapshot {
        files: files.into_iter().map(|f| (f.id.clone(), f)).collect(),
        problems: problems.into_iter().map(|p| (p.id.clone(), p)).collect(),
        progress,
    }
}

/// Referential rules the catalog is responsible for:
/// every problem points at a stored file, every progress record is stored
/// under its problem id, points at a stored problem and repeats that
/// problem's file id.
pub async fn assert_integrity(stores: &Stores) {
    let snap = snapshot(stores).await;

    for problem in snap.problems.values() {
        assert!(
            snap.files.contains_key(&problem.file_set_id),
            "problem {} references missing file {}",
            problem.id,
            problem.file_set_id
        );
    }

    for (key, record) in &snap.progress {
        assert_eq!(key, record.problem_id.as_str(), "progress stored under a foreign key");
        let problem = snap
            .problems
            .get(&record.problem_id)
            .unwrap_or_else(|| panic!("progress {} references missing problem", key));
        assert_eq!(record.file_set_id, problem.file_set_id, "progress {} has a stale file id", key);
    }
}

pub fn problems_for(file: &FileId, count: u32) -> Vec<ProblemRecord> {
    (1..=count)
        .map(|i| {
            ProblemRecord::new(file.clone(), i, format!("{} question {}", file, i), format!("{} answer {}", file, i))
        })
        .collect()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
