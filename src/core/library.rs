use chrono::Utc;
use serde::Serialize;

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::settings::SettingsRepo;
use crate::core::stats::LibraryStats;
use crate::core::types::{FileId, FileRecord, ProblemId, ProblemRecord};
use crate::integrity::FileCatalog;
use crate::progress::{ProgressSeed, ProgressTracker};
use crate::search::{AggregateKind, Aggregator, ProblemSet};
use crate::storage::Stores;

pub const AUTHORED_SUFFIX: &str = ".custom";
pub const AUTHORED_FILE_TYPE: &str = "custom";

/// One row handed over by a sheet decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedProblem {
    pub description: String,
    pub answer: String,
    pub hint: Option<String>,
    pub explanation: Option<String>,
    pub choices: Vec<String>,
    // Carried progress columns, if the sheet had them
    pub is_completed: bool,
    pub wrong_count: u32,
}

/// One problem as edited in the problem-set editor. Rows without an id are new.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemDraft {
    pub id: Option<ProblemId>,
    pub description: String,
    pub answer: String,
    pub hint: Option<String>,
    pub explanation: Option<String>,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub file: FileRecord,
    pub imported: usize,
    pub skipped: usize,
    pub progress_restored: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedProblem<'a> {
    sequence_number: u32,
    description: &'a str,
    answer: &'a str,
    hint: &'a Option<String>,
    explanation: &'a Option<String>,
    choices: &'a [String],
}

#[derive(Serialize)]
struct ExportBundle<'a> {
    metadata: &'a FileRecord,
    problems: Vec<ExportedProblem<'a>>,
}

fn blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !blank(t))
}

/// Entry point tying the stores to every layer built on them.
pub struct Library {
    stores: Stores,
    catalog: FileCatalog,
    progress: ProgressTracker,
    aggregator: Aggregator,
    settings: SettingsRepo,
}

impl Library {
    pub fn new(stores: Stores) -> Self {
        Library {
            catalog: FileCatalog::new(&stores),
            progress: ProgressTracker::new(&stores),
            aggregator: Aggregator::new(&stores),
            settings: SettingsRepo::new(stores.settings.clone()),
            stores,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Stores::in_memory())
    }

    /// Open (or create) the durable stores under `config.storage_path`.
    pub fn open(config: Config) -> Result<Self> {
        let stores = Stores::open(&config)?;
        log::info!("Opened library at {:?}", config.storage_path);
        Ok(Self::new(stores))
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn catalog(&self) -> &FileCatalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn settings(&self) -> &SettingsRepo {
        &self.settings
    }

    /// Store decoded sheet rows as a new file.
    ///
    /// Rows lacking a description or an answer are dropped. Progress columns
    /// are restored for rows that were completed or had been missed.
    pub async fn import_problems(
        &self,
        filename: &str,
        file_type: &str,
        rows: Vec<ImportedProblem>,
    ) -> Result<ImportReport> {
        let total_rows = rows.len();
        let rows: Vec<ImportedProblem> = rows
            .into_iter()
            .filter(|r| !blank(&r.description) && !blank(&r.answer))
            .collect();
        if rows.is_empty() {
            return Err(Error::invalid_input(format!("{} contains no usable problems", filename)));
        }

        let file = FileRecord::new(filename, file_type, rows.len());
        self.catalog.save_file(file.clone()).await?;

        let mut problems = Vec::with_capacity(rows.len());
        let mut seeds = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            let mut problem = ProblemRecord::new(file.id.clone(), index as u32 + 1, row.description, row.answer)
                .with_choices(row.choices.into_iter().filter(|c| !blank(c)));
            problem.hint = non_blank(row.hint);
            problem.explanation = non_blank(row.explanation);

            if row.is_completed || row.wrong_count > 0 {
                seeds.push(ProgressSeed {
                    file_set_id: file.id.clone(),
                    problem_id: problem.id.clone(),
                    is_completed: row.is_completed,
                    wrong_count: row.wrong_count,
                });
            }
            problems.push(problem);
        }

        let sync = self.catalog.save_problems(&file.id, problems).await?;
        let progress_restored = if seeds.is_empty() {
            0
        } else {
            self.progress.bulk_restore(seeds).await?
        };

        log::info!(
            "Imported {} ({} problems, {} rows skipped, {} progress restored)",
            filename,
            sync.upserted,
            total_rows - sync.upserted,
            progress_restored
        );

        Ok(ImportReport {
            file,
            imported: sync.upserted,
            skipped: total_rows - sync.upserted,
            progress_restored,
        })
    }

    /// Save the editor's problem list, creating the file when `existing` is
    /// `None`. Rows removed in the editor lose their progress; kept rows
    /// keep it.
    pub async fn save_authored(
        &self,
        existing: Option<&FileId>,
        filename: &str,
        drafts: Vec<ProblemDraft>,
    ) -> Result<FileRecord> {
        if blank(filename) {
            return Err(Error::invalid_input("file name is empty"));
        }
        if let Some(pos) = drafts.iter().position(|d| blank(&d.description) || blank(&d.answer)) {
            return Err(Error::invalid_input(format!(
                "problem {} needs both a description and an answer",
                pos + 1
            )));
        }

        let previous = match existing {
            Some(id) => self.catalog.get_file(id).await?,
            None => None,
        };
        let now = Utc::now();
        let original_filename = if filename.ends_with(AUTHORED_SUFFIX) {
            filename.to_string()
        } else {
            format!("{}{}", filename, AUTHORED_SUFFIX)
        };

        let file = FileRecord {
            id: existing.cloned().unwrap_or_else(FileId::generate),
            original_filename,
            file_type: AUTHORED_FILE_TYPE.to_string(),
            total_problems: drafts.len(),
            created_at: previous.as_ref().map(|f| f.created_at).unwrap_or(now),
            updated_at: now,
            deleted_at: None,
        };
        self.catalog.save_file(file.clone()).await?;

        let problems = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| ProblemRecord {
                id: draft.id.unwrap_or_else(ProblemId::generate),
                file_set_id: file.id.clone(),
                sequence_number: index as u32 + 1,
                description: draft.description,
                answer: draft.answer,
                hint: non_blank(draft.hint),
                explanation: non_blank(draft.explanation),
                choices: draft.choices.into_iter().filter(|c| !blank(c)).collect(),
            })
            .collect();
        self.catalog.save_problems(&file.id, problems).await?;

        Ok(file)
    }

    /// Pretty JSON holding the file metadata and its problems, without the
    /// internal ids. `None` for an unknown file.
    pub async fn export_json(&self, file_id: &FileId) -> Result<Option<String>> {
        let Some(file) = self.catalog.get_file(file_id).await? else {
            return Ok(None);
        };
        let problems = self.catalog.problems_for_file(file_id).await?;

        let bundle = ExportBundle {
            metadata: &file,
            problems: problems
                .iter()
                .map(|p| ExportedProblem {
                    sequence_number: p.sequence_number,
                    description: &p.description,
                    answer: &p.answer,
                    hint: &p.hint,
                    explanation: &p.explanation,
                    choices: &p.choices,
                })
                .collect(),
        };
        Ok(Some(serde_json::to_string_pretty(&bundle)?))
    }

    /// Problems of one stored file as a study set.
    pub async fn problem_set(&self, file_id: &FileId) -> Result<Option<ProblemSet>> {
        let Some(file) = self.catalog.get_file(file_id).await? else {
            return Ok(None);
        };
        let problems = self.catalog.problems_for_file(file_id).await?;
        Ok(Some(ProblemSet {
            id: file.id,
            title: file.original_filename,
            problems,
            is_review: false,
        }))
    }

    pub async fn aggregated_set(&self, kind: AggregateKind, file_ids: &[FileId]) -> Result<Option<ProblemSet>> {
        self.aggregator.aggregated_set(kind, file_ids).await
    }

    pub async fn stats(&self) -> Result<LibraryStats> {
        let mut stats = LibraryStats::default();

        let mut count_files = |_: &str, file: &FileRecord| {
            if file.is_trashed() {
                stats.trashed_files += 1;
            } else {
                stats.active_files += 1;
            }
        };
        self.stores.files.for_each(&mut count_files).await?;

        stats.problems = self.stores.problems.len().await?;

        let progress = self.progress.load_all().await?;
        stats.progress_records = progress.len();
        for record in progress.values() {
            if record.is_completed {
                stats.completed_problems += 1;
            }
            if record.has_wrong() {
                stats.wrong_problems += 1;
            }
            stats.last_attempted_at = stats.last_attempted_at.max(record.last_attempted_at);
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(description: &str, answer: &str) -> ImportedProblem {
        ImportedProblem {
            description: description.to_string(),
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn import_skips_incomplete_rows_and_restores_progress() {
        let library = Library::in_memory();
        let mut missed = row("q2", "a2");
        missed.wrong_count = 2;

        let report = library
            .import_problems("deck.csv", "csv", vec![row("q1", "a1"), row("", "orphan"), missed, row("q3", " ")])
            .await
            .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.progress_restored, 1);

        let problems = library.catalog().problems_for_file(&report.file.id).await.unwrap();
        assert_eq!(problems.iter().map(|p| p.sequence_number).collect::<Vec<_>>(), vec![1, 2]);

        let progress = library.progress().get(&problems[1].id).await.unwrap().unwrap();
        assert_eq!(progress.wrong_count, 2);
        assert_eq!(progress.is_correct, None);
    }

    #[tokio::test]
    async fn import_without_rows_is_rejected() {
        let library = Library::in_memory();
        let err = library.import_problems("empty.csv", "csv", vec![row("", "")]).await.unwrap_err();
        assert_eq!(err.kind, crate::core::error::ErrorKind::InvalidInput);
        assert!(library.catalog().active_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn authored_save_keeps_created_at_and_renumbers() {
        let library = Library::in_memory();
        let draft = |id: Option<&str>, d: &str| ProblemDraft {
            id: id.map(ProblemId::from),
            description: d.to_string(),
            answer: "x".to_string(),
            choices: vec!["y".to_string(), "  ".to_string()],
            ..Default::default()
        };

        let created = library
            .save_authored(None, "mine", vec![draft(Some("p1"), "one"), draft(Some("p2"), "two")])
            .await
            .unwrap();
        assert_eq!(created.original_filename, "mine.custom");
        assert_eq!(created.file_type, "custom");

        let updated = library
            .save_authored(Some(&created.id), "mine.custom", vec![draft(Some("p2"), "two"), draft(None, "three")])
            .await
            .unwrap();
        assert_eq!(updated.created_at, created.created_at);

        let problems = library.catalog().problems_for_file(&created.id).await.unwrap();
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].id.as_str(), "p2");
        assert_eq!(problems[0].sequence_number, 1);
        assert_eq!(problems[0].choices, vec!["y".to_string()]);
        assert!(library.stores().problems.get("p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn authored_save_validates_input() {
        let library = Library::in_memory();
        assert!(library.save_authored(None, "  ", Vec::new()).await.is_err());

        let incomplete = ProblemDraft {
            description: "q".to_string(),
            ..Default::default()
        };
        assert!(library.save_authored(None, "deck", vec![incomplete]).await.is_err());
    }

    #[tokio::test]
    async fn export_omits_internal_ids() {
        let library = Library::in_memory();
        let report = library.import_problems("deck.csv", "csv", vec![row("q1", "a1")]).await.unwrap();

        let json = library.export_json(&report.file.id).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["originalFilename"], "deck.csv");
        let problem = &value["problems"][0];
        assert_eq!(problem["answer"], "a1");
        assert!(problem.get("id").is_none());
        assert!(problem.get("fileSetId").is_none());

        assert!(library.export_json(&FileId::from("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stats_reflect_trash_and_progress() {
        let library = Library::in_memory();
        let a = library.import_problems("a.csv", "csv", vec![row("q1", "a1")]).await.unwrap();
        let b = library.import_problems("b.csv", "csv", vec![row("q2", "a2")]).await.unwrap();
        library.catalog().move_to_trash(&b.file.id).await.unwrap();

        let problems = library.catalog().problems_for_file(&a.file.id).await.unwrap();
        library.progress().save_result(&a.file.id, &problems[0].id, false).await.unwrap();

        let stats = library.stats().await.unwrap();
        assert_eq!(stats.active_files, 1);
        assert_eq!(stats.trashed_files, 1);
        assert_eq!(stats.problems, 2);
        assert_eq!(stats.progress_records, 1);
        assert_eq!(stats.wrong_problems, 1);
        assert_eq!(stats.completion_percent(), 50);
        assert!(stats.last_attempted_at.is_some());
    }
}
