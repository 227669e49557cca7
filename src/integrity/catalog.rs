use std::sync::Arc;

use chrono::Utc;

use crate::core::error::Result;
use crate::core::types::{FileId, FileRecord, ProblemId, ProblemRecord, ProgressRecord};
use crate::integrity::cascade::remove_problems_with_progress;
use crate::storage::Stores;
use crate::storage::store::RecordStore;

/// Outcome of a permanent delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub file_removed: bool,
    pub problems_removed: usize,
    pub progress_removed: usize,
}

/// Owner of every write that can break the Files -> Problems -> Progress
/// chain. The stores check nothing; this type is where the rules live.
#[derive(Clone)]
pub struct FileCatalog {
    pub(crate) files: Arc<dyn RecordStore<FileRecord>>,
    pub(crate) problems: Arc<dyn RecordStore<ProblemRecord>>,
    pub(crate) progress: Arc<dyn RecordStore<ProgressRecord>>,
}

impl FileCatalog {
    pub fn new(stores: &Stores) -> Self {
        FileCatalog {
            files: stores.files.clone(),
            problems: stores.problems.clone(),
            progress: stores.progress.clone(),
        }
    }

    pub async fn save_file(&self, file: FileRecord) -> Result<FileRecord> {
        self.files.set(file.id.as_str(), file.clone()).await?;
        Ok(file)
    }

    pub async fn get_file(&self, file_id: &FileId) -> Result<Option<FileRecord>> {
        self.files.get(file_id.as_str()).await
    }

    /// Files not in the trash, newest first.
    pub async fn active_files(&self) -> Result<Vec<FileRecord>> {
        let mut files = self.files.values_where(&|f| !f.is_trashed()).await?;
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    /// Trashed files, most recently trashed first.
    pub async fn trashed_files(&self) -> Result<Vec<FileRecord>> {
        let mut files = self.files.values_where(&|f| f.is_trashed()).await?;
        files.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(files)
    }

    pub async fn move_to_trash(&self, file_id: &FileId) -> Result<Option<FileRecord>> {
        let Some(mut file) = self.files.get(file_id.as_str()).await? else {
            return Ok(None);
        };
        file.deleted_at = Some(Utc::now());
        self.files.set(file_id.as_str(), file.clone()).await?;
        log::debug!("Moved file {} to trash", file_id);
        Ok(Some(file))
    }

    pub async fn restore(&self, file_id: &FileId) -> Result<Option<FileRecord>> {
        let Some(mut file) = self.files.get(file_id.as_str()).await? else {
            return Ok(None);
        };
        file.deleted_at = None;
        self.files.set(file_id.as_str(), file.clone()).await?;
        log::debug!("Restored file {} from trash", file_id);
        Ok(Some(file))
    }

    /// Returns how many of the ids named an existing file.
    pub async fn move_many_to_trash(&self, file_ids: &[FileId]) -> Result<usize> {
        let mut moved = 0;
        for file_id in file_ids {
            if self.move_to_trash(file_id).await?.is_some() {
                moved += 1;
            }
        }
        Ok(moved)
    }

    pub async fn restore_many(&self, file_ids: &[FileId]) -> Result<usize> {
        let mut restored = 0;
        for file_id in file_ids {
            if self.restore(file_id).await?.is_some() {
                restored += 1;
            }
        }
        Ok(restored)
    }

    /// Erase a file, its problems and their progress.
    ///
    /// Order: file record, then each problem's progress followed by the
    /// problem, then any progress still tagged with the file. Every step is a
    /// separate write; an interrupted run leaves dependents behind and
    /// running it again removes them.
    pub async fn permanent_delete(&self, file_id: &FileId) -> Result<CascadeReport> {
        let file_removed = self.files.get(file_id.as_str()).await?.is_some();
        self.files.remove(file_id.as_str()).await?;

        let doomed: Vec<ProblemId> = self
            .problems
            .values_where(&|p| &p.file_set_id == file_id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        let mut progress_removed =
            remove_problems_with_progress(self.problems.as_ref(), self.progress.as_ref(), &doomed).await?;

        let stray = self.progress.keys_where(&|r| &r.file_set_id == file_id).await?;
        for key in &stray {
            self.progress.remove(key).await?;
        }
        progress_removed += stray.len();

        let report = CascadeReport {
            file_removed,
            problems_removed: doomed.len(),
            progress_removed,
        };
        log::info!(
            "Permanently deleted file {}: {} problems, {} progress records",
            file_id,
            report.problems_removed,
            report.progress_removed
        );
        Ok(report)
    }

    pub async fn permanent_delete_many(&self, file_ids: &[FileId]) -> Result<CascadeReport> {
        let mut total = CascadeReport::default();
        for file_id in file_ids {
            let report = self.permanent_delete(file_id).await?;
            total.file_removed |= report.file_removed;
            total.problems_removed += report.problems_removed;
            total.progress_removed += report.progress_removed;
        }
        Ok(total)
    }

    /// Problems of one file in authored order.
    pub async fn problems_for_file(&self, file_id: &FileId) -> Result<Vec<ProblemRecord>> {
        let mut problems = self.problems.values_where(&|p| &p.file_set_id == file_id).await?;
        problems.sort_by_key(|p| p.sequence_number);
        Ok(problems)
    }
}
