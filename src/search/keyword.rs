use std::collections::BTreeSet;

use crate::analysis::chosung::initials_contains;
use crate::core::error::Result;
use crate::core::types::{FileId, ProblemRecord};
use crate::search::aggregate::Aggregator;

/// True when `query` (already lowercased and trimmed) hits the description,
/// the answer or any choice, literally or by initial consonants.
pub fn problem_matches(problem: &ProblemRecord, query: &str) -> bool {
    initials_contains(&problem.description, query)
        || initials_contains(&problem.answer, query)
        || problem.choices.iter().any(|c| initials_contains(c, query))
}

impl Aggregator {
    /// Ids of every file owning at least one matching problem.
    pub async fn search_by_keyword(&self, keyword: &str) -> Result<BTreeSet<FileId>> {
        let query = keyword.trim().to_lowercase();
        let mut files = BTreeSet::new();
        if query.is_empty() {
            return Ok(files);
        }

        let mut visit = |_: &str, problem: &ProblemRecord| {
            if !files.contains(&problem.file_set_id) && problem_matches(problem, &query) {
                files.insert(problem.file_set_id.clone());
            }
        };
        self.problems.for_each(&mut visit).await?;

        log::debug!("Keyword {:?} matched {} files", keyword, files.len());
        Ok(files)
    }
}
