use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::core::settings::OrderMode;
use crate::core::types::{FileId, ProblemId, ProblemRecord};
use crate::progress::filter::ProgressFilter;
use crate::session::choices::{DistractorSource, build_choices};
use crate::session::shuffle::{charcode_sum, seeded_shuffle};

/// What a session was built for. Starting again with an equal key keeps the
/// running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    pub file_id: FileId,
    pub order_mode: OrderMode,
    pub filters: Vec<ProgressFilter>,
}

/// What the user did with one problem during this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAnswer {
    pub selected_choice: Option<String>,
    pub typed_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub revealed: bool,
}

/// Partial update for a [`SessionAnswer`]; `None` fields leave the recorded
/// value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerPatch {
    pub selected_choice: Option<String>,
    pub typed_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub revealed: Option<bool>,
}

impl AnswerPatch {
    pub fn selected(choice: impl Into<String>, is_correct: bool) -> Self {
        AnswerPatch {
            selected_choice: Some(choice.into()),
            is_correct: Some(is_correct),
            ..Default::default()
        }
    }

    pub fn typed(answer: impl Into<String>) -> Self {
        AnswerPatch {
            typed_answer: Some(answer.into()),
            ..Default::default()
        }
    }

    pub fn revealed() -> Self {
        AnswerPatch {
            revealed: Some(true),
            ..Default::default()
        }
    }

    pub fn graded(is_correct: bool) -> Self {
        AnswerPatch {
            is_correct: Some(is_correct),
            ..Default::default()
        }
    }
}

impl SessionAnswer {
    pub fn merge(&mut self, patch: AnswerPatch) {
        if let Some(choice) = patch.selected_choice {
            self.selected_choice = Some(choice);
        }
        if let Some(typed) = patch.typed_answer {
            self.typed_answer = Some(typed);
        }
        if let Some(is_correct) = patch.is_correct {
            self.is_correct = Some(is_correct);
        }
        if let Some(revealed) = patch.revealed {
            self.revealed = revealed;
        }
    }
}

/// In-memory state of one study run: the frozen problem order, the frozen
/// options of every problem, the cursor and the answers given so far.
///
/// Nothing outside this type mutates it and it never touches the stores;
/// outcomes are persisted by the caller through the progress tracker.
#[derive(Debug, Default)]
pub struct StudySession {
    key: Option<SessionKey>,
    seed: i64,
    problems: Vec<ProblemRecord>,
    choices: HashMap<ProblemId, Vec<String>>,
    answers: HashMap<ProblemId, SessionAnswer>,
    current_index: usize,
    started_at: Option<DateTime<Utc>>,
}

impl StudySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the session unless one with the same file, order mode and
    /// filters is already running. Returns whether a rebuild happened.
    pub fn start(
        &mut self,
        file_id: &FileId,
        problems: Vec<ProblemRecord>,
        order_mode: OrderMode,
        filters: &[ProgressFilter],
        pool: &[DistractorSource],
    ) -> bool {
        let key = SessionKey {
            file_id: file_id.clone(),
            order_mode,
            filters: filters.to_vec(),
        };
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        self.rebuild(key, problems, pool, 0);
        true
    }

    /// Rebuild unconditionally with a seed mixed with the wall clock, so the
    /// order and the options change.
    pub fn restart(
        &mut self,
        file_id: &FileId,
        problems: Vec<ProblemRecord>,
        order_mode: OrderMode,
        filters: &[ProgressFilter],
        pool: &[DistractorSource],
    ) {
        let key = SessionKey {
            file_id: file_id.clone(),
            order_mode,
            filters: filters.to_vec(),
        };
        self.rebuild(key, problems, pool, Utc::now().timestamp_millis());
    }

    fn rebuild(&mut self, key: SessionKey, mut problems: Vec<ProblemRecord>, pool: &[DistractorSource], base: i64) {
        let seed = charcode_sum(key.file_id.as_str(), base);
        if key.order_mode == OrderMode::Random {
            seeded_shuffle(&mut problems, seed);
        }

        let choices = problems
            .iter()
            .map(|p| {
                let problem_seed = charcode_sum(p.id.as_str(), seed);
                (p.id.clone(), build_choices(p, pool, problem_seed))
            })
            .collect();

        log::debug!(
            "Built session for {} ({:?}): {} problems, seed {}",
            key.file_id,
            key.order_mode,
            problems.len(),
            seed
        );

        self.key = Some(key);
        self.seed = seed;
        self.problems = problems;
        self.choices = choices;
        self.answers.clear();
        self.current_index = 0;
        self.started_at = Some(Utc::now());
    }

    /// Drop everything; the next `start` always rebuilds.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn key(&self) -> Option<&SessionKey> {
        self.key.as_ref()
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn problems(&self) -> &[ProblemRecord] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// No problems to study. Callers treat this as a terminal state.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Out-of-range indices are ignored.
    pub fn set_current_index(&mut self, index: usize) -> bool {
        if index < self.problems.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.set_current_index(self.current_index + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current_index.checked_sub(1) {
            Some(index) => self.set_current_index(index),
            None => false,
        }
    }

    pub fn current_problem(&self) -> Option<&ProblemRecord> {
        self.problems.get(self.current_index)
    }

    pub fn choices_for(&self, problem_id: &ProblemId) -> &[String] {
        self.choices.get(problem_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_answer(&mut self, problem_id: &ProblemId, patch: AnswerPatch) {
        self.answers.entry(problem_id.clone()).or_default().merge(patch);
    }

    pub fn answer(&self, problem_id: &ProblemId) -> Option<&SessionAnswer> {
        self.answers.get(problem_id)
    }

    pub fn answers(&self) -> &HashMap<ProblemId, SessionAnswer> {
        &self.answers
    }

    /// Every problem has a recorded answer.
    pub fn is_finished(&self) -> bool {
        !self.problems.is_empty() && self.problems.iter().all(|p| self.answers.contains_key(&p.id))
    }
}
