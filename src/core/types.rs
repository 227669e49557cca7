use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Problems whose description carries this marker form their own distractor
/// category: calculation answers are never offered as options for a
/// non-calculation question and vice versa.
pub const CALCULATION_MARKER: &str = "[계산]";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                $name(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Key of a [`FileRecord`]. Also used for virtual aggregated sets.
    FileId
);

string_id!(
    /// Key of a [`ProblemRecord`] and of its (at most one) [`ProgressRecord`].
    ProblemId
);

/// One uploaded or authored problem set.
///
/// `total_problems` is a cached hint written at save time; the problem store
/// is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: FileId,
    pub original_filename: String,
    pub file_type: String,
    pub total_problems: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn new(original_filename: impl Into<String>, file_type: impl Into<String>, total_problems: usize) -> Self {
        let now = Utc::now();
        FileRecord {
            id: FileId::generate(),
            original_filename: original_filename.into(),
            file_type: file_type.into(),
            total_problems,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    pub id: ProblemId,
    pub file_set_id: FileId,
    pub sequence_number: u32,
    pub description: String,
    pub answer: String,
    pub hint: Option<String>,
    pub explanation: Option<String>,
    pub choices: Vec<String>,
}

impl ProblemRecord {
    pub fn new(
        file_set_id: FileId,
        sequence_number: u32,
        description: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        ProblemRecord {
            id: ProblemId::generate(),
            file_set_id,
            sequence_number,
            description: description.into(),
            answer: answer.into(),
            hint: None,
            explanation: None,
            choices: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ProblemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_calculation(&self) -> bool {
        self.description.contains(CALCULATION_MARKER)
    }
}

/// Per-problem study state, keyed by `problem_id` in the progress store.
///
/// `is_correct` is tri-state: `None` until the first graded attempt.
/// `wrong_count` is sticky, see [`crate::progress::accounting`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: String,
    pub problem_id: ProblemId,
    pub file_set_id: FileId,
    pub is_completed: bool,
    pub is_correct: Option<bool>,
    pub wrong_count: u32,
    pub last_attempted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    pub fn fresh(file_set_id: FileId, problem_id: ProblemId) -> Self {
        ProgressRecord {
            id: Uuid::new_v4().to_string(),
            problem_id,
            file_set_id,
            is_completed: false,
            is_correct: None,
            wrong_count: 0,
            last_attempted_at: None,
            completed_at: None,
        }
    }

    pub fn has_wrong(&self) -> bool {
        self.wrong_count > 0
    }
}
