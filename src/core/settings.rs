use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::progress::filter::ProgressFilter;
use crate::storage::store::RecordStore;

/// Key of the singleton settings record.
pub const SETTINGS_KEY: &str = "userSettings";

/// Column index meaning "not present in the sheet".
pub const UNMAPPED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    Sequential,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Flip cards
    Explanation,
    /// Quiz
    Problem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Multiple,
    Subjective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardFront {
    Explanation,
    Answer,
    Random,
}

/// Where each problem field lives in an imported/exported sheet.
/// Decoding the sheet itself happens outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub description: i32,
    pub answer: i32,
    pub hint: i32,
    pub explanation: i32,
    pub is_completed: i32,
    pub wrong_count: i32,
}

impl ColumnMapping {
    /// First column after every mapped one; authored choices start here.
    pub fn choices_start(&self) -> i32 {
        [self.description, self.answer, self.hint, self.explanation, self.is_completed, self.wrong_count]
            .into_iter()
            .max()
            .unwrap_or(UNMAPPED)
            + 1
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            description: 0,
            answer: 1,
            hint: UNMAPPED,
            explanation: UNMAPPED,
            is_completed: UNMAPPED,
            wrong_count: UNMAPPED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    pub mode: StudyMode,
    pub order_mode: OrderMode,
    pub repeat_mode: bool,
    pub question_type: QuestionType,
    pub card_front: CardFront,
    pub has_header_row: bool,
    pub parser_mapping: ColumnMapping,
    pub export_mapping: ColumnMapping,
    pub active_filters: Vec<ProgressFilter>,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        SettingsRecord {
            mode: StudyMode::Problem,
            order_mode: OrderMode::Random,
            repeat_mode: false,
            question_type: QuestionType::Multiple,
            card_front: CardFront::Explanation,
            has_header_row: true,
            parser_mapping: ColumnMapping::default(),
            export_mapping: ColumnMapping::default(),
            active_filters: Vec::new(),
        }
    }
}

pub struct SettingsRepo {
    settings: Arc<dyn RecordStore<SettingsRecord>>,
}

impl SettingsRepo {
    pub fn new(settings: Arc<dyn RecordStore<SettingsRecord>>) -> Self {
        SettingsRepo { settings }
    }

    /// Stored settings, or the defaults when nothing was saved yet.
    pub async fn load(&self) -> Result<SettingsRecord> {
        Ok(self.settings.get(SETTINGS_KEY).await?.unwrap_or_default())
    }

    pub async fn save(&self, settings: SettingsRecord) -> Result<SettingsRecord> {
        self.settings.set(SETTINGS_KEY, settings.clone()).await?;
        Ok(settings)
    }

    pub async fn update<F>(&self, change: F) -> Result<SettingsRecord>
    where
        F: FnOnce(&mut SettingsRecord) + Send,
    {
        let mut settings = self.load().await?;
        change(&mut settings);
        self.save(settings).await
    }
}
