pub mod checkpoint;
pub mod file_lock;
pub mod layout;
pub mod log_store;
pub mod store;
pub mod wal;

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::settings::SettingsRecord;
use crate::core::types::{FileRecord, ProblemRecord, ProgressRecord};
use crate::storage::layout::{FILES_STORE, PROBLEMS_STORE, PROGRESS_STORE, SETTINGS_STORE, StorageLayout};
use crate::storage::log_store::LogStore;
use crate::storage::store::{MemoryStore, RecordStore};

/// Handles to the four independent record stores.
///
/// Cloning is cheap; every layer gets its own copy of the handles it needs.
#[derive(Clone)]
pub struct Stores {
    pub files: Arc<dyn RecordStore<FileRecord>>,
    pub problems: Arc<dyn RecordStore<ProblemRecord>>,
    pub progress: Arc<dyn RecordStore<ProgressRecord>>,
    pub settings: Arc<dyn RecordStore<SettingsRecord>>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Stores {
            files: Arc::new(MemoryStore::new(FILES_STORE)),
            problems: Arc::new(MemoryStore::new(PROBLEMS_STORE)),
            progress: Arc::new(MemoryStore::new(PROGRESS_STORE)),
            settings: Arc::new(MemoryStore::new(SETTINGS_STORE)),
        }
    }

    pub fn open(config: &Config) -> Result<Self> {
        let layout = StorageLayout::new(config.storage_path.clone())?;
        Ok(Stores {
            files: Arc::new(LogStore::<FileRecord>::open(&layout, FILES_STORE, config)?),
            problems: Arc::new(LogStore::<ProblemRecord>::open(&layout, PROBLEMS_STORE, config)?),
            progress: Arc::new(LogStore::<ProgressRecord>::open(&layout, PROGRESS_STORE, config)?),
            settings: Arc::new(LogStore::<SettingsRecord>::open(&layout, SETTINGS_STORE, config)?),
        })
    }
}
