use std::path::PathBuf;

use crate::storage::wal::SyncMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_path: PathBuf,

    // Durability of each individual set/remove
    pub sync_mode: SyncMode,

    // Rewrite the checkpoint once the log holds this many entries (0 = never)
    pub compact_threshold: usize,

    // Frames larger than this are treated as corruption during replay
    pub max_entry_bytes: usize,
}

impl Config {
    pub fn with_path(storage_path: impl Into<PathBuf>) -> Self {
        Config {
            storage_path: storage_path.into(),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: PathBuf::from("./learningmate-data"),
            sync_mode: SyncMode::Immediate,
            compact_threshold: 4096,
            max_entry_bytes: 10 * 1024 * 1024, // 10MB per record
        }
    }
}
