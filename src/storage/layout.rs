use std::fs;
use std::path::PathBuf;

use crate::core::error::Result;

pub const FILES_STORE: &str = "files";
pub const PROBLEMS_STORE: &str = "problems";
pub const PROGRESS_STORE: &str = "progress";
pub const SETTINGS_STORE: &str = "settings";

/// Directory structure for data files
///
/// ```text
/// <base>/<store>/wal.log
/// <base>/<store>/checkpoint.bin
/// <base>/<store>/.lock
/// ```
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(StorageLayout { base_dir })
    }

    /// Create (if needed) and return the directory of one store.
    pub fn prepare_store(&self, name: &str) -> Result<PathBuf> {
        let dir = self.store_dir(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn store_dir(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn wal_path(&self, name: &str) -> PathBuf {
        self.store_dir(name).join("wal.log")
    }

    pub fn checkpoint_path(&self, name: &str) -> PathBuf {
        self.store_dir(name).join("checkpoint.bin")
    }

    pub fn lock_path(&self, name: &str) -> PathBuf {
        self.store_dir(name).join(".lock")
    }
}
