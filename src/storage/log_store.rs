use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::storage::checkpoint::Checkpoint;
use crate::storage::file_lock::FileLock;
use crate::storage::layout::StorageLayout;
use crate::storage::store::RecordStore;
use crate::storage::wal::{StoreOp, Wal};

/// Durable record store: an in-memory map rebuilt from checkpoint + WAL.
///
/// Each `set`/`remove` is appended to the WAL (and synced per the configured
/// [`SyncMode`](crate::storage::wal::SyncMode)) before the map changes, so a
/// single call is durable on its own. Nothing spans two calls.
pub struct LogStore<V> {
    name: String,
    entries: RwLock<BTreeMap<String, V>>,
    wal: Mutex<Wal>,
    checkpoint_path: PathBuf,
    compact_threshold: usize,
    _lock: FileLock,
}

impl<V> LogStore<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn open(layout: &StorageLayout, name: &str, config: &Config) -> Result<Self> {
        layout.prepare_store(name)?;
        let lock = FileLock::acquire(&layout.lock_path(name))?;

        let checkpoint_path = layout.checkpoint_path(name);
        let (mut entries, next_sequence) = match Checkpoint::<V>::load(&checkpoint_path)? {
            Some(checkpoint) => (checkpoint.entries, checkpoint.next_sequence),
            None => (BTreeMap::new(), 0),
        };

        let mut wal = Wal::open(&layout.wal_path(name), config.sync_mode, next_sequence)?;
        let replayed = wal.replay::<V>(config.max_entry_bytes)?;
        let mut applied = 0usize;
        for entry in replayed {
            if entry.sequence < next_sequence {
                continue;
            }
            apply(&mut entries, entry.operation);
            applied += 1;
        }

        log::info!(
            "Opened store '{}' with {} records ({} log entries replayed)",
            name,
            entries.len(),
            applied
        );

        Ok(LogStore {
            name: name.to_string(),
            entries: RwLock::new(entries),
            wal: Mutex::new(wal),
            checkpoint_path,
            compact_threshold: config.compact_threshold,
            _lock: lock,
        })
    }

    /// Fold the log into a fresh checkpoint and empty the log.
    pub fn compact(&self) -> Result<()> {
        let mut wal = self.wal.lock();
        self.compact_locked(&mut wal)
    }

    fn compact_locked(&self, wal: &mut Wal) -> Result<()> {
        let checkpoint = Checkpoint {
            next_sequence: wal.sequence,
            timestamp: Utc::now(),
            entries: self.entries.read().clone(),
        };
        checkpoint.save(&self.checkpoint_path)?;
        wal.truncate()?;

        log::info!(
            "Compacted store '{}' at sequence {} ({} records)",
            self.name,
            checkpoint.next_sequence,
            checkpoint.entries.len()
        );
        Ok(())
    }

    fn write(&self, operation: StoreOp<V>) -> Result<()> {
        let mut wal = self.wal.lock();
        wal.append(&operation)?;
        apply(&mut self.entries.write(), operation);

        if self.compact_threshold > 0 && wal.entries >= self.compact_threshold {
            // the write is already durable; the log just stays longer
            if let Err(err) = self.compact_locked(&mut wal) {
                log::warn!("Compaction of store '{}' failed: {}", self.name, err);
            }
        }
        Ok(())
    }

    pub fn pending_log_entries(&self) -> usize {
        self.wal.lock().entries
    }
}

fn apply<V>(entries: &mut BTreeMap<String, V>, operation: StoreOp<V>) {
    match operation {
        StoreOp::Set { key, value } => {
            entries.insert(key, value);
        }
        StoreOp::Remove { key } => {
            entries.remove(&key);
        }
    }
}

#[async_trait]
impl<V> RecordStore<V> for LogStore<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<V>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: V) -> Result<()> {
        self.write(StoreOp::Set { key: key.to_string(), value })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if !self.entries.read().contains_key(key) {
            return Ok(());
        }
        self.write(StoreOp::Remove { key: key.to_string() })
    }

    async fn for_each(&self, visitor: &mut (dyn for<'k, 'v> FnMut(&'k str, &'v V) + Send)) -> Result<()> {
        let entries = self.entries.read();
        for (key, value) in entries.iter() {
            visitor(key, value);
        }
        Ok(())
    }
}
