use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

const FRAME_HEADER_LEN: usize = 8; // u32 length + u32 crc
const BATCH_SYNC_EVERY: u64 = 64;

/// Append-only log of store mutations
pub struct Wal {
    pub file: File,
    pub path: PathBuf,
    pub position: u64,
    pub sync_mode: SyncMode,
    pub sequence: u64,
    pub entries: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Immediate,  // fsync after every write
    Batch,      // fsync periodically
    None,       // Let OS handle it
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry<T> {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub operation: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreOp<V> {
    Set { key: String, value: V },
    Remove { key: String },
}

impl Wal {
    pub fn open(path: &Path, sync_mode: SyncMode, sequence: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;
        let position = file.metadata()?.len();

        Ok(Wal {
            file,
            path: path.to_path_buf(),
            position,
            sync_mode,
            sequence,
            entries: 0,
        })
    }

    pub fn append<V: Serialize>(&mut self, operation: &StoreOp<V>) -> Result<u64> {
        let entry = WalEntry {
            sequence: self.sequence,
            timestamp: Utc::now(),
            operation,
        };

        let data = bincode::serialize(&entry)?;
        let mut hasher = Hasher::new();
        hasher.update(&data);

        let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + data.len());
        frame.extend_from_slice(&(data.len() as u32).to_le_bytes());
        frame.extend_from_slice(&hasher.finalize().to_le_bytes());
        frame.extend_from_slice(&data);
        if let Err(err) = self.file.write_all(&frame) {
            if let Err(cut) = self.discard_partial() {
                log::error!("Could not cut partial frame from {}: {}", self.path.display(), cut);
            }
            return Err(err.into());
        }

        let written = self.sequence;
        self.sequence += 1;
        self.entries += 1;
        self.position += frame.len() as u64;

        match self.sync_mode {
            SyncMode::Immediate => self.file.sync_data()?,
            SyncMode::Batch if self.sequence % BATCH_SYNC_EVERY == 0 => self.file.sync_data()?,
            _ => {}
        }

        Ok(written)
    }

    /// Cut the log back to the end of the last whole frame.
    fn discard_partial(&mut self) -> Result<()> {
        self.file.set_len(self.position)?;
        Ok(())
    }

    /// Read every intact entry from the start of the log.
    ///
    /// An incomplete frame at the tail (a write torn by a crash) is cut off
    /// so later appends start on a frame boundary. A complete frame that
    /// fails its checksum is corruption and aborts the replay.
    pub fn replay<V: DeserializeOwned>(&mut self, max_entry_bytes: usize) -> Result<Vec<WalEntry<StoreOp<V>>>> {
        let data = fs::read(&self.path)?;
        let mut entries = Vec::new();
        let mut offset = 0usize;

        while offset < data.len() {
            if data.len() - offset < FRAME_HEADER_LEN {
                break;
            }
            let len = read_u32(&data[offset..]) as usize;
            let crc = read_u32(&data[offset + 4..]);

            if len > max_entry_bytes {
                return Err(Error::corrupted(format!(
                    "WAL frame at offset {} claims {} bytes, limit is {}",
                    offset, len, max_entry_bytes
                )));
            }

            let body_start = offset + FRAME_HEADER_LEN;
            if data.len() - body_start < len {
                break;
            }
            let body = &data[body_start..body_start + len];

            let mut hasher = Hasher::new();
            hasher.update(body);
            if hasher.finalize() != crc {
                return Err(Error::corrupted(format!(
                    "WAL checksum mismatch at offset {} in {}",
                    offset,
                    self.path.display()
                )));
            }

            let entry: WalEntry<StoreOp<V>> = bincode::deserialize(body)?;
            entries.push(entry);
            offset = body_start + len;
        }

        if offset < data.len() {
            log::warn!(
                "Truncating torn WAL tail in {}: {} trailing bytes dropped",
                self.path.display(),
                data.len() - offset
            );
            self.file.set_len(offset as u64)?;
            self.file.sync_all()?;
        }

        self.position = offset as u64;
        self.entries = entries.len();
        if let Some(last) = entries.last() {
            self.sequence = self.sequence.max(last.sequence + 1);
        }

        Ok(entries)
    }

    /// Drop every entry; called once a checkpoint covers them.
    pub fn truncate(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.file.sync_all()?;
        self.position = 0;
        self.entries = 0;
        Ok(())
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}
