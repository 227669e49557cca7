use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

const CHECKPOINT_MAGIC: &[u8; 8] = b"LMCKPT01";

/// Full image of one store at a WAL sequence number.
///
/// On disk: magic, crc32 of the payload, then the lz4 block (size-prefixed)
/// of the bincode-encoded checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint<V> {
    /// First WAL sequence number *not* covered by this image
    pub next_sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub entries: BTreeMap<String, V>,
}

impl<V> Checkpoint<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Load checkpoint from disk
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read(path)?;
        if data.len() < CHECKPOINT_MAGIC.len() + 4 || &data[..CHECKPOINT_MAGIC.len()] != CHECKPOINT_MAGIC {
            return Err(Error::corrupted(format!("{} is not a checkpoint file", path.display())));
        }

        let mut crc = [0u8; 4];
        crc.copy_from_slice(&data[CHECKPOINT_MAGIC.len()..CHECKPOINT_MAGIC.len() + 4]);
        let payload = &data[CHECKPOINT_MAGIC.len() + 4..];

        let mut hasher = Hasher::new();
        hasher.update(payload);
        if hasher.finalize() != u32::from_le_bytes(crc) {
            return Err(Error::corrupted(format!("checkpoint checksum mismatch in {}", path.display())));
        }

        let raw = lz4_flex::decompress_size_prepended(payload)?;
        let checkpoint = bincode::deserialize(&raw)?;
        Ok(Some(checkpoint))
    }

    /// Save checkpoint to disk, replacing any previous image atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = bincode::serialize(self)?;
        let payload = lz4_flex::compress_prepend_size(&raw);

        let mut hasher = Hasher::new();
        hasher.update(&payload);

        let tmp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(CHECKPOINT_MAGIC)?;
            file.write_all(&hasher.finalize().to_le_bytes())?;
            file.write_all(&payload)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        log::debug!(
            "Wrote checkpoint {} ({} entries, {} bytes compressed)",
            path.display(),
            self.entries.len(),
            payload.len()
        );
        Ok(())
    }
}
