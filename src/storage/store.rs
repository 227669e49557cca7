use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::error::Result;

/// Key-value collection holding one record kind.
///
/// Every call stands on its own: there is no multi-key atomicity, and a
/// caller running a multi-step operation must tolerate stopping halfway.
/// Removing an absent key is a no-op.
#[async_trait]
pub trait RecordStore<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<V>>;

    async fn set(&self, key: &str, value: V) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    /// Visit every entry in key order.
    async fn for_each(&self, visitor: &mut (dyn for<'k, 'v> FnMut(&'k str, &'v V) + Send)) -> Result<()>;

    async fn values_where(&self, pred: &(dyn for<'v> Fn(&'v V) -> bool + Sync)) -> Result<Vec<V>> {
        let mut out = Vec::new();
        let mut visit = |_: &str, value: &V| {
            if pred(value) {
                out.push(value.clone());
            }
        };
        self.for_each(&mut visit).await?;
        Ok(out)
    }

    async fn keys_where(&self, pred: &(dyn for<'v> Fn(&'v V) -> bool + Sync)) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let mut visit = |key: &str, value: &V| {
            if pred(value) {
                out.push(key.to_string());
            }
        };
        self.for_each(&mut visit).await?;
        Ok(out)
    }

    async fn len(&self) -> Result<usize> {
        let mut count = 0;
        let mut visit = |_: &str, _: &V| count += 1;
        self.for_each(&mut visit).await?;
        Ok(count)
    }
}

/// Volatile store used for tests and for sessions that never touch disk.
pub struct MemoryStore<V> {
    name: String,
    entries: RwLock<BTreeMap<String, V>>,
}

impl<V> MemoryStore<V> {
    pub fn new(name: impl Into<String>) -> Self {
        MemoryStore {
            name: name.into(),
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl<V> RecordStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<V>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: V) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn for_each(&self, visitor: &mut (dyn for<'k, 'v> FnMut(&'k str, &'v V) + Send)) -> Result<()> {
        let entries = self.entries.read();
        for (key, value) in entries.iter() {
            visitor(key, value);
        }
        Ok(())
    }
}
