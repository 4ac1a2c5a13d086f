use hashbrown::HashMap;

use super::{KvStorage, PersistResult};

/// Volatile storage; contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryKvStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryKvStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` with `value`, as if written by an earlier session.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl KvStorage for MemoryKvStorage {
    fn get(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> PersistResult<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
