use super::KvStore;
use crate::error::GameResult;
use std::collections::BTreeMap;

/// Process-local store. Contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    entries: BTreeMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GameResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> GameResult<()> {
        self.entries.clear();
        Ok(())
    }
}
