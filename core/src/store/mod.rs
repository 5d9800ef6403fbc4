//! Durable key-value persistence.
//!
//! RULE: Only the store module talks to storage.
//! The cache store and player state go through `KvStore` and never know
//! which medium sits behind it.

mod memory;
mod sqlite;

pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

use crate::error::GameResult;

/// A string-keyed, string-valued durable store.
///
/// Last writer wins per key; the game has a single writer.
pub trait KvStore {
    fn get(&self, key: &str) -> GameResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> GameResult<()>;
    fn remove(&mut self, key: &str) -> GameResult<()>;
    fn clear(&mut self) -> GameResult<()>;

    /// Write every entry or none of them.
    ///
    /// The default applies the writes in order and, if one fails, restores
    /// the keys already written to their previous values.
    fn set_batch(&mut self, entries: &[(&str, &str)]) -> GameResult<()> {
        let previous = entries
            .iter()
            .map(|(key, _)| self.get(key))
            .collect::<GameResult<Vec<_>>>()?;

        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(e) = self.set(key, value) {
                for ((key, _), old) in entries[..written].iter().zip(&previous[..written]).rev() {
                    let undo = match old {
                        Some(old) => self.set(key, old),
                        None => self.remove(key),
                    };
                    if let Err(undo_err) = undo {
                        log::error!("{key}: rollback failed ({undo_err})");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> GameResult<()> {
        (**self).remove(key)
    }

    fn clear(&mut self) -> GameResult<()> {
        (**self).clear()
    }

    fn set_batch(&mut self, entries: &[(&str, &str)]) -> GameResult<()> {
        (**self).set_batch(entries)
    }
}
