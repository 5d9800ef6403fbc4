//! The authoritative per-cell cache state.
//!
//! Lifecycle of a cell's record:
//!   Unvisited: no record under the cell's key
//!   Generated: first materialization; contents rolled and persisted at once
//!   Modified : every withdraw/deposit re-persists the whole memento
//!
//! RULES:
//!   - A cell with a record is ALWAYS restored, never regenerated.
//!     Regenerating would silently erase the player's withdrawals and deposits.
//!   - Writes are write-through: durable state matches memory after every call.
//!   - A corrupt record is discarded and the cell regenerated. Availability
//!     wins over durability here; the loss is logged, not surfaced.

use crate::{
    board::Cell,
    cache::{Cache, Token},
    error::GameResult,
    generator::ContentGenerator,
    memento,
    store::KvStore,
};

/// The store key for a cell's memento. Used for both writes and reads.
pub fn cache_key(cell: &Cell) -> String {
    cell.key()
}

/// How a materialized cache came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOrigin {
    Generated,
    Restored,
    Regenerated { reason: String },
}

pub struct CacheStore<S: KvStore> {
    kv:        S,
    generator: ContentGenerator,
}

impl<S: KvStore> CacheStore<S> {
    pub fn new(kv: S, generator: ContentGenerator) -> Self {
        Self { kv, generator }
    }

    pub fn generator(&self) -> &ContentGenerator {
        &self.generator
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut S {
        &mut self.kv
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    /// Whether the cell has left the Unvisited state.
    pub fn has_record(&self, cell: &Cell) -> GameResult<bool> {
        Ok(self.kv.get(&cache_key(cell))?.is_some())
    }

    pub fn get_or_create_cache(&mut self, cell: &Cell) -> GameResult<(Cache, CacheOrigin)> {
        let key = cache_key(cell);
        let reason = match self.kv.get(&key)? {
            None => None,
            Some(raw) => match memento::deserialize(&raw) {
                Ok(cache) if cache.cell == *cell => {
                    log::debug!("cache {key}: restored {} tokens", cache.len());
                    return Ok((cache, CacheOrigin::Restored));
                }
                Ok(cache) => Some(format!("record for {} stored under {key}", cache.cell)),
                Err(corrupt) => Some(corrupt.reason),
            },
        };

        if let Some(reason) = &reason {
            log::warn!("cache {key}: discarding corrupt record ({reason})");
            self.kv.remove(&key)?;
        }

        let cache = Cache::new(*cell, self.generator.initial_tokens(cell));
        self.persist(&cache)?;
        log::debug!("cache {key}: generated {} tokens", cache.len());

        let origin = match reason {
            Some(reason) => CacheOrigin::Regenerated { reason },
            None => CacheOrigin::Generated,
        };
        Ok((cache, origin))
    }

    /// Take the most recently added token. `None` (and no write) if empty.
    /// A failed write leaves `cache` as it was.
    pub fn withdraw(&mut self, cache: &mut Cache) -> GameResult<Option<Token>> {
        let Some(token) = cache.tokens.pop() else {
            return Ok(None);
        };
        if let Err(e) = self.persist(cache) {
            cache.tokens.push(token);
            return Err(e);
        }
        Ok(Some(token))
    }

    /// A failed write leaves `cache` as it was.
    pub fn deposit(&mut self, cache: &mut Cache, token: Token) -> GameResult<()> {
        cache.tokens.push(token);
        let result = self.persist(cache);
        if result.is_err() {
            cache.tokens.pop();
        }
        result
    }

    /// Write the memento for `cache` and every `extra` entry as one batch.
    pub fn persist_with(&mut self, cache: &Cache, extra: &[(&str, &str)]) -> GameResult<()> {
        let raw = memento::serialize(cache)?;
        let key = cache_key(&cache.cell);
        let mut entries = vec![(key.as_str(), raw.as_str())];
        entries.extend_from_slice(extra);
        self.kv.set_batch(&entries)
    }

    fn persist(&mut self, cache: &Cache) -> GameResult<()> {
        self.persist_with(cache, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::store::MemoryKv;

    /// Reads work, every write fails.
    struct ReadOnlyKv(MemoryKv);

    impl KvStore for ReadOnlyKv {
        fn get(&self, key: &str) -> GameResult<Option<String>> {
            self.0.get(key)
        }
        fn set(&mut self, _: &str, _: &str) -> GameResult<()> {
            Err(GameError::Other(anyhow::anyhow!("read-only store")))
        }
        fn remove(&mut self, _: &str) -> GameResult<()> {
            Err(GameError::Other(anyhow::anyhow!("read-only store")))
        }
        fn clear(&mut self) -> GameResult<()> {
            Err(GameError::Other(anyhow::anyhow!("read-only store")))
        }
    }

    fn store() -> CacheStore<MemoryKv> {
        CacheStore::new(MemoryKv::new(), ContentGenerator::new(1.0, 10))
    }

    /// A cell whose fresh cache holds at least one token.
    fn stocked_cell(store: &CacheStore<MemoryKv>) -> Cell {
        (0..)
            .map(|i| Cell::new(i, 7))
            .find(|c| store.generator().seed_token_count(c) > 0)
            .unwrap()
    }

    #[test]
    fn key_is_comma_joined_indices() {
        assert_eq!(cache_key(&Cell::new(-3, 12)), "-3,12");
    }

    #[test]
    fn first_materialization_persists_immediately() {
        let mut store = store();
        let cell = Cell::new(5, 5);
        assert!(!store.has_record(&cell).unwrap());
        let (cache, origin) = store.get_or_create_cache(&cell).unwrap();
        assert_eq!(origin, CacheOrigin::Generated);
        assert!(store.has_record(&cell).unwrap());
        let raw = store.kv().get("5,5").unwrap().expect("record written");
        assert_eq!(memento::deserialize(&raw).unwrap(), cache);
    }

    #[test]
    fn second_materialization_restores() {
        let mut store = store();
        let cell = Cell::new(5, 5);
        let (first, _) = store.get_or_create_cache(&cell).unwrap();
        let (second, origin) = store.get_or_create_cache(&cell).unwrap();
        assert_eq!(origin, CacheOrigin::Restored);
        assert_eq!(first, second);
    }

    #[test]
    fn withdraw_is_lifo_and_write_through() {
        let mut store = store();
        let cell = stocked_cell(&store);
        let (mut cache, _) = store.get_or_create_cache(&cell).unwrap();
        let expected_last = *cache.tokens.last().unwrap();
        let before = cache.len();

        let token = store.withdraw(&mut cache).unwrap();
        assert_eq!(token, Some(expected_last));
        assert_eq!(cache.len(), before - 1);

        let (reloaded, origin) = store.get_or_create_cache(&cell).unwrap();
        assert_eq!(origin, CacheOrigin::Restored);
        assert_eq!(reloaded, cache);
    }

    #[test]
    fn withdraw_from_empty_is_a_no_op() {
        let mut store = store();
        let mut cache = Cache::new(Cell::new(1, 1), Vec::new());
        assert_eq!(store.withdraw(&mut cache).unwrap(), None);
        assert!(store.kv().is_empty(), "empty withdraw must not write");
    }

    #[test]
    fn deposit_appends_and_persists() {
        let mut store = store();
        let cell = Cell::new(2, 2);
        let (mut cache, _) = store.get_or_create_cache(&cell).unwrap();
        let foreign = Token { i: 40, j: 41, num: 3 };
        store.deposit(&mut cache, foreign).unwrap();
        assert_eq!(cache.tokens.last(), Some(&foreign));
        let (reloaded, _) = store.get_or_create_cache(&cell).unwrap();
        assert_eq!(reloaded.tokens.last(), Some(&foreign));
    }

    #[test]
    fn failed_writes_leave_the_cache_untouched() {
        let mut store = CacheStore::new(ReadOnlyKv(MemoryKv::new()), ContentGenerator::new(1.0, 10));
        let original = Cache::new(Cell::new(1, 1), vec![Token { i: 1, j: 1, num: 1 }]);

        let mut cache = original.clone();
        assert!(store.withdraw(&mut cache).is_err());
        assert_eq!(cache, original);

        assert!(store.deposit(&mut cache, Token { i: 9, j: 9, num: 2 }).is_err());
        assert_eq!(cache, original);
    }

    #[test]
    fn persist_with_writes_memento_and_extras() {
        let mut store = store();
        let cache = Cache::new(Cell::new(6, 6), vec![Token { i: 6, j: 6, num: 1 }]);
        store.persist_with(&cache, &[("player.inventory", "[]")]).unwrap();
        let raw = store.kv().get("6,6").unwrap().expect("memento written");
        assert_eq!(memento::deserialize(&raw).unwrap(), cache);
        assert_eq!(store.kv().get("player.inventory").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn corrupt_record_is_regenerated() {
        let mut store = store();
        let cell = Cell::new(8, 8);
        store.kv_mut().set("8,8", "{\"cell\":").unwrap();
        let (cache, origin) = store.get_or_create_cache(&cell).unwrap();
        assert!(matches!(origin, CacheOrigin::Regenerated { .. }));
        assert_eq!(cache.tokens, store.generator().initial_tokens(&cell));
        let (_, origin) = store.get_or_create_cache(&cell).unwrap();
        assert_eq!(origin, CacheOrigin::Restored, "regenerated record is persisted");
    }

    #[test]
    fn record_under_wrong_key_is_corrupt() {
        let mut store = store();
        let misplaced = memento::serialize(&Cache::new(Cell::new(1, 2), Vec::new())).unwrap();
        store.kv_mut().set("2,1", &misplaced).unwrap();
        let (cache, origin) = store.get_or_create_cache(&Cell::new(2, 1)).unwrap();
        assert!(matches!(origin, CacheOrigin::Regenerated { .. }));
        assert_eq!(cache.cell, Cell::new(2, 1));
    }
}
