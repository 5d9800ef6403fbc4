//! Memento serialization: a Cache to/from its durable JSON form.
//!
//! Format:
//!   {"cell":{"i":3,"j":4},"cacheTokens":[{"i":3,"j":4,"num":1}, ...]}
//!
//! Decoding is strict: unknown fields, missing fields, wrong types and
//! zero token serials are all rejected as a CorruptRecord. Callers decide
//! what to do with a corrupt record; this module never touches storage.

use crate::{
    board::Cell,
    cache::{Cache, Token},
    error::{CorruptRecord, GameResult},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CellRecord {
    i: i32,
    j: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CacheRecord {
    cell:   CellRecord,
    #[serde(rename = "cacheTokens")]
    tokens: Vec<Token>,
}

pub fn serialize(cache: &Cache) -> GameResult<String> {
    let record = CacheRecord {
        cell:   CellRecord { i: cache.cell.i, j: cache.cell.j },
        tokens: cache.tokens.clone(),
    };
    Ok(serde_json::to_string(&record)?)
}

pub fn deserialize(raw: &str) -> Result<Cache, CorruptRecord> {
    let record: CacheRecord =
        serde_json::from_str(raw).map_err(|e| CorruptRecord::new(e.to_string()))?;
    if let Some(bad) = record.tokens.iter().find(|t| t.num == 0) {
        return Err(CorruptRecord::new(format!("token {bad} has serial 0")));
    }
    Ok(Cache::new(
        Cell::new(record.cell.i, record.cell.j),
        record.tokens,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_cell_and_order() {
        let cache = Cache::new(
            Cell::new(3, 4),
            vec![Token { i: 3, j: 4, num: 1 }, Token { i: 3, j: 4, num: 2 }],
        );
        let restored = deserialize(&serialize(&cache).unwrap()).expect("valid memento");
        assert_eq!(restored, cache);
    }

    #[test]
    fn foreign_tokens_keep_their_origin() {
        let cache = Cache::new(
            Cell::new(0, 0),
            vec![Token { i: 9, j: -2, num: 5 }, Token { i: 0, j: 0, num: 1 }],
        );
        let restored = deserialize(&serialize(&cache).unwrap()).unwrap();
        assert_eq!(restored.tokens[0].origin(), Cell::new(9, -2));
    }

    #[test]
    fn wire_format_is_stable() {
        let cache = Cache::new(Cell::new(-1, 2), vec![Token { i: -1, j: 2, num: 1 }]);
        assert_eq!(
            serialize(&cache).unwrap(),
            r#"{"cell":{"i":-1,"j":2},"cacheTokens":[{"i":-1,"j":2,"num":1}]}"#
        );
    }

    #[test]
    fn rejects_malformed_records() {
        let bad = [
            "",
            "not json",
            "{}",
            r#"{"cell":{"i":1,"j":2}}"#,
            r#"{"cell":{"i":1},"cacheTokens":[]}"#,
            r#"{"cell":{"i":1,"j":2},"cacheTokens":[{"i":1,"j":2}]}"#,
            r#"{"cell":{"i":1,"j":2},"cacheTokens":[{"i":1,"j":2,"num":0}]}"#,
            r#"{"cell":{"i":1,"j":2},"cacheTokens":[],"extra":true}"#,
            r#"{"cell":{"i":"1","j":2},"cacheTokens":[]}"#,
            r#"{"cell":{"i":1,"j":2},"tokens":[]}"#,
        ];
        for raw in bad {
            assert!(deserialize(raw).is_err(), "accepted malformed record: {raw:?}");
        }
    }
}
