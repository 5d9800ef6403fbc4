//! Cache contents must be a pure function of the cell's indices.
//!
//! Two independent generators (and two independent stores) standing in
//! for two process lifetimes must agree on every cell.

use geocoin_core::{
    board::Cell,
    cache_store::{CacheOrigin, CacheStore},
    config::GameConfig,
    generator::ContentGenerator,
    store::{KvStore, SqliteKv},
};

fn fresh_store() -> CacheStore<SqliteKv> {
    let kv = SqliteKv::in_memory().expect("in-memory store");
    kv.migrate().expect("migration");
    CacheStore::new(kv, ContentGenerator::from_config(&GameConfig::default_test()))
}

#[test]
fn seed_and_spawn_are_repeatable() {
    let a = ContentGenerator::from_config(&GameConfig::default_test());
    let b = ContentGenerator::from_config(&GameConfig::default_test());
    for i in -30..30 {
        for j in -30..30 {
            let cell = Cell::new(i, j);
            assert_eq!(a.seed_token_count(&cell), a.seed_token_count(&cell));
            assert_eq!(a.seed_token_count(&cell), b.seed_token_count(&cell));
            assert_eq!(a.spawn_decision(&cell), b.spawn_decision(&cell));
        }
    }
}

#[test]
fn independent_stores_generate_identical_caches() {
    let mut store_a = fresh_store();
    let mut store_b = fresh_store();
    for (i, j) in [(5, 5), (-3, 8), (369_894, -1_220_627), (0, 0)] {
        let cell = Cell::new(i, j);
        let (a, origin_a) = store_a.get_or_create_cache(&cell).unwrap();
        let (b, origin_b) = store_b.get_or_create_cache(&cell).unwrap();
        assert_eq!(origin_a, CacheOrigin::Generated);
        assert_eq!(origin_b, CacheOrigin::Generated);
        assert_eq!(a, b, "cell ({i},{j}) generated differently");
        assert_eq!(
            store_a.kv().get(&cell.key()).unwrap(),
            store_b.kv().get(&cell.key()).unwrap(),
            "persisted mementos differ for ({i},{j})"
        );
    }
}

#[test]
fn spawn_and_seed_are_not_the_same_draw() {
    // If both decisions came from one hash, every spawning cell would sit
    // in the same band of token counts.
    let g = ContentGenerator::new(0.1, 10);
    let counts: std::collections::HashSet<u32> = (0..200)
        .flat_map(|i| (0..200).map(move |j| Cell::new(i, j)))
        .filter(|c| g.spawn_decision(c))
        .map(|c| g.seed_token_count(&c))
        .collect();
    assert!(counts.len() > 5, "spawning cells only produced counts {counts:?}");
}
