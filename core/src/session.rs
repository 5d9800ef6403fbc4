//! The game session: sole owner of every piece of mutable game state.
//!
//! RULES:
//!   - All movement, geolocation or manual, funnels through move_player().
//!   - Only caches inside the visibility square are held in memory.
//!     Everything else lives in the store and is restored on return.
//!   - Every mutation is persisted before the call returns.
//!   - A token move writes the cache and the inventory in one batch.
//!     A failed write changes neither storage nor memory.

use crate::{
    board::{Board, Cell},
    cache::{Cache, Token},
    cache_store::{CacheOrigin, CacheStore},
    config::GameConfig,
    error::{GameError, GameResult},
    event::GameEvent,
    generator::ContentGenerator,
    geo::LatLng,
    inventory::Inventory,
    player::{PlayerState, INVENTORY_KEY},
    store::KvStore,
    types::GridIndex,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Grid offset as (di, dj); i grows northward, j eastward.
    pub fn offset(&self) -> (GridIndex, GridIndex) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East  => (0, 1),
            Self::West  => (0, -1),
        }
    }
}

pub struct GameSession<S: KvStore> {
    config:  GameConfig,
    board:   Board,
    caches:  CacheStore<S>,
    player:  PlayerState,
    visible: BTreeMap<Cell, Cache>,
}

impl<S: KvStore> GameSession<S> {
    /// Restore the player from `kv` (or start fresh) and reveal the
    /// surroundings of the restored position.
    pub fn start(mut kv: S, config: GameConfig) -> GameResult<Self> {
        config.validate()?;
        let player = PlayerState::restore(&mut kv, config.start_position)?;
        let mut session = Self {
            board:   Board::new(config.quantizer(), config.visibility_radius),
            caches:  CacheStore::new(kv, ContentGenerator::from_config(&config)),
            visible: BTreeMap::new(),
            player,
            config,
        };
        log::info!(
            "session started at ({}, {}) with {} tokens",
            session.player.position.lat,
            session.player.position.lng,
            session.player.token_count(),
        );
        let position = session.player.position;
        session.move_player(position)?;
        Ok(session)
    }

    /// The single "player moved" notification point.
    ///
    /// Repeating a call with the same point re-materializes nothing.
    /// A point off the globe, or whose visibility square leaves the grid,
    /// is refused with `GameError::OffGrid` and nothing changes.
    pub fn move_player(&mut self, point: LatLng) -> GameResult<Vec<GameEvent>> {
        if !point.is_on_globe() || !self.board.fits(point) {
            return Err(GameError::OffGrid { lat: point.lat, lng: point.lng });
        }
        self.player.position = point;
        self.player.save_position(self.caches.kv_mut())?;

        let center = self.board.cell_for_point(point);
        let mut events = vec![GameEvent::PlayerMoved {
            position: point,
            cell:     *center,
        }];

        let board = &self.board;
        let mut evicted = Vec::new();
        self.visible.retain(|cell, _| {
            let keep = board.is_visible_from(cell, point);
            if !keep {
                evicted.push(*cell);
            }
            keep
        });
        events.extend(evicted.into_iter().map(|cell| GameEvent::CacheEvicted { cell }));

        for cell in self.board.visible_cells(point) {
            if self.visible.contains_key(&*cell) || !self.caches.generator().spawn_decision(&cell) {
                continue;
            }
            let (cache, origin) = self.caches.get_or_create_cache(&cell)?;
            let tokens = cache.len();
            events.push(match origin {
                CacheOrigin::Generated => GameEvent::CacheGenerated { cell: *cell, tokens },
                CacheOrigin::Restored => GameEvent::CacheRestored { cell: *cell, tokens },
                CacheOrigin::Regenerated { reason } => {
                    GameEvent::CacheRegenerated { cell: *cell, tokens, reason }
                }
            });
            self.visible.insert(*cell, cache);
        }

        log_events(&events);
        Ok(events)
    }

    /// Move one cell in `direction`, landing on the centre of that cell.
    pub fn step(&mut self, direction: Direction) -> GameResult<Vec<GameEvent>> {
        let (i, j) = self.board.quantizer().cell_indices(self.player.position);
        let (di, dj) = direction.offset();
        let (Some(ti), Some(tj)) = (i.checked_add(di), j.checked_add(dj)) else {
            let LatLng { lat, lng } = self.player.position;
            return Err(GameError::OffGrid { lat, lng });
        };
        let target = self.board.canonical_cell(ti, tj);
        let point = self.board.cell_bounds(&target).center();
        self.move_player(point)
    }

    /// Move the top token of a visible cache into the inventory.
    /// `None` if the cell has no visible cache or the cache is empty.
    pub fn withdraw_from(&mut self, i: GridIndex, j: GridIndex) -> GameResult<Option<Token>> {
        let cell = Cell::new(i, j);
        let Some(current) = self.visible.get(&cell) else {
            return Ok(None);
        };
        let mut cache = current.clone();
        let Some(token) = cache.tokens.pop() else {
            return Ok(None);
        };
        let mut inventory = self.player.inventory.clone();
        inventory.push(token);
        self.commit_transfer(cache, inventory)?;

        log_events(&[GameEvent::TokenWithdrawn {
            cell,
            token,
            inventory_count: self.player.token_count(),
        }]);
        Ok(Some(token))
    }

    /// Move the top inventory token into a visible cache.
    /// `None` if the cell has no visible cache or the inventory is empty.
    pub fn deposit_into(&mut self, i: GridIndex, j: GridIndex) -> GameResult<Option<Token>> {
        let cell = Cell::new(i, j);
        let Some(current) = self.visible.get(&cell) else {
            return Ok(None);
        };
        let mut inventory = self.player.inventory.clone();
        let Some(token) = inventory.pop() else {
            return Ok(None);
        };
        let mut cache = current.clone();
        cache.tokens.push(token);
        self.commit_transfer(cache, inventory)?;

        log_events(&[GameEvent::TokenDeposited {
            cell,
            token,
            inventory_count: self.player.token_count(),
        }]);
        Ok(Some(token))
    }

    /// Persist both sides of a token move, then adopt them in memory.
    fn commit_transfer(&mut self, cache: Cache, inventory: Inventory) -> GameResult<()> {
        let encoded = PlayerState::encode_inventory(&inventory)?;
        self.caches
            .persist_with(&cache, &[(INVENTORY_KEY, encoded.as_str())])?;
        self.player.inventory = inventory;
        self.visible.insert(cache.cell, cache);
        Ok(())
    }

    /// Wipe all persisted state and start over at the configured start.
    pub fn reset(&mut self) -> GameResult<Vec<GameEvent>> {
        self.caches.kv_mut().clear()?;
        self.visible.clear();
        self.player = PlayerState::new(self.config.start_position);
        self.player.save(self.caches.kv_mut())?;
        log::info!("session reset");

        let mut events = vec![GameEvent::SessionReset];
        events.extend(self.move_player(self.config.start_position)?);
        Ok(events)
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn position(&self) -> LatLng {
        self.player.position
    }

    pub fn player_cell(&self) -> Cell {
        let (i, j) = self.board.quantizer().cell_indices(self.player.position);
        Cell::new(i, j)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.player.inventory
    }

    pub fn cache_at(&self, i: GridIndex, j: GridIndex) -> Option<&Cache> {
        self.visible.get(&Cell::new(i, j))
    }

    /// Visible caches in (i, j) order.
    pub fn visible_caches(&self) -> impl Iterator<Item = &Cache> {
        self.visible.values()
    }

    pub fn store(&self) -> &S {
        self.caches.kv()
    }

    /// End the session, handing back the store.
    pub fn into_store(self) -> S {
        self.caches.into_inner()
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match serde_json::to_string(event) {
            Ok(payload) => log::debug!("{}: {payload}", event.type_name()),
            Err(e) => log::debug!("{}: <unserializable: {e}>", event.type_name()),
        }
    }
}
