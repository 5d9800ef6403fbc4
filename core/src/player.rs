//! Player position and inventory, persisted under fixed keys.
//!
//! Both keys sit outside the "i,j" cache key space, so player state can
//! never shadow a cache memento.

use crate::{
    cache::Token,
    error::{CorruptRecord, GameResult},
    geo::LatLng,
    inventory::Inventory,
    store::KvStore,
};
use serde::de::DeserializeOwned;

pub const POSITION_KEY:  &str = "player.position";
pub const INVENTORY_KEY: &str = "player.inventory";

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub position:  LatLng,
    pub inventory: Inventory,
}

impl PlayerState {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            inventory: Inventory::new(),
        }
    }

    /// Load from the store. Missing or corrupt entries fall back to
    /// `default_position` and an empty inventory; corrupt ones are removed.
    pub fn restore<S: KvStore>(kv: &mut S, default_position: LatLng) -> GameResult<Self> {
        let position = load_or_discard(kv, POSITION_KEY, |p: &LatLng| {
            if p.is_on_globe() {
                Ok(())
            } else {
                Err(CorruptRecord::new(format!("({}, {}) is not on the globe", p.lat, p.lng)))
            }
        })?
        .unwrap_or(default_position);

        let inventory = load_or_discard(kv, INVENTORY_KEY, |inv: &Inventory| {
            match inv.tokens().iter().find(|t| t.num == 0) {
                Some(bad) => Err(CorruptRecord::new(format!("token {bad} has serial 0"))),
                None => Ok(()),
            }
        })?
        .unwrap_or_default();

        Ok(Self { position, inventory })
    }

    pub fn save<S: KvStore>(&self, kv: &mut S) -> GameResult<()> {
        self.save_position(kv)?;
        self.save_inventory(kv)
    }

    pub fn save_position<S: KvStore>(&self, kv: &mut S) -> GameResult<()> {
        kv.set(POSITION_KEY, &serde_json::to_string(&self.position)?)
    }

    pub fn save_inventory<S: KvStore>(&self, kv: &mut S) -> GameResult<()> {
        kv.set(INVENTORY_KEY, &Self::encode_inventory(&self.inventory)?)
    }

    /// The stored form of an inventory, as written under `INVENTORY_KEY`.
    pub fn encode_inventory(inventory: &Inventory) -> GameResult<String> {
        Ok(serde_json::to_string(inventory)?)
    }

    pub fn token_count(&self) -> usize {
        self.inventory.len()
    }

    pub fn tokens(&self) -> &[Token] {
        self.inventory.tokens()
    }
}

fn load_or_discard<S, T, F>(kv: &mut S, key: &str, validate: F) -> GameResult<Option<T>>
where
    S: KvStore,
    T: DeserializeOwned,
    F: Fn(&T) -> Result<(), CorruptRecord>,
{
    let Some(raw) = kv.get(key)? else {
        return Ok(None);
    };
    let parsed = serde_json::from_str::<T>(&raw)
        .map_err(|e| CorruptRecord::new(e.to_string()))
        .and_then(|value| validate(&value).map(|_| value));
    match parsed {
        Ok(value) => Ok(Some(value)),
        Err(corrupt) => {
            log::warn!("{key}: discarding corrupt record ({})", corrupt.reason);
            kv.remove(key)?;
            Ok(None)
        }
    }
}
