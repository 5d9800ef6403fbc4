//! Game events: what a session operation did, for the caller to render.
//!
//! Every session operation returns the events it produced, in order.
//! Variants are appended only; never removed or reordered.

use crate::{board::Cell, cache::Token, geo::LatLng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Movement ───────────────────────────────────
    PlayerMoved {
        position: LatLng,
        cell:     Cell,
    },

    // ── Cache lifecycle ────────────────────────────
    /// First visit: contents generated and persisted.
    CacheGenerated {
        cell:   Cell,
        tokens: usize,
    },
    /// Seen before: contents reloaded from the store.
    CacheRestored {
        cell:   Cell,
        tokens: usize,
    },
    /// Stored record was corrupt and has been replaced with fresh contents.
    CacheRegenerated {
        cell:   Cell,
        tokens: usize,
        reason: String,
    },
    /// Left the visibility square. State stays in the store.
    CacheEvicted {
        cell: Cell,
    },

    // ── Token movement ─────────────────────────────
    TokenWithdrawn {
        cell:            Cell,
        token:           Token,
        inventory_count: usize,
    },
    TokenDeposited {
        cell:            Cell,
        token:           Token,
        inventory_count: usize,
    },

    // ── Session ────────────────────────────────────
    SessionReset,
}

impl GameEvent {
    /// Stable snake_case name, matching the serde tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            GameEvent::PlayerMoved { .. }      => "player_moved",
            GameEvent::CacheGenerated { .. }   => "cache_generated",
            GameEvent::CacheRestored { .. }    => "cache_restored",
            GameEvent::CacheRegenerated { .. } => "cache_regenerated",
            GameEvent::CacheEvicted { .. }     => "cache_evicted",
            GameEvent::TokenWithdrawn { .. }   => "token_withdrawn",
            GameEvent::TokenDeposited { .. }   => "token_deposited",
            GameEvent::SessionReset            => "session_reset",
        }
    }
}
