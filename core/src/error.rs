use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Corrupt(#[from] CorruptRecord),

    #[error("Position ({lat}, {lng}) is off the grid")]
    OffGrid { lat: f64, lng: f64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A persisted record that could not be reconstructed.
///
/// Never surfaced to the player: the cache store and player state discard
/// the record and fall back to fresh state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Corrupt record: {reason}")]
pub struct CorruptRecord {
    pub reason: String,
}

impl CorruptRecord {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

pub type GameResult<T> = Result<T, GameError>;
