use crate::{
    board::Board,
    error::{GameError, GameResult},
    geo::{LatLng, Quantizer},
};
use serde::{Deserialize, Serialize};

/// Oakes College classroom, where a fresh player starts.
pub const DEFAULT_START: LatLng = LatLng::new(36.98949379578401, -122.06277128548504);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    /// Degrees per cell edge.
    pub cell_size: f64,
    /// Cells visible in each direction from the player's cell.
    pub visibility_radius: u32,
    /// Probability that any given cell hosts a cache.
    pub spawn_probability: f64,
    /// Exclusive upper bound on the number of tokens a fresh cache holds.
    pub max_tokens: u32,
    /// Grid anchor. Changing this re-keys every cache.
    #[serde(default = "default_origin")]
    pub origin: LatLng,
    #[serde(default = "default_start")]
    pub start_position: LatLng,
}

fn default_origin() -> LatLng {
    LatLng::new(0.0, 0.0)
}

fn default_start() -> LatLng {
    DEFAULT_START
}

impl GameConfig {
    /// Load from the data/ directory.
    /// In tests, use GameConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/game.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(GameError::Config(format!(
                "cell_size must be a positive number, got {}",
                self.cell_size
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(GameError::Config(format!(
                "spawn_probability must be in [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if self.max_tokens == 0 {
            return Err(GameError::Config("max_tokens must be >= 1".into()));
        }
        if !self.start_position.is_on_globe() {
            return Err(GameError::Config(format!(
                "start_position ({}, {}) is not a valid coordinate",
                self.start_position.lat, self.start_position.lng
            )));
        }
        let board = Board::new(self.quantizer(), self.visibility_radius);
        let corners = [LatLng::new(-90.0, -180.0), LatLng::new(90.0, 180.0)];
        if !corners.into_iter().all(|corner| board.fits(corner)) {
            return Err(GameError::Config(format!(
                "cell_size {} with origin ({}, {}) does not map the globe onto the grid",
                self.cell_size, self.origin.lat, self.origin.lng
            )));
        }
        Ok(())
    }

    pub fn quantizer(&self) -> Quantizer {
        Quantizer::new(self.origin, self.cell_size)
    }

    /// In-code defaults mirroring data/game.json.
    pub fn default_test() -> Self {
        Self {
            cell_size:         1e-4,
            visibility_radius: 8,
            spawn_probability: 0.1,
            max_tokens:        10,
            origin:            default_origin(),
            start_position:    DEFAULT_START,
        }
    }
}
