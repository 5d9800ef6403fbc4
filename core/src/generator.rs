//! Deterministic cache contents, derived from a cell's indices alone.
//!
//! Two independent draws per cell:
//!   - "i,j"              decides whether a cache spawns at all
//!   - "i,j,initialValue" decides how many tokens it starts with
//! Distinct keys keep the two decisions uncorrelated.

use crate::{
    board::Cell,
    cache::Token,
    config::GameConfig,
    rng::{luck, LuckRng},
    types::TokenNum,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentGenerator {
    pub spawn_probability: f64,
    pub max_tokens:        u32,
}

impl ContentGenerator {
    pub fn new(spawn_probability: f64, max_tokens: u32) -> Self {
        assert!(max_tokens > 0, "max_tokens must be > 0");
        Self { spawn_probability, max_tokens }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.spawn_probability, config.max_tokens)
    }

    /// Initial token count in [0, max_tokens).
    pub fn seed_token_count(&self, cell: &Cell) -> u32 {
        let roll = luck(&format!("{},{},initialValue", cell.i, cell.j));
        // roll < 1.0, but guard the boundary against float rounding.
        ((roll * self.max_tokens as f64).floor() as u32).min(self.max_tokens - 1)
    }

    pub fn spawn_decision(&self, cell: &Cell) -> bool {
        LuckRng::from_key(&format!("{},{}", cell.i, cell.j)).chance(self.spawn_probability)
    }

    pub fn make_tokens(&self, cell: &Cell, count: u32) -> Vec<Token> {
        (1..=count as TokenNum).map(|num| Token::new(cell, num)).collect()
    }

    /// Fresh contents for a cell that has never been visited.
    pub fn initial_tokens(&self, cell: &Cell) -> Vec<Token> {
        self.make_tokens(cell, self.seed_token_count(cell))
    }
}
