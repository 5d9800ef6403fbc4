//! Tokens and the per-cell caches that hold them.

use crate::{
    board::Cell,
    types::{GridIndex, TokenNum},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A minted coin. `(i, j)` is the cell that minted it; `num` is its
/// 1-based serial within that cell's original cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Token {
    pub i:   GridIndex,
    pub j:   GridIndex,
    pub num: TokenNum,
}

impl Token {
    pub fn new(cell: &Cell, num: TokenNum) -> Self {
        Self { i: cell.i, j: cell.j, num }
    }

    pub fn origin(&self) -> Cell {
        Cell::new(self.i, self.j)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.i, self.j, self.num)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    pub cell:   Cell,
    pub tokens: Vec<Token>,
}

impl Cache {
    pub fn new(cell: Cell, tokens: Vec<Token>) -> Self {
        Self { cell, tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
