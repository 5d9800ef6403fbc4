//! The player's personal token collection.
//!
//! The token count is always `tokens.len()`; there is no separate counter
//! to drift out of step.

use crate::cache::Token;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    tokens: Vec<Token>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    /// The token that `pop` would return.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl From<Vec<Token>> for Inventory {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut inv = Inventory::new();
        let a = Token { i: 1, j: 1, num: 1 };
        let b = Token { i: 2, j: 2, num: 1 };
        inv.push(a);
        inv.push(b);
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.peek(), Some(&b));
        assert_eq!(inv.pop(), Some(b));
        assert_eq!(inv.pop(), Some(a));
        assert_eq!(inv.pop(), None);
        assert!(inv.is_empty());
    }

    #[test]
    fn serializes_as_a_plain_array() {
        let inv = Inventory::from(vec![Token { i: 3, j: 4, num: 2 }]);
        assert_eq!(
            serde_json::to_string(&inv).unwrap(),
            r#"[{"i":3,"j":4,"num":2}]"#
        );
    }
}
