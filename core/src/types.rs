//! Shared primitive types used across the entire game core.

/// A grid index along one axis. Cells are addressed by a pair of these.
pub type GridIndex = i32;

/// The 1-based sequence number of a token within the cache that minted it.
pub type TokenNum = u32;

