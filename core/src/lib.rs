//! GeoCoin Collector game core.
//!
//! Spatial grid, deterministic cache seeding, and memento persistence
//! for a location-based coin collecting game. Rendering and device input
//! live outside this crate and drive it through `session::GameSession`.

pub mod board;
pub mod cache;
pub mod cache_store;
pub mod config;
pub mod error;
pub mod event;
pub mod generator;
pub mod geo;
pub mod inventory;
pub mod memento;
pub mod player;
pub mod rng;
pub mod session;
pub mod store;
pub mod types;
