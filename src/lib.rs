// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Rampart: a turn-by-turn decision core for a two-player tower-defense game.
//!
//! The game host streams JSON frames over stdin. Every decision phase the
//! strategy builds prioritized defensive tiers, upgrades key structures,
//! predicts whether the opponent is about to attack, places counter-units
//! at the usual moments of contact, and launches a scout offensive once it
//! can afford one. Action sub-frames between decisions feed telemetry.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      protocol (stdin / stdout)      │
//! ├─────────────────────────────────────┤
//! │   strategy (planner, telemetry...)  │
//! ├─────────────────────────────────────┤
//! │  game (frames, catalog, Arena/Turn) │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod strategy;

pub use config::Tuning;
pub use error::{ConfigError, FrameError, ProtocolError};

// Re-export key types at crate root for convenience
pub use game::{Arena, Coord, Frame, Phase, Side, Structure, Turn, UnitCatalog, UnitType};
pub use protocol::{GameSummary, run};
pub use strategy::{Strategy, TurnReport};
