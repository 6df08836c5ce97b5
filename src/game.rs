//! Game layer for Rampart.
//!
//! Everything the strategy needs from the game host, and nothing else:
//! - Board coordinates and diamond-arena geometry
//! - The unit catalog resolved from the start-of-game configuration
//! - Frame decoding (turn snapshots and action sub-frames)
//! - The [`Arena`] trait and its per-turn implementation

mod arena;
mod coord;
mod frame;
mod turn;
mod units;

pub use arena::{Arena, Side, Structure};
pub use coord::{ARENA_SIZE, Coord, HALF_ARENA, MIDLINE};
pub use frame::{
    AttackEvent, BreachEvent, Events, Frame, Phase, PlayerStats, SpawnEvent, TurnInfo,
};
pub use turn::{Order, OrderKind, Submission, Turn};
pub use units::{Cost, PLAYABLE_UNIT_COUNT, Resource, UnitCatalog, UnitInfo, UnitType};
