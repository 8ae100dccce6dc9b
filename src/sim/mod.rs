//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{overlaps, overlaps_symmetric};
pub use rect::OrientedRect;
pub use state::{
    Asteroid, FuelCan, GameOverCause, GamePhase, GameState, RngState, Ship, Target, TargetKind,
};
pub use tick::{TickInput, tick};
