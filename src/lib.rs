//! Moon Run - a space arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `scheduler`: Fixed-timestep frame loop
//! - `input`: Logical key state polled by the simulation
//! - `render`: Canvas 2D renderer (wasm)
//! - `assets`: Image store keyed by logical name (wasm)
//! - `settings`: Player preferences persisted in LocalStorage

pub mod input;
pub mod scheduler;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use scheduler::{FrameSource, Scheduler, SchedulerBuilder};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (fixed updates per second)
    pub const SIM_FPS: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_FPS as f32;
    /// Frames whose delta exceeds this are dropped outright (tab suspension)
    pub const FRAME_GAP_CLAMP_MS: f64 = 1000.0;

    /// Map dimensions - a square that grows as the player scores
    pub const MAP_BASE_SIZE: f32 = 2000.0;
    pub const MAP_GROWTH_PER_SCORE: f32 = 120.0;
    pub const MAP_MAX_SIZE: f32 = 6000.0;

    /// Ship handling
    pub const SHIP_HALF_WIDTH: f32 = 22.0;
    pub const SHIP_HALF_HEIGHT: f32 = 14.0;
    pub const SHIP_TURN_RATE: f32 = 3.2; // radians per second
    pub const SHIP_THRUST: f32 = 260.0; // pixels per second^2
    pub const SHIP_MAX_SPEED: f32 = 340.0;
    pub const SHIP_DRAG: f32 = 0.6; // fraction of velocity shed per second

    /// Fuel economy
    pub const FUEL_CAPACITY: f32 = 100.0;
    pub const FUEL_IDLE_DRAIN: f32 = 1.2; // per second, life support
    pub const FUEL_THRUST_DRAIN: f32 = 6.5; // per second while burning
    pub const FUEL_PER_CAN: f32 = 28.0;

    /// Fuel can geometry and population
    pub const CAN_HALF_SIZE: f32 = 12.0;
    pub const CAN_SPIN_RATE: f32 = 0.8;
    pub const CAN_TARGET_COUNT: usize = 6;

    /// Asteroid tuning
    pub const ASTEROID_MIN_HALF: f32 = 16.0;
    pub const ASTEROID_MAX_HALF: f32 = 46.0;
    pub const ASTEROID_MIN_SPEED: f32 = 40.0;
    pub const ASTEROID_MAX_SPEED: f32 = 150.0;
    pub const ASTEROID_MAX_SPIN: f32 = 1.4;
    /// Distance past the map edge at which asteroids are culled
    pub const ASTEROID_CULL_MARGIN: f32 = 200.0;
    /// Base interval between asteroid spawns, in ticks
    pub const ASTEROID_SPAWN_INTERVAL: u32 = 150;

    /// Landing targets (fixed world positions inside the base map)
    pub const MOON_CENTER: (f32, f32) = (420.0, 380.0);
    pub const MOON_HALF_SIZE: f32 = 48.0;
    pub const EARTH_CENTER: (f32, f32) = (1650.0, 1580.0);
    pub const EARTH_HALF_SIZE: f32 = 64.0;
    pub const MOON_LANDING_BONUS: u64 = 50;
    pub const EARTH_LANDING_BONUS: u64 = 100;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Rotate a point about the origin by `angle` radians
#[inline]
pub fn rotate_point(p: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
