//! Game state and core simulation types
//!
//! Everything needed to resume a run deterministically lives here and is
//! serializable. Entity collections keep stable id order so ticks replay
//! identically for equal seeds.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::OrientedRect;
use crate::consts::*;
use crate::{heading_vector, normalize_angle};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ship under player control
    Flying,
    /// Game is paused
    Paused,
    /// Ship reached a landing target - run complete
    Landed { target: TargetKind },
    /// Run ended
    GameOver { cause: GameOverCause },
}

/// The two fixed landing targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Moon,
    Earth,
}

impl TargetKind {
    pub fn landing_bonus(&self) -> u64 {
        match self {
            TargetKind::Moon => MOON_LANDING_BONUS,
            TargetKind::Earth => EARTH_LANDING_BONUS,
        }
    }
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    Asteroid,
    OutOfFuel,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle, radians
    pub heading: f32,
    /// True while thrust was applied this tick (renderer draws the flame)
    pub thrusting: bool,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            thrusting: false,
        }
    }

    /// Collision bounds (recomputed per query, never cached)
    pub fn bounds(&self) -> OrientedRect {
        OrientedRect::new(self.pos, SHIP_HALF_WIDTH, SHIP_HALF_HEIGHT, self.heading)
    }

    /// Integrate one tick of steering and thrust
    pub fn steer(&mut self, turn: f32, thrust: bool, dt: f32) {
        self.heading = normalize_angle(self.heading + turn * SHIP_TURN_RATE * dt);
        self.thrusting = thrust;
        if thrust {
            self.vel += heading_vector(self.heading) * SHIP_THRUST * dt;
        }
        // Drag, then speed clamp
        self.vel *= 1.0 - (SHIP_DRAG * dt).min(1.0);
        let speed = self.vel.length();
        if speed > SHIP_MAX_SPEED {
            self.vel *= SHIP_MAX_SPEED / speed;
        }
        self.pos += self.vel * dt;
    }

    /// Keep the ship inside the map square, killing velocity into the wall
    pub fn clamp_to_map(&mut self, map_size: f32) {
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = self.vel.x.max(0.0);
        } else if self.pos.x > map_size {
            self.pos.x = map_size;
            self.vel.x = self.vel.x.min(0.0);
        }
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.max(0.0);
        } else if self.pos.y > map_size {
            self.pos.y = map_size;
            self.vel.y = self.vel.y.min(0.0);
        }
    }
}

/// A drifting asteroid with a spinning rectangular hitbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extents: Vec2,
    pub rotation: f32,
    /// Spin rate, radians per second
    pub spin: f32,
}

impl Asteroid {
    pub fn bounds(&self) -> OrientedRect {
        OrientedRect {
            center: self.pos,
            half_extents: self.half_extents,
            rotation: self.rotation,
        }
    }

    /// Linear drift plus spin
    pub fn drift(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.rotation = normalize_angle(self.rotation + self.spin * dt);
    }

    /// True once the asteroid has left the map by more than the cull margin
    pub fn out_of_bounds(&self, map_size: f32) -> bool {
        let m = ASTEROID_CULL_MARGIN;
        self.pos.x < -m || self.pos.y < -m || self.pos.x > map_size + m || self.pos.y > map_size + m
    }
}

/// A collectible fuel can
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelCan {
    pub id: u32,
    pub pos: Vec2,
    pub rotation: f32,
}

impl FuelCan {
    pub fn bounds(&self) -> OrientedRect {
        OrientedRect::new(self.pos, CAN_HALF_SIZE, CAN_HALF_SIZE, self.rotation)
    }
}

/// A fixed landing target (axis-aligned)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    pub center: Vec2,
    pub half_size: f32,
}

impl Target {
    pub fn bounds(&self) -> OrientedRect {
        OrientedRect::axis_aligned(self.center, self.half_size, self.half_size)
    }
}

/// RNG state wrapper for serialization
///
/// Spawn decisions draw from a fresh `Pcg32` on an incremented stream, so
/// the sequence is reproducible for equal seeds and survives save/load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        self.stream += 1;
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Score (fuel cans collected plus landing bonus)
    pub score: u64,
    /// Remaining fuel
    pub fuel: f32,
    /// Side length of the square map; grows with score
    pub map_size: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks until the next asteroid spawn
    pub asteroid_spawn_cooldown: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Player ship
    pub ship: Ship,
    /// Drifting asteroids (sorted by id for determinism)
    pub asteroids: Vec<Asteroid>,
    /// Fuel cans (sorted by id for determinism)
    pub cans: Vec<FuelCan>,
    /// Landing targets, fixed for the whole run
    pub targets: [Target; 2],
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        let map_size = MAP_BASE_SIZE;
        Self {
            seed,
            rng_state: RngState::new(seed),
            score: 0,
            fuel: FUEL_CAPACITY,
            map_size,
            time_ticks: 0,
            asteroid_spawn_cooldown: ASTEROID_SPAWN_INTERVAL,
            phase: GamePhase::Flying,
            ship: Ship::new(Vec2::splat(map_size / 2.0)),
            asteroids: Vec::new(),
            cans: Vec::new(),
            targets: [
                Target {
                    kind: TargetKind::Moon,
                    center: Vec2::new(MOON_CENTER.0, MOON_CENTER.1),
                    half_size: MOON_HALF_SIZE,
                },
                Target {
                    kind: TargetKind::Earth,
                    center: Vec2::new(EARTH_CENTER.0, EARTH_CENTER.1),
                    half_size: EARTH_HALF_SIZE,
                },
            ],
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Grow the map for the current score, capped
    pub fn grow_map(&mut self) {
        self.map_size =
            (MAP_BASE_SIZE + self.score as f32 * MAP_GROWTH_PER_SCORE).min(MAP_MAX_SIZE);
    }

    /// Ensure entity collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.asteroids.sort_by_key(|a| a.id);
        self.cans.sort_by_key(|c| c.id);
    }

    /// True once the run has reached a terminal phase
    pub fn is_over(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Landed { .. } | GamePhase::GameOver { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_clamped_to_map() {
        let mut ship = Ship::new(Vec2::new(-10.0, 2500.0));
        ship.vel = Vec2::new(-50.0, 80.0);
        ship.clamp_to_map(2000.0);
        assert_eq!(ship.pos, Vec2::new(0.0, 2000.0));
        assert_eq!(ship.vel.x, 0.0);
        assert_eq!(ship.vel.y, 0.0);
    }

    #[test]
    fn test_ship_speed_clamped() {
        let mut ship = Ship::new(Vec2::ZERO);
        for _ in 0..600 {
            ship.steer(0.0, true, SIM_DT);
        }
        assert!(ship.vel.length() <= SHIP_MAX_SPEED + 1e-3);
    }

    #[test]
    fn test_map_growth_capped() {
        let mut state = GameState::new(1);
        state.score = 10;
        state.grow_map();
        assert_eq!(state.map_size, MAP_BASE_SIZE + 10.0 * MAP_GROWTH_PER_SCORE);
        state.score = 100_000;
        state.grow_map();
        assert_eq!(state.map_size, MAP_MAX_SIZE);
    }

    #[test]
    fn test_rng_state_reproducible() {
        let mut a = RngState::new(42);
        let mut b = RngState::new(42);
        use rand::Rng;
        let xa: u32 = a.next_rng().random();
        let xb: u32 = b.next_rng().random();
        assert_eq!(xa, xb);
        // A later stream draws a different sequence
        let xc: u32 = a.next_rng().random();
        assert_ne!(xa, xc);
    }

    #[test]
    fn test_targets_inside_base_map() {
        let state = GameState::new(7);
        for target in &state.targets {
            let b = target.bounds();
            assert!(b.center.x + b.half_extents.x < state.map_size);
            assert!(b.center.y + b.half_extents.y < state.map_size);
        }
    }
}
