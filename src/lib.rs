//! Asteroid Drift - An asteroids arcade game on a toroidal field
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, wrapping, collisions, game state)
//! - `highscores`: Persisted top-5 leaderboard
//! - `persistence`: Key-value stores backing the leaderboard and settings
//! - `platform`: Keyboard mapping and browser glue
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences and collision rules

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ship handling (per tick)
    pub const SHIP_RADIUS: f32 = 15.0;
    pub const SHIP_TURN_RATE: f32 = 0.07;
    pub const SHIP_THRUST: f32 = 0.1;
    pub const SHIP_DRAG: f32 = 0.99;

    /// Bullets spawn this far ahead of the ship center
    pub const BULLET_SPAWN_OFFSET: f32 = 20.0;
    pub const BULLET_SPEED: f32 = 6.0;
    /// Wall-clock time between two shots
    pub const FIRE_COOLDOWN: Duration = Duration::from_millis(300);

    /// Asteroid radii by size class
    pub const LARGE_RADIUS: f32 = 50.0;
    pub const MEDIUM_RADIUS: f32 = 30.0;
    pub const SMALL_RADIUS: f32 = 15.0;
    /// Asteroid velocity components are drawn from [-ASTEROID_MAX_SPEED, ASTEROID_MAX_SPEED]
    pub const ASTEROID_MAX_SPEED: f32 = 2.0;
    /// Fragments produced by a large or medium asteroid
    pub const FRAGMENT_COUNT: usize = 2;
    /// Large asteroids per wave
    pub const WAVE_SIZE: usize = 4;

    pub const STARTING_LIVES: u8 = 3;
    pub const POINTS_PER_ASTEROID: u64 = 10;

    /// Leaderboard capacity
    pub const MAX_HIGH_SCORES: usize = 5;
    /// Name used when name entry is empty or cancelled
    pub const DEFAULT_PLAYER_NAME: &str = "Player";
}

/// Uniform random value in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
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

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}
