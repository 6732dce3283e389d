//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, wall-clock time passed in explicitly
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod clock;
pub mod collision;
pub mod field;
pub mod state;
pub mod tick;

pub use clock::{FrameClock, FrameStep};
pub use collision::{
    CollisionResult, bullet_hits_asteroid, resolve_collisions, ship_hits_asteroid, size_census,
};
pub use field::Field;
pub use state::{
    Asteroid, AsteroidSize, Bullet, BulletHits, GameEvent, GamePhase, GameState, Rules, Ship,
    ShipHits, Snapshot,
};
pub use tick::{TickInput, run_frame, spawn_wave, tick};
