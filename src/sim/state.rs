//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; the host owns it
//! and passes it by `&mut` into [`super::tick`].

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::Field;
use super::tick::{TickInput, spawn_wave};
use crate::consts::*;
use crate::highscores::{HighScoreEntry, resolve_name};
use crate::random_in_range;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen by the player
    Paused,
    /// Out of lives, waiting for the host to supply a name
    AwaitingName,
    /// Run ended and recorded
    GameOver,
}

/// Asteroid size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    /// Collision radius for this size class
    pub const fn radius(self) -> f32 {
        match self {
            AsteroidSize::Large => LARGE_RADIUS,
            AsteroidSize::Medium => MEDIUM_RADIUS,
            AsteroidSize::Small => SMALL_RADIUS,
        }
    }

    /// Size of the fragments this asteroid breaks into, if any
    pub const fn fragment_size(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// What a single bullet may destroy in one collision pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletHits {
    /// Every asteroid the bullet overlaps this tick is destroyed
    #[default]
    AllOverlapping,
    /// The bullet is spent on the first asteroid it overlaps
    FirstOnly,
}

/// How many lives overlapping asteroids may take in one collision pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShipHits {
    /// Each overlapping asteroid costs a life; the ship is re-centered between checks
    #[default]
    PerAsteroid,
    /// At most one life is lost per tick
    OncePerTick,
}

/// Collision resolution rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default)]
    pub bullet_hits: BulletHits,
    #[serde(default)]
    pub ship_hits: ShipHits,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// Facing angle (radians, 0 = +x, clockwise on screen)
    pub angle: f32,
    /// Velocity in field units per tick
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Wall-clock time left before the next shot is allowed
    pub fire_cooldown: Duration,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            angle: 0.0,
            vel: Vec2::ZERO,
            radius: SHIP_RADIUS,
            alive: true,
            fire_cooldown: Duration::ZERO,
        }
    }

    /// Unit vector the ship is facing
    #[inline]
    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Apply steering, thrust, momentum, drag and wrapping for one tick
    pub fn update(&mut self, input: &TickInput, field: &Field) {
        if !self.alive {
            return;
        }

        if input.turn_left {
            self.angle -= SHIP_TURN_RATE;
        }
        if input.turn_right {
            self.angle += SHIP_TURN_RATE;
        }
        if input.thrust {
            self.vel += self.heading() * SHIP_THRUST;
        }

        self.pos += self.vel;
        self.vel *= SHIP_DRAG;
        self.pos = field.wrap(self.pos);
    }

    /// Count down the fire cooldown by elapsed wall-clock time
    pub fn cool_down(&mut self, elapsed: Duration) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(elapsed);
    }

    pub fn can_fire(&self) -> bool {
        self.alive && self.fire_cooldown.is_zero()
    }

    /// Fire a bullet from the nose and re-arm the cooldown
    pub fn fire(&mut self) -> Option<Bullet> {
        if !self.can_fire() {
            return None;
        }
        let heading = self.heading();
        self.fire_cooldown = FIRE_COOLDOWN;
        Some(Bullet {
            pos: self.pos + heading * BULLET_SPAWN_OFFSET,
            vel: heading * BULLET_SPEED,
        })
    }

    /// Put the ship back at `pos`, at rest and facing +x
    pub fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.angle = 0.0;
    }
}

/// A bullet (point projectile, never wraps)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Bullet {
    pub fn update(&mut self) {
        self.pos += self.vel;
    }
}

/// An asteroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: AsteroidSize,
}

impl Asteroid {
    /// Create an asteroid at `pos` drifting with a random velocity
    pub fn new<R: Rng + ?Sized>(pos: Vec2, size: AsteroidSize, rng: &mut R) -> Self {
        let vel = Vec2::new(
            random_in_range(rng, -ASTEROID_MAX_SPEED, ASTEROID_MAX_SPEED),
            random_in_range(rng, -ASTEROID_MAX_SPEED, ASTEROID_MAX_SPEED),
        );
        Self { pos, vel, size }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.radius()
    }

    pub fn update(&mut self, field: &Field) {
        self.pos = field.wrap(self.pos + self.vel);
    }

    /// Fragments left behind when this asteroid is destroyed
    pub fn fragments<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Asteroid> {
        match self.size.fragment_size() {
            Some(size) => (0..FRAGMENT_COUNT)
                .map(|_| Asteroid::new(self.pos, size, rng))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AsteroidDestroyed { size: AsteroidSize, pos: Vec2 },
    ShipHit { lives_left: u8 },
    GameOver { score: u64 },
    WaveSpawned { wave: u32 },
}

/// Read-only view handed to renderers and loggers
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub field: Field,
    pub ship: &'a Ship,
    pub bullets: &'a [Bullet],
    pub asteroids: &'a [Asteroid],
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub field: Field,
    pub rules: Rules,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    /// Waves spawned so far (the opening wave is 1)
    pub wave_index: u32,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the opening wave already spawned
    pub fn new(field: Field, seed: u64) -> Self {
        Self::with_rules(field, seed, Rules::default())
    }

    pub fn with_rules(field: Field, seed: u64, rules: Rules) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            rules,
            score: 0,
            lives: STARTING_LIVES,
            phase: GamePhase::Running,
            wave_index: 0,
            time_ticks: 0,
            ship: Ship::new(field.center()),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            events: Vec::new(),
        };

        spawn_wave(&mut state);

        state
    }

    /// Start a fresh run on the same field; only allowed once the run is recorded
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.phase = GamePhase::Running;
        self.wave_index = 0;
        self.time_ticks = 0;
        self.ship = Ship::new(self.field.center());
        self.bullets.clear();
        self.asteroids.clear();
        self.events.clear();
        spawn_wave(self);
        log::info!("Restarted run");
        true
    }

    /// Resolve name entry after the last life is lost.
    ///
    /// Returns the leaderboard entry to record, or `None` when the game is not
    /// waiting for a name (so each game over yields exactly one entry).
    pub fn submit_name(&mut self, name: Option<&str>, default_name: &str) -> Option<HighScoreEntry> {
        if self.phase != GamePhase::AwaitingName {
            return None;
        }
        self.phase = GamePhase::GameOver;
        Some(HighScoreEntry {
            name: resolve_name(name, default_name),
            score: self.score,
        })
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            field: self.field,
            ship: &self.ship,
            bullets: &self.bullets,
            asteroids: &self.asteroids,
            score: self.score,
            lives: self.lives,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> Field {
        Field::new(800.0, 600.0)
    }

    #[test]
    fn test_new_game() {
        let state = GameState::new(field(), 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.asteroids.len(), 4);
        assert!(state.asteroids.iter().all(|a| a.size == AsteroidSize::Large));
        assert_eq!(state.ship.pos, Vec2::new(400.0, 300.0));
        assert!(state.ship.alive);
    }

    #[test]
    fn test_same_seed_same_wave() {
        let a = GameState::new(field(), 42);
        let b = GameState::new(field(), 42);
        assert_eq!(a.asteroids, b.asteroids);
    }

    #[test]
    fn test_radius_mapping() {
        assert_eq!(AsteroidSize::Large.radius(), 50.0);
        assert_eq!(AsteroidSize::Medium.radius(), 30.0);
        assert_eq!(AsteroidSize::Small.radius(), 15.0);
    }

    #[test]
    fn test_fragments() {
        let mut rng = Pcg32::seed_from_u64(3);
        let pos = Vec2::new(10.0, 20.0);

        let large = Asteroid::new(pos, AsteroidSize::Large, &mut rng);
        let children = large.fragments(&mut rng);
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.size == AsteroidSize::Medium && c.pos == pos));
        assert!(children.iter().all(|c| c.vel.abs().max_element() <= 2.0));

        let medium = Asteroid::new(pos, AsteroidSize::Medium, &mut rng);
        let children = medium.fragments(&mut rng);
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.size == AsteroidSize::Small));

        let small = Asteroid::new(pos, AsteroidSize::Small, &mut rng);
        assert!(small.fragments(&mut rng).is_empty());
    }

    #[test]
    fn test_ship_turn_and_thrust() {
        let mut ship = Ship::new(Vec2::new(400.0, 300.0));
        let input = TickInput {
            turn_right: true,
            thrust: true,
            ..Default::default()
        };
        ship.update(&input, &field());
        assert!((ship.angle - 0.07).abs() < 1e-6);
        let expected = Vec2::from_angle(0.07) * 0.1;
        // Position moves by the fresh velocity, then drag applies
        assert!((ship.pos - (Vec2::new(400.0, 300.0) + expected)).length() < 1e-4);
        assert!((ship.vel - expected * 0.99).length() < 1e-6);

        let input = TickInput {
            turn_left: true,
            ..Default::default()
        };
        ship.update(&input, &field());
        assert!(ship.angle.abs() < 1e-6);
    }

    #[test]
    fn test_ship_momentum_decays() {
        let mut ship = Ship::new(Vec2::new(400.0, 300.0));
        ship.vel = Vec2::new(1.0, 0.0);
        let idle = TickInput::default();
        for _ in 0..100 {
            ship.update(&idle, &field());
        }
        assert!(ship.vel.x > 0.0 && ship.vel.x < 0.37);
        assert!(ship.pos.x > 400.0);
    }

    #[test]
    fn test_ship_wraps() {
        let mut ship = Ship::new(Vec2::new(799.5, 300.0));
        ship.vel = Vec2::new(1.0, 0.0);
        ship.update(&TickInput::default(), &field());
        assert_eq!(ship.pos.x, 0.0);
    }

    #[test]
    fn test_dead_ship_does_not_move() {
        let mut ship = Ship::new(Vec2::new(100.0, 100.0));
        ship.vel = Vec2::new(1.0, 1.0);
        ship.alive = false;
        ship.update(&TickInput::default(), &field());
        assert_eq!(ship.pos, Vec2::new(100.0, 100.0));
        assert!(ship.fire().is_none());
    }

    #[test]
    fn test_fire_and_cooldown() {
        let mut ship = Ship::new(Vec2::new(100.0, 100.0));
        let bullet = ship.fire().expect("first shot");
        assert!((bullet.pos - Vec2::new(120.0, 100.0)).length() < 1e-5);
        assert!((bullet.vel - Vec2::new(6.0, 0.0)).length() < 1e-5);

        assert!(ship.fire().is_none());
        ship.cool_down(Duration::from_millis(299));
        assert!(ship.fire().is_none());
        ship.cool_down(Duration::from_millis(1));
        assert!(ship.fire().is_some());
    }

    #[test]
    fn test_submit_name_once() {
        let mut state = GameState::new(field(), 5);
        assert!(state.submit_name(Some("Ada"), "Player").is_none());

        state.score = 120;
        state.phase = GamePhase::AwaitingName;
        let entry = state.submit_name(Some("  "), "Player").unwrap();
        assert_eq!(entry.name, "Player");
        assert_eq!(entry.score, 120);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.submit_name(Some("Ada"), "Player").is_none());
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut state = GameState::new(field(), 5);
        assert!(!state.restart());

        state.phase = GamePhase::GameOver;
        state.score = 70;
        state.lives = 0;
        state.ship.alive = false;
        state.asteroids.clear();
        assert!(state.restart());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.ship.alive);
        assert_eq!(state.asteroids.len(), 4);
        assert_eq!(state.phase, GamePhase::Running);
    }

    proptest! {
        #[test]
        fn radius_is_function_of_size(seed in any::<u64>(), size in 0usize..3) {
            let size = [AsteroidSize::Large, AsteroidSize::Medium, AsteroidSize::Small][size];
            let mut rng = Pcg32::seed_from_u64(seed);
            let a = Asteroid::new(Vec2::ZERO, size, &mut rng);
            prop_assert_eq!(a.radius(), size.radius());
            for child in a.fragments(&mut rng) {
                prop_assert_eq!(child.radius(), child.size.radius());
                prop_assert!(child.radius() < a.radius());
            }
        }
    }
}
