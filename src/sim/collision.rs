//! Collision detection and fragmentation
//!
//! Runs once per tick after every entity has moved. Removals are marked during
//! the scan and compacted afterwards, so indices never shift mid-pass.

use super::state::{
    Asteroid, AsteroidSize, Bullet, BulletHits, GameEvent, GamePhase, GameState, Ship, ShipHits,
};
use crate::consts::POINTS_PER_ASTEROID;
use crate::distance;

/// Bullets are points: they hit when strictly inside the asteroid radius
#[inline]
pub fn bullet_hits_asteroid(bullet: &Bullet, asteroid: &Asteroid) -> bool {
    distance(bullet.pos, asteroid.pos) < asteroid.radius()
}

#[inline]
pub fn ship_hits_asteroid(ship: &Ship, asteroid: &Asteroid) -> bool {
    distance(ship.pos, asteroid.pos) < asteroid.radius() + ship.radius
}

/// Outcome of one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    pub asteroids_destroyed: u32,
    pub lives_lost: u8,
}

/// Run the bullet pass, then the ship pass
pub fn resolve_collisions(state: &mut GameState) -> CollisionResult {
    let asteroids_destroyed = resolve_bullet_hits(state);
    let lives_lost = resolve_ship_hits(state);
    CollisionResult {
        asteroids_destroyed,
        lives_lost,
    }
}

/// Destroy every asteroid hit by a bullet and split it into fragments.
///
/// Pairs are tested against the asteroids present when the pass starts;
/// fragments join the field afterwards and are first tested next tick. An
/// asteroid is destroyed at most once. Whether one bullet can destroy several
/// overlapping asteroids is decided by [`BulletHits`].
pub fn resolve_bullet_hits(state: &mut GameState) -> u32 {
    if state.bullets.is_empty() || state.asteroids.is_empty() {
        return 0;
    }

    let mut spent = vec![false; state.bullets.len()];
    let mut destroyed = vec![false; state.asteroids.len()];
    let mut fragments: Vec<Asteroid> = Vec::new();
    let mut count = 0;

    for (bi, bullet) in state.bullets.iter().enumerate() {
        for (ai, asteroid) in state.asteroids.iter().enumerate() {
            if spent[bi] && state.rules.bullet_hits == BulletHits::FirstOnly {
                break;
            }
            if destroyed[ai] || !bullet_hits_asteroid(bullet, asteroid) {
                continue;
            }

            spent[bi] = true;
            destroyed[ai] = true;
            count += 1;
            state.score += POINTS_PER_ASTEROID;
            fragments.extend(asteroid.fragments(&mut state.rng));
            state.events.push(GameEvent::AsteroidDestroyed {
                size: asteroid.size,
                pos: asteroid.pos,
            });
        }
    }

    state.bullets = compact(std::mem::take(&mut state.bullets), &spent);
    state.asteroids = compact(std::mem::take(&mut state.asteroids), &destroyed);
    state.asteroids.extend(fragments);

    count
}

/// Take lives for asteroids overlapping the ship.
///
/// Asteroids are checked in order against the ship's current position. A
/// non-fatal hit re-centers the ship; under [`ShipHits::PerAsteroid`] the
/// remaining asteroids are then checked against the re-centered ship. Losing
/// the last life kills the ship, ends the run and stops the pass.
pub fn resolve_ship_hits(state: &mut GameState) -> u8 {
    if !state.ship.alive {
        return 0;
    }

    let mut lost = 0;
    for asteroid in &state.asteroids {
        if !ship_hits_asteroid(&state.ship, asteroid) {
            continue;
        }

        state.lives = state.lives.saturating_sub(1);
        lost += 1;

        if state.lives == 0 {
            state.ship.alive = false;
            state.phase = GamePhase::AwaitingName;
            state.events.push(GameEvent::GameOver { score: state.score });
            log::info!("Game over with score {}", state.score);
            break;
        }

        state.ship.respawn(state.field.center());
        state.events.push(GameEvent::ShipHit {
            lives_left: state.lives,
        });
        log::info!("Ship hit, {} lives left", state.lives);

        if state.rules.ship_hits == ShipHits::OncePerTick {
            break;
        }
    }

    lost
}

fn compact<T>(items: Vec<T>, removed: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(removed)
        .filter_map(|(item, &gone)| (!gone).then_some(item))
        .collect()
}

/// Count of asteroids by size, used by tests and the attract-mode log
pub fn size_census(asteroids: &[Asteroid]) -> [usize; 3] {
    let mut census = [0; 3];
    for asteroid in asteroids {
        let slot = match asteroid.size {
            AsteroidSize::Large => 0,
            AsteroidSize::Medium => 1,
            AsteroidSize::Small => 2,
        };
        census[slot] += 1;
    }
    census
}
