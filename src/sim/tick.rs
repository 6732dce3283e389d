//! Simulation tick
//!
//! Core game loop step: moves every entity, resolves collisions and respawns
//! the field when it has been cleared.

use std::time::Duration;

use super::clock::FrameStep;
use super::collision::resolve_collisions;
use super::state::{Asteroid, AsteroidSize, GameEvent, GamePhase, GameState};
use crate::consts::WAVE_SIZE;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Rotate counter-clockwise on screen (held)
    pub turn_left: bool,
    /// Rotate clockwise on screen (held)
    pub turn_right: bool,
    /// Forward thrust (held)
    pub thrust: bool,
    /// Fire one bullet (edge-triggered)
    pub fire: bool,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
    /// Start a new run from the game-over screen (edge-triggered)
    pub restart: bool,
}

/// Advance the game state by one tick.
///
/// `elapsed` is the wall-clock time this tick stands for. It always counts
/// down the fire cooldown, even while the game is paused or over; everything
/// else only happens while the game is running.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed: Duration) {
    state.ship.cool_down(elapsed);

    if input.restart && state.restart() {
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                log::debug!("Resumed");
            }
            _ => {}
        }
    }

    // Don't tick unless running
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;

    if input.fire {
        if let Some(bullet) = state.ship.fire() {
            state.bullets.push(bullet);
        }
    }

    state.ship.update(input, &state.field);

    let field = state.field;
    for bullet in &mut state.bullets {
        bullet.update();
    }
    state.bullets.retain(|b| field.contains_strict(b.pos));

    for asteroid in &mut state.asteroids {
        asteroid.update(&field);
    }

    resolve_collisions(state);

    if state.asteroids.is_empty() {
        spawn_wave(state);
    }
}

/// Run every tick one host frame asks for.
///
/// The frame's real elapsed time goes to the first tick, before it fires, and
/// the rest see none. A frame that runs no tick still counts down the fire
/// cooldown, so shots stay paced by wall-clock time on any frame rate.
pub fn run_frame<F>(state: &mut GameState, step: FrameStep, mut next_input: F)
where
    F: FnMut() -> TickInput,
{
    if step.ticks == 0 {
        state.ship.cool_down(step.elapsed);
        return;
    }
    for i in 0..step.ticks {
        let input = next_input();
        let elapsed = if i == 0 { step.elapsed } else { Duration::ZERO };
        tick(state, &input, elapsed);
    }
}

/// Add a wave of large asteroids at random positions
pub fn spawn_wave(state: &mut GameState) {
    for _ in 0..WAVE_SIZE {
        let pos = state.field.random_position(&mut state.rng);
        let asteroid = Asteroid::new(pos, AsteroidSize::Large, &mut state.rng);
        state.asteroids.push(asteroid);
    }
    state.wave_index += 1;
    state.events.push(GameEvent::WaveSpawned {
        wave: state.wave_index,
    });
    log::debug!("Spawned wave {} ({} asteroids)", state.wave_index, WAVE_SIZE);
}
