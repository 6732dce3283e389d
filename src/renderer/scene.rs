//! Scene building: turns a simulation snapshot into vertices

use glam::Vec2;

use super::shapes::{circle, outline, ring};
use super::vertex::{Vertex, colors};
use crate::sim::{Asteroid, Ship, Snapshot};

/// Stroke width for outlines (field units)
pub const STROKE_WIDTH: f32 = 1.5;
/// Bullet dot radius
pub const BULLET_RADIUS: f32 = 2.0;

/// Ship dart in ship space, nose along +x
const SHIP_SHAPE: [Vec2; 4] = [
    Vec2::new(20.0, 0.0),
    Vec2::new(-10.0, -10.0),
    Vec2::new(-5.0, 0.0),
    Vec2::new(-10.0, 10.0),
];

/// Ship outline corners in field coordinates
pub fn ship_points(ship: &Ship) -> [Vec2; 4] {
    let rotation = Vec2::from_angle(ship.angle);
    SHIP_SHAPE.map(|p| ship.pos + rotation.rotate(p))
}

fn asteroid_segments(asteroid: &Asteroid) -> u32 {
    // Roughly one segment per 4 units of circumference
    ((asteroid.radius() * 1.5) as u32).clamp(12, 64)
}

/// Build the vertex list for one frame
pub fn build_scene(snapshot: &Snapshot<'_>) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    if snapshot.ship.alive {
        vertices.extend(outline(&ship_points(snapshot.ship), STROKE_WIDTH, colors::SHIP));
    }

    for bullet in snapshot.bullets {
        vertices.extend(circle(bullet.pos, BULLET_RADIUS, colors::BULLET, 8));
    }

    for asteroid in snapshot.asteroids {
        let r = asteroid.radius();
        vertices.extend(ring(
            asteroid.pos,
            r - STROKE_WIDTH / 2.0,
            r + STROKE_WIDTH / 2.0,
            colors::ASTEROID,
            asteroid_segments(asteroid),
        ));
    }

    vertices
}
