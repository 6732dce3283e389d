//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in field coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::from_angle(theta1);
        let dir2 = Vec2::from_angle(theta2);
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        quad(&mut vertices, inner1, outer1, inner2, outer2, color);
    }

    vertices
}

/// Generate vertices for a closed polygon outline
pub fn outline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity(points.len() * 6);
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        push_line(&mut vertices, a, b, width, color);
    }
    vertices
}

fn push_line(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(vertices, a + perp, a - perp, b + perp, b - perp, color);
}

fn quad(vertices: &mut Vec<Vertex>, a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2, color: [f32; 4]) {
    vertices.push(Vertex::new(a1.x, a1.y, color));
    vertices.push(Vertex::new(a2.x, a2.y, color));
    vertices.push(Vertex::new(b1.x, b1.y, color));

    vertices.push(Vertex::new(b1.x, b1.y, color));
    vertices.push(Vertex::new(a2.x, a2.y, color));
    vertices.push(Vertex::new(b2.x, b2.y, color));
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 2.0, WHITE, 8).len(), 24);
    }

    #[test]
    fn test_ring_stays_between_radii() {
        let center = Vec2::new(100.0, 100.0);
        for v in ring(center, 49.0, 51.0, WHITE, 32) {
            let d = Vec2::from(v.position).distance(center);
            assert!((48.99..=51.01).contains(&d), "{d}");
        }
    }

    #[test]
    fn test_outline_width() {
        // Degenerate two-point outline: the segment and its way back
        let vertices = outline(&[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)], 2.0, WHITE);
        assert_eq!(vertices.len(), 12);
        for v in vertices {
            assert!((v.position[1].abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_outline_closes() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(outline(&square, 0.1, WHITE).len(), 4 * 6);
        assert!(outline(&square[..1], 0.1, WHITE).is_empty());
    }
}
