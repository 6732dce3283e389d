//! Toroidal play-field
//!
//! Field coordinates match the canvas: origin top-left, y grows downward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::random_in_range;

/// Rectangular field whose opposite edges are joined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wrap a position that crossed an edge onto the opposite edge.
    ///
    /// Each axis is handled independently. A coordinate below zero jumps to the
    /// far edge and one past the far edge jumps to zero; coordinates inside
    /// `[0, size]` are untouched.
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(wrap_axis(pos.x, self.width), wrap_axis(pos.y, self.height))
    }

    /// True while a point is strictly inside the field on both axes
    pub fn contains_strict(&self, pos: Vec2) -> bool {
        pos.x > 0.0 && pos.x < self.width && pos.y > 0.0 && pos.y < self.height
    }

    /// Uniformly random position inside the field
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            random_in_range(rng, 0.0, self.width),
            random_in_range(rng, 0.0, self.height),
        )
    }
}

#[inline]
fn wrap_axis(v: f32, size: f32) -> f32 {
    if v < 0.0 {
        size
    } else if v > size {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_each_edge() {
        let field = Field::new(800.0, 600.0);
        assert_eq!(field.wrap(Vec2::new(-0.5, 300.0)), Vec2::new(800.0, 300.0));
        assert_eq!(field.wrap(Vec2::new(800.5, 300.0)), Vec2::new(0.0, 300.0));
        assert_eq!(field.wrap(Vec2::new(400.0, -1.0)), Vec2::new(400.0, 600.0));
        assert_eq!(field.wrap(Vec2::new(400.0, 601.0)), Vec2::new(400.0, 0.0));
    }

    #[test]
    fn test_wrap_boundary_is_inside() {
        let field = Field::new(800.0, 600.0);
        assert_eq!(field.wrap(Vec2::new(0.0, 600.0)), Vec2::new(0.0, 600.0));
        assert_eq!(field.wrap(Vec2::new(800.0, 0.0)), Vec2::new(800.0, 0.0));
    }

    #[test]
    fn test_wrap_both_axes() {
        let field = Field::new(100.0, 100.0);
        assert_eq!(field.wrap(Vec2::new(-3.0, 104.0)), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_contains_strict_excludes_edges() {
        let field = Field::new(100.0, 50.0);
        assert!(field.contains_strict(Vec2::new(1.0, 1.0)));
        assert!(!field.contains_strict(Vec2::new(0.0, 25.0)));
        assert!(!field.contains_strict(Vec2::new(100.0, 25.0)));
        assert!(!field.contains_strict(Vec2::new(50.0, 0.0)));
        assert!(!field.contains_strict(Vec2::new(50.0, 50.0)));
    }

    proptest! {
        #[test]
        fn wrapped_one_step_stays_in_field(
            x in -10.0f32..810.0,
            y in -10.0f32..610.0,
        ) {
            let field = Field::new(800.0, 600.0);
            let p = field.wrap(Vec2::new(x, y));
            prop_assert!(p.x >= 0.0 && p.x <= field.width);
            prop_assert!(p.y >= 0.0 && p.y <= field.height);
        }
    }
}
