//! Oriented rectangle geometry for ship, asteroid and pickup hitboxes
//!
//! A rectangle is axis-aligned before rotation: half extents around the
//! center, then rotated about the center by `rotation` radians. Corners are
//! derived fresh per query - there is no cached vertex set to invalidate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rotate_point;

/// A rectangle rotated about its own center
///
/// Invariant: half extents are non-negative. Degenerate (zero-area)
/// rectangles are not meaningful collision inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    /// Center position in world space
    pub center: Vec2,
    /// Half width (x) and half height (y) before rotation
    pub half_extents: Vec2,
    /// Rotation about the center, radians
    pub rotation: f32,
}

impl OrientedRect {
    pub fn new(center: Vec2, half_width: f32, half_height: f32, rotation: f32) -> Self {
        debug_assert!(half_width >= 0.0 && half_height >= 0.0);
        Self {
            center,
            half_extents: Vec2::new(half_width, half_height),
            rotation,
        }
    }

    /// Axis-aligned rectangle (rotation zero)
    pub fn axis_aligned(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self::new(center, half_width, half_height, 0.0)
    }

    /// The 4 corners in world space, counter-clockwise
    ///
    /// Computed per call: corner offsets rotated by `rotation`, translated
    /// by `center`.
    pub fn corners(&self) -> [Vec2; 4] {
        let Vec2 { x: hw, y: hh } = self.half_extents;
        let offsets = [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        offsets.map(|o| self.center + rotate_point(o, self.rotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_corners_axis_aligned() {
        let r = OrientedRect::axis_aligned(Vec2::new(10.0, 20.0), 3.0, 2.0);
        let c = r.corners();
        assert!(approx(c[0], Vec2::new(7.0, 18.0)));
        assert!(approx(c[1], Vec2::new(13.0, 18.0)));
        assert!(approx(c[2], Vec2::new(13.0, 22.0)));
        assert!(approx(c[3], Vec2::new(7.0, 22.0)));
    }

    #[test]
    fn test_corners_quarter_turn() {
        // 90 degree rotation swaps the roles of width and height
        let r = OrientedRect::new(Vec2::ZERO, 4.0, 1.0, FRAC_PI_2);
        let c = r.corners();
        assert!(approx(c[0], Vec2::new(1.0, -4.0)));
        assert!(approx(c[1], Vec2::new(1.0, 4.0)));
        assert!(approx(c[2], Vec2::new(-1.0, 4.0)));
        assert!(approx(c[3], Vec2::new(-1.0, -4.0)));
    }

    #[test]
    fn test_corners_recomputed_after_mutation() {
        let mut r = OrientedRect::axis_aligned(Vec2::ZERO, 2.0, 2.0);
        let before = r.corners();
        r.center.x += 5.0;
        let after = r.corners();
        assert!(approx(after[0], before[0] + Vec2::new(5.0, 0.0)));
    }
}
