//! Axis-aligned bounding-box hit tests
//!
//! All hit detection in this game is AABB overlap between a bullet point and
//! an entity box, padded by the bullet radius.

use glam::Vec2;

use crate::consts::BULLET_RADIUS;

/// Overlap test between two centers with the given half-extents.
#[inline]
pub fn aabb_overlap(a: Vec2, b: Vec2, half_w: f32, half_h: f32) -> bool {
    (a.x - b.x).abs() < half_w && (a.y - b.y).abs() < half_h
}

/// Does a bullet at `bullet_pos` hit a square entity of `size` centered at
/// `center`? The box is padded by the bullet radius.
#[inline]
pub fn bullet_hits(bullet_pos: Vec2, center: Vec2, size: f32) -> bool {
    let half = size / 2.0 + BULLET_RADIUS;
    aabb_overlap(bullet_pos, center, half, half)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_hit() {
        let center = Vec2::new(100.0, 100.0);
        assert!(bullet_hits(Vec2::new(100.0, 100.0), center, 28.0));
        assert!(bullet_hits(Vec2::new(112.0, 108.0), center, 28.0));
    }

    #[test]
    fn tolerance_extends_the_box() {
        let center = Vec2::new(100.0, 100.0);
        // Half-extent is 14 + 3; 16px off-center still hits, 17 does not
        assert!(bullet_hits(Vec2::new(116.0, 100.0), center, 28.0));
        assert!(!bullet_hits(Vec2::new(117.0, 100.0), center, 28.0));
    }

    #[test]
    fn miss_on_either_axis() {
        let center = Vec2::new(100.0, 100.0);
        assert!(!bullet_hits(Vec2::new(100.0, 140.0), center, 28.0));
        assert!(!bullet_hits(Vec2::new(140.0, 100.0), center, 28.0));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Vec2::new(10.0, 20.0);
        let b = Vec2::new(14.0, 17.0);
        assert_eq!(aabb_overlap(a, b, 5.0, 5.0), aabb_overlap(b, a, 5.0, 5.0));
    }
}
