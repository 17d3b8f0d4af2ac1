//! Collision detection and response for rectangular bodies
//!
//! Every moving body in the arcade games is an axis-aligned box: the Pong
//! ball and paddles, the Flappy bird and pipe segments.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box, `min` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Aabb {
        let min = self.min.min(other.min);
        Aabb::new(min, self.max().max(other.max()) - min)
    }

    /// Strict overlap: touching edges do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing toward the mover, for reflection)
    pub normal: Vec2,
    /// Penetration depth along the normal (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a mover that travelled `travel` this tick against a paddle whose
/// hitting face points along `face` (`Vec2::X` for a paddle on the left edge,
/// `-Vec2::X` on the right).
///
/// The whole path is tested, not just the end position, so a fast mover
/// cannot tunnel through a thin paddle in one long tick. Only reports a hit
/// while the mover travels into the face, so a ball that was already
/// reflected this contact is not reflected back.
pub fn box_paddle_collision(mover: &Aabb, travel: Vec2, paddle: &Aabb, face: Vec2) -> CollisionResult {
    if travel.dot(face) >= 0.0 {
        return CollisionResult::miss();
    }
    let start = Aabb::new(mover.min - travel, mover.size);
    if !mover.union(&start).overlaps(paddle) {
        return CollisionResult::miss();
    }

    let penetration = if face.x > 0.0 {
        paddle.max().x - mover.min.x
    } else {
        mover.max().x - paddle.min.x
    };

    CollisionResult {
        hit: true,
        normal: face,
        penetration,
    }
}

/// Check a mover against the inside of a horizontal band `[top, bottom]`.
/// The normal points back into the band.
pub fn box_band_collision(mover: &Aabb, top: f32, bottom: f32) -> CollisionResult {
    if mover.min.y < top {
        return CollisionResult {
            hit: true,
            normal: Vec2::Y,
            penetration: top - mover.min.y,
        };
    }
    if mover.max().y > bottom {
        return CollisionResult {
            hit: true,
            normal: -Vec2::Y,
            penetration: mover.max().y - bottom,
        };
    }
    CollisionResult::miss()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
