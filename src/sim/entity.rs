//! Movable and static game objects
//!
//! One `update` call advances an entity by exactly one fixed step and
//! resolves collisions against a static set, Y axis first, then X.

use glam::Vec2;

use super::collision::Aabb;
use crate::assets::VisualHandle;

/// Contacts found during the most recent update (reset every step)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// Crossing-axis overlap at or below this counts as touching (snap rounding)
const CONTACT_TOLERANCE: f32 = 1e-5;

/// A game object: the rocket or one of the platforms/rocks
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Vec2,
    /// Input direction (unit or zero), re-read every step
    pub movement: Vec2,
    pub velocity: Vec2,
    /// Constant acceleration (gravity for the rocket)
    pub acceleration: Vec2,
    /// Multiplier on `movement` when deriving horizontal velocity
    pub speed: f32,
    /// Collision box size (width, height)
    pub extents: Vec2,
    pub visual: VisualHandle,
    pub collisions: CollisionFlags,
}

impl Entity {
    /// Create a motionless entity
    pub fn new(position: Vec2, extents: Vec2, visual: VisualHandle) -> Self {
        Self {
            position,
            movement: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            speed: 0.0,
            extents,
            visual,
            collisions: CollisionFlags::default(),
        }
    }

    /// Give the entity constant acceleration and an input speed
    pub fn with_motion(mut self, acceleration: Vec2, speed: f32) -> Self {
        self.acceleration = acceleration;
        self.speed = speed;
        self
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.extents)
    }

    /// Advance one fixed step and resolve collisions against `statics`
    pub fn update(&mut self, dt: f32, statics: &[Entity]) {
        self.collisions = CollisionFlags::default();

        // Horizontal velocity comes straight from input; vertical accumulates
        self.velocity.x = self.movement.x * self.speed;
        self.velocity += self.acceleration * dt;

        self.position.y += self.velocity.y * dt;
        self.resolve_vertical(statics);

        self.position.x += self.velocity.x * dt;
        self.resolve_horizontal(statics);
    }

    fn resolve_vertical(&mut self, statics: &[Entity]) {
        let half_height = self.extents.y * 0.5;
        for other in statics {
            let other_bounds = other.bounds();
            let gap = self.bounds().gap(&other_bounds);
            if gap.y >= 0.0 || gap.x > -CONTACT_TOLERANCE {
                continue;
            }
            if self.velocity.y > 0.0 {
                self.position.y = other_bounds.bottom() - half_height;
                self.velocity.y = 0.0;
                self.collisions.top = true;
            } else if self.velocity.y < 0.0 {
                self.position.y = other_bounds.top() + half_height;
                self.velocity.y = 0.0;
                self.collisions.bottom = true;
            }
        }
    }

    fn resolve_horizontal(&mut self, statics: &[Entity]) {
        let half_width = self.extents.x * 0.5;
        for other in statics {
            let other_bounds = other.bounds();
            let gap = self.bounds().gap(&other_bounds);
            if gap.x >= 0.0 || gap.y > -CONTACT_TOLERANCE {
                continue;
            }
            if self.velocity.x > 0.0 {
                self.position.x = other_bounds.left() - half_width;
                self.velocity.x = 0.0;
                self.collisions.right = true;
            } else if self.velocity.x < 0.0 {
                self.position.x = other_bounds.right() + half_width;
                self.velocity.x = 0.0;
                self.collisions.left = true;
            }
        }
    }
}
