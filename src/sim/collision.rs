//! Axis-aligned box overlap tests
//!
//! Boxes are centre + size. Overlap is strict: boxes that share an edge do
//! not collide, which is what lets a landed rocket sit exactly on a surface.

use glam::Vec2;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Box centre
    pub center: Vec2,
    /// Full width/height
    pub extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, extents: Vec2) -> Self {
        Self { center, extents }
    }

    /// Build a box from its min/max corners
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self {
            center: (min + max) * 0.5,
            extents: max - min,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.extents * 0.5
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.extents.y * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.extents.y * 0.5
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.extents.x * 0.5
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.extents.x * 0.5
    }

    /// Signed gap between the boxes on each axis (negative = overlapping on that axis)
    pub fn gap(&self, other: &Aabb) -> Vec2 {
        (self.center - other.center).abs() - (self.extents + other.extents) * 0.5
    }
}

/// True if the two boxes overlap on both axes
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let gap = a.gap(b);
    gap.x < 0.0 && gap.y < 0.0
}
