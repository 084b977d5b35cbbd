//! Data-driven level layout
//!
//! The level is an ordered table of entity records (position, extents,
//! visual path) shipped as JSON next to the textures. Records are consumed in
//! table order, which is also the collision resolution order.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The level table compiled into the binary
const BUILTIN_LEVEL: &str = include_str!("../../assets/level.json");

/// A static entity record (platform or rock)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub position: Vec2,
    #[serde(default = "unit_extents")]
    pub extents: Vec2,
    /// Texture path resolved through the presentation layer
    pub visual: String,
}

/// The player rocket record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketRecord {
    pub position: Vec2,
    #[serde(default = "unit_extents")]
    pub extents: Vec2,
    pub visual: String,
    pub acceleration: Vec2,
    pub speed: f32,
}

/// Complete level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub rocket: RocketRecord,
    /// Bitmap font atlas used for the outcome banner
    pub font: String,
    /// Platforms and rocks, in resolution order
    pub statics: Vec<EntityRecord>,
}

fn unit_extents() -> Vec2 {
    Vec2::ONE
}

/// Level table errors
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to parse level table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Level entity {index} has non-positive extents {extents}")]
    InvalidExtents { index: usize, extents: Vec2 },
}

impl LevelLayout {
    /// The shipped level
    pub fn builtin() -> Result<Self, LayoutError> {
        Self::from_json(BUILTIN_LEVEL)
    }

    /// Parse and validate a level table
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: LevelLayout = serde_json::from_str(json)?;
        layout.validate()?;
        log::debug!("Level table: {} static entities", layout.statics.len());
        Ok(layout)
    }

    fn validate(&self) -> Result<(), LayoutError> {
        // Index 0 is the rocket, statics follow in table order
        let extents = std::iter::once(self.rocket.extents).chain(self.statics.iter().map(|s| s.extents));
        for (index, extents) in extents.enumerate() {
            if extents.x <= 0.0 || extents.y <= 0.0 {
                return Err(LayoutError::InvalidExtents { index, extents });
            }
        }
        Ok(())
    }

    /// Every distinct texture path, in first-use order
    pub fn visual_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        let all = std::iter::once(self.rocket.visual.as_str())
            .chain(self.statics.iter().map(|s| s.visual.as_str()))
            .chain(std::iter::once(self.font.as_str()));
        for path in all {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }
}
