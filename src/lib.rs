//! Rocket Lander - A single-screen descent arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, AABB collisions, fixed timestep, outcome)
//! - `game`: Session driver running input → update → render over platform services
//! - `renderer`: Presentation layer (WebGPU sprites + bitmap text, headless recorder)
//! - `platform`: Browser/native clock and keyboard services
//! - `assets`: Embedded textures and the level table

pub mod assets;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Session, SessionError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep in seconds (~60 Hz)
    pub const FIXED_TIMESTEP: f32 = 0.0166666;
    /// Same step as an exact duration for the accumulator
    pub const FIXED_STEP: Duration = Duration::from_nanos(16_666_600);

    /// Landing zone (literal thresholds, matched to the platform placement)
    pub const LANDING_ZONE_MIN_X: f32 = 1.0;
    pub const LANDING_ZONE_MAX_X: f32 = 2.0;
    /// Rocket centre must be strictly below this to count as landed
    pub const LANDING_ZONE_MAX_Y: f32 = -2.0;

    /// Orthographic view half extents (world units)
    pub const VIEW_HALF_WIDTH: f32 = 5.0;
    pub const VIEW_HALF_HEIGHT: f32 = 3.75;

    /// Outcome banners
    pub const WON_BANNER: &str = "Mission Successful";
    pub const LOST_BANNER: &str = "Mission Failed";
    pub const BANNER_GLYPH_SIZE: f32 = 0.5;
    pub const BANNER_GLYPH_SPACING: f32 = -0.25;
    pub const WON_BANNER_POS: (f32, f32) = (-2.0, 3.3);
    pub const LOST_BANNER_POS: (f32, f32) = (-1.5, 3.3);
}
