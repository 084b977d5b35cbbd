//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (layout order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod layout;
pub mod state;
pub mod tick;

pub use collision::{Aabb, overlaps};
pub use entity::{CollisionFlags, Entity};
pub use layout::{EntityRecord, LayoutError, LevelLayout, RocketRecord};
pub use state::{GamePhase, GameState};
pub use tick::{FixedStep, FrameInput, advance_frame, apply_input, evaluate_outcome, tick};
