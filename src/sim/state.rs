//! Game session state
//!
//! The rocket, the fixed static set, and the outcome phase.

use glam::Vec2;

use super::entity::Entity;
use super::layout::LevelLayout;
use crate::assets::VisualHandle;

/// Outcome of the descent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Rocket is descending and responds to input
    #[default]
    Playing,
    /// Landed inside the landing zone (terminal)
    Won,
    /// Touched ground, a wall or a rock anywhere else (terminal)
    Lost,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// The single movable entity
    pub rocket: Entity,
    /// Platforms and rocks (never move after construction)
    pub(super) statics: Vec<Entity>,
    pub phase: GamePhase,
    /// Fixed steps simulated so far
    pub time_steps: u64,
}

impl GameState {
    /// Build state from already-constructed entities
    pub fn new(rocket: Entity, statics: Vec<Entity>) -> Self {
        let mut statics = statics;
        // Refresh static bounds once; a no-op for motionless entities
        for entity in &mut statics {
            entity.update(0.0, &[]);
        }

        Self {
            rocket,
            statics,
            phase: GamePhase::Playing,
            time_steps: 0,
        }
    }

    /// Build state from a level table, resolving each visual path through `resolve`
    pub fn from_layout<E>(
        layout: &LevelLayout,
        mut resolve: impl FnMut(&str) -> Result<VisualHandle, E>,
    ) -> Result<Self, E> {
        let r = &layout.rocket;
        let rocket = Entity::new(r.position, r.extents, resolve(&r.visual)?)
            .with_motion(r.acceleration, r.speed);

        let statics = layout
            .statics
            .iter()
            .map(|s| Ok(Entity::new(s.position, s.extents, resolve(&s.visual)?)))
            .collect::<Result<Vec<_>, E>>()?;

        Ok(Self::new(rocket, statics))
    }

    /// Build state from a level table with placeholder visuals (headless/tests)
    pub fn from_layout_unresolved(layout: &LevelLayout) -> Self {
        match Self::from_layout(layout, |_| Ok::<_, std::convert::Infallible>(VisualHandle::default())) {
            Ok(state) => state,
            Err(never) => match never {},
        }
    }

    /// Platforms and rocks in resolution order
    pub fn statics(&self) -> &[Entity] {
        &self.statics
    }

    pub fn rocket_position(&self) -> Vec2 {
        self.rocket.position
    }
}
