//! Idle/demo mode - the autopilot flies the rocket
//!
//! Steers toward the middle of the landing zone, but only slides sideways
//! when the column below the rocket's next position is clear all the way
//! down to landing height. Otherwise it just keeps falling.

use glam::Vec2;

use super::collision::{Aabb, overlaps};
use super::state::GameState;
use super::tick::FrameInput;
use crate::consts::*;

/// Horizontal aim point (centre of the landing zone)
pub const TARGET_X: f32 = (LANDING_ZONE_MIN_X + LANDING_ZONE_MAX_X) / 2.0;

/// Choose held keys for the next frame
pub fn steer(state: &GameState) -> FrameInput {
    if state.phase.is_terminal() {
        return FrameInput::default();
    }

    let rocket = &state.rocket;
    let step = rocket.speed * FIXED_TIMESTEP;
    let dx = TARGET_X - rocket.position.x;

    // Close enough: another step would overshoot
    if step <= 0.0 || dx.abs() <= step * 0.5 {
        return FrameInput::default();
    }

    let next_x = rocket.position.x + dx.signum() * step;
    if !corridor_clear(state, next_x) {
        return FrameInput::default();
    }

    FrameInput {
        left: dx < 0.0,
        right: dx > 0.0,
    }
}

/// True if nothing static sits in the rocket's column at `x`, from its top
/// down to landing height
fn corridor_clear(state: &GameState, x: f32) -> bool {
    let rocket = &state.rocket;
    let half = rocket.extents * 0.5;
    let top = rocket.position.y + half.y;
    let floor = (LANDING_ZONE_MAX_Y - half.y).min(top - rocket.extents.y);

    let corridor = Aabb::from_corners(Vec2::new(x - half.x, floor), Vec2::new(x + half.x, top));
    !state
        .statics()
        .iter()
        .any(|entity| overlaps(&corridor, &entity.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{FixedStep, advance_frame, apply_input};
    use crate::sim::{GamePhase, LevelLayout};

    fn builtin_state() -> GameState {
        GameState::from_layout_unresolved(&LevelLayout::builtin().unwrap())
    }

    #[test]
    fn test_holds_while_ledge_blocks_the_column() {
        // Starting column is clear, but one step right runs into the ledge above the pad
        let state = builtin_state();
        assert_eq!(steer(&state), FrameInput::default());
    }

    #[test]
    fn test_slides_once_below_the_ledge() {
        let mut state = builtin_state();
        state.rocket.position = Vec2::new(0.0, -0.5);
        assert_eq!(steer(&state), FrameInput { left: false, right: true });

        state.rocket.position = Vec2::new(3.0, -0.5);
        assert_eq!(steer(&state), FrameInput { left: true, right: false });
    }

    #[test]
    fn test_stops_at_target() {
        let mut state = builtin_state();
        state.rocket.position = Vec2::new(TARGET_X + 0.001, -1.0);
        assert_eq!(steer(&state), FrameInput::default());
    }

    #[test]
    fn test_idle_after_terminal() {
        let mut state = builtin_state();
        state.rocket.position = Vec2::new(0.0, -0.5);
        state.phase = GamePhase::Lost;
        assert_eq!(steer(&state), FrameInput::default());
    }

    #[test]
    fn test_autopilot_lands_builtin_level() {
        let mut state = builtin_state();
        let mut stepper = FixedStep::default();

        let mut frames = 0;
        while state.phase == GamePhase::Playing {
            let input = steer(&state);
            apply_input(&mut state, &input);
            advance_frame(&mut state, &mut stepper, FIXED_STEP);
            frames += 1;
            assert!(frames < 3000, "autopilot never finished");
        }

        assert_eq!(state.phase, GamePhase::Won);
        let p = state.rocket.position;
        assert!((LANDING_ZONE_MIN_X..=LANDING_ZONE_MAX_X).contains(&p.x));
        assert!(p.y < LANDING_ZONE_MAX_Y);
    }
}
