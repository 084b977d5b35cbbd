//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Elapsed wall
//! time is banked in an exact accumulator and spent in identical steps.

use std::time::Duration;

use glam::Vec2;

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Held keys for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
}

/// Fixed timestep accumulator
///
/// Time is kept in whole nanoseconds, so the number of steps taken for a
/// given total elapsed time does not depend on how that time was split
/// across frames.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(FIXED_STEP)
    }
}

impl FixedStep {
    pub fn new(step: Duration) -> Self {
        debug_assert!(!step.is_zero(), "fixed step must be non-zero");
        Self {
            step,
            accumulator: Duration::ZERO,
        }
    }

    /// Bank `elapsed` and return how many whole steps are now due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let mut remaining = self.accumulator + elapsed;
        if remaining < self.step {
            self.accumulator = remaining;
            return 0;
        }

        let mut steps = 0;
        while remaining >= self.step {
            remaining -= self.step;
            steps += 1;
        }
        self.accumulator = remaining;
        steps
    }

    /// Time carried into the next frame
    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }
}

/// Reset rocket movement and set it from held keys (ignored once terminal)
pub fn apply_input(state: &mut GameState, input: &FrameInput) {
    let mut movement = Vec2::ZERO;
    if !state.phase.is_terminal() {
        if input.left {
            movement.x = -1.0;
        } else if input.right {
            movement.x = 1.0;
        }
    }
    state.rocket.movement = clamp_unit(movement);
}

fn clamp_unit(v: Vec2) -> Vec2 {
    if v.length() > 1.0 { v.normalize() } else { v }
}

/// Advance the rocket by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    state.rocket.update(dt, &state.statics);
    state.time_steps += 1;
}

/// Decide win/loss from the rocket's latest contacts
///
/// Returns the new phase when a transition happens. Terminal phases never
/// change again.
pub fn evaluate_outcome(state: &mut GameState) -> Option<GamePhase> {
    if state.phase.is_terminal() {
        return None;
    }

    let rocket = &state.rocket;
    let contacts = rocket.collisions;
    let in_zone = (LANDING_ZONE_MIN_X..=LANDING_ZONE_MAX_X).contains(&rocket.position.x)
        && rocket.position.y < LANDING_ZONE_MAX_Y;

    let next = if contacts.bottom && in_zone {
        GamePhase::Won
    } else if contacts.bottom || contacts.left || contacts.right {
        GamePhase::Lost
    } else {
        return None;
    };

    log::info!(
        "Descent ended: {:?} at ({:.3}, {:.3}) after {} steps",
        next,
        rocket.position.x,
        rocket.position.y,
        state.time_steps
    );
    state.phase = next;
    Some(next)
}

/// Run every step due for `elapsed`, then evaluate the outcome
///
/// Outcome is only evaluated when at least one step ran this frame.
pub fn advance_frame(state: &mut GameState, stepper: &mut FixedStep, elapsed: Duration) -> u32 {
    let steps = stepper.advance(elapsed);
    if steps == 0 {
        return 0;
    }

    for _ in 0..steps {
        tick(state, FIXED_TIMESTEP);
    }
    evaluate_outcome(state);
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Entity, LevelLayout};
    use proptest::prelude::*;

    fn builtin_state() -> GameState {
        GameState::from_layout_unresolved(&LevelLayout::builtin().unwrap())
    }

    /// One frame of exactly one step with the given keys
    fn frame(state: &mut GameState, stepper: &mut FixedStep, input: FrameInput) -> u32 {
        apply_input(state, &input);
        advance_frame(state, stepper, FIXED_STEP)
    }

    const LEFT: FrameInput = FrameInput { left: true, right: false };
    const RIGHT: FrameInput = FrameInput { left: false, right: true };
    const NONE: FrameInput = FrameInput { left: false, right: false };

    #[test]
    fn test_small_deltas_are_banked() {
        let mut stepper = FixedStep::default();
        assert_eq!(stepper.advance(Duration::from_millis(10)), 0);
        assert_eq!(stepper.accumulator(), Duration::from_millis(10));
        assert_eq!(stepper.advance(Duration::from_millis(10)), 1);
        assert_eq!(
            stepper.accumulator(),
            Duration::from_millis(20) - FIXED_STEP
        );
    }

    #[test]
    fn test_large_delta_runs_multiple_steps() {
        let mut stepper = FixedStep::default();
        assert_eq!(stepper.advance(FIXED_STEP * 5 + Duration::from_nanos(7)), 5);
        assert_eq!(stepper.accumulator(), Duration::from_nanos(7));
    }

    #[test]
    fn test_no_outcome_without_a_step() {
        let mut state = builtin_state();
        state.rocket.collisions.left = true;
        let mut stepper = FixedStep::default();
        assert_eq!(advance_frame(&mut state, &mut stepper, Duration::from_millis(5)), 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_steps, 0);
    }

    #[test]
    fn test_left_takes_priority_over_right() {
        let mut state = builtin_state();
        apply_input(&mut state, &FrameInput { left: true, right: true });
        assert_eq!(state.rocket.movement, Vec2::new(-1.0, 0.0));
        apply_input(&mut state, &RIGHT);
        assert_eq!(state.rocket.movement, Vec2::new(1.0, 0.0));
        apply_input(&mut state, &NONE);
        assert_eq!(state.rocket.movement, Vec2::ZERO);
    }

    #[test]
    fn test_movement_clamped_to_unit_length() {
        assert_eq!(clamp_unit(Vec2::new(1.0, 0.0)), Vec2::new(1.0, 0.0));
        let diagonal = clamp_unit(Vec2::new(1.0, 1.0));
        assert!((diagonal.length() - 1.0).abs() < 1e-6);
        assert!((diagonal.x - diagonal.y).abs() < 1e-6);
    }

    #[test]
    fn test_top_contact_alone_is_not_a_loss() {
        let mut state = builtin_state();
        state.rocket.collisions.top = true;
        assert_eq!(evaluate_outcome(&mut state), None);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_landing_zone_thresholds_are_literal() {
        let mut state = builtin_state();
        state.rocket.collisions.bottom = true;

        // Inside x range but not low enough
        state.rocket.position = Vec2::new(1.5, -2.0);
        assert_eq!(evaluate_outcome(&mut state), Some(GamePhase::Lost));

        for x in [1.0, 1.5, 2.0] {
            let mut state = builtin_state();
            state.rocket.collisions.bottom = true;
            state.rocket.position = Vec2::new(x, -2.5);
            assert_eq!(evaluate_outcome(&mut state), Some(GamePhase::Won));
        }

        let mut state = builtin_state();
        state.rocket.collisions.bottom = true;
        state.rocket.position = Vec2::new(2.01, -2.5);
        assert_eq!(evaluate_outcome(&mut state), Some(GamePhase::Lost));
    }

    #[test]
    fn test_win_scenario() {
        let mut state = builtin_state();
        state.rocket.position = Vec2::new(0.0, -1.0);
        let mut stepper = FixedStep::default();

        // 90 steps at speed 1 carries the rocket to x = 1.5
        for _ in 0..90 {
            frame(&mut state, &mut stepper, RIGHT);
            assert_eq!(state.phase, GamePhase::Playing);
        }
        assert!((state.rocket.position.x - 1.5).abs() < 1e-3);

        let mut frames = 0;
        while state.phase == GamePhase::Playing {
            frame(&mut state, &mut stepper, NONE);
            frames += 1;
            assert!(frames < 2000, "rocket never landed");
        }

        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.rocket.collisions.bottom);
        assert_eq!(state.rocket.position.y, -2.5);

        // Resting on the pad keeps the win
        for _ in 0..300 {
            frame(&mut state, &mut stepper, NONE);
        }
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn test_lose_scenario() {
        let mut state = builtin_state();
        let mut stepper = FixedStep::default();

        let mut frames = 0;
        while state.phase == GamePhase::Playing {
            frame(&mut state, &mut stepper, LEFT);
            frames += 1;
            assert!(frames < 2000, "rocket never crashed");
        }

        assert_eq!(state.phase, GamePhase::Lost);
        let contacts = state.rocket.collisions;
        assert!(contacts.left || contacts.bottom);
        // Pressed against the left rock column
        assert_eq!(state.rocket.position.x, -3.0);
    }

    #[test]
    fn test_input_ignored_after_terminal() {
        let mut state = builtin_state();
        let mut stepper = FixedStep::default();
        while state.phase == GamePhase::Playing {
            frame(&mut state, &mut stepper, LEFT);
        }

        let mut idle = state.clone();
        let mut idle_stepper = stepper.clone();
        let x = state.rocket.position.x;
        for _ in 0..120 {
            frame(&mut state, &mut stepper, RIGHT);
            frame(&mut idle, &mut idle_stepper, NONE);
            assert_eq!(state.rocket.movement, Vec2::ZERO);
            assert_eq!(state.rocket.position.x, x);
            assert_eq!(state.rocket.position, idle.rocket.position);
            assert_eq!(state.phase, GamePhase::Lost);
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = builtin_state();
        let mut b = builtin_state();
        let mut sa = FixedStep::default();
        let mut sb = FixedStep::default();
        for i in 0..400 {
            let input = if i % 3 == 0 { RIGHT } else { NONE };
            frame(&mut a, &mut sa, input);
            frame(&mut b, &mut sb, input);
        }
        assert_eq!(a.rocket, b.rocket);
        assert_eq!(a.time_steps, b.time_steps);
    }

    #[test]
    fn test_static_set_never_moves() {
        let mut state = builtin_state();
        let before: Vec<Entity> = state.statics().to_vec();
        let mut stepper = FixedStep::default();
        for _ in 0..600 {
            frame(&mut state, &mut stepper, LEFT);
        }
        assert_eq!(state.statics(), &before[..]);
    }

    proptest! {
        #[test]
        fn prop_step_count_is_floor_of_total(chunks in prop::collection::vec(0u64..60_000_000, 1..60)) {
            let mut stepper = FixedStep::default();
            let step = FIXED_STEP.as_nanos() as u64;
            let mut total = 0u64;
            let mut steps = 0u64;
            for nanos in &chunks {
                steps += stepper.advance(Duration::from_nanos(*nanos)) as u64;
                total += nanos;
                prop_assert_eq!(steps, total / step);
                prop_assert_eq!(stepper.accumulator(), Duration::from_nanos(total % step));
            }
        }

        #[test]
        fn prop_chunking_does_not_change_position(chunks in prop::collection::vec(0u64..40_000_000, 1..80)) {
            let total: u64 = chunks.iter().sum();

            let mut whole = builtin_state();
            let mut whole_stepper = FixedStep::default();
            advance_frame(&mut whole, &mut whole_stepper, Duration::from_nanos(total));

            let mut split = builtin_state();
            let mut split_stepper = FixedStep::default();
            for nanos in &chunks {
                advance_frame(&mut split, &mut split_stepper, Duration::from_nanos(*nanos));
            }

            prop_assert_eq!(whole.time_steps, split.time_steps);
            prop_assert_eq!(whole.rocket.position, split.rocket.position);
            prop_assert_eq!(whole_stepper.accumulator(), split_stepper.accumulator());
        }
    }
}
