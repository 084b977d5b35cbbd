//! Session driver
//!
//! One `Session` per run: it owns the simulation state and the timestep
//! accumulator, and runs input → update → render against whatever presenter,
//! input source and clock the platform provides.

use std::time::Duration;

use glam::Vec2;
use thiserror::Error;

use crate::assets::{AssetError, VisualHandle};
use crate::consts::*;
use crate::platform::{InputSource, sample_input};
use crate::renderer::Presenter;
use crate::sim::autopilot;
use crate::sim::{FixedStep, GamePhase, GameState, LayoutError, LevelLayout};
use crate::sim::{advance_frame, apply_input};

/// Startup failures (all fatal)
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to load visual: {0}")]
    Asset(#[from] AssetError),

    #[error("Invalid level layout: {0}")]
    Layout(#[from] LayoutError),
}

const FPS_WINDOW: usize = 60;

/// Rolling frame rate over the last `FPS_WINDOW` frames
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    samples: usize,
    fps: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            samples: 0,
            fps: 0,
        }
    }
}

impl FrameStats {
    /// Record a frame timestamp (seconds)
    pub fn record(&mut self, now: f64) {
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.samples = (self.samples + 1).min(FPS_WINDOW);

        if self.samples == FPS_WINDOW {
            // Slot about to be overwritten holds the oldest timestamp
            let elapsed = now - self.frame_times[self.frame_index];
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

pub struct Session {
    state: GameState,
    stepper: FixedStep,
    /// Clock reading at the previous `update`
    last_ticks: f64,
    running: bool,
    autopilot: bool,
    font: VisualHandle,
    stats: FrameStats,
}

impl Session {
    /// Resolve every visual through `presenter` and build the level
    pub fn new(
        layout: &LevelLayout,
        presenter: &mut impl Presenter,
        now: f64,
    ) -> Result<Self, SessionError> {
        // Load each distinct texture once; entity resolution then hits the cache
        for path in layout.visual_paths() {
            presenter.load_visual(path)?;
        }
        let state = GameState::from_layout(layout, |path| presenter.load_visual(path))?;
        let font = presenter.load_visual(&layout.font)?;

        log::info!(
            "Session started: {} statics, rocket at ({}, {})",
            state.statics().len(),
            state.rocket.position.x,
            state.rocket.position.y
        );

        Ok(Self {
            state,
            stepper: FixedStep::default(),
            last_ticks: now,
            running: true,
            autopilot: false,
            font,
            stats: FrameStats::default(),
        })
    }

    /// Session on the level compiled into the binary
    pub fn builtin(presenter: &mut impl Presenter, now: f64) -> Result<Self, SessionError> {
        let layout = LevelLayout::builtin()?;
        Self::new(&layout, presenter, now)
    }

    /// Drain platform events and set this frame's rocket movement
    pub fn process_input(&mut self, input: &mut impl InputSource) {
        if input.poll_events().quit && self.running {
            log::info!("Quit requested");
            self.running = false;
        }

        let frame = if self.autopilot {
            autopilot::steer(&self.state)
        } else {
            sample_input(input)
        };
        apply_input(&mut self.state, &frame);
    }

    /// Advance the simulation to `now`, returning the number of steps run
    pub fn update(&mut self, now: f64) -> u32 {
        let delta = now - self.last_ticks;
        self.last_ticks = now;
        self.stats.record(now);

        let elapsed = Duration::try_from_secs_f64(delta.max(0.0)).unwrap_or_default();
        advance_frame(&mut self.state, &mut self.stepper, elapsed)
    }

    /// Draw the rocket, the statics and any outcome banner, then present
    pub fn render(&self, presenter: &mut impl Presenter) {
        let rocket = &self.state.rocket;
        presenter.draw_entity(rocket.visual, rocket.position, rocket.extents);
        for entity in self.state.statics() {
            presenter.draw_entity(entity.visual, entity.position, entity.extents);
        }

        let banner = match self.state.phase {
            GamePhase::Won => Some((WON_BANNER, WON_BANNER_POS)),
            GamePhase::Lost => Some((LOST_BANNER, LOST_BANNER_POS)),
            GamePhase::Playing => None,
        };
        if let Some((text, (x, y))) = banner {
            presenter.draw_text(
                self.font,
                text,
                BANNER_GLYPH_SIZE,
                BANNER_GLYPH_SPACING,
                Vec2::new(x, y),
            );
        }

        presenter.present();
    }

    /// Stop and release every visual the presenter holds
    pub fn shutdown(&mut self, presenter: &mut impl Presenter) -> usize {
        self.running = false;
        let released = presenter.release_visuals();
        log::info!("Session shut down, released {} visuals", released);
        released
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.autopilot != enabled {
            log::info!("Autopilot: {}", enabled);
        }
        self.autopilot = enabled;
    }

    pub fn fps(&self) -> u32 {
        self.stats.fps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Key, KeyboardState};
    use crate::renderer::{DrawCall, HeadlessPresenter};

    /// Exact in binary and shorter than one step, so each frame runs 0 or 1 steps
    const FRAME: f64 = 1.0 / 64.0;

    fn new_session() -> (Session, HeadlessPresenter) {
        let mut presenter = HeadlessPresenter::new();
        let session = Session::builtin(&mut presenter, 0.0).unwrap();
        (session, presenter)
    }

    /// Run frames until the outcome is decided
    fn play_out(session: &mut Session, input: &mut KeyboardState) -> u32 {
        let mut frame = 0;
        while session.phase() == GamePhase::Playing {
            frame += 1;
            session.process_input(input);
            session.update(frame as f64 * FRAME);
            assert!(frame < 5000, "descent never ended");
        }
        frame
    }

    #[test]
    fn test_new_resolves_every_visual_once() {
        let (session, presenter) = new_session();
        // rocket, platform, rock, font
        assert_eq!(presenter.loaded_visuals(), 4);
        assert_eq!(session.state().statics().len(), 29);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(session.is_running());
        assert_eq!(presenter.visual_path(session.font), Some("font1.png"));

        // Handles follow first use in the level table
        let paths: Vec<_> = (0..4)
            .map(|i| presenter.visual_path(VisualHandle::from_index(i)))
            .collect();
        assert_eq!(
            paths,
            vec![Some("rocket.png"), Some("platform.png"), Some("rock.png"), Some("font1.png")]
        );
        assert_eq!(session.state().rocket.visual, VisualHandle::from_index(0));
    }

    #[test]
    fn test_missing_visual_is_fatal() {
        let mut layout = LevelLayout::builtin().unwrap();
        layout.statics[3].visual = "missing.png".to_string();

        let mut presenter = HeadlessPresenter::new();
        let err = Session::new(&layout, &mut presenter, 0.0).err().unwrap();
        assert!(matches!(err, SessionError::Asset(AssetError::NotFound(ref p)) if p == "missing.png"));
    }

    #[test]
    fn test_render_order_while_playing() {
        let (session, mut presenter) = new_session();
        session.render(&mut presenter);

        let frame = presenter.last_frame();
        assert_eq!(frame.len(), 30);
        assert_eq!(
            frame[0],
            DrawCall::Entity {
                visual: session.state().rocket.visual,
                position: Vec2::new(0.0, 4.0),
                extents: Vec2::ONE,
            }
        );
        assert_eq!(presenter.texts().count(), 0);
    }

    #[test]
    fn test_update_banks_short_frames() {
        let (mut session, _presenter) = new_session();
        assert_eq!(session.update(0.010), 0);
        assert_eq!(session.update(0.020), 1);
        assert_eq!(session.state().time_steps, 1);
    }

    #[test]
    fn test_clock_going_backwards_runs_nothing() {
        let (mut session, _presenter) = new_session();
        session.update(1.0);
        let steps = session.state().time_steps;
        assert_eq!(session.update(0.5), 0);
        assert_eq!(session.state().time_steps, steps);
    }

    #[test]
    fn test_autopilot_wins_and_shows_banner() {
        let (mut session, mut presenter) = new_session();
        session.set_autopilot(true);
        play_out(&mut session, &mut KeyboardState::default());
        assert_eq!(session.phase(), GamePhase::Won);

        session.render(&mut presenter);
        let banner = presenter.last_frame().last().unwrap();
        assert_eq!(
            *banner,
            DrawCall::Text {
                font: session.font,
                text: WON_BANNER.to_string(),
                glyph_size: 0.5,
                glyph_spacing: -0.25,
                position: Vec2::new(-2.0, 3.3),
            }
        );
    }

    #[test]
    fn test_drifting_left_loses() {
        let (mut session, mut presenter) = new_session();
        let mut keys = KeyboardState::default();
        keys.set_key(Key::Left, true);
        play_out(&mut session, &mut keys);
        assert_eq!(session.phase(), GamePhase::Lost);

        session.render(&mut presenter);
        assert_eq!(presenter.texts().collect::<Vec<_>>(), vec![LOST_BANNER]);
        match presenter.last_frame().last().unwrap() {
            DrawCall::Text { position, .. } => assert_eq!(*position, Vec2::new(-1.5, 3.3)),
            other => panic!("expected banner, got {other:?}"),
        }
    }

    #[test]
    fn test_input_ignored_after_outcome() {
        let (mut session, _presenter) = new_session();
        let mut keys = KeyboardState::default();
        keys.set_key(Key::Left, true);
        let frames = play_out(&mut session, &mut keys);

        session.process_input(&mut keys);
        assert_eq!(session.state().rocket.movement, Vec2::ZERO);
        session.update((frames + 1) as f64 * FRAME);
        assert_eq!(session.phase(), GamePhase::Lost);
    }

    #[test]
    fn test_quit_stops_running() {
        let (mut session, _presenter) = new_session();
        let mut keys = KeyboardState::default();
        session.process_input(&mut keys);
        assert!(session.is_running());

        keys.request_quit();
        session.process_input(&mut keys);
        assert!(!session.is_running());
    }

    #[test]
    fn test_shutdown_releases_visuals() {
        let (mut session, mut presenter) = new_session();
        assert_eq!(session.shutdown(&mut presenter), 4);
        assert_eq!(presenter.loaded_visuals(), 0);
        assert!(!session.is_running());
    }

    #[test]
    fn test_frame_stats() {
        let mut stats = FrameStats::default();
        for i in 0..59 {
            stats.record(i as f64 / 60.0);
        }
        assert_eq!(stats.fps(), 0);
        stats.record(59.0 / 60.0);
        assert_eq!(stats.fps(), 60);

        for i in 60..200 {
            stats.record(i as f64 / 30.0);
        }
        assert_eq!(stats.fps(), 30);
    }
}
