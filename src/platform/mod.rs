//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic seconds)
//! - Held-key input and quit requests

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use native::InstantClock;
#[cfg(target_arch = "wasm32")]
pub use web::PerformanceClock;

use crate::sim::FrameInput;

/// Monotonic time source
pub trait Clock {
    fn now_seconds(&self) -> f64;
}

/// Keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            _ => None,
        }
    }
}

/// Result of draining pending platform events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollResult {
    pub quit: bool,
}

/// Source of discrete events and held-key state
pub trait InputSource {
    fn poll_events(&mut self) -> PollResult;
    fn is_key_held(&self, key: Key) -> bool;
}

/// Held keys plus a latched quit request, fed by platform event handlers
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    left: bool,
    right: bool,
    quit_requested: bool,
}

impl KeyboardState {
    pub fn set_key(&mut self, key: Key, held: bool) {
        match key {
            Key::Left => self.left = held,
            Key::Right => self.right = held,
        }
    }

    /// Forget held keys (focus loss can swallow keyup events)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Page is being hidden. A page kept in the back/forward cache resumes
    /// later, so only a real unload quits.
    pub fn page_hidden(&mut self, persisted: bool) {
        self.release_all();
        if !persisted {
            self.request_quit();
        }
    }
}

impl InputSource for KeyboardState {
    fn poll_events(&mut self) -> PollResult {
        PollResult {
            quit: self.quit_requested,
        }
    }

    fn is_key_held(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
        }
    }
}

/// Read held Left/Right into a frame input
pub fn sample_input(input: &impl InputSource) -> FrameInput {
    FrameInput {
        left: input.is_key_held(Key::Left),
        right: input.is_key_held(Key::Right),
    }
}
