//! Browser time source

use super::Clock;

/// `performance.now()` in seconds
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: web_sys::Performance,
}

impl PerformanceClock {
    pub fn new() -> Option<Self> {
        let performance = web_sys::window()?.performance()?;
        Some(Self { performance })
    }
}

impl Clock for PerformanceClock {
    fn now_seconds(&self) -> f64 {
        self.performance.now() / 1000.0
    }
}
