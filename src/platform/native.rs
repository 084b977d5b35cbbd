use std::time::Instant;

use super::Clock;

/// Seconds since the clock was created
#[derive(Debug, Clone)]
pub struct InstantClock {
    start: Instant,
}

impl Default for InstantClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for InstantClock {
    fn now_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
