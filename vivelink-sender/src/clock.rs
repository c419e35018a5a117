// File: vivelink-sender/src/clock.rs

use std::time::Instant;

/// Sender-side timestamp source.
///
/// Wall-clock epoch seconds taken once at session start, advanced by a
/// monotonic `Instant`. Readings never go backwards within a session even if
/// the system clock is adjusted.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    epoch_start: f64,
    started: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        let epoch_start = chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        Self::from_epoch(epoch_start)
    }

    pub fn from_epoch(epoch_start: f64) -> Self {
        Self {
            epoch_start,
            started: Instant::now(),
        }
    }

    /// Seconds since the Unix epoch.
    pub fn now(&self) -> f64 {
        self.epoch_start + self.started.elapsed().as_secs_f64()
    }
}
