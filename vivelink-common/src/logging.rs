// File: vivelink-common/src/logging.rs

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_level`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Counts repeats of one kind of failure and says when to log it: on the
/// first occurrence and then every `every`-th.
#[derive(Debug, Clone)]
pub struct Throttle {
    every: u64,
    count: u64,
}

impl Throttle {
    pub const DEFAULT_EVERY: u64 = 100;

    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            count: 0,
        }
    }

    /// Record one occurrence. Returns the running count when this one should
    /// be logged.
    pub fn hit(&mut self) -> Option<u64> {
        self.count += 1;
        if self.count == 1 || self.count % self.every == 0 {
            Some(self.count)
        } else {
            None
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EVERY)
    }
}
