// File: vivelink-receiver/src/visualizer/log_scene.rs

use std::time::{Duration, Instant};

use tracing::{debug, info};
use vivelink_common::{Hand, Vector3};

use super::scene::{GroundGrid, Marker, Rgba, Scene, ViewBox};

/// Headless backend: a debug line per frame and the status line at info,
/// rate limited.
#[derive(Debug)]
pub struct LogScene {
    status_every: Duration,
    last_status: Option<Instant>,
    markers: [Option<Vector3>; 2],
    path_lens: [usize; 2],
    logged: u64,
}

impl LogScene {
    pub const STATUS_EVERY: Duration = Duration::from_millis(200);

    pub fn new() -> Self {
        Self::with_interval(Self::STATUS_EVERY)
    }

    pub fn with_interval(status_every: Duration) -> Self {
        Self {
            status_every,
            last_status: None,
            markers: [None; 2],
            path_lens: [0; 2],
            logged: 0,
        }
    }

    /// Status lines written so far.
    pub fn status_lines(&self) -> u64 {
        self.logged
    }

    fn status_due(&mut self, now: Instant) -> bool {
        match self.last_status {
            Some(t) if now.saturating_duration_since(t) < self.status_every => false,
            _ => {
                self.last_status = Some(now);
                true
            }
        }
    }
}

impl Default for LogScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for LogScene {
    fn begin_frame(&mut self) {
        self.markers = [None; 2];
        self.path_lens = [0; 2];
    }

    fn draw_grid(&mut self, _grid: &GroundGrid) {}

    fn set_marker(&mut self, hand: Hand, marker: &Marker) {
        self.markers[hand.index()] = Some(marker.position);
    }

    fn set_path(&mut self, hand: Hand, points: &[Vector3], _color: Rgba) {
        self.path_lens[hand.index()] = points.len();
    }

    fn set_view(&mut self, _view: &ViewBox) {}

    fn end_frame(&mut self, status: &str) {
        for hand in Hand::ALL {
            if let Some(p) = self.markers[hand.index()] {
                debug!(
                    "{} marker=({:.3}, {:.3}, {:.3}) trail={}",
                    hand,
                    p.x,
                    p.y,
                    p.z,
                    self.path_lens[hand.index()]
                );
            }
        }
        if self.status_due(Instant::now()) {
            self.logged += 1;
            info!("{}", status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_rate_limited() {
        let mut scene = LogScene::with_interval(Duration::from_secs(3600));
        for _ in 0..5 {
            scene.begin_frame();
            scene.end_frame("status");
        }
        assert_eq!(scene.status_lines(), 1);

        let mut every = LogScene::with_interval(Duration::ZERO);
        for _ in 0..5 {
            every.begin_frame();
            every.end_frame("status");
        }
        assert_eq!(every.status_lines(), 5);
    }
}
