//! vivelink-receiver/src/visualizer/mod.rs
//!
//! Trail visualizer: per-hand pose, trigger state and bounded trail, drawn
//! through a `Scene` every time a new frame is applied.

pub mod log_scene;
pub mod scene;
pub mod state;
pub mod trail;

pub use log_scene::LogScene;
pub use scene::{GroundGrid, Marker, RecordedFrame, RecordingScene, Rgba, Scene, ViewBox};
pub use state::{Bounds, HandPhase, HandState};
pub use trail::Trail;

use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, info};

use vivelink_common::rotation::body_axes;
use vivelink_common::shutdown::stop_requested;
use vivelink_common::{FrameSnapshot, Hand};

use crate::config::VisualizerConfig;
use crate::consumer::SlotReader;
use scene::palette;
use state::fixed_view;

/// Length of each drawn body axis, meters.
pub const AXIS_LENGTH: f64 = 0.1;

pub struct TrailVisualizer {
    config: VisualizerConfig,
    hands: [HandState; 2],
    bounds: Bounds,
    auto_scale: bool,
    debug: bool,
    last_update: Option<Instant>,
    frames: u64,
}

impl TrailVisualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            config,
            hands: [
                HandState::new(config.trail_length),
                HandState::new(config.trail_length),
            ],
            bounds: Bounds::default(),
            auto_scale: true,
            debug: false,
            last_update: None,
            frames: 0,
        }
    }

    pub fn hand(&self, hand: Hand) -> &HandState {
        &self.hands[hand.index()]
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn auto_scale(&self) -> bool {
        self.auto_scale
    }

    /// Flip between fitting the data and the fixed box. Returns the new
    /// setting.
    pub fn toggle_auto_scale(&mut self) -> bool {
        self.auto_scale = !self.auto_scale;
        info!("Auto-scaling: {}", on_off(self.auto_scale));
        self.auto_scale
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        info!("Debug mode: {}", on_off(self.debug));
        self.debug
    }

    /// Fold a received frame into the per-hand state.
    pub fn apply(&mut self, frame: &FrameSnapshot, now: Instant) {
        for hand in Hand::ALL {
            let snapshot = frame.hand(hand);
            if let Some(p) = self.hands[hand.index()].apply(snapshot) {
                self.bounds.include(p);
            }
            if self.debug {
                info!(
                    "{} tracked={} pos=({:.3}, {:.3}, {:.3}) trail={}",
                    hand,
                    snapshot.tracked,
                    snapshot.position.x,
                    snapshot.position.y,
                    snapshot.position.z,
                    self.hands[hand.index()].trail.len()
                );
            }
        }
        self.last_update = Some(now);
        self.frames += 1;
    }

    pub fn view_box(&self) -> ViewBox {
        if self.auto_scale {
            if let Some(fitted) = self.bounds.fitted() {
                return fitted;
            }
        }
        fixed_view(self.config.axis_limit)
    }

    /// Marker colour: stale when untracked, active while the trigger is held,
    /// otherwise the hand colour.
    pub fn marker_color(&self, hand: Hand) -> Rgba {
        let h = self.hand(hand);
        if !h.tracked {
            palette::STALE
        } else if h.trigger_active {
            palette::ACTIVE
        } else {
            hand_color(hand)
        }
    }

    pub fn status_line(&self, now: Instant) -> String {
        let age = self
            .last_update
            .map(|t| format!("{:.1}s", now.saturating_duration_since(t).as_secs_f64()))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "Left: {}, Right: {} | Scaling: {} | Data Age: {} | Debug: {}",
            self.hand_status(Hand::Left),
            self.hand_status(Hand::Right),
            if self.auto_scale { "AUTO" } else { "FIXED" },
            age,
            on_off(self.debug)
        )
    }

    fn hand_status(&self, hand: Hand) -> String {
        let h = self.hand(hand);
        match (h.phase, h.tracked, h.trigger_active) {
            (HandPhase::NoHistory, _, _) => "NO DATA".to_string(),
            (_, false, _) => "NOT TRACKED".to_string(),
            (_, true, true) => "TRACKED (TRIGGER PRESSED)".to_string(),
            (_, true, false) => "TRACKED".to_string(),
        }
    }

    /// Draw the current state.
    pub fn render<S: Scene + ?Sized>(&self, scene: &mut S, now: Instant) {
        scene.begin_frame();
        scene.draw_grid(&GroundGrid::new(self.config.axis_limit));
        scene.set_view(&self.view_box());

        for hand in Hand::ALL {
            let h = self.hand(hand);
            if !h.has_history() {
                continue;
            }
            if !h.trail.is_empty() {
                let points = h.trail.to_vec();
                scene.set_path(hand, &points, hand_color(hand).with_alpha(palette::TRAIL_ALPHA));
            }
            let axes = body_axes(&h.rotation).map(|axis| h.position.add(axis.scale(AXIS_LENGTH)));
            scene.set_marker(
                hand,
                &Marker {
                    position: h.position,
                    color: self.marker_color(hand),
                    axes,
                },
            );
        }

        scene.end_frame(&self.status_line(now));
    }
}

pub fn hand_color(hand: Hand) -> Rgba {
    match hand {
        Hand::Left => palette::LEFT,
        Hand::Right => palette::RIGHT,
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "ON" } else { "OFF" }
}

/// Drain the frame slot and redraw on every new frame until stopped or the
/// writer goes away. Returns the visualizer so callers can inspect it.
pub async fn run_headless<S: Scene>(
    mut visualizer: TrailVisualizer,
    mut reader: SlotReader,
    scene: &mut S,
    mut shutdown_rx: watch::Receiver<bool>,
) -> TrailVisualizer {
    loop {
        if stop_requested(&shutdown_rx) {
            break;
        }
        tokio::select! {
            next = reader.next() => match next {
                Some(frame) => {
                    let now = Instant::now();
                    visualizer.apply(&frame, now);
                    visualizer.render(scene, now);
                }
                None => break,
            },
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    debug!("Visualizer stopped after {} frames", visualizer.frames());
    visualizer
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivelink_common::{ControllerSnapshot, Orientation, Vector3};

    fn static_frame(t: f64) -> FrameSnapshot {
        let mut left = ControllerSnapshot {
            tracked: true,
            position: Vector3::new(0.1, 0.2, 0.3),
            ..Default::default()
        };
        left.buttons.trigger = true;
        FrameSnapshot::new(left, ControllerSnapshot::default(), t)
    }

    #[test]
    fn static_trigger_held_controller() {
        let mut vis = TrailVisualizer::new(VisualizerConfig::default());
        let mut scene = RecordingScene::new();
        let now = Instant::now();
        for t in [1.0, 1.016, 1.033] {
            vis.apply(&static_frame(t), now);
            vis.render(&mut scene, now);
        }

        let left = vis.hand(Hand::Left);
        assert_eq!(left.trail.to_vec(), vec![Vector3::new(0.1, 0.2, 0.3); 3]);

        let frame = scene.last_frame().unwrap();
        let marker = frame.marker(Hand::Left).unwrap();
        assert_eq!(marker.color, palette::ACTIVE);
        assert_eq!(marker.position, Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(frame.path(Hand::Left).unwrap().0.len(), 3);
        assert!(frame.status.contains("Left: TRACKED (TRIGGER PRESSED)"));
        assert!(frame.status.contains("Right: NOT TRACKED"));
        assert_eq!(scene.frames(), 3);
    }

    #[test]
    fn nothing_drawn_before_first_frame_except_grid() {
        let vis = TrailVisualizer::new(VisualizerConfig::default());
        let mut scene = RecordingScene::new();
        vis.render(&mut scene, Instant::now());
        let frame = scene.last_frame().unwrap();
        assert!(frame.grid.is_some());
        assert!(frame.marker(Hand::Left).is_none());
        assert!(frame.status.contains("Left: NO DATA"));
        assert!(frame.status.contains("Data Age: -"));
    }

    #[test]
    fn untracked_hand_is_drawn_stale_at_last_pose() {
        let mut vis = TrailVisualizer::new(VisualizerConfig::default());
        let now = Instant::now();
        let tracked = static_frame(1.0);
        vis.apply(&tracked, now);
        let asleep = tracked.with_hand(Hand::Left, tracked.left.stale());
        vis.apply(&asleep, now);

        assert_eq!(vis.marker_color(Hand::Left), palette::STALE);
        assert_eq!(vis.hand(Hand::Left).trail.len(), 1);
        assert_eq!(vis.hand(Hand::Left).position, Vector3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn released_trigger_uses_hand_colour() {
        let mut vis = TrailVisualizer::new(VisualizerConfig::default());
        let mut f = static_frame(1.0);
        f.left.buttons.trigger = false;
        f.right.tracked = true;
        vis.apply(&f, Instant::now());
        assert_eq!(vis.marker_color(Hand::Left), palette::LEFT);
        assert_eq!(vis.marker_color(Hand::Right), palette::RIGHT);
    }

    #[test]
    fn trail_is_bounded_by_config() {
        let mut vis = TrailVisualizer::new(VisualizerConfig::new(4, 2.0).unwrap());
        let now = Instant::now();
        for i in 0..10 {
            let mut f = static_frame(i as f64);
            f.left.position.x = i as f64;
            vis.apply(&f, now);
        }
        let xs: Vec<f64> = vis.hand(Hand::Left).trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn auto_scale_toggle_switches_view() {
        let mut vis = TrailVisualizer::new(VisualizerConfig::default());
        let now = Instant::now();
        let mut f = static_frame(1.0);
        vis.apply(&f, now);
        assert_eq!(vis.view_box(), fixed_view(2.0));

        f.left.position.x = 1.0;
        vis.apply(&f, now);
        let fitted = vis.view_box();
        assert_ne!(fitted, fixed_view(2.0));
        assert!(fitted.min.x < 0.1 && fitted.max.x > 1.0);

        assert!(!vis.toggle_auto_scale());
        assert_eq!(vis.view_box(), fixed_view(2.0));
        assert!(vis.status_line(now).contains("Scaling: FIXED"));
    }

    #[test]
    fn coordinate_frame_follows_rotation() {
        let mut vis = TrailVisualizer::new(VisualizerConfig::default());
        let mut f = static_frame(1.0);
        f.left.rotation = Orientation::new(0.0, 0.0, 90.0);
        vis.apply(&f, Instant::now());

        let mut scene = RecordingScene::new();
        vis.render(&mut scene, Instant::now());
        let marker = *scene.last_frame().unwrap().marker(Hand::Left).unwrap();
        // Yaw 90 about z turns body x onto world y.
        let x_end = marker.axes[0];
        assert!((x_end.x - 0.1).abs() < 1e-9);
        assert!((x_end.y - 0.3).abs() < 1e-9);
        assert!((x_end.z - 0.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn headless_loop_renders_newest_frame() {
        use crate::consumer::frame_slot;
        use vivelink_common::Shutdown;

        let (slot, reader) = frame_slot();
        let shutdown = Shutdown::new();
        let vis = TrailVisualizer::new(VisualizerConfig::default());
        let mut scene = RecordingScene::new();

        slot.publish(static_frame(1.0));
        let rx = shutdown.subscribe();
        let run = run_headless(vis, reader, &mut scene, rx);
        let stop = async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            shutdown.trigger();
        };
        let (vis, _) = tokio::join!(run, stop);

        assert_eq!(vis.frames(), 1);
        assert_eq!(scene.frames(), 1);
        drop(slot);
    }
}
