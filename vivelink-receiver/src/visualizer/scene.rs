//! vivelink-receiver/src/visualizer/scene.rs
//!
//! The drawing seam. The visualizer describes each frame through `Scene`;
//! backends turn that into pixels, log lines, or a recording for tests.

use vivelink_common::{Hand, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

pub mod palette {
    use super::Rgba;

    pub const LEFT: Rgba = Rgba::rgb(0.0, 0.0, 1.0);
    pub const RIGHT: Rgba = Rgba::rgb(1.0, 0.0, 0.0);
    /// Trigger held.
    pub const ACTIVE: Rgba = Rgba::rgb(0.0, 0.8, 0.0);
    /// Last known pose of a hand that is not tracked right now.
    pub const STALE: Rgba = Rgba::rgb(0.45, 0.45, 0.45);
    pub const GRID: Rgba = Rgba::rgb(0.5, 0.5, 0.5).with_alpha(0.3);
    pub const TRAIL_ALPHA: f32 = 0.5;

    pub const AXIS_X: Rgba = Rgba::rgb(1.0, 0.0, 0.0);
    pub const AXIS_Y: Rgba = Rgba::rgb(0.0, 1.0, 0.0);
    pub const AXIS_Z: Rgba = Rgba::rgb(0.0, 0.0, 1.0);
}

/// A controller drawn at its current position with its body axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Vector3,
    pub color: Rgba,
    /// End points of the x, y and z axis segments, starting at `position`.
    pub axes: [Vector3; 3],
}

/// Static reference grid on the y = 0 plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundGrid {
    pub half_extent: f64,
    /// Lines per direction.
    pub lines: usize,
}

impl GroundGrid {
    pub const LINES: usize = 11;

    pub fn new(half_extent: f64) -> Self {
        Self {
            half_extent,
            lines: Self::LINES,
        }
    }

    /// Line segments: `lines` parallel to z, then `lines` parallel to x.
    pub fn segments(&self) -> Vec<(Vector3, Vector3)> {
        let e = self.half_extent;
        let n = self.lines.max(2);
        let step = 2.0 * e / (n - 1) as f64;
        let mut out = Vec::with_capacity(n * 2);
        for i in 0..n {
            let x = -e + step * i as f64;
            out.push((Vector3::new(x, 0.0, -e), Vector3::new(x, 0.0, e)));
        }
        for i in 0..n {
            let z = -e + step * i as f64;
            out.push((Vector3::new(-e, 0.0, z), Vector3::new(e, 0.0, z)));
        }
        out
    }
}

/// Axis-aligned region the view should frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl ViewBox {
    pub fn center(&self) -> Vector3 {
        Vector3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Largest side length.
    pub fn extent(&self) -> f64 {
        (self.max.x - self.min.x)
            .max(self.max.y - self.min.y)
            .max(self.max.z - self.min.z)
    }
}

pub trait Scene {
    fn begin_frame(&mut self);
    fn draw_grid(&mut self, grid: &GroundGrid);
    fn set_marker(&mut self, hand: Hand, marker: &Marker);
    fn set_path(&mut self, hand: Hand, points: &[Vector3], color: Rgba);
    fn set_view(&mut self, view: &ViewBox);
    /// Frame complete. `status` is the one-line summary of both hands.
    fn end_frame(&mut self, status: &str);
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    pub grid: Option<GroundGrid>,
    pub markers: [Option<Marker>; 2],
    pub paths: [Option<(Vec<Vector3>, Rgba)>; 2],
    pub view: Option<ViewBox>,
    pub status: String,
}

impl RecordedFrame {
    pub fn marker(&self, hand: Hand) -> Option<&Marker> {
        self.markers[hand.index()].as_ref()
    }

    pub fn path(&self, hand: Hand) -> Option<&(Vec<Vector3>, Rgba)> {
        self.paths[hand.index()].as_ref()
    }
}

/// Keeps the last completed frame. Used by tests.
#[derive(Debug, Default)]
pub struct RecordingScene {
    pending: RecordedFrame,
    last: Option<RecordedFrame>,
    frames: u64,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.last.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Scene for RecordingScene {
    fn begin_frame(&mut self) {
        self.pending = RecordedFrame::default();
    }

    fn draw_grid(&mut self, grid: &GroundGrid) {
        self.pending.grid = Some(*grid);
    }

    fn set_marker(&mut self, hand: Hand, marker: &Marker) {
        self.pending.markers[hand.index()] = Some(*marker);
    }

    fn set_path(&mut self, hand: Hand, points: &[Vector3], color: Rgba) {
        self.pending.paths[hand.index()] = Some((points.to_vec(), color));
    }

    fn set_view(&mut self, view: &ViewBox) {
        self.pending.view = Some(*view);
    }

    fn end_frame(&mut self, status: &str) {
        self.pending.status = status.to_string();
        self.last = Some(std::mem::take(&mut self.pending));
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_eleven_by_eleven_on_the_floor() {
        let segs = GroundGrid::new(2.0).segments();
        assert_eq!(segs.len(), 22);
        assert!(segs.iter().all(|(a, b)| a.y == 0.0 && b.y == 0.0));
        assert_eq!(segs[0].0, Vector3::new(-2.0, 0.0, -2.0));
        assert_eq!(segs[10].0.x, 2.0);
        assert!((segs[1].0.x - -1.6).abs() < 1e-12);
    }

    #[test]
    fn recording_scene_keeps_last_complete_frame() {
        let mut scene = RecordingScene::new();
        scene.begin_frame();
        scene.set_path(Hand::Left, &[Vector3::ZERO], palette::LEFT);
        scene.end_frame("first");

        scene.begin_frame();
        scene.draw_grid(&GroundGrid::new(1.0));
        assert_eq!(scene.last_frame().unwrap().status, "first");
        scene.end_frame("second");

        let last = scene.last_frame().unwrap();
        assert_eq!(last.status, "second");
        assert!(last.path(Hand::Left).is_none());
        assert_eq!(last.grid, Some(GroundGrid::new(1.0)));
        assert_eq!(scene.frames(), 2);
    }

    #[test]
    fn view_box_center_and_extent() {
        let v = ViewBox {
            min: Vector3::new(-1.0, 0.0, -2.0),
            max: Vector3::new(1.0, 4.0, 2.0),
        };
        assert_eq!(v.center(), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(v.extent(), 4.0);
    }
}
