// File: vivelink-receiver/src/visualizer/state.rs

use vivelink_common::{ControllerSnapshot, Orientation, Vector3};

use super::scene::ViewBox;
use super::trail::Trail;

/// Analog pull above which the trigger counts as held even without a click.
pub const TRIGGER_ACTIVE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandPhase {
    NoHistory,
    HasHistory,
}

/// What the visualizer knows about one hand.
#[derive(Debug, Clone)]
pub struct HandState {
    pub phase: HandPhase,
    pub tracked: bool,
    pub position: Vector3,
    pub rotation: Orientation,
    pub trigger_active: bool,
    pub trail: Trail,
}

impl HandState {
    pub fn new(trail_length: usize) -> Self {
        Self {
            phase: HandPhase::NoHistory,
            tracked: false,
            position: Vector3::ZERO,
            rotation: Orientation::IDENTITY,
            trigger_active: false,
            trail: Trail::new(trail_length),
        }
    }

    /// Fold one snapshot in. Returns the position appended to the trail, if
    /// any. Untracked snapshots freeze the pose and leave the trail alone.
    pub fn apply(&mut self, c: &ControllerSnapshot) -> Option<Vector3> {
        self.phase = HandPhase::HasHistory;
        self.tracked = c.tracked;
        self.trigger_active = c.buttons.trigger || c.analog.trigger > TRIGGER_ACTIVE_THRESHOLD;

        if !c.tracked {
            return None;
        }
        self.position = c.position;
        self.rotation = c.rotation;
        self.trail.push(c.position);
        Some(c.position)
    }

    pub fn has_history(&self) -> bool {
        self.phase == HandPhase::HasHistory
    }
}

/// Running min/max over every tracked position seen this session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    extent: Option<(Vector3, Vector3)>,
}

/// Smallest side length auto-scaling will zoom in to, meters.
pub const MIN_SPAN: f64 = 0.5;
/// Margin added on every side when auto-scaling, meters.
pub const PADDING: f64 = 0.2;

impl Bounds {
    pub fn include(&mut self, p: Vector3) {
        self.extent = Some(match self.extent {
            None => (p, p),
            Some((lo, hi)) => (
                Vector3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Vector3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            ),
        });
    }

    pub fn min_max(&self) -> Option<(Vector3, Vector3)> {
        self.extent
    }

    /// Box centred on the data, or `None` while every point so far shares
    /// one x coordinate.
    pub fn fitted(&self) -> Option<ViewBox> {
        let (lo, hi) = self.extent?;
        if lo.x == hi.x {
            return None;
        }
        let axis = |lo: f64, hi: f64| {
            let half = (hi - lo).max(MIN_SPAN) / 2.0 + PADDING;
            let c = (lo + hi) / 2.0;
            (c - half, c + half)
        };
        let (x0, x1) = axis(lo.x, hi.x);
        let (y0, y1) = axis(lo.y, hi.y);
        let (z0, z1) = axis(lo.z, hi.z);
        Some(ViewBox {
            min: Vector3::new(x0, y0, z0),
            max: Vector3::new(x1, y1, z1),
        })
    }
}

/// Box used when auto-scaling is off or there is nothing to fit yet.
pub fn fixed_view(axis_limit: f64) -> ViewBox {
    ViewBox {
        min: Vector3::new(-axis_limit, 0.0, -axis_limit),
        max: Vector3::new(axis_limit, 2.0 * axis_limit, axis_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked_at(x: f64, y: f64, z: f64) -> ControllerSnapshot {
        ControllerSnapshot {
            tracked: true,
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    #[test]
    fn first_snapshot_moves_to_has_history() {
        let mut h = HandState::new(10);
        assert_eq!(h.phase, HandPhase::NoHistory);
        h.apply(&ControllerSnapshot::default());
        assert_eq!(h.phase, HandPhase::HasHistory);
        assert!(h.trail.is_empty());
    }

    #[test]
    fn untracked_freezes_pose_and_trail() {
        let mut h = HandState::new(10);
        h.apply(&tracked_at(1.0, 2.0, 3.0));
        let stale = ControllerSnapshot {
            tracked: false,
            position: Vector3::new(9.0, 9.0, 9.0),
            ..Default::default()
        };
        assert_eq!(h.apply(&stale), None);
        assert!(!h.tracked);
        assert_eq!(h.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(h.trail.len(), 1);
    }

    #[test]
    fn trigger_active_from_click_or_pull() {
        let mut h = HandState::new(10);
        let mut c = tracked_at(0.0, 0.0, 0.0);
        c.analog.trigger = 0.6;
        h.apply(&c);
        assert!(h.trigger_active);

        c.analog.trigger = 0.2;
        h.apply(&c);
        assert!(!h.trigger_active);

        c.buttons.trigger = true;
        h.apply(&c);
        assert!(h.trigger_active);
    }

    #[test]
    fn fitted_view_has_min_span_and_padding() {
        let mut b = Bounds::default();
        assert_eq!(b.fitted(), None);
        b.include(Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(b.fitted(), None);
        b.include(Vector3::new(0.1, 1.0, 2.0));

        let v = b.fitted().unwrap();
        // x span 0.1 is raised to 0.5, centred on 0.05.
        assert!((v.min.x - (0.05 - 0.25 - 0.2)).abs() < 1e-12);
        assert!((v.max.x - (0.05 + 0.25 + 0.2)).abs() < 1e-12);
        // z span 2.0 is kept.
        assert!((v.min.z - (-0.2)).abs() < 1e-12);
        assert!((v.max.z - 2.2).abs() < 1e-12);
    }

    #[test]
    fn fixed_view_stands_on_the_floor() {
        let v = fixed_view(2.0);
        assert_eq!(v.min, Vector3::new(-2.0, 0.0, -2.0));
        assert_eq!(v.max, Vector3::new(2.0, 4.0, 2.0));
    }
}
