// src/scene.rs
use bevy::math::Isometry3d;
use bevy::prelude::*;
use vivelink_common::{Hand, Vector3};
use vivelink_receiver::visualizer::scene::{GroundGrid, Marker, Rgba, Scene, ViewBox};
use vivelink_receiver::visualizer::scene::palette;

/// Marker sphere radius, meters.
const MARKER_RADIUS: f32 = 0.03;

/// Draws one visualizer frame with immediate-mode gizmos. Gizmos are cleared
/// by bevy every frame, so the whole scene is re-issued each time.
pub struct GizmoScene<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    view: Option<ViewBox>,
    status: Option<String>,
}

impl<'a, 'w, 's> GizmoScene<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>) -> Self {
        Self { gizmos, view: None, status: None }
    }

    pub fn view(&self) -> Option<ViewBox> {
        self.view
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

pub fn to_vec3(v: Vector3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

pub fn to_color(c: Rgba) -> Color {
    Color::srgba(c.r, c.g, c.b, c.a)
}

impl Scene for GizmoScene<'_, '_, '_> {
    fn begin_frame(&mut self) {
        self.view = None;
        self.status = None;
    }

    fn draw_grid(&mut self, grid: &GroundGrid) {
        let color = to_color(palette::GRID);
        for (a, b) in grid.segments() {
            self.gizmos.line(to_vec3(a), to_vec3(b), color);
        }
    }

    fn set_marker(&mut self, _hand: Hand, marker: &Marker) {
        let center = to_vec3(marker.position);
        self.gizmos
            .sphere(Isometry3d::from_translation(center), MARKER_RADIUS, to_color(marker.color));

        let axis_colors = [palette::AXIS_X, palette::AXIS_Y, palette::AXIS_Z];
        for (end, color) in marker.axes.iter().zip(axis_colors) {
            self.gizmos.line(center, to_vec3(*end), to_color(color));
        }
    }

    fn set_path(&mut self, _hand: Hand, points: &[Vector3], color: Rgba) {
        if points.len() > 1 {
            self.gizmos
                .linestrip(points.iter().copied().map(to_vec3), to_color(color));
        }
    }

    fn set_view(&mut self, view: &ViewBox) {
        self.view = Some(*view);
    }

    fn end_frame(&mut self, status: &str) {
        self.status = Some(status.to_string());
    }
}

/// Camera placement that keeps `view` in frame: in front of and above the
/// box centre, looking at it.
pub fn camera_for(view: &ViewBox) -> Transform {
    let center = to_vec3(view.center());
    let distance = (view.extent() as f32).max(0.5) * 1.6;
    let eye = center + Vec3::new(0.6, 0.5, 1.0).normalize() * distance;
    Transform::from_translation(eye).looking_at(center, Vec3::Y)
}
