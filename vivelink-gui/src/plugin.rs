// src/plugin.rs
use std::time::Instant;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use vivelink_receiver::{SlotReader, TrailVisualizer};

use crate::scene::{camera_for, GizmoScene};

/// Pulls frames from the receive thread's slot and draws them every frame.
pub struct VisualizerPlugin {
    pub visualizer: std::sync::Mutex<Option<(TrailVisualizer, SlotReader)>>,
}

impl VisualizerPlugin {
    pub fn new(visualizer: TrailVisualizer, reader: SlotReader) -> Self {
        Self {
            visualizer: std::sync::Mutex::new(Some((visualizer, reader))),
        }
    }
}

#[derive(Resource)]
struct Link {
    visualizer: TrailVisualizer,
    reader: SlotReader,
}

#[derive(Component)]
struct ViewCamera;

impl Plugin for VisualizerPlugin {
    fn build(&self, app: &mut App) {
        let taken = self.visualizer.lock().ok().and_then(|mut slot| slot.take());
        let Some((visualizer, reader)) = taken else {
            tracing::error!("VisualizerPlugin added twice; second copy ignored");
            return;
        };

        app.insert_resource(Link { visualizer, reader })
            .insert_resource(ClearColor(Color::srgb(0.08, 0.08, 0.1)))
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, (handle_keys, pull_frames, draw).chain());
    }
}

fn spawn_camera(mut cmds: Commands) {
    cmds.spawn((
        Camera3d::default(),
        Tonemapping::None,
        Transform::from_xyz(3.0, 3.0, 5.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
        ViewCamera,
    ));
}

/// A toggles auto-scaling, D toggles per-frame debug logging.
fn handle_keys(keys: Res<ButtonInput<KeyCode>>, mut link: ResMut<Link>) {
    if keys.just_pressed(KeyCode::KeyA) {
        link.visualizer.toggle_auto_scale();
    }
    if keys.just_pressed(KeyCode::KeyD) {
        link.visualizer.toggle_debug();
    }
}

fn pull_frames(mut link: ResMut<Link>) {
    let link = &mut *link;
    if let Some(frame) = link.reader.take() {
        link.visualizer.apply(&frame, Instant::now());
    }
}

fn draw(
    link: Res<Link>,
    mut gizmos: Gizmos,
    mut cameras: Query<&mut Transform, With<ViewCamera>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let mut scene = GizmoScene::new(&mut gizmos);
    link.visualizer.render(&mut scene, Instant::now());

    if let (Some(view), Ok(mut cam)) = (scene.view(), cameras.single_mut()) {
        let target = camera_for(&view);
        // Ease toward the new framing instead of jumping.
        cam.translation = cam.translation.lerp(target.translation, 0.1);
        cam.look_at(view_center(&view), Vec3::Y);
    }
    if let (Some(status), Ok(mut window)) = (scene.status(), windows.single_mut()) {
        let title = format!("Vive Controllers - {}", status);
        if window.title != title {
            window.title = title;
        }
    }
}

fn view_center(view: &vivelink_receiver::visualizer::ViewBox) -> Vec3 {
    crate::scene::to_vec3(view.center())
}
