//! Orbit camera.
//!
//! The camera circles a focus point in its parent's space. Until the
//! helicopter loads it orbits the world origin; afterwards it is parented to
//! the model and orbits the aircraft.
//!
//! Mouse bindings: right drag orbits, left drag and the wheel zoom, middle
//! drag pans.

use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::input::egui_wants_any_pointer_input;
use heli_sim::config::CameraConfig;
use heli_sim::{OrbitLimits, OrbitState};

// ============================================================================
// Plugin
// ============================================================================

/// Plugin for the orbit camera.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            orbit_camera_input.run_if(not(egui_wants_any_pointer_input)),
        );
    }
}

// ============================================================================
// Components
// ============================================================================

/// Orbit state and tuning for the camera.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    pub state: OrbitState,
    pub limits: OrbitLimits,
    /// Radians per pixel of drag.
    pub rotate_sensitivity: f32,
    /// Zoom exponent per pixel of drag or wheel line.
    pub zoom_sensitivity: f32,
    /// Pan distance per pixel, per metre of orbit distance.
    pub pan_sensitivity: f32,
}

impl OrbitCamera {
    /// Build the camera's initial orbit from config.
    pub fn from_config(config: &CameraConfig) -> Self {
        let limits = OrbitLimits {
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            ..Default::default()
        };
        Self {
            state: OrbitState::from_offset(config.initial_offset, Vec3::ZERO, &limits),
            limits,
            rotate_sensitivity: config.rotate_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            pan_sensitivity: config.pan_sensitivity,
        }
    }

    /// Local transform for the current orbit.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.state.eye()).with_rotation(self.state.look_rotation())
    }

    /// Apply one frame of mouse input. Returns whether the orbit changed.
    pub fn apply(&mut self, gesture: OrbitGesture) -> bool {
        let OrbitGesture {
            rotate,
            zoom,
            pan,
        } = gesture;

        if rotate != Vec2::ZERO {
            self.state.rotate(
                -rotate.x * self.rotate_sensitivity,
                rotate.y * self.rotate_sensitivity,
                &self.limits,
            );
        }
        if zoom != 0.0 {
            self.state
                .zoom((zoom * self.zoom_sensitivity).exp(), &self.limits);
        }
        if pan != Vec2::ZERO {
            let scale = self.pan_sensitivity * self.state.distance;
            self.state.pan(-pan.x * scale, pan.y * scale);
        }

        rotate != Vec2::ZERO || zoom != 0.0 || pan != Vec2::ZERO
    }
}

/// Mouse input gathered over one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitGesture {
    /// Drag delta while orbiting, in pixels.
    pub rotate: Vec2,
    /// Positive moves away from the focus.
    pub zoom: f32,
    /// Drag delta while panning, in pixels.
    pub pan: Vec2,
}

// ============================================================================
// Systems
// ============================================================================

/// Pixels the browser reports per wheel line.
const PIXELS_PER_LINE: f32 = 120.0;

/// Pixels of zoom per wheel line.
const WHEEL_ZOOM_PIXELS: f32 = 30.0;

fn orbit_camera_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut scroll_events: MessageReader<MouseWheel>,
    mut query: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    let mut gesture = OrbitGesture::default();
    if buttons.pressed(MouseButton::Right) {
        gesture.rotate = delta;
    } else if buttons.pressed(MouseButton::Left) {
        gesture.zoom = delta.y;
    } else if buttons.pressed(MouseButton::Middle) {
        gesture.pan = delta;
    }

    for event in scroll_events.read() {
        // Normalize scroll value: web reports pixels, native reports lines.
        let scroll = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_LINE,
        };
        gesture.zoom -= scroll * WHEEL_ZOOM_PIXELS;
    }

    for (mut orbit, mut transform) in &mut query {
        if orbit.apply(gesture) {
            *transform = orbit.transform();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::from_config(&CameraConfig::default())
    }

    #[test]
    fn test_initial_transform_matches_offset() {
        let camera = camera();
        let transform = camera.transform();
        assert!(
            transform
                .translation
                .abs_diff_eq(CameraConfig::default().initial_offset, 1e-4)
        );
        // Looking at the focus.
        let forward = transform.forward();
        let to_focus = (-transform.translation).normalize();
        assert!(forward.dot(to_focus) > 0.9999);
    }

    #[test]
    fn test_idle_gesture_changes_nothing() {
        let mut camera = camera();
        let before = camera.state;
        assert!(!camera.apply(OrbitGesture::default()));
        assert_eq!(camera.state, before);
    }

    #[test]
    fn test_zoom_respects_minimum_distance() {
        let mut camera = camera();
        camera.apply(OrbitGesture {
            zoom: -1000.0,
            ..Default::default()
        });
        assert_eq!(camera.state.distance, camera.limits.min_distance);
    }

    #[test]
    fn test_drag_right_orbits_around_focus() {
        let mut camera = camera();
        let distance = camera.state.distance;
        camera.apply(OrbitGesture {
            rotate: Vec2::new(100.0, 0.0),
            ..Default::default()
        });
        assert!((camera.state.distance - distance).abs() < 1e-5);
        assert!(
            (camera.transform().translation.length() - distance).abs() < 1e-3,
            "still on the sphere"
        );
    }

    #[test]
    fn test_pan_moves_focus() {
        let mut camera = camera();
        camera.apply(OrbitGesture {
            pan: Vec2::new(10.0, 0.0),
            ..Default::default()
        });
        assert_ne!(camera.state.focus, Vec3::ZERO);
    }
}
