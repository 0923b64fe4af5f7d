//! Orbit camera math.
//!
//! The camera circles a focus point in its parent's local space on a sphere
//! described by yaw, pitch and distance. Parenting the camera to the
//! helicopter makes the orbit follow the aircraft.

use glam::{Mat3, Quat, Vec3};

/// Clamping limits for the orbit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Largest pitch magnitude in radians; kept short of the poles so the
    /// up vector stays well defined.
    pub max_pitch: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 10.0,
            max_distance: 200.0,
            max_pitch: 85.0_f32.to_radians(),
        }
    }
}

/// Spherical camera placement around a focus point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitState {
    /// Rotation around +Y in radians; zero looks down -Z from +Z.
    pub yaw: f32,
    /// Elevation above the focus' horizontal plane in radians.
    pub pitch: f32,
    pub distance: f32,
    pub focus: Vec3,
}

impl OrbitState {
    /// Place the camera at `focus + offset`, clamped to the limits.
    pub fn from_offset(offset: Vec3, focus: Vec3, limits: &OrbitLimits) -> Self {
        let distance = offset.length();
        let (yaw, pitch) = if distance > f32::EPSILON {
            (offset.x.atan2(offset.z), (offset.y / distance).asin())
        } else {
            (0.0, 0.0)
        };

        Self {
            yaw,
            pitch: pitch.clamp(-limits.max_pitch, limits.max_pitch),
            distance: distance.clamp(limits.min_distance, limits.max_distance),
            focus,
        }
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32, limits: &OrbitLimits) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-limits.max_pitch, limits.max_pitch);
    }

    /// Scale the distance; factors below one move closer.
    pub fn zoom(&mut self, factor: f32, limits: &OrbitLimits) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(limits.min_distance, limits.max_distance);
        }
    }

    /// Slide the focus within the camera's view plane.
    pub fn pan(&mut self, delta_right: f32, delta_up: f32) {
        let rotation = self.look_rotation();
        self.focus += rotation * Vec3::X * delta_right + rotation * Vec3::Y * delta_up;
    }

    /// Camera position.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.focus + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Orientation that looks from the eye at the focus with +Y up.
    pub fn look_rotation(&self) -> Quat {
        let forward = (self.focus - self.eye()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        Quat::from_mat3(&Mat3::from_cols(right, up, -forward))
    }
}
