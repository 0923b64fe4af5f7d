//! Control-to-force mapping.
//!
//! The rotor pushes the body along its own up axis with a force equal to the
//! current torque, applied slightly below the body origin so a tilted
//! helicopter rights itself. Commanded pitch/yaw/roll rates are expressed in
//! the body frame and, when non-zero, replace the body's angular velocity
//! outright; otherwise rotation is left to the physics engine.

use glam::{Quat, Vec3};

use crate::ControlState;
use crate::config::HeliConfig;

/// Kinematic state of a rigid body, as read from (and written back to) the
/// physics engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

impl BodyState {
    /// Height of the body origin, as shown on the HUD.
    pub fn altitude(&self) -> f32 {
        self.position.y
    }

    /// Magnitude of the linear velocity.
    pub fn speed(&self) -> f32 {
        self.linear_velocity.length()
    }
}

/// Mass properties needed to turn forces into velocity changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightParams {
    /// Body mass in kg.
    pub mass: f32,
    /// Simplified scalar moment of inertia.
    pub inertia: f32,
    /// Vertical offset of the lift application point.
    pub lift_point_offset: f32,
}

impl FlightParams {
    /// Derive flight parameters from the body's mass and box half extents.
    pub fn from_box(mass: f32, half_extents: Vec3, lift_point_offset: f32) -> Self {
        Self {
            mass,
            inertia: compute_inertia(mass, half_extents),
            lift_point_offset,
        }
    }
}

impl Default for FlightParams {
    /// The default helicopter body.
    fn default() -> Self {
        let heli = HeliConfig::default();
        Self::from_box(heli.mass, heli.half_extents, heli.lift_point_offset)
    }
}

/// What the controls ask of the physics body for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlOutput {
    /// Lift force in world space.
    pub force: Vec3,
    /// World-space point the lift acts on.
    pub application_point: Vec3,
    /// Torque produced by applying `force` at `application_point`.
    pub torque: Vec3,
    /// Angular velocity override, when the pilot commands a rotation.
    pub angular_velocity: Option<Vec3>,
}

/// Map the control state onto forces for the given body.
pub fn compute_control_output(
    controls: &ControlState,
    body: &BodyState,
    params: &FlightParams,
) -> ControlOutput {
    let force = body.rotation * Vec3::new(0.0, controls.torque, 0.0);

    // The offset is along world Y, not the body axis.
    let application_point = body.position + Vec3::new(0.0, params.lift_point_offset, 0.0);
    let torque = (application_point - body.position).cross(force);

    let movement = body.rotation
        * Vec3::new(controls.pitch_speed, controls.yaw_speed, controls.roll_speed);
    let angular_velocity = (movement != Vec3::ZERO).then_some(movement);

    ControlOutput {
        force,
        application_point,
        torque,
        angular_velocity,
    }
}

/// Apply a control output to a body over `dt` seconds.
///
/// A commanded angular velocity first replaces whatever rotation the body
/// had. Forces then become velocity changes on top (`dv = F/m * dt`,
/// `dw = τ/I * dt`), so the lift torque still acts while a rate is held.
pub fn integrate(output: &ControlOutput, body: &mut BodyState, params: &FlightParams, dt: f32) {
    let inv_mass = 1.0 / params.mass.max(1e-3);
    let inv_inertia = 1.0 / params.inertia.max(1e-3);

    if let Some(angular_velocity) = output.angular_velocity {
        body.angular_velocity = angular_velocity;
    }

    body.linear_velocity += output.force * inv_mass * dt;
    body.angular_velocity += output.torque * inv_inertia * dt;
}

/// Compute simplified scalar inertia from mass and half extents.
pub fn compute_inertia(mass: f32, half_extents: Vec3) -> f32 {
    let avg_extent = (half_extents.x + half_extents.y + half_extents.z) / 3.0;
    mass * avg_extent * avg_extent
}

/// Torque at which lift exactly cancels gravity for an upright body.
pub fn hover_torque(mass: f32, gravity: Vec3) -> f32 {
    mass * gravity.length()
}
