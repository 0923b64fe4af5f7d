//! Helicopter component definitions.
//!
//! Components derive `Reflect` so they show up in inspectors and scene dumps.
//! State that lives in `heli-sim` types is not reflected.

use bevy::prelude::*;
use heli_sim::{ControlState, FlightParams, RotorAnimator};

/// The helicopter's physics body.
///
/// The visual model is a separate entity that follows this one every frame.
#[derive(Component, Reflect)]
#[reflect(Component)]
#[require(HeliControls, HeliRotor)]
pub struct Helicopter {
    /// The glTF scene entity drawn in the body's place.
    pub model: Entity,
    /// Mass properties used to turn control forces into velocity changes.
    #[reflect(ignore)]
    pub flight: FlightParams,
}

/// The pilot's accumulated control state.
#[derive(Component, Reflect, Default, Deref, DerefMut)]
#[reflect(Component)]
pub struct HeliControls(#[reflect(ignore)] pub ControlState);

/// Shared rotor animation phase for both rotors.
#[derive(Component, Reflect, Default, Deref, DerefMut)]
#[reflect(Component)]
pub struct HeliRotor(#[reflect(ignore)] pub RotorAnimator);

/// Marker for the root of the helicopter's glTF scene.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct HeliModel;

/// A rotor node inside the helicopter model.
#[derive(Component, Reflect, Clone, Copy, Debug)]
#[reflect(Component)]
pub struct RotorSpin {
    /// Spin axis in the node's local space.
    pub axis: Vec3,
    /// The node's rotation as authored in the model.
    pub base_rotation: Quat,
}

impl RotorSpin {
    /// Node rotation for a given blade angle.
    pub fn rotation_at(&self, blade_angle: f32) -> Quat {
        self.base_rotation * Quat::from_axis_angle(self.axis, blade_angle)
    }
}
