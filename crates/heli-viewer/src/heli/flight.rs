//! Helicopter flight systems.
//!
//! Each fixed step reads the pilot's axes into the control state, maps it to
//! a lift force and commanded rates, and applies them to the Avian body as
//! velocity changes before the physics step runs. The visual model then
//! copies the body's pose once per frame.

use avian3d::prelude::*;
use bevy::prelude::*;
use heli_sim::BodyState;
use heli_sim::flight::{compute_control_output, integrate};
use leafwing_input_manager::prelude::ActionState;

use super::components::{HeliControls, HeliRotor, Helicopter, RotorSpin};
use crate::input::{HeliAction, PilotInput, control_input};
use crate::sim_loop::Settings;

/// Advance the control state from the pilot's axes.
pub fn update_controls(
    settings: Res<Settings>,
    pilot: Single<&ActionState<HeliAction>, With<PilotInput>>,
    mut query: Query<&mut HeliControls>,
) {
    let input = control_input(&pilot);
    for mut controls in &mut query {
        controls.update(&input, &settings.controls);
    }
}

/// Apply lift and commanded rotation to the helicopter body.
///
/// Forces are applied as velocity changes, the same way for every step.
pub fn apply_control_forces(
    time: Res<Time>,
    mut query: Query<(
        &Helicopter,
        &HeliControls,
        &Position,
        &Rotation,
        &mut LinearVelocity,
        &mut AngularVelocity,
    )>,
) {
    let dt = time.delta_secs();

    for (heli, controls, position, rotation, mut linear_velocity, mut angular_velocity) in
        &mut query
    {
        let mut body = BodyState {
            position: position.0,
            rotation: rotation.0,
            linear_velocity: linear_velocity.0,
            angular_velocity: angular_velocity.0,
        };

        let output = compute_control_output(controls, &body, &heli.flight);
        integrate(&output, &mut body, &heli.flight, dt);

        linear_velocity.0 = body.linear_velocity;
        angular_velocity.0 = body.angular_velocity;
    }
}

/// Spin the rotor blades in proportion to the current torque.
pub fn animate_rotors(
    mut helis: Query<(&Helicopter, &HeliControls, &mut HeliRotor)>,
    children: Query<&Children>,
    mut rotors: Query<(&RotorSpin, &mut Transform)>,
) {
    for (heli, controls, mut rotor) in &mut helis {
        rotor.advance(controls.torque);
        let blade_angle = rotor.blade_angle();

        for entity in children.iter_descendants(heli.model) {
            if let Ok((spin, mut transform)) = rotors.get_mut(entity) {
                transform.rotation = spin.rotation_at(blade_angle);
            }
        }
    }
}

/// Copy the body's pose onto its visual model.
pub fn sync_model_to_body(
    helis: Query<(&Helicopter, &Position, &Rotation)>,
    mut models: Query<&mut Transform, Without<Helicopter>>,
) {
    for (heli, position, rotation) in &helis {
        let Ok(mut transform) = models.get_mut(heli.model) else {
            continue;
        };
        transform.translation = position.0;
        transform.rotation = rotation.0;
    }
}
