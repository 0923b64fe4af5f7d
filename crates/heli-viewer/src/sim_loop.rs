//! Fixed-timestep simulation loop and pause handling.
//!
//! Controls and physics advance in `FixedUpdate`, driven by `Time<Fixed>` at
//! the configured step. Pausing pauses `Time<Virtual>`, which starves the
//! fixed schedule so the simulation freezes while rendering carries on.

use std::ops::Deref;

use bevy::prelude::*;
use heli_sim::SimConfig;
use leafwing_input_manager::prelude::ActionState;

use crate::input::{HeliAction, PilotInput};

/// The resolved simulation configuration.
#[derive(Resource, Debug, Clone)]
pub struct Settings(pub SimConfig);

impl Deref for Settings {
    type Target = SimConfig;

    fn deref(&self) -> &SimConfig {
        &self.0
    }
}

/// Ordering of the per-step flight systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Advance the pilot's control state.
    Controls,
    /// Turn the control state into body velocity changes.
    Forces,
    /// Per-step visual bookkeeping (rotor animation).
    Animate,
}

/// Plugin for the fixed-step loop and the pause toggle.
pub struct SimLoopPlugin {
    pub start_paused: bool,
}

impl Plugin for SimLoopPlugin {
    fn build(&self, app: &mut App) {
        let time_step = app
            .world()
            .get_resource::<Settings>()
            .map_or(1.0 / 60.0, |settings| settings.physics.time_step);

        let start_paused = self.start_paused;
        app.insert_resource(Time::<Fixed>::from_seconds(time_step))
            .configure_sets(
                FixedUpdate,
                (SimSet::Controls, SimSet::Forces, SimSet::Animate).chain(),
            )
            .add_systems(Startup, move |mut time: ResMut<Time<Virtual>>| {
                if start_paused {
                    time.pause();
                    tracing::info!("Starting paused (P to resume)");
                }
            })
            .add_systems(Update, toggle_pause);
    }
}

/// Flip the pause flag and return whether the simulation is now paused.
pub fn flip_pause(time: &mut Time<Virtual>) -> bool {
    if time.is_paused() {
        time.unpause();
        tracing::info!("Resume");
        false
    } else {
        time.pause();
        tracing::info!("Pause");
        true
    }
}

/// Toggle the pause flag on `P`.
fn toggle_pause(
    pilot: Single<&ActionState<HeliAction>, With<PilotInput>>,
    mut time: ResMut<Time<Virtual>>,
) {
    if pilot.just_pressed(&HeliAction::Pause) {
        flip_pause(&mut time);
    }
}
