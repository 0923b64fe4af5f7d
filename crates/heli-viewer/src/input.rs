//! Centralized input action definitions.
//!
//! Defines all pilot and demo actions using `leafwing-input-manager` for
//! declarative, rebindable input mapping.

use bevy::prelude::*;
use heli_sim::ControlInput;
use leafwing_input_manager::prelude::*;

// ============================================================================
// Action enums
// ============================================================================

/// Actions for flying the helicopter and driving the demo.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum HeliAction {
    /// Collective (W/S).
    #[actionlike(Axis)]
    Throttle,
    /// Nose up/down (arrow down/up).
    #[actionlike(Axis)]
    Pitch,
    /// Turn left/right (A/D).
    #[actionlike(Axis)]
    Yaw,
    /// Bank left/right (arrow left/right).
    #[actionlike(Axis)]
    Roll,
    /// Pause/resume the simulation (P).
    Pause,
    /// Toggle physics debug rendering (F1).
    ToggleDebug,
    /// Toggle the HUD (H).
    ToggleHud,
}

// ============================================================================
// Input maps
// ============================================================================

/// Create the default input map for pilot actions.
pub fn default_heli_input_map() -> InputMap<HeliAction> {
    InputMap::default()
        .with_axis(HeliAction::Throttle, VirtualAxis::ws())
        .with_axis(
            HeliAction::Pitch,
            VirtualAxis::new(KeyCode::ArrowUp, KeyCode::ArrowDown),
        )
        .with_axis(HeliAction::Yaw, VirtualAxis::new(KeyCode::KeyD, KeyCode::KeyA))
        .with_axis(
            HeliAction::Roll,
            VirtualAxis::new(KeyCode::ArrowRight, KeyCode::ArrowLeft),
        )
        .with(HeliAction::Pause, KeyCode::KeyP)
        .with(HeliAction::ToggleDebug, KeyCode::F1)
        .with(HeliAction::ToggleHud, KeyCode::KeyH)
}

/// Read the pilot axes into a control input.
pub fn control_input(action_state: &ActionState<HeliAction>) -> ControlInput {
    ControlInput {
        throttle: action_state.clamped_value(&HeliAction::Throttle),
        pitch: action_state.clamped_value(&HeliAction::Pitch),
        yaw: action_state.clamped_value(&HeliAction::Yaw),
        roll: action_state.clamped_value(&HeliAction::Roll),
    }
    .clamped()
}

// ============================================================================
// Plugin
// ============================================================================

/// Plugin that registers the action type and spawns the pilot's input map.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<HeliAction>::default())
            .add_systems(Startup, spawn_pilot_input);
    }
}

/// Marker for the entity holding the pilot's input map and action state.
#[derive(Component)]
pub struct PilotInput;

fn spawn_pilot_input(mut commands: Commands) {
    commands.spawn((PilotInput, default_heli_input_map()));
}
