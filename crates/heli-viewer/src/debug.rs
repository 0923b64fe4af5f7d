//! Physics debug rendering.
//!
//! Draws Avian collider outlines over the scene. Off by default; `F1` toggles
//! it and `--debug` turns it on at launch.

use avian3d::debug_render::{PhysicsDebugPlugin, PhysicsGizmos};
use bevy::gizmos::config::{GizmoConfig, GizmoConfigStore};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;

use crate::hex_color;
use crate::input::{HeliAction, PilotInput};

/// Collider outline colour.
const DEBUG_COLLIDER_COLOR: u32 = 0x0077aa;

/// Plugin for toggled physics debug rendering.
pub struct DebugRenderPlugin {
    pub start_enabled: bool,
}

impl Plugin for DebugRenderPlugin {
    fn build(&self, app: &mut App) {
        let start_enabled = self.start_enabled;
        app.add_plugins(PhysicsDebugPlugin)
            .add_systems(
                Startup,
                move |mut config_store: ResMut<GizmoConfigStore>| {
                    configure_physics_debug(&mut config_store, start_enabled);
                },
            )
            .add_systems(Update, toggle_debug_on_key);
    }
}

/// Install the collider colour and initial visibility.
fn configure_physics_debug(config_store: &mut GizmoConfigStore, enabled: bool) {
    let physics_gizmos = PhysicsGizmos {
        collider_color: Some(hex_color(DEBUG_COLLIDER_COLOR)),
        ..Default::default()
    };

    // Negative depth bias draws the outlines on top of the meshes they wrap.
    let gizmo_config = GizmoConfig {
        enabled,
        depth_bias: -1.0,
        ..Default::default()
    };

    config_store.insert(gizmo_config, physics_gizmos);
}

/// Toggle physics debug visualization.
pub fn toggle_physics_debug(config_store: &mut GizmoConfigStore) {
    let (config, _) = config_store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    tracing::info!("Physics debug visualization: {}", config.enabled);
}

/// Check if physics debug is currently enabled.
pub fn is_physics_debug_enabled(config_store: &GizmoConfigStore) -> bool {
    let (config, _) = config_store.config::<PhysicsGizmos>();
    config.enabled
}

fn toggle_debug_on_key(
    pilot: Single<&ActionState<HeliAction>, With<PilotInput>>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    if pilot.just_pressed(&HeliAction::ToggleDebug) {
        toggle_physics_debug(&mut config_store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_enabled_state() {
        let mut store = GizmoConfigStore::default();
        configure_physics_debug(&mut store, false);
        assert!(!is_physics_debug_enabled(&store));

        toggle_physics_debug(&mut store);
        assert!(is_physics_debug_enabled(&store));

        toggle_physics_debug(&mut store);
        assert!(!is_physics_debug_enabled(&store));
    }

    #[test]
    fn test_configure_applies_collider_color() {
        let mut store = GizmoConfigStore::default();
        configure_physics_debug(&mut store, true);
        let (config, gizmos) = store.config::<PhysicsGizmos>();
        assert!(config.enabled);
        assert_eq!(gizmos.collider_color, Some(hex_color(DEBUG_COLLIDER_COLOR)));
    }
}
