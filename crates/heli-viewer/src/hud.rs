//! Flight HUD overlay.
//!
//! Shows rotor torque and altitude every frame, plus speed, frame rate and
//! the pause/debug switches. `H` hides it.

use avian3d::prelude::{LinearVelocity, Position};
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use heli_sim::BodyState;
use leafwing_input_manager::prelude::ActionState;

use crate::debug::{is_physics_debug_enabled, toggle_physics_debug};
use crate::heli::{HeliControls, Helicopter};
use crate::input::{HeliAction, PilotInput};
use crate::sim_loop::flip_pause;

/// Plugin for the HUD overlay.
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .add_plugins(FrameTimeDiagnosticsPlugin::default())
            .init_resource::<HudState>()
            .add_systems(Update, toggle_hud)
            .add_systems(EguiPrimaryContextPass, hud_system);
    }
}

/// HUD visibility.
#[derive(Resource)]
struct HudState {
    visible: bool,
}

impl Default for HudState {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Values shown on the HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HudReadout {
    pub torque: f32,
    pub altitude: f32,
    pub speed: f32,
}

impl HudReadout {
    pub fn from_state(torque: f32, body: &BodyState) -> Self {
        Self {
            torque,
            altitude: body.altitude(),
            speed: body.speed(),
        }
    }

    /// Lines of text in display order.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Torque: {:.2}", self.torque),
            format!("Altitude: {:.2} m", self.altitude),
            format!("Speed: {:.0} km/h", self.speed * 3.6),
        ]
    }
}

fn toggle_hud(
    pilot: Single<&ActionState<HeliAction>, With<PilotInput>>,
    mut hud: ResMut<HudState>,
) {
    if pilot.just_pressed(&HeliAction::ToggleHud) {
        hud.visible = !hud.visible;
    }
}

/// Render the HUD.
fn hud_system(
    mut contexts: EguiContexts,
    hud: Res<HudState>,
    diagnostics: Res<DiagnosticsStore>,
    mut time: ResMut<Time<Virtual>>,
    mut config_store: ResMut<GizmoConfigStore>,
    heli_query: Query<(&HeliControls, &Position, &LinearVelocity), With<Helicopter>>,
) -> Result {
    if !hud.visible {
        return Ok(());
    }
    let ctx = contexts.ctx_mut()?;

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(bevy::diagnostic::Diagnostic::smoothed)
        .unwrap_or(0.0);

    let readout = heli_query.iter().next().map(|(controls, position, velocity)| {
        let body = BodyState {
            position: position.0,
            linear_velocity: velocity.0,
            ..Default::default()
        };
        HudReadout::from_state(controls.torque, &body)
    });

    egui::Window::new("Helicopter")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            match readout {
                Some(readout) => {
                    for line in readout.lines() {
                        ui.label(line);
                    }
                }
                None => {
                    ui.label("Loading helicopter...");
                }
            }
            ui.label(format!("FPS: {fps:.0}"));
            ui.separator();

            let mut paused = time.is_paused();
            if ui.checkbox(&mut paused, "Paused (P)").changed() {
                flip_pause(&mut time);
            }

            let mut debug = is_physics_debug_enabled(&config_store);
            if ui.checkbox(&mut debug, "Physics debug (F1)").changed() {
                toggle_physics_debug(&mut config_store);
            }

            ui.separator();
            ui.small("W/S throttle, arrows pitch and roll, A/D yaw");
            ui.small("Right drag orbit, left drag zoom, middle drag pan");
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_uses_body_height_and_speed() {
        let body = BodyState {
            position: Vec3::new(5.0, 12.5, -3.0),
            linear_velocity: Vec3::new(0.0, 0.0, 10.0),
            ..Default::default()
        };
        let readout = HudReadout::from_state(9.9, &body);
        assert_eq!(readout.altitude, 12.5);
        assert_eq!(
            readout.lines(),
            [
                "Torque: 9.90".to_string(),
                "Altitude: 12.50 m".to_string(),
                "Speed: 36 km/h".to_string(),
            ]
        );
    }
}
