//! Interactive helicopter flight demo using Bevy.
//!
//! A helicopter model rides on an Avian rigid body above a generated
//! heightfield. The pilot drives the rotor torque and the body's angular
//! rates from the keyboard, and an orbit camera follows the model.

mod assets;
mod camera;
mod debug;
mod heli;
mod hud;
mod input;
mod launch_params;
mod sim_loop;
mod skybox;
mod world;

use assets::AssetWatchPlugin;
use bevy::prelude::*;
use camera::{OrbitCamera, OrbitCameraPlugin};
use debug::DebugRenderPlugin;
use heli::HeliPlugin;
use heli_sim::config::hex_to_rgb;
use hud::HudPlugin;
use input::InputPlugin;
use launch_params::LaunchParams;
use sim_loop::{Settings, SimLoopPlugin};
use skybox::SkyboxPlugin;
use world::WorldPlugin;

/// Plugin for the main application.
pub struct AppPlugin {
    pub launch: LaunchParams,
}

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        let config = self.launch.resolve_config();

        app.insert_resource(Settings(config))
            .add_plugins((
                SimLoopPlugin {
                    start_paused: self.launch.paused,
                },
                InputPlugin,
                WorldPlugin,
                DebugRenderPlugin {
                    start_enabled: self.launch.debug,
                },
                HeliPlugin,
                OrbitCameraPlugin,
                SkyboxPlugin,
                HudPlugin,
                AssetWatchPlugin,
            ))
            .add_systems(Startup, setup_scene);
    }
}

/// Convert a `0xRRGGBB` colour into a Bevy colour.
pub fn hex_color(hex: u32) -> Color {
    let [r, g, b] = hex_to_rgb(hex);
    Color::srgb(r, g, b)
}

/// Set up the camera and lights.
fn setup_scene(mut commands: Commands, settings: Res<Settings>) {
    let camera_config = &settings.camera;
    let scene = &settings.scene;

    let orbit = OrbitCamera::from_config(camera_config);
    let transform = orbit.transform();

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera_config.fov_degrees.to_radians(),
            near: camera_config.near,
            far: camera_config.far,
            ..Default::default()
        }),
        transform,
        // Ambient light lives on the camera so it also lights the skybox pass.
        AmbientLight {
            color: hex_color(scene.ambient_color),
            brightness: scene.ambient_brightness,
            ..Default::default()
        },
        orbit,
    ));

    // The sun shines from `sun_position` towards the origin.
    let sun_direction = -scene.sun_position.normalize_or(Vec3::Y);
    commands.spawn((
        DirectionalLight {
            color: hex_color(scene.sun_color),
            illuminance: scene.sun_illuminance,
            shadows_enabled: settings.terrain.enable_shadows,
            ..default()
        },
        Transform::default().looking_to(sun_direction, Vec3::Y),
    ));

    tracing::info!("Scene setup complete - W/S throttle, arrows pitch/roll, A/D yaw, P pause");
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let launch = launch_params::parse();

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "heli-viewer".to_string(),
        resolution: (1280, 720).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.add_plugins(AppPlugin { launch }).run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_matches_channels() {
        let color = hex_color(0xff8000).to_srgba();
        assert!((color.red - 1.0).abs() < 1e-6);
        assert!((color.green - 128.0 / 255.0).abs() < 1e-6);
        assert!(color.blue.abs() < 1e-6);
    }
}
