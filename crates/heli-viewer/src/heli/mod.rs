//! Helicopter model, physics body and flight.
//!
//! The glTF model is loaded on startup. Once its scene instance is ready the
//! named nodes are wired up (rotor spin, materials), the camera is parented
//! to the model and the dynamic rigid body is spawned, so flight only begins
//! after the model has loaded.

mod components;
mod flight;

use avian3d::prelude::*;
use bevy::{prelude::*, scene::SceneInstanceReady, transform::TransformSystems};
use heli_sim::FlightParams;
use heli_sim::config::HeliConfig;

pub use components::{HeliControls, Helicopter};
use components::{HeliModel, HeliRotor, RotorSpin};

use crate::assets::AssetWatch;
use crate::camera::OrbitCamera;
use crate::hex_color;
use crate::sim_loop::{Settings, SimSet};

/// Plugin for helicopter functionality.
pub struct HeliPlugin;

impl Plugin for HeliPlugin {
    fn build(&self, app: &mut App) {
        // Register reflectable types for inspection.
        app.register_type::<Helicopter>()
            .register_type::<HeliControls>()
            .register_type::<HeliRotor>()
            .register_type::<HeliModel>()
            .register_type::<RotorSpin>();

        app.add_plugins(FlightPlugin)
            .add_systems(Startup, spawn_heli_model)
            .add_observer(on_heli_scene_ready);
    }
}

/// Per-step flight systems and the per-frame model sync.
struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                flight::update_controls.in_set(SimSet::Controls),
                flight::apply_control_forces.in_set(SimSet::Forces),
                flight::animate_rotors.in_set(SimSet::Animate),
            ),
        )
        .add_systems(
            PostUpdate,
            flight::sync_model_to_body.before(TransformSystems::Propagate),
        );
    }
}

/// Start loading the helicopter model.
fn spawn_heli_model(
    mut commands: Commands,
    settings: Res<Settings>,
    asset_server: Res<AssetServer>,
    mut watch: ResMut<AssetWatch>,
) {
    let heli = &settings.heli;
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(heli.model_path.clone()));
    watch.track("helicopter model", &scene);

    commands.spawn((
        HeliModel,
        Name::new("Helicopter model"),
        SceneRoot(scene),
        Transform::from_translation(heli.initial_position),
    ));

    tracing::info!("Loading helicopter model: {}", heli.model_path);
}

/// Which part of the helicopter a named model node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeliPart {
    MainRotor,
    TailRotor,
    Body,
}

/// Match a node name against the configured part names.
fn classify_node(name: &str, config: &HeliConfig) -> Option<HeliPart> {
    if name == config.main_rotor_node {
        Some(HeliPart::MainRotor)
    } else if name == config.tail_rotor_node {
        Some(HeliPart::TailRotor)
    } else if name == config.body_node {
        Some(HeliPart::Body)
    } else {
        None
    }
}

/// Observer called when the helicopter scene finishes loading.
#[allow(clippy::too_many_arguments)]
fn on_heli_scene_ready(
    trigger: On<SceneInstanceReady>,
    mut commands: Commands,
    settings: Res<Settings>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    models: Query<&Transform, With<HeliModel>>,
    children: Query<&Children>,
    nodes: Query<(&Name, &Transform)>,
    meshes: Query<(), With<MeshMaterial3d<StandardMaterial>>>,
    camera: Single<Entity, With<OrbitCamera>>,
) {
    let model = trigger.event_target();
    let Ok(model_transform) = models.get(model) else {
        return;
    };
    let config = &settings.heli;

    // Every rotor shares one flat, unlit material.
    let rotor_material = materials.add(StandardMaterial {
        base_color: hex_color(config.rotor_color),
        unlit: true,
        ..default()
    });
    let body_material = materials.add(StandardMaterial {
        base_color: hex_color(config.body_color),
        perceptual_roughness: 0.8,
        ..default()
    });

    let mut found_main = false;
    let mut found_tail = false;

    for node in children.iter_descendants(model) {
        let Ok((name, transform)) = nodes.get(node) else {
            continue;
        };
        let Some(part) = classify_node(name.as_str(), config) else {
            continue;
        };

        let material = match part {
            HeliPart::MainRotor | HeliPart::TailRotor => {
                let axis = if part == HeliPart::MainRotor {
                    found_main = true;
                    config.main_rotor_axis
                } else {
                    found_tail = true;
                    config.tail_rotor_axis
                };
                commands.entity(node).insert(RotorSpin {
                    axis: axis.normalize_or(Vec3::Y),
                    base_rotation: transform.rotation,
                });
                &rotor_material
            }
            HeliPart::Body => &body_material,
        };

        // glTF primitives are child entities of the named node.
        for mesh_entity in std::iter::once(node).chain(children.iter_descendants(node)) {
            if meshes.contains(mesh_entity) {
                commands
                    .entity(mesh_entity)
                    .insert(MeshMaterial3d(material.clone()));
            }
        }
    }

    if !found_main {
        tracing::warn!("Helicopter model has no '{}' node", config.main_rotor_node);
    }
    if !found_tail {
        tracing::warn!("Helicopter model has no '{}' node", config.tail_rotor_node);
    }

    // The camera rides with the model from now on.
    commands.entity(model).add_child(*camera);

    let half_extents = config.half_extents;
    commands.spawn((
        Helicopter {
            model,
            flight: FlightParams::from_box(config.mass, half_extents, config.lift_point_offset),
        },
        Name::new("Helicopter body"),
        RigidBody::Dynamic,
        Collider::cuboid(
            half_extents.x * 2.0,
            half_extents.y * 2.0,
            half_extents.z * 2.0,
        ),
        Mass(config.mass),
        LinearDamping(config.linear_damping),
        AngularDamping(config.angular_damping),
        Transform::from_translation(model_transform.translation),
    ));

    tracing::info!(
        "Helicopter ready at {} (mass {} kg)",
        model_transform.translation,
        config.mass
    );
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;
    use std::time::Duration;

    use bevy::ecs::reflect::ReflectComponent;
    use bevy::time::TimeUpdateStrategy;
    use heli_sim::SimConfig;
    use leafwing_input_manager::prelude::ActionState;

    use super::*;
    use crate::input::{HeliAction, PilotInput};
    use crate::sim_loop::{SimLoopPlugin, flip_pause};

    /// An app running the fixed-step flight loop with full throttle held.
    fn flight_app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(bevy::time::TimePlugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)))
            .insert_resource(Settings(SimConfig::default()))
            .add_plugins(SimLoopPlugin {
                start_paused: false,
            })
            .add_plugins(FlightPlugin);

        let mut pilot = ActionState::<HeliAction>::default();
        pilot.set_value(&HeliAction::Throttle, 1.0);
        app.world_mut().spawn((PilotInput, pilot));

        let model = app.world_mut().spawn(Transform::default()).id();
        let body = app
            .world_mut()
            .spawn((
                Helicopter {
                    model,
                    flight: FlightParams::default(),
                },
                Position::default(),
                Rotation::default(),
                LinearVelocity::default(),
                AngularVelocity::default(),
            ))
            .id();
        (app, body)
    }

    fn snapshot(app: &App, body: Entity) -> (f32, f32, f32) {
        let world = app.world();
        (
            world.get::<HeliControls>(body).unwrap().torque,
            world.get::<HeliRotor>(body).unwrap().angle(),
            world.get::<LinearVelocity>(body).unwrap().y,
        )
    }

    #[test]
    fn test_each_step_runs_controls_then_forces_then_rotors() {
        let (mut app, body) = flight_app();
        // The first update only primes the clock.
        for _ in 0..5 {
            app.update();
        }

        let (torque, angle, velocity) = snapshot(&app, body);
        let torque_step = SimConfig::default().controls.torque_step;
        let steps = (torque / torque_step).round();
        assert!(steps >= 1.0, "fixed steps ran");

        // Forces and rotors see the torque raised earlier in the same step,
        // so step k contributes k * torque_step.
        let triangle = torque_step * steps * (steps + 1.0) / 2.0;
        let dt = SimConfig::default().physics.time_step as f32;
        assert!((angle - triangle.to_radians()).abs() < 1e-4);
        assert!((velocity - triangle * dt).abs() < 1e-4);
    }

    #[test]
    fn test_pause_freezes_controls_physics_and_rotors() {
        let (mut app, body) = flight_app();
        for _ in 0..3 {
            app.update();
        }
        let running = snapshot(&app, body);
        assert!(running.0 > 0.0 && running.1 > 0.0 && running.2 > 0.0);

        assert!(flip_pause(
            &mut app.world_mut().resource_mut::<Time<Virtual>>()
        ));
        for _ in 0..3 {
            app.update();
        }
        assert_eq!(snapshot(&app, body), running);

        assert!(!flip_pause(
            &mut app.world_mut().resource_mut::<Time<Virtual>>()
        ));
        for _ in 0..2 {
            app.update();
        }
        assert!(snapshot(&app, body).0 > running.0, "resumes after unpause");
    }

    #[test]
    fn test_heli_components_are_registered_for_reflection() {
        let mut app = App::new();
        app.add_plugins(HeliPlugin);

        let registry = app.world().resource::<AppTypeRegistry>().read();
        for type_id in [
            TypeId::of::<Helicopter>(),
            TypeId::of::<HeliControls>(),
            TypeId::of::<HeliRotor>(),
            TypeId::of::<HeliModel>(),
            TypeId::of::<RotorSpin>(),
        ] {
            let registration = registry.get(type_id).unwrap();
            assert!(registration.data::<ReflectComponent>().is_some());
        }
    }

    #[test]
    fn test_classify_node_uses_configured_names() {
        let config = SimConfig::default().heli;
        assert_eq!(classify_node("MainRotor", &config), Some(HeliPart::MainRotor));
        assert_eq!(classify_node("TailRotor", &config), Some(HeliPart::TailRotor));
        assert_eq!(classify_node("HeliBody", &config), Some(HeliPart::Body));
        assert_eq!(classify_node("Skid", &config), None);
    }

    #[test]
    fn test_classify_node_follows_renamed_nodes() {
        let mut config = SimConfig::default().heli;
        config.main_rotor_node = "rotor_top".to_string();
        assert_eq!(classify_node("rotor_top", &config), Some(HeliPart::MainRotor));
        assert_eq!(classify_node("MainRotor", &config), None);
    }
}
