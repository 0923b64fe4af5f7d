//! Physics world and terrain.
//!
//! Sets up Avian with the configured gravity and solver substeps, then spawns
//! the static heightfield the helicopter flies over.

pub mod terrain;

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::sim_loop::Settings;

/// Plugin for the physics world and the terrain.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let (gravity, substeps) = app
            .world()
            .get_resource::<Settings>()
            .map_or((Vec3::new(0.0, -9.82, 0.0), 5), |settings| {
                (settings.physics.gravity, settings.physics.solver_iterations)
            });

        app.add_plugins(PhysicsPlugins::default())
            .insert_resource(Gravity(gravity))
            .insert_resource(SubstepCount(substeps))
            .add_systems(Startup, terrain::spawn_terrain);
    }
}
