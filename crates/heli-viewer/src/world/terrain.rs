//! Terrain collider and mesh creation.
//!
//! One generated heightfield feeds both the static Avian heightfield collider
//! and the flat-shaded render mesh, so what the helicopter hits is exactly
//! what is drawn.

use avian3d::prelude::*;
use bevy::asset::RenderAssetUsages;
use bevy::light::{NotShadowCaster, NotShadowReceiver};
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use heli_sim::{Heightfield, TerrainMesh};

use crate::hex_color;
use crate::sim_loop::Settings;

/// Marker component for the terrain entity.
#[derive(Component)]
pub struct Terrain;

/// Convert a triangulated heightfield to a Bevy mesh.
pub fn convert_terrain_mesh(terrain: TerrainMesh) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, terrain.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, terrain.normals);
    mesh.insert_indices(Indices::U32(terrain.indices));
    mesh
}

/// Build the static heightfield collider.
///
/// Avian's heightfield is centred on its local origin with rows along X and
/// columns along Z, which is the layout `Heightfield` triangulates in.
pub fn create_terrain_collider(heightfield: &Heightfield) -> Collider {
    Collider::heightfield(heightfield.heights().to_vec(), heightfield.collider_scale())
}

/// Generate the terrain and spawn it.
pub fn spawn_terrain(
    mut commands: Commands,
    settings: Res<Settings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let config = &settings.terrain;
    let heightfield = match Heightfield::generate(config) {
        Ok(heightfield) => heightfield,
        Err(e) => {
            tracing::error!("Failed to generate terrain: {e}");
            return;
        }
    };

    let (extent_x, extent_z) = heightfield.extent();
    tracing::info!(
        "Terrain: {}x{} samples, {extent_x:.0}x{extent_z:.0} m, heights {:.1}..{:.1}",
        heightfield.rows(),
        heightfield.columns(),
        heightfield.min_height(),
        heightfield.max_height(),
    );

    let collider = create_terrain_collider(&heightfield);
    let mesh = meshes.add(convert_terrain_mesh(heightfield.triangulate()));

    // Matte and non-metallic, close to a Lambert surface.
    let material = materials.add(StandardMaterial {
        base_color: hex_color(config.color),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        reflectance: 0.0,
        ..default()
    });

    let mut entity = commands.spawn((
        Terrain,
        Name::new("Terrain"),
        RigidBody::Static,
        collider,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_translation(config.position),
    ));

    if !config.enable_shadows {
        entity.insert((NotShadowCaster, NotShadowReceiver));
    }
}

#[cfg(test)]
mod tests {
    use bevy::mesh::VertexAttributeValues;
    use heli_sim::config::TerrainConfig;

    use super::*;

    fn small_heightfield() -> Heightfield {
        Heightfield::new(
            vec![vec![0.0, 1.0, 0.5], vec![2.0, 0.0, 1.0], vec![0.0, 0.0, 3.0]],
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn test_convert_terrain_mesh_keeps_every_triangle() {
        let heightfield = small_heightfield();
        let triangulated = heightfield.triangulate();
        let triangle_count = triangulated.triangle_count();
        let mesh = convert_terrain_mesh(triangulated);

        assert_eq!(triangle_count, 8);
        assert_eq!(mesh.count_vertices(), 24);
        match mesh.indices() {
            Some(Indices::U32(indices)) => assert_eq!(indices.len(), 24),
            other => panic!("unexpected indices: {other:?}"),
        }
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
    }

    #[test]
    fn test_converted_normals_face_up_on_flat_ground() {
        let heightfield = Heightfield::new(vec![vec![1.0; 3]; 3], 1.0).unwrap();
        let mesh = convert_terrain_mesh(heightfield.triangulate());
        let Some(VertexAttributeValues::Float32x3(normals)) =
            mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
        else {
            panic!("normals missing");
        };
        for normal in normals {
            assert!((normal[1] - 1.0).abs() < 1e-6, "{normal:?}");
        }
    }

    #[test]
    fn test_mesh_and_collider_share_extent() {
        let heightfield = Heightfield::generate(&TerrainConfig::default()).unwrap();
        let (extent_x, extent_z) = heightfield.extent();
        assert_eq!(
            heightfield.collider_scale(),
            Vec3::new(extent_x, 1.0, extent_z)
        );

        let triangulated = heightfield.triangulate();
        let (min_x, max_x) = triangulated
            .positions
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[0]), hi.max(p[0]))
            });
        assert!((min_x + extent_x * 0.5).abs() < 1e-4);
        assert!((max_x - extent_x * 0.5).abs() < 1e-4);
    }
}
