//! Skybox loading.
//!
//! The sky ships as a single cross-layout image. Once it has loaded it is cut
//! into a six-layer cube texture and attached to the camera.

use bevy::asset::RenderAssetUsages;
use bevy::core_pipeline::Skybox;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use heli_sim::skybox::{CrossLayout, slice_cross};

use crate::assets::AssetWatch;
use crate::camera::OrbitCamera;
use crate::sim_loop::Settings;

/// Bytes per pixel of the cube texture.
const CUBE_BYTES_PER_PIXEL: usize = 4;

/// Plugin for the skybox.
pub struct SkyboxPlugin;

impl Plugin for SkyboxPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_skybox)
            .add_systems(Update, apply_skybox);
    }
}

/// The cross image being loaded.
#[derive(Resource)]
struct SkyboxSource {
    handle: Handle<Image>,
    brightness: f32,
}

fn load_skybox(
    mut commands: Commands,
    settings: Res<Settings>,
    asset_server: Res<AssetServer>,
    mut watch: ResMut<AssetWatch>,
) {
    let scene = &settings.scene;
    let handle: Handle<Image> = asset_server.load(scene.skybox_path.clone());
    watch.track("skybox", &handle);
    commands.insert_resource(SkyboxSource {
        handle,
        brightness: scene.skybox_brightness,
    });
}

/// Build a cube texture from a cross-layout image.
pub fn cube_from_cross(cross: &Image) -> heli_sim::Result<Image> {
    let (width, height) = (cross.width(), cross.height());
    let failed = |detail: &str| heli_sim::Error::Skybox {
        width,
        height,
        detail: detail.to_string(),
    };

    let rgba = if cross.texture_descriptor.format == TextureFormat::Rgba8UnormSrgb {
        None
    } else {
        Some(
            cross
                .convert(TextureFormat::Rgba8UnormSrgb)
                .ok_or_else(|| failed("unsupported pixel format"))?,
        )
    };
    let source = rgba.as_ref().unwrap_or(cross);
    let pixels = source
        .data
        .as_deref()
        .ok_or_else(|| failed("image has no pixel data"))?;

    let layout = CrossLayout::from_dimensions(width, height)?;
    let faces = slice_cross(pixels, width, height, CUBE_BYTES_PER_PIXEL)?;

    let mut cube = Image::new(
        Extent3d {
            width: layout.face_size,
            height: layout.face_size,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        faces,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    cube.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..Default::default()
    });
    Ok(cube)
}

/// Attach the skybox once the cross image is available.
fn apply_skybox(
    mut commands: Commands,
    source: Option<Res<SkyboxSource>>,
    mut images: ResMut<Assets<Image>>,
    camera: Single<Entity, With<OrbitCamera>>,
) {
    let Some(source) = source else {
        return;
    };
    let Some(cross) = images.get(&source.handle) else {
        return;
    };

    match cube_from_cross(cross) {
        Ok(cube) => {
            let face_size = cube.width();
            let image = images.add(cube);
            commands.entity(*camera).insert(Skybox {
                image,
                brightness: source.brightness,
                ..default()
            });
            tracing::info!("Skybox applied ({face_size}px faces)");
        }
        Err(e) => tracing::error!("Failed to build skybox: {e}"),
    }

    // One attempt per load; the source image is no longer needed.
    images.remove(&source.handle);
    commands.remove_resource::<SkyboxSource>();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_image(face_size: u32) -> Image {
        let (width, height) = (face_size * 4, face_size * 3);
        let data = (0..width * height)
            .flat_map(|i| {
                let cell = u8::try_from((i / width / face_size) * 4 + (i % width) / face_size)
                    .unwrap();
                [cell, 0, 0, 255]
            })
            .collect();
        Image::new(
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }

    #[test]
    fn test_cube_has_six_square_layers() {
        let cube = cube_from_cross(&cross_image(4)).unwrap();
        let size = cube.texture_descriptor.size;
        assert_eq!((size.width, size.height, size.depth_or_array_layers), (4, 4, 6));
        assert_eq!(
            cube.texture_view_descriptor
                .as_ref()
                .and_then(|descriptor| descriptor.dimension),
            Some(TextureViewDimension::Cube)
        );
        assert_eq!(cube.data.as_ref().map(Vec::len), Some(4 * 4 * 4 * 6));
    }

    #[test]
    fn test_first_layer_is_positive_x() {
        let cube = cube_from_cross(&cross_image(2)).unwrap();
        let data = cube.data.unwrap();
        // +X sits in cell 6 of the 4x3 grid.
        assert_eq!(&data[..4], &[6, 0, 0, 255]);
    }

    #[test]
    fn test_non_cross_image_is_rejected() {
        let square = Image::new(
            Extent3d {
                width: 4,
                height: 4,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            vec![0; 4 * 4 * 4],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        );
        assert!(cube_from_cross(&square).is_err());
    }
}
