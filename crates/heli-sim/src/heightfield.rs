//! Heightfield terrain and its triangulation.
//!
//! A heightfield is a regular grid of height samples. Rows run along X and
//! columns along Z, and the grid is centred on its local origin, which is
//! the layout the physics engine's heightfield collider uses. The same grid
//! is triangulated here into a renderable mesh so what you see is what you
//! collide with.

use std::f32::consts::PI;

use glam::Vec3;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Error, Result, config::TerrainConfig};

/// Grid of height samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    /// `heights[row][column]`.
    heights: Vec<Vec<f32>>,
    /// Distance between neighbouring samples on both axes.
    element_size: f32,
}

/// Flat-shaded triangle list ready for upload to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Heightfield {
    /// Wrap a grid of samples, rejecting shapes the collider cannot represent.
    pub fn new(heights: Vec<Vec<f32>>, element_size: f32) -> Result<Self> {
        if heights.len() < 2 {
            return Err(Error::heightfield(format!(
                "need at least 2 rows, got {}",
                heights.len()
            )));
        }
        let columns = heights[0].len();
        if columns < 2 {
            return Err(Error::heightfield(format!(
                "need at least 2 columns, got {columns}"
            )));
        }
        if let Some((row, len)) = heights
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != columns)
        {
            return Err(Error::heightfield(format!(
                "row {row} has {len} samples, expected {columns}"
            )));
        }
        if heights.iter().flatten().any(|h| !h.is_finite()) {
            return Err(Error::heightfield("samples must be finite"));
        }
        if !(element_size.is_finite() && element_size > 0.0) {
            return Err(Error::heightfield(format!(
                "element size must be positive, got {element_size}"
            )));
        }

        Ok(Self {
            heights,
            element_size,
        })
    }

    /// Generate rolling terrain: a basin that rises towards the edges, with
    /// seeded random roughness on top.
    pub fn generate(config: &TerrainConfig) -> Result<Self> {
        let (rows, columns) = (config.rows, config.columns);
        if rows < 2 || columns < 2 {
            return Err(Error::heightfield(format!(
                "grid must be at least 2x2, got {rows}x{columns}"
            )));
        }
        let mut rng = StdRng::seed_from_u64(config.seed);

        let heights = (0..rows)
            .map(|row| {
                let u = (PI * row as f32 / (rows - 1) as f32).sin().powi(2);
                (0..columns)
                    .map(|column| {
                        let v = (PI * column as f32 / (columns - 1) as f32).sin().powi(2);
                        let basin = config.amplitude * (1.0 - u * v);
                        basin + rng.random::<f32>() * config.roughness
                    })
                    .collect()
            })
            .collect();

        tracing::debug!("Generated {rows}x{columns} heightfield with seed {}", config.seed);
        Self::new(heights, config.element_size)
    }

    pub fn rows(&self) -> usize {
        self.heights.len()
    }

    pub fn columns(&self) -> usize {
        self.heights[0].len()
    }

    pub fn element_size(&self) -> f32 {
        self.element_size
    }

    /// Raw samples, `heights[row][column]`.
    pub fn heights(&self) -> &[Vec<f32>] {
        &self.heights
    }

    pub fn height_at(&self, row: usize, column: usize) -> Option<f32> {
        self.heights.get(row)?.get(column).copied()
    }

    pub fn min_height(&self) -> f32 {
        self.heights.iter().flatten().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.heights
            .iter()
            .flatten()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// World size of the grid on X and Z.
    pub fn extent(&self) -> (f32, f32) {
        (
            (self.rows() - 1) as f32 * self.element_size,
            (self.columns() - 1) as f32 * self.element_size,
        )
    }

    /// Scale to hand to the physics engine's heightfield collider. Heights
    /// are already in world units.
    pub fn collider_scale(&self) -> Vec3 {
        let (x, z) = self.extent();
        Vec3::new(x, 1.0, z)
    }

    /// Local position of a grid sample.
    pub fn vertex(&self, row: usize, column: usize) -> Vec3 {
        let (extent_x, extent_z) = self.extent();
        Vec3::new(
            row as f32 * self.element_size - extent_x * 0.5,
            self.heights[row][column],
            column as f32 * self.element_size - extent_z * 0.5,
        )
    }

    /// Triangulate into a flat-shaded mesh, two triangles per grid cell.
    ///
    /// Every triangle gets its own three vertices so each face can carry its
    /// own normal. Winding is counter-clockwise seen from above.
    pub fn triangulate(&self) -> TerrainMesh {
        let cells = (self.rows() - 1) * (self.columns() - 1);
        let vertex_count = cells * 6;
        let mut mesh = TerrainMesh {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(vertex_count),
        };

        for row in 0..self.rows() - 1 {
            for column in 0..self.columns() - 1 {
                let p00 = self.vertex(row, column);
                let p10 = self.vertex(row + 1, column);
                let p01 = self.vertex(row, column + 1);
                let p11 = self.vertex(row + 1, column + 1);

                mesh.push_triangle(p00, p01, p10);
                mesh.push_triangle(p10, p01, p11);
            }
        }

        mesh
    }
}

impl TerrainMesh {
    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        for vertex in [a, b, c] {
            let index = u32::try_from(self.positions.len()).unwrap_or(u32::MAX);
            self.positions.push(vertex.to_array());
            self.normals.push(normal.to_array());
            self.indices.push(index);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Centre and radius of a sphere enclosing every vertex.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        if self.positions.is_empty() {
            return (Vec3::ZERO, 0.0);
        }

        let (min, max) = self.positions.iter().map(|&p| Vec3::from(p)).fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(p), max.max(p)),
        );
        let center = (min + max) * 0.5;
        let radius = self
            .positions
            .iter()
            .map(|&p| Vec3::from(p).distance(center))
            .fold(0.0, f32::max);
        (center, radius)
    }
}
