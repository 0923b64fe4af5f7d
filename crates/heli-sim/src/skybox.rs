//! Cube texture slicing.
//!
//! The sky is shipped as one image laid out as a horizontal cross, four
//! faces wide and three high:
//!
//! ```text
//!        +Y
//!    -X  +Z  +X  -Z
//!        -Y
//! ```
//!
//! [`slice_cross`] cuts it into the six faces a cube texture expects.

use crate::{Error, Result};

/// Cube faces in the order renderers upload array layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Cell of this face in the cross, as (column, row).
    fn cross_cell(self) -> (u32, u32) {
        match self {
            CubeFace::PositiveX => (2, 1),
            CubeFace::NegativeX => (0, 1),
            CubeFace::PositiveY => (1, 0),
            CubeFace::NegativeY => (1, 2),
            CubeFace::PositiveZ => (1, 1),
            CubeFace::NegativeZ => (3, 1),
        }
    }
}

/// Face geometry of a cross-layout image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossLayout {
    /// Edge length of one face in pixels.
    pub face_size: u32,
}

impl CrossLayout {
    /// Validate the image dimensions and derive the face size.
    pub fn from_dimensions(width: u32, height: u32) -> Result<Self> {
        let invalid = |detail: &str| Error::Skybox {
            width,
            height,
            detail: detail.to_string(),
        };

        if width == 0 || height == 0 {
            return Err(invalid("image is empty"));
        }
        if width % 4 != 0 || height % 3 != 0 {
            return Err(invalid("expected a 4x3 grid of faces"));
        }
        let face_size = width / 4;
        if height / 3 != face_size {
            return Err(invalid("faces are not square"));
        }

        Ok(Self { face_size })
    }

    /// Top-left pixel of a face.
    pub fn face_origin(&self, face: CubeFace) -> (u32, u32) {
        let (column, row) = face.cross_cell();
        (column * self.face_size, row * self.face_size)
    }
}

/// Cut a cross-layout image into six square faces stacked in
/// [`CubeFace::ALL`] order.
///
/// `pixels` is row-major with `bytes_per_pixel` bytes per pixel.
pub fn slice_cross(pixels: &[u8], width: u32, height: u32, bytes_per_pixel: usize) -> Result<Vec<u8>> {
    let layout = CrossLayout::from_dimensions(width, height)?;
    let expected = width as usize * height as usize * bytes_per_pixel;
    if bytes_per_pixel == 0 || pixels.len() != expected {
        return Err(Error::Skybox {
            width,
            height,
            detail: format!("expected {expected} bytes of pixel data, got {}", pixels.len()),
        });
    }

    let face = layout.face_size as usize;
    let stride = width as usize * bytes_per_pixel;
    let face_row_bytes = face * bytes_per_pixel;
    let mut faces = Vec::with_capacity(face * face * bytes_per_pixel * 6);

    for cube_face in CubeFace::ALL {
        let (x0, y0) = layout.face_origin(cube_face);
        let (x0, y0) = (x0 as usize, y0 as usize);
        for y in y0..y0 + face {
            let start = y * stride + x0 * bytes_per_pixel;
            faces.extend_from_slice(&pixels[start..start + face_row_bytes]);
        }
    }

    Ok(faces)
}
