//! Engine-independent core of the helicopter demo.
//!
//! Everything here is plain data and pure functions over `glam` types, so it
//! can be tested without a window, a renderer or a physics world. The viewer
//! crate wires these pieces into Bevy and Avian.

pub mod config;
pub mod controls;
mod error;
pub mod flight;
pub mod heightfield;
pub mod orbit;
pub mod rotor;
pub mod skybox;

pub use config::SimConfig;
pub use controls::{ControlInput, ControlState};
pub use error::{Error, Result};
pub use flight::{BodyState, ControlOutput, FlightParams};
pub use heightfield::{Heightfield, TerrainMesh};
pub use orbit::{OrbitLimits, OrbitState};
pub use rotor::RotorAnimator;
pub use skybox::{CrossLayout, CubeFace};
