//! Simulation configuration.
//!
//! Every tunable constant of the demo lives here. Sections deserialize with
//! `#[serde(default)]`, so a config file only needs to name the values it
//! overrides.

use glam::Vec3;
use serde::Deserialize;

use crate::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub heli: HeliConfig,
    pub controls: ControlConfig,
    pub terrain: TerrainConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
}

/// Physics world settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational acceleration (m/s²).
    pub gravity: Vec3,
    /// Fixed simulation step in seconds.
    pub time_step: f64,
    /// Solver iterations per step.
    pub solver_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            time_step: 1.0 / 60.0,
            solver_iterations: 5,
        }
    }
}

/// Helicopter body and model settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeliConfig {
    /// Body mass in kg.
    pub mass: f32,
    /// Half extents of the body's box collider.
    pub half_extents: Vec3,
    /// Spawn position.
    pub initial_position: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Vertical offset of the lift application point from the body origin.
    pub lift_point_offset: f32,
    /// Fuselage colour (0xRRGGBB).
    pub body_color: u32,
    /// Colour shared by both rotors (0xRRGGBB).
    pub rotor_color: u32,
    /// Asset path of the glTF model.
    pub model_path: String,
    /// Node names inside the model.
    pub main_rotor_node: String,
    pub tail_rotor_node: String,
    pub body_node: String,
    /// Local axes the rotors spin around.
    pub main_rotor_axis: Vec3,
    pub tail_rotor_axis: Vec3,
}

impl Default for HeliConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            half_extents: Vec3::new(0.75, 0.6, 2.0),
            initial_position: Vec3::new(0.0, 3.0, 0.0),
            linear_damping: 0.5,
            angular_damping: 0.9,
            lift_point_offset: -0.5,
            body_color: 0xe4_e4_e4,
            rotor_color: 0x55_55_55,
            model_path: "models/ah6.glb".to_string(),
            main_rotor_node: "MainRotor".to_string(),
            tail_rotor_node: "TailRotor".to_string(),
            body_node: "HeliBody".to_string(),
            main_rotor_axis: Vec3::Y,
            tail_rotor_axis: Vec3::X,
        }
    }
}

/// Keyboard control response.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Torque change per step at full throttle input.
    pub torque_step: f32,
    pub min_torque: f32,
    pub max_torque: f32,
    /// Target angular rate (rad/s) at full pitch/yaw/roll input.
    pub angular_rate: f32,
    /// Maximum change of each angular rate per step.
    pub rate_ramp: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            torque_step: 0.1,
            min_torque: 0.0,
            max_torque: 20.0,
            angular_rate: 1.0,
            rate_ramp: 0.1,
        }
    }
}

/// Generated terrain settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Number of height samples along X.
    pub rows: usize,
    /// Number of height samples along Z.
    pub columns: usize,
    /// Distance between neighbouring samples.
    pub element_size: f32,
    /// Height of the cosine basin rim.
    pub amplitude: f32,
    /// Maximum random offset added to every sample.
    pub roughness: f32,
    pub seed: u64,
    /// Ground colour (0xRRGGBB).
    pub color: u32,
    pub enable_shadows: bool,
    /// World position of the terrain centre.
    pub position: Vec3,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            rows: 64,
            columns: 64,
            element_size: 2.0,
            amplitude: 6.0,
            roughness: 0.4,
            seed: 1,
            color: 0xb5_90_58,
            enable_shadows: true,
            position: Vec3::new(0.0, -2.0, 0.0),
        }
    }
}

/// Orbit camera settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera position relative to the helicopter.
    pub initial_offset: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians per pixel of mouse motion.
    pub rotate_sensitivity: f32,
    /// Zoom factor exponent per pixel of mouse motion.
    pub zoom_sensitivity: f32,
    /// World units per pixel per unit of distance.
    pub pan_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            initial_offset: Vec3::new(0.0, 4.0, 20.0),
            min_distance: 10.0,
            max_distance: 200.0,
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.01,
            pan_sensitivity: 0.0015,
        }
    }
}

/// Lighting and sky settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ambient_color: u32,
    pub ambient_brightness: f32,
    pub sun_color: u32,
    /// Sun illuminance in lux.
    pub sun_illuminance: f32,
    /// Direction pointing from the scene towards the sun.
    pub sun_position: Vec3,
    /// Asset path of the cross-layout skybox image.
    pub skybox_path: String,
    pub skybox_brightness: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0xff_ff_ff,
            ambient_brightness: 400.0,
            sun_color: 0xf5_f4_d3,
            sun_illuminance: 9_000.0,
            sun_position: Vec3::new(-1.0, 0.5, -1.0),
            skybox_path: "images/skybox.jpg".to_string(),
            skybox_brightness: 1_000.0,
        }
    }
}

impl SimConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let physics = &self.physics;
        if !(physics.time_step.is_finite() && physics.time_step > 0.0) {
            return Err(Error::config(
                "physics.time_step",
                format!("must be positive, got {}", physics.time_step),
            ));
        }
        if physics.solver_iterations == 0 {
            return Err(Error::config("physics.solver_iterations", "must be at least 1"));
        }

        let heli = &self.heli;
        if !(heli.mass.is_finite() && heli.mass > 0.0) {
            return Err(Error::config(
                "heli.mass",
                format!("must be positive, got {}", heli.mass),
            ));
        }
        if !(heli.half_extents.is_finite() && heli.half_extents.min_element() > 0.0) {
            return Err(Error::config(
                "heli.half_extents",
                format!("must be positive, got {}", heli.half_extents),
            ));
        }
        if heli.linear_damping < 0.0 || heli.angular_damping < 0.0 {
            return Err(Error::config("heli.damping", "must not be negative"));
        }

        let controls = &self.controls;
        if controls.min_torque > controls.max_torque {
            return Err(Error::config(
                "controls.max_torque",
                format!(
                    "range is inverted ({} > {})",
                    controls.min_torque, controls.max_torque
                ),
            ));
        }
        if !(controls.torque_step >= 0.0 && controls.angular_rate >= 0.0) {
            return Err(Error::config(
                "controls",
                "torque_step and angular_rate must not be negative",
            ));
        }
        if !(controls.rate_ramp.is_finite() && controls.rate_ramp > 0.0) {
            return Err(Error::config(
                "controls.rate_ramp",
                format!("must be positive, got {}", controls.rate_ramp),
            ));
        }

        let terrain = &self.terrain;
        if terrain.rows < 2 || terrain.columns < 2 {
            return Err(Error::config(
                "terrain.rows",
                format!(
                    "grid must be at least 2x2, got {}x{}",
                    terrain.rows, terrain.columns
                ),
            ));
        }
        if !(terrain.element_size.is_finite() && terrain.element_size > 0.0) {
            return Err(Error::config(
                "terrain.element_size",
                format!("must be positive, got {}", terrain.element_size),
            ));
        }

        let camera = &self.camera;
        if camera.min_distance <= 0.0 || camera.min_distance > camera.max_distance {
            return Err(Error::config(
                "camera.min_distance",
                format!(
                    "must be positive and at most max_distance ({})",
                    camera.max_distance
                ),
            ));
        }
        if camera.near <= 0.0 || camera.near >= camera.far {
            return Err(Error::config("camera.near", "must be in (0, far)"));
        }

        Ok(())
    }
}

/// Split a `0xRRGGBB` colour into sRGB components in `0.0..=1.0`.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| f32::from(((hex >> shift) & 0xff) as u8) / 255.0;
    [channel(16), channel(8), channel(0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_matches_demo_constants() {
        let config = SimConfig::default();
        assert_eq!(config.physics.solver_iterations, 5);
        assert!((config.physics.time_step - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(config.heli.initial_position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(config.heli.linear_damping, 0.5);
        assert_eq!(config.heli.angular_damping, 0.9);
        assert_eq!(config.camera.min_distance, 10.0);
        assert_eq!(config.camera.initial_offset, Vec3::new(0.0, 4.0, 20.0));
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config =
            SimConfig::from_json_str(r#"{ "heli": { "mass": 2.5 }, "terrain": { "seed": 9 } }"#)
                .unwrap();
        assert_eq!(config.heli.mass, 2.5);
        assert_eq!(config.terrain.seed, 9);
        assert_eq!(config.heli.model_path, HeliConfig::default().model_path);
        assert_eq!(config.terrain.rows, TerrainConfig::default().rows);
    }

    #[test]
    fn test_vec3_fields_parse_from_arrays() {
        let config =
            SimConfig::from_json_str(r#"{ "physics": { "gravity": [0.0, -1.6, 0.0] } }"#).unwrap();
        assert_eq!(config.physics.gravity, Vec3::new(0.0, -1.6, 0.0));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = SimConfig::default();
        config.physics.time_step = 0.0;
        assert!(matches!(
            config.validate(),
            Err(Error::Config {
                field: "physics.time_step",
                ..
            })
        ));

        let mut config = SimConfig::default();
        config.controls.min_torque = 5.0;
        config.controls.max_torque = 1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.terrain.columns = 1;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.camera.min_distance = 500.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = SimConfig::from_json_str(r#"{ "heli": { "mass": -1.0 } }"#).unwrap_err();
        assert_eq!(err.to_string(), "invalid config heli.mass: must be positive, got -1");
    }

    #[test]
    fn test_zero_rate_ramp_is_reported_as_non_positive() {
        let mut config = SimConfig::default();
        config.controls.rate_ramp = 0.0;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config controls.rate_ramp: must be positive, got 0"
        );

        config.controls.rate_ramp = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_half_extents_are_rejected() {
        let mut config = SimConfig::default();
        config.heli.half_extents = Vec3::new(f32::NAN, 0.6, 2.0);
        assert!(matches!(
            config.validate(),
            Err(Error::Config {
                field: "heli.half_extents",
                ..
            })
        ));
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb(0xff_00_00), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb(0x00_00_00), [0.0, 0.0, 0.0]);
        let [r, g, b] = hex_to_rgb(0xb5_90_58);
        assert!((r - 181.0 / 255.0).abs() < 1e-6);
        assert!((g - 144.0 / 255.0).abs() < 1e-6);
        assert!((b - 88.0 / 255.0).abs() < 1e-6);
    }
}
