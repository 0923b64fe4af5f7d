//! Pilot control state.
//!
//! Input axes are sampled every frame, but the control state itself only
//! advances once per fixed simulation step so the helicopter responds the
//! same regardless of frame rate.

use crate::config::ControlConfig;

/// Raw pilot input for one step. Every axis is in `-1.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlInput {
    /// Collective: positive spins the rotor up.
    pub throttle: f32,
    /// Nose up (positive) / down (negative).
    pub pitch: f32,
    /// Turn left (positive) / right (negative).
    pub yaw: f32,
    /// Bank left (positive) / right (negative).
    pub roll: f32,
}

impl ControlInput {
    /// Clamp every axis into `-1.0..=1.0`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            throttle: self.throttle.clamp(-1.0, 1.0),
            pitch: self.pitch.clamp(-1.0, 1.0),
            yaw: self.yaw.clamp(-1.0, 1.0),
            roll: self.roll.clamp(-1.0, 1.0),
        }
    }
}

/// Accumulated control state that drives the flight model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlState {
    /// Rotor torque, which doubles as the lift force magnitude.
    pub torque: f32,
    /// Angular rate around the body's X axis.
    pub pitch_speed: f32,
    /// Angular rate around the body's Y axis.
    pub yaw_speed: f32,
    /// Angular rate around the body's Z axis.
    pub roll_speed: f32,
}

impl ControlState {
    /// Advance the control state by one simulation step.
    pub fn update(&mut self, input: &ControlInput, config: &ControlConfig) {
        let input = input.clamped();

        self.torque = (self.torque + input.throttle * config.torque_step)
            .clamp(config.min_torque, config.max_torque);

        let ramp = config.rate_ramp;
        self.pitch_speed = move_toward(self.pitch_speed, input.pitch * config.angular_rate, ramp);
        self.yaw_speed = move_toward(self.yaw_speed, input.yaw * config.angular_rate, ramp);
        self.roll_speed = move_toward(self.roll_speed, input.roll * config.angular_rate, ramp);
    }

    /// Whether any angular rate is being commanded.
    pub fn is_rotating(&self) -> bool {
        self.pitch_speed != 0.0 || self.yaw_speed != 0.0 || self.roll_speed != 0.0
    }
}

/// Move a value toward a target by a maximum delta.
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn throttle(value: f32) -> ControlInput {
        ControlInput {
            throttle: value,
            ..Default::default()
        }
    }

    #[test]
    fn test_throttle_accumulates_torque() {
        let config = ControlConfig::default();
        let mut state = ControlState::default();
        for _ in 0..10 {
            state.update(&throttle(1.0), &config);
        }
        assert!((state.torque - 10.0 * config.torque_step).abs() < 1e-5);

        // Releasing the throttle holds the torque.
        state.update(&ControlInput::default(), &config);
        assert!((state.torque - 10.0 * config.torque_step).abs() < 1e-5);
    }

    #[test]
    fn test_torque_is_clamped_to_range() {
        let config = ControlConfig::default();
        let mut state = ControlState::default();
        state.update(&throttle(-1.0), &config);
        assert_eq!(state.torque, config.min_torque);

        for _ in 0..1000 {
            state.update(&throttle(1.0), &config);
        }
        assert_eq!(state.torque, config.max_torque);
    }

    #[test]
    fn test_rates_ramp_up_and_decay() {
        let config = ControlConfig::default();
        let mut state = ControlState::default();
        let input = ControlInput {
            yaw: 1.0,
            ..Default::default()
        };

        state.update(&input, &config);
        assert!((state.yaw_speed - config.rate_ramp).abs() < 1e-6);
        assert!(state.is_rotating());

        for _ in 0..100 {
            state.update(&input, &config);
        }
        assert_eq!(state.yaw_speed, config.angular_rate);

        for _ in 0..100 {
            state.update(&ControlInput::default(), &config);
        }
        assert_eq!(state.yaw_speed, 0.0);
        assert!(!state.is_rotating());
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let config = ControlConfig::default();
        let mut state = ControlState::default();
        state.update(&throttle(50.0), &config);
        assert!((state.torque - config.torque_step).abs() < 1e-6);
    }

    #[test]
    fn test_move_toward() {
        assert_eq!(move_toward(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_toward(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_toward(0.0, -1.0, 0.5), -0.5);
        assert_eq!(move_toward(0.3, 0.3, 0.1), 0.3);
    }

    proptest! {
        #[test]
        fn test_state_stays_within_limits(
            inputs in prop::collection::vec(
                (-2.0f32..2.0, -2.0f32..2.0, -2.0f32..2.0, -2.0f32..2.0),
                1..200,
            )
        ) {
            let config = ControlConfig::default();
            let mut state = ControlState::default();
            for (throttle, pitch, yaw, roll) in inputs {
                state.update(&ControlInput { throttle, pitch, yaw, roll }, &config);
                prop_assert!(state.torque >= config.min_torque);
                prop_assert!(state.torque <= config.max_torque);
                for rate in [state.pitch_speed, state.yaw_speed, state.roll_speed] {
                    prop_assert!(rate.abs() <= config.angular_rate + 1e-5);
                }
            }
        }
    }
}
