//! Rotor blade animation.

use std::f32::consts::TAU;

/// Accumulates the rotor angle from the current torque.
///
/// The blades turn one degree per step per unit of torque, so the visual
/// spin rate tracks the lift the pilot has dialled in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotorAnimator {
    angle: f32,
}

impl RotorAnimator {
    /// Advance the rotor by one simulation step.
    pub fn advance(&mut self, torque: f32) {
        let speed = torque.to_radians();
        self.angle = if self.angle > TAU {
            self.angle - TAU + speed
        } else {
            self.angle + speed
        };
    }

    /// Accumulated angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Angle to apply to the blades; they spin clockwise seen from above.
    pub fn blade_angle(&self) -> f32 {
        -self.angle
    }
}
