//! Geometry inversion flags applied at encode time.

use std::f32::consts::TAU;

/// Per-channel axis inversion.
///
/// Deployments with a rear-projected or mirrored surface flip coordinates
/// here so receivers always see the normalized orientation. Each flag is
/// independent and each inversion is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisFlip {
    pub invert_x: bool,
    pub invert_y: bool,
    pub invert_angle: bool,
}

impl AxisFlip {
    /// No inversion on any axis.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            invert_x: false,
            invert_y: false,
            invert_angle: false,
        }
    }

    /// Creates flags for each axis.
    #[must_use]
    pub const fn new(invert_x: bool, invert_y: bool, invert_angle: bool) -> Self {
        Self {
            invert_x,
            invert_y,
            invert_angle,
        }
    }

    /// Applies the x flag to a normalized coordinate.
    #[must_use]
    pub fn apply_x(self, x: f32) -> f32 {
        if self.invert_x {
            1.0 - x
        } else {
            x
        }
    }

    /// Applies the y flag to a normalized coordinate.
    #[must_use]
    pub fn apply_y(self, y: f32) -> f32 {
        if self.invert_y {
            1.0 - y
        } else {
            y
        }
    }

    /// Applies the angle flag to an orientation in `[0, 2π)`.
    ///
    /// The result stays in the same range: inverting `0` yields `0`, not a
    /// full turn.
    #[must_use]
    pub fn apply_angle(self, angle: f32) -> f32 {
        if self.invert_angle {
            (TAU - angle).rem_euclid(TAU)
        } else {
            angle
        }
    }
}
