//! Curvature-based differential drive model
//!
//! Converts a (speed, curvature) command pair into independent left and
//! right wheel commands. The turn radius follows a logarithmic law: for
//! nonzero curvature `c`, the inner wheel is divided by
//! `ratio = (ln|c| - S) / (ln|c| + S)` where `S` is the sensitivity
//! constant, giving a constant-radius arc whose sharpness grows with
//! |curvature|. Larger sensitivity yields sharper turns for the same
//! curvature magnitude.
//!
//! Pure kinematics; no state, no error cases.

use libm::logf;

/// Ratio substitute when the log transform lands exactly on zero,
/// keeping the divided wheel command finite
const RATIO_EPSILON: f32 = 1e-10;

/// Per-side wheel commands, each in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelCommands {
    pub left: f32,
    pub right: f32,
}

/// Curvature drive model
///
/// `sensitivity` is the only tunable; `right_inverted` matches the
/// actuator polarity of the physical right-side motor controller.
#[derive(Debug, Clone, Copy)]
pub struct CurvatureDrive {
    pub sensitivity: f32,
    pub right_inverted: bool,
}

impl Default for CurvatureDrive {
    fn default() -> Self {
        Self {
            sensitivity: 0.75,
            right_inverted: true,
        }
    }
}

impl CurvatureDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert (speed, curvature) into per-side wheel speeds
    ///
    /// Curvature 0 drives both sides at `speed`. Negative curvature
    /// turns left (left wheel becomes the inner, divided side);
    /// positive turns right. Both outputs are clamped to [-1, 1].
    pub fn wheel_speeds(&self, speed: f32, curvature: f32) -> WheelCommands {
        let (left, right) = if curvature < 0.0 {
            let ratio = self.turn_ratio(-curvature);
            (speed / ratio, speed)
        } else if curvature > 0.0 {
            let ratio = self.turn_ratio(curvature);
            (speed, speed / ratio)
        } else {
            (speed, speed)
        };

        WheelCommands {
            left: left.clamp(-1.0, 1.0),
            right: right.clamp(-1.0, 1.0),
        }
    }

    /// Like [`wheel_speeds`](Self::wheel_speeds), with the right-side
    /// polarity inversion applied for the physical motor controller
    pub fn actuator_commands(&self, speed: f32, curvature: f32) -> WheelCommands {
        let mut commands = self.wheel_speeds(speed, curvature);
        if self.right_inverted {
            commands.right = -commands.right;
        }
        commands
    }

    fn turn_ratio(&self, curvature_magnitude: f32) -> f32 {
        let value = logf(curvature_magnitude);
        let ratio = (value - self.sensitivity) / (value + self.sensitivity);
        if ratio == 0.0 {
            RATIO_EPSILON
        } else {
            ratio
        }
    }
}
