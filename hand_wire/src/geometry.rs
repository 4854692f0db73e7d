//! Vector math in the sensor's coordinate frame.
//!
//! The sensor reports millimetres in a right-handed frame centred on the
//! device: **x** to the user's right, **y** up, **z** toward the user.
//! A hand pointing away from the user therefore has a direction of roughly
//! `(0, 0, -1)`, and the angle helpers below are zero for that pose.

use std::f32::consts::PI;
use std::ops::Sub;

/// Radians → degrees.
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// ════════════════════════════════════════════════════════════════════════════
// Vector3
// ════════════════════════════════════════════════════════════════════════════

/// A 3-component vector (position in mm, or a unit direction).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3 { x, y, z }
    }

    /// Angle above the horizontal plane, about the x axis.
    ///
    /// `atan2(y, -z)`: positive when the vector tilts up.
    pub fn pitch(&self) -> f32 {
        self.y.atan2(-self.z)
    }

    /// Heading in the horizontal plane, about the y axis.
    ///
    /// `atan2(x, -z)`: positive when the vector turns right.
    pub fn yaw(&self) -> f32 {
        self.x.atan2(-self.z)
    }

    /// Rotation about the z axis.
    ///
    /// `atan2(x, -y)`: zero for a palm normal pointing straight down.
    pub fn roll(&self) -> f32 {
        self.x.atan2(-self.y)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalized(&self) -> Vector3 {
        let len = self.length();
        if len < 1e-6 {
            return Vector3::ZERO;
        }
        Vector3::new(self.x / len, self.y / len, self.z / len)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Vector3::new(v[0], v[1], v[2])
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Coordinate transform for the receiver
// ════════════════════════════════════════════════════════════════════════════

/// Map a sensor-space position to the receiver's basis.
///
/// Input: millimetres, x right, y up, z toward the user.
/// Output: decimetres, `[x, -z, -y]`. The receiver's second axis points
/// away from the user and its third axis is the inverted height.
pub fn sensor_to_receiver(p: Vector3) -> [f32; 3] {
    [p.x / 100.0, -p.z / 100.0, -p.y / 100.0]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn forward_vector_has_zero_angles() {
        let fwd = Vector3::new(0.0, 0.0, -1.0);
        assert_eq!(fwd.pitch(), 0.0);
        assert_eq!(fwd.yaw(), 0.0);
    }

    #[test]
    fn pitch_up_is_positive() {
        let up45 = Vector3::new(0.0, 1.0, -1.0);
        assert!(close(up45.pitch() * RAD_TO_DEG, 45.0));
    }

    #[test]
    fn yaw_right_is_positive() {
        let right = Vector3::new(1.0, 0.0, 0.0);
        assert!(close(right.yaw(), PI / 2.0));
    }

    #[test]
    fn palm_down_has_zero_roll() {
        let down = Vector3::new(0.0, -1.0, 0.0);
        assert_eq!(down.roll(), 0.0);
        let tilted = Vector3::new(1.0, 0.0, 0.0);
        assert!(close(tilted.roll(), PI / 2.0));
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vector3::new(3.0, 4.0, 0.0).normalized();
        assert!(close(v.length(), 1.0));
        assert!(close(v.x, 0.6));
        assert_eq!(Vector3::ZERO.normalized(), Vector3::ZERO);
    }

    #[test]
    fn from_array_keeps_axis_order() {
        assert_eq!(Vector3::from([1.0, -2.0, 3.5]), Vector3::new(1.0, -2.0, 3.5));
    }

    #[test]
    fn receiver_basis_swaps_and_inverts() {
        let wrist = Vector3::new(12.0, 250.0, -40.0);
        assert_eq!(sensor_to_receiver(wrist), [0.12, 0.4, -2.5]);
    }
}
