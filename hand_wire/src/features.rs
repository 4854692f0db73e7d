//! Per-hand feature extraction.
//!
//! [`extract`] turns one [`HandSnapshot`] into the numbers the receiver
//! drives its lights with: a handedness flag and, for a fully resolved
//! hand, palm orientation, three joint-bend angles and the wrist position.
//!
//! ## Field order
//!
//! | # | Field      | Unit | Source                                        |
//! |---|------------|------|-----------------------------------------------|
//! | 0 | handedness | 0/1  | `1` = left                                    |
//! | 1 | pitch      | deg  | hand direction                                |
//! | 2 | roll       | deg  | palm normal                                   |
//! | 3 | yaw        | deg  | hand direction                                |
//! | 4 | thumbZ     | deg  | thumb distal bone yaw vs. hand yaw, +90       |
//! | 5 | indexX     | deg  | hand pitch vs. index middle-bone pitch, +180  |
//! | 6 | middleX    | deg  | middle middle-bone pitch vs. hand pitch, +180 |
//! | 7 | wristX     | dm   | `x / 100`                                     |
//! | 8 | wristY     | dm   | `-z / 100`                                    |
//! | 9 | wristZ     | dm   | `-y / 100`                                    |

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

use crate::geometry::{sensor_to_receiver, RAD_TO_DEG};
use crate::hand::{BoneKind, HandSnapshot, Handedness};
use crate::numfmt::format_field;

/// A hand tracked with this many fingers or fewer is degraded and sends its
/// handedness flag only.
pub const DEGRADED_MAX_FINGERS: usize = 4;

/// Number of fields in a fully resolved group.
pub const FULL_GROUP_LEN: usize = 10;

// ════════════════════════════════════════════════════════════════════════════
// HandAngles / HandFeatures
// ════════════════════════════════════════════════════════════════════════════

/// Orientation, bend and position fields of a fully resolved hand.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandAngles {
    pub pitch:    f32,
    pub roll:     f32,
    pub yaw:      f32,
    pub thumb_z:  f32,
    pub index_x:  f32,
    pub middle_x: f32,
    /// Wrist in the receiver basis, see [`sensor_to_receiver`].
    pub wrist:    [f32; 3],
}

impl HandAngles {
    pub fn fields(&self) -> [f32; 9] {
        [
            self.pitch, self.roll, self.yaw,
            self.thumb_z, self.index_x, self.middle_x,
            self.wrist[0], self.wrist[1], self.wrist[2],
        ]
    }
}

/// One hand's contribution to a control message.
///
/// `angles` is `None` for a hand with too few tracked fingers; the group
/// is then just the handedness flag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandFeatures {
    pub handedness: Handedness,
    pub angles:     Option<HandAngles>,
}

impl HandFeatures {
    pub fn is_left(&self) -> bool {
        self.handedness.is_left()
    }

    /// Number of wire fields: 1 or [`FULL_GROUP_LEN`].
    pub fn field_count(&self) -> usize {
        match self.angles {
            Some(_) => FULL_GROUP_LEN,
            None    => 1,
        }
    }
}

/// Each field is written with a leading space.
impl fmt::Display for HandFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {}", self.handedness.flag())?;
        if let Some(angles) = &self.angles {
            for v in angles.fields() {
                write!(f, " {}", format_field(v))?;
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// extract
// ════════════════════════════════════════════════════════════════════════════

/// Derive the feature group for one hand.
pub fn extract(hand: &HandSnapshot) -> HandFeatures {
    HandFeatures {
        handedness: hand.handedness,
        angles:     hand_angles(hand),
    }
}

fn hand_angles(hand: &HandSnapshot) -> Option<HandAngles> {
    if hand.fingers.len() <= DEGRADED_MAX_FINGERS {
        log::trace!(
            "{:?} hand has {} fingers, sending handedness only",
            hand.handedness,
            hand.fingers.len()
        );
        return None;
    }

    let direction = hand.direction;
    let normal    = hand.palm_normal;

    let thumb  = hand.finger(0)?.bone(BoneKind::Distal).direction;
    let index  = hand.finger(1)?.bone(BoneKind::Middle).direction;
    let middle = hand.finger(2)?.bone(BoneKind::Middle).direction;

    let angles = HandAngles {
        pitch:    direction.pitch() * RAD_TO_DEG,
        roll:     normal.roll() * RAD_TO_DEG,
        yaw:      direction.yaw() * RAD_TO_DEG,
        thumb_z:  (FRAC_PI_2 + thumb.yaw() - direction.yaw()) * RAD_TO_DEG,
        index_x:  (PI + direction.pitch() - index.pitch()) * RAD_TO_DEG,
        middle_x: (PI + middle.pitch() - direction.pitch()) * RAD_TO_DEG,
        wrist:    sensor_to_receiver(hand.wrist_position),
    };

    log::trace!(
        "{:?} hand: pitch {} roll {} yaw {} | thumb {} index {} middle {}",
        hand.handedness,
        angles.pitch, angles.roll, angles.yaw,
        angles.thumb_z, angles.index_x, angles.middle_x
    );

    Some(angles)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector3;
    use crate::hand::{Bone, FingerKind, FingerRecord};

    const FORWARD: Vector3 = Vector3::new(0.0, 0.0, -1.0);
    const DOWN: Vector3    = Vector3::new(0.0, -1.0, 0.0);

    fn flat_hand(handedness: Handedness, finger_count: usize) -> HandSnapshot {
        HandSnapshot {
            handedness,
            palm_position:  Vector3::new(0.0, 200.0, 0.0),
            palm_normal:    DOWN,
            direction:      FORWARD,
            fingers:        FingerKind::ALL[..finger_count]
                .iter()
                .map(|&k| FingerRecord::straight(k, FORWARD))
                .collect(),
            wrist_position: Vector3::new(10.0, 150.0, 60.0),
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn flat_hand_angles() {
        let f = extract(&flat_hand(Handedness::Right, 5));
        let a = f.angles.expect("five fingers");
        assert_eq!(a.pitch, 0.0);
        assert_eq!(a.roll, 0.0);
        assert_eq!(a.yaw, 0.0);
        // Straight fingers sit at the neutral offsets.
        assert!(close(a.thumb_z, 90.0));
        assert!(close(a.index_x, 180.0));
        assert!(close(a.middle_x, 180.0));
        assert_eq!(a.wrist, [0.1, -0.6, -1.5]);
    }

    #[test]
    fn bent_index_raises_index_x() {
        let mut hand = flat_hand(Handedness::Left, 5);
        // Middle phalanx tilted 30° downward.
        let down30 = Vector3::new(0.0, -(30f32.to_radians().sin()), -(30f32.to_radians().cos()));
        hand.fingers[1].bones[BoneKind::Middle as usize] = Bone::new(down30);
        let a = extract(&hand).angles.expect("five fingers");
        assert!(close(a.index_x, 210.0), "{}", a.index_x);
        assert!(close(a.middle_x, 180.0));
    }

    #[test]
    fn curled_middle_reduces_middle_x() {
        let mut hand = flat_hand(Handedness::Right, 5);
        let down45 = Vector3::new(0.0, -1.0, -1.0).normalized();
        hand.fingers[2].bones[BoneKind::Middle as usize] = Bone::new(down45);
        let a = extract(&hand).angles.expect("five fingers");
        assert!(close(a.middle_x, 135.0), "{}", a.middle_x);
    }

    #[test]
    fn thumb_uses_distal_bone_yaw() {
        let mut hand = flat_hand(Handedness::Right, 5);
        hand.fingers[0].bones[BoneKind::Distal as usize] = Bone::new(Vector3::new(-1.0, 0.0, 0.0));
        let a = extract(&hand).angles.expect("five fingers");
        assert!(close(a.thumb_z, 0.0), "{}", a.thumb_z);
        // Other thumb bones are ignored.
        hand.fingers[0].bones[BoneKind::Proximal as usize] = Bone::new(DOWN);
        assert_eq!(extract(&hand).angles.map(|b| b.thumb_z), Some(a.thumb_z));
    }

    #[test]
    fn hand_orientation_feeds_pitch_and_yaw() {
        let mut hand = flat_hand(Handedness::Right, 5);
        hand.direction = Vector3::new(1.0, 0.0, -1.0).normalized();
        let a = extract(&hand).angles.expect("five fingers");
        assert!(close(a.yaw, 45.0));
        assert!(close(a.pitch, 0.0));
        // Straight fingers still point forward, so the thumb offset shifts.
        assert!(close(a.thumb_z, 45.0));
    }

    #[test]
    fn ring_and_pinky_are_ignored() {
        let reference = extract(&flat_hand(Handedness::Left, 5));
        let mut hand = flat_hand(Handedness::Left, 5);
        hand.fingers[3] = FingerRecord::straight(FingerKind::Ring, DOWN);
        hand.fingers[4] = FingerRecord::straight(FingerKind::Pinky, DOWN);
        assert_eq!(extract(&hand), reference);
    }

    #[test]
    fn four_fingers_yield_flag_only() {
        for n in 0..=DEGRADED_MAX_FINGERS {
            let f = extract(&flat_hand(Handedness::Left, n));
            assert!(f.angles.is_none());
            assert_eq!(f.field_count(), 1);
            assert_eq!(f.to_string(), " 1");
        }
    }

    #[test]
    fn five_fingers_yield_ten_fields() {
        let f = extract(&flat_hand(Handedness::Right, 5));
        assert_eq!(f.field_count(), FULL_GROUP_LEN);
        assert_eq!(f.to_string().split_whitespace().count(), FULL_GROUP_LEN);
        assert_eq!(f.to_string(), " 0 0 0 0 90 180 180 0.1 -0.6 -1.5");
    }

    #[test]
    fn zeroed_angles_render_as_zeros() {
        let f = HandFeatures { handedness: Handedness::Right, angles: Some(HandAngles::default()) };
        assert_eq!(f.to_string(), " 0 0 0 0 0 0 0 0 0 0");
    }
}
