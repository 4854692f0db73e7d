//! Per-frame skeletal snapshot of tracked hands.
//!
//! These types are what a frame source hands to the encoder: plain owned
//! data, detached from whatever SDK produced them.

use crate::geometry::Vector3;

// ════════════════════════════════════════════════════════════════════════════
// Handedness
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn is_left(self) -> bool {
        self == Handedness::Left
    }

    /// Wire flag: `1` for a left hand, `0` otherwise.
    pub fn flag(self) -> u8 {
        match self {
            Handedness::Left  => 1,
            Handedness::Right => 0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fingers and bones
// ════════════════════════════════════════════════════════════════════════════

/// Finger identity, in the order the sensor reports them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FingerKind {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerKind {
    pub const ALL: [FingerKind; 5] = [
        FingerKind::Thumb,
        FingerKind::Index,
        FingerKind::Middle,
        FingerKind::Ring,
        FingerKind::Pinky,
    ];
}

/// Bone identity along a finger, palm to tip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoneKind {
    Metacarpal = 0,
    Proximal   = 1,
    Middle     = 2,
    Distal     = 3,
}

/// One finger bone. Only its direction is consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bone {
    /// Unit vector from the bone's base joint toward its tip joint.
    pub direction: Vector3,
}

impl Bone {
    pub fn new(direction: Vector3) -> Self {
        Bone { direction }
    }

    /// Bone spanning two joint positions.
    pub fn between(prev_joint: Vector3, next_joint: Vector3) -> Self {
        Bone { direction: (next_joint - prev_joint).normalized() }
    }
}

/// A finger's bone chain: metacarpal, proximal, middle, distal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FingerRecord {
    pub kind:  FingerKind,
    pub bones: [Bone; 4],
}

impl FingerRecord {
    pub fn new(kind: FingerKind, bones: [Bone; 4]) -> Self {
        FingerRecord { kind, bones }
    }

    /// A finger whose four bones all point the same way.
    pub fn straight(kind: FingerKind, direction: Vector3) -> Self {
        FingerRecord { kind, bones: [Bone::new(direction); 4] }
    }

    pub fn bone(&self, kind: BoneKind) -> &Bone {
        &self.bones[kind as usize]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSnapshot / FrameSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// One tracked hand at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct HandSnapshot {
    pub handedness:    Handedness,
    /// Palm centre (mm). Its x coordinate decides leftmost/rightmost.
    pub palm_position: Vector3,
    /// Unit vector out of the palm.
    pub palm_normal:   Vector3,
    /// Unit vector from the palm toward the fingers.
    pub direction:     Vector3,
    /// Thumb first. Normally five entries; fewer when tracking degrades.
    pub fingers:       Vec<FingerRecord>,
    pub wrist_position: Vector3,
}

impl HandSnapshot {
    pub fn is_left(&self) -> bool {
        self.handedness.is_left()
    }

    /// The `index`-th finger in sensor order (0 = thumb).
    pub fn finger(&self, index: usize) -> Option<&FingerRecord> {
        self.fingers.get(index)
    }
}

/// All hands captured together in one sensor frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSnapshot {
    /// Sensor frame counter; diagnostic only.
    pub id:    u64,
    pub hands: Vec<HandSnapshot>,
}

impl FrameSnapshot {
    pub fn new(id: u64, hands: Vec<HandSnapshot>) -> Self {
        FrameSnapshot { id, hands }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Hand with the smallest palm x. Ties keep the earlier hand.
    pub fn leftmost(&self) -> Option<&HandSnapshot> {
        self.hands.iter().fold(None, |best: Option<&HandSnapshot>, h| match best {
            Some(b) if b.palm_position.x <= h.palm_position.x => Some(b),
            _ => Some(h),
        })
    }

    /// Hand with the largest palm x. Ties take the later hand, so two
    /// hands side by side are never collapsed into one.
    pub fn rightmost(&self) -> Option<&HandSnapshot> {
        self.hands.iter().fold(None, |best: Option<&HandSnapshot>, h| match best {
            Some(b) if b.palm_position.x > h.palm_position.x => Some(b),
            _ => Some(h),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_at(handedness: Handedness, x: f32) -> HandSnapshot {
        HandSnapshot {
            handedness,
            palm_position:  Vector3::new(x, 200.0, 0.0),
            palm_normal:    Vector3::new(0.0, -1.0, 0.0),
            direction:      Vector3::new(0.0, 0.0, -1.0),
            fingers:        Vec::new(),
            wrist_position: Vector3::ZERO,
        }
    }

    #[test]
    fn handedness_flags() {
        assert_eq!(Handedness::Left.flag(), 1);
        assert_eq!(Handedness::Right.flag(), 0);
    }

    #[test]
    fn bone_between_joints_is_unit() {
        let b = Bone::between(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -30.0));
        assert_eq!(b.direction, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn finger_bone_lookup_by_kind() {
        let mut f = FingerRecord::straight(FingerKind::Index, Vector3::new(0.0, 0.0, -1.0));
        f.bones[BoneKind::Middle as usize] = Bone::new(Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(f.bone(BoneKind::Middle).direction, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(f.bone(BoneKind::Distal).direction, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn extremes_of_empty_frame() {
        let f = FrameSnapshot::default();
        assert!(f.leftmost().is_none());
        assert!(f.rightmost().is_none());
    }

    #[test]
    fn single_hand_is_both_extremes() {
        let f = FrameSnapshot::new(1, vec![hand_at(Handedness::Right, 30.0)]);
        assert_eq!(f.leftmost(), f.rightmost());
    }

    #[test]
    fn extremes_use_palm_x_not_order() {
        let f = FrameSnapshot::new(7, vec![
            hand_at(Handedness::Left, 10.0),
            hand_at(Handedness::Right, -80.0),
            hand_at(Handedness::Left, 120.0),
        ]);
        assert_eq!(f.leftmost().map(|h| h.palm_position.x), Some(-80.0));
        assert_eq!(f.rightmost().map(|h| h.palm_position.x), Some(120.0));
    }

    #[test]
    fn ties_split_between_first_and_last_hand() {
        let f = FrameSnapshot::new(2, vec![
            hand_at(Handedness::Right, 0.0),
            hand_at(Handedness::Left, 0.0),
        ]);
        assert_eq!(f.leftmost().map(|h| h.handedness), Some(Handedness::Right));
        assert_eq!(f.rightmost().map(|h| h.handedness), Some(Handedness::Left));
        assert!(!std::ptr::eq(f.leftmost().unwrap(), f.rightmost().unwrap()));
    }
}
