//! Frame → control message.
//!
//! A message always carries two hand groups. With two (or more) hands the
//! spatially leftmost and rightmost are encoded, left-handed group first.
//! With one hand the missing side is filled by the [`PLACEHOLDER`] group,
//! after a left hand and before a right hand.
//!
//! ```text
//!  " 2" " 1 p r y t i m wx wy wz" " 0 p r y t i m wx wy wz"
//!  " 1" " 1 p r y t i m wx wy wz" " 555 0 0 0 0 0 0 0 0 0"
//!  " 1" " 555 0 0 0 0 0 0 0 0 0" " 0 p r y t i m wx wy wz"
//! ```

use std::fmt;

use crate::features::{extract, HandFeatures};
use crate::hand::FrameSnapshot;

/// Stands in for the absent hand of a one-hand frame. The leading `555`
/// is outside the handedness domain `{0, 1}`.
pub const PLACEHOLDER: &str = " 555 0 0 0 0 0 0 0 0 0";

// ════════════════════════════════════════════════════════════════════════════
// FeatureGroup / ControlMessage
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeatureGroup {
    Hand(HandFeatures),
    Placeholder,
}

impl FeatureGroup {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, FeatureGroup::Placeholder)
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureGroup::Hand(features) => write!(f, "{}", features),
            FeatureGroup::Placeholder    => f.write_str(PLACEHOLDER),
        }
    }
}

/// One frame's message body, before the terminator.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlMessage {
    /// Hands in the frame, which may exceed the two that are encoded.
    pub hand_count: usize,
    pub groups:     [FeatureGroup; 2],
}

impl ControlMessage {
    /// The body text, e.g. `" 1 1 555 0 0 0 0 0 0 0 0 0"`.
    pub fn body(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {}", self.hand_count)?;
        for group in &self.groups {
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// encode
// ════════════════════════════════════════════════════════════════════════════

/// Build the message for one frame, or `None` when no hand is tracked.
pub fn encode(frame: &FrameSnapshot) -> Option<ControlMessage> {
    let leftmost  = frame.leftmost()?;
    let rightmost = frame.rightmost()?;
    let hand_count = frame.hands.len();

    let left_features = extract(leftmost);

    let groups = if hand_count > 1 {
        let right_features = extract(rightmost);
        if left_features.is_left() {
            [FeatureGroup::Hand(left_features), FeatureGroup::Hand(right_features)]
        } else {
            [FeatureGroup::Hand(right_features), FeatureGroup::Hand(left_features)]
        }
    } else if left_features.is_left() {
        [FeatureGroup::Hand(left_features), FeatureGroup::Placeholder]
    } else {
        [FeatureGroup::Placeholder, FeatureGroup::Hand(left_features)]
    };

    log::trace!("frame {}: {} hand(s) encoded", frame.id, hand_count);

    Some(ControlMessage { hand_count, groups })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
