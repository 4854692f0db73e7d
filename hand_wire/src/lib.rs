//! # hand_wire
//!
//! Turns tracked-hand snapshots into the flat ASCII control message read by
//! the MamuLEDs lighting patch.
//!
//! ```text
//!  FrameSnapshot ──encode──▶ ControlMessage ──frame──▶ b" 2 1 … 0 …;"
//!        │                        ▲
//!        └── per hand: extract ───┘
//! ```
//!
//! Everything here is pure: no I/O, no shared state. Delivery lives in the
//! `leap_bridge` crate.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_wire::{payload_for, FrameSnapshot, HandSnapshot, Handedness, Vector3};
//!
//! // No hands, nothing to send.
//! assert!(payload_for(&FrameSnapshot::default()).is_none());
//!
//! // A left hand with too few resolved fingers carries its flag only.
//! let left = HandSnapshot {
//!     handedness:     Handedness::Left,
//!     palm_position:  Vector3::ZERO,
//!     palm_normal:    Vector3::new(0.0, -1.0, 0.0),
//!     direction:      Vector3::new(0.0, 0.0, -1.0),
//!     fingers:        Vec::new(),
//!     wrist_position: Vector3::ZERO,
//! };
//! let bytes = payload_for(&FrameSnapshot::new(1, vec![left])).unwrap();
//! assert_eq!(bytes, b" 1 1 555 0 0 0 0 0 0 0 0 0;");
//! ```

pub mod geometry;
pub mod hand;
pub mod numfmt;
pub mod features;
pub mod encoder;
pub mod framer;

pub use geometry::{sensor_to_receiver, Vector3, RAD_TO_DEG};
pub use hand::{Bone, BoneKind, FingerKind, FingerRecord, FrameSnapshot, HandSnapshot, Handedness};
pub use features::{extract, HandAngles, HandFeatures};
pub use encoder::{encode, ControlMessage, FeatureGroup, PLACEHOLDER};
pub use framer::{frame, frame_message, MessageSplitter, TERMINATOR};

/// Encode and frame in one step: the bytes to send for `frame`, if any.
pub fn payload_for(snapshot: &FrameSnapshot) -> Option<Vec<u8>> {
    encode(snapshot).map(|msg| frame_message(&msg))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests: whole pipeline
// ════════════════════════════════════════════════════════════════════════════
