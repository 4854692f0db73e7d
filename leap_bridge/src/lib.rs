//! # leap_bridge
//!
//! Streams LeapMotion hand frames to the MamuLEDs Pure Data patch.
//!
//! Every sensor frame with at least one hand becomes one flat ASCII message
//! (see the `hand_wire` crate) written to a single TCP connection, port
//! 17780 on `localhost` by default. Frames without hands send nothing.
//!
//! ## Failure behaviour
//!
//! | Situation | Result |
//! |---|---|
//! | Receiver not listening at startup | logged, bridge runs without a connection |
//! | A write fails | logged, that message is dropped, next frame tried normally |
//! | Hand with four or fewer fingers | short group: handedness flag only |
//! | Bad command-line arguments | usage printed, exit before the loop starts |
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**, synthetic hands, no hardware needed.
//! * `leap`: **Hardware mode**, reads a real LeapMotion controller via LeapC.

pub mod config;
pub mod transport;
pub mod source;
pub mod bridge;
