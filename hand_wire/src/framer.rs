//! Message framing.
//!
//! The wire has no length prefix and no newline: every message is its body
//! followed by a single `;`, and the receiver splits the byte stream on
//! that terminator. Bodies are built from numerals and spaces only, so no
//! escaping is needed.

use crate::encoder::ControlMessage;

pub const TERMINATOR: u8 = b';';

/// Terminate a body and return the bytes to transmit.
pub fn frame(body: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.extend_from_slice(body.as_bytes());
    out.push(TERMINATOR);
    out
}

/// Shorthand for `frame(&msg.body())`.
pub fn frame_message(msg: &ControlMessage) -> Vec<u8> {
    frame(&msg.body())
}

// ════════════════════════════════════════════════════════════════════════════
// MessageSplitter (receiving side)
// ════════════════════════════════════════════════════════════════════════════

/// Reassembles message bodies from arbitrarily chunked stream reads.
///
/// ```
/// use hand_wire::framer::MessageSplitter;
///
/// let mut rx = MessageSplitter::default();
/// assert!(rx.push(b" 1 1 555 0 0").is_empty());
/// assert_eq!(rx.push(b" 0 0 0 0 0 0 0; 2"), vec![" 1 1 555 0 0 0 0 0 0 0 0 0"]);
/// assert_eq!(rx.pending(), b" 2");
/// ```
#[derive(Debug, Default)]
pub struct MessageSplitter {
    buf: Vec<u8>,
}

impl MessageSplitter {
    /// Feed bytes; returns every body completed by them, in order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);

        let mut bodies = Vec::new();
        while let Some(end) = self.buf.iter().position(|&b| b == TERMINATOR) {
            let body: Vec<u8> = self.buf.drain(..=end).take(end).collect();
            bodies.push(String::from_utf8_lossy(&body).into_owned());
        }
        bodies
    }

    /// Bytes received since the last terminator.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
