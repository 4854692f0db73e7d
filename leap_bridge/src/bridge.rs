//! The per-frame encode-and-send loop.
//!
//! `Bridge` owns the [`StreamTransport`] and handles [`SourceEvent`]s one
//! at a time: a frame with hands becomes exactly one send attempt; a frame
//! without hands sends nothing; lifecycle events are only logged.

use std::io::Write;
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use hand_wire::{encode, frame_message, FrameSnapshot};

use crate::config::{BridgeConfig, SourceKind};
use crate::source::{spawn_frame_source, SimFrameSource, SourceEvent};
use crate::transport::{StreamTransport, TransportError};

/// How often the loop checks the stop flag while no events arrive.
const STOP_POLL: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("could not install the Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// Outcomes and counters
// ════════════════════════════════════════════════════════════════════════════

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No hands, no message.
    NoHands,
    Sent,
    /// Encoded but not delivered; the message is gone.
    Dropped,
}

/// Running totals, reported when the bridge stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub frames:        u64,
    pub empty_frames:  u64,
    pub sent:          u64,
    pub write_failures: u64,
    /// Messages encoded while there was no connection.
    pub unconnected:   u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

// ════════════════════════════════════════════════════════════════════════════
// Bridge
// ════════════════════════════════════════════════════════════════════════════

pub struct Bridge<W: Write = TcpStream> {
    transport: StreamTransport<W>,
    stats:     BridgeStats,
}

impl<W: Write> Bridge<W> {
    pub fn new(transport: StreamTransport<W>) -> Self {
        Bridge { transport, stats: BridgeStats::default() }
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    pub fn transport(&self) -> &StreamTransport<W> {
        &self.transport
    }

    // ── process one SourceEvent ─────────────────────────────────────────

    pub fn handle_event(&mut self, event: SourceEvent) -> Flow {
        match event {
            SourceEvent::Frame(frame) => {
                self.on_frame(&frame);
            }
            SourceEvent::ServiceConnected    => log::info!("Tracking service connected"),
            SourceEvent::ServiceDisconnected => log::info!("Tracking service disconnected"),
            SourceEvent::DeviceAttached(dev) => log::info!("Sensor attached: {}", dev),
            SourceEvent::DeviceLost          => log::warn!("Sensor lost; no frames until it returns"),
            SourceEvent::DeviceFailed(what)  => log::error!("Sensor failure: {}", what),
            SourceEvent::Stop => {
                log::info!("Frame source stopped");
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    /// Encode `frame` and make one attempt to deliver it.
    pub fn on_frame(&mut self, frame: &FrameSnapshot) -> FrameOutcome {
        self.stats.frames += 1;

        let msg = match encode(frame) {
            Some(m) => m,
            None => {
                self.stats.empty_frames += 1;
                return FrameOutcome::NoHands;
            }
        };
        let padded = msg.groups.iter().any(|g| g.is_placeholder());
        log::debug!(
            "Frame {}: {} hand(s){}",
            frame.id,
            msg.hand_count,
            if padded { ", placeholder for the missing side" } else { "" }
        );

        let payload = frame_message(&msg);
        match self.transport.send(&payload) {
            Ok(()) => {
                self.stats.sent += 1;
                FrameOutcome::Sent
            }
            Err(TransportError::NotConnected) => {
                self.stats.unconnected += 1;
                log::trace!("Frame {} not sent: no connection", frame.id);
                FrameOutcome::Dropped
            }
            Err(e) => {
                self.stats.write_failures += 1;
                log::warn!("Frame {} dropped: {}", frame.id, e);
                FrameOutcome::Dropped
            }
        }
    }

    /// Handle events until the source stops, the channel closes, or
    /// `running` goes false.
    pub fn pump(&mut self, rx: &Receiver<SourceEvent>, running: &AtomicBool) -> BridgeStats {
        while running.load(Ordering::SeqCst) {
            match rx.recv_timeout(STOP_POLL) {
                Ok(event) => {
                    if self.handle_event(event) == Flow::Stop {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    log::warn!("Frame source went away");
                    break;
                }
            }
        }
        self.stats
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the process main loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the bridge until Ctrl-C.
///
/// Connects (or fails to, and carries on), starts the frame source, then
/// pumps events on the calling thread. Dropping the receiver on the way
/// out ends the source thread; dropping the bridge closes the socket.
pub fn run(cfg: BridgeConfig) -> Result<BridgeStats, BridgeError> {
    let endpoint = cfg.endpoint();
    log::info!("Receiver: {}", endpoint);
    let transport = StreamTransport::connect(&endpoint, cfg.connect_attempts, cfg.connect_retry_delay);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let rx = match cfg.source {
        #[cfg(feature = "leap")]
        SourceKind::Leap => {
            log::info!("Source: LeapMotion ({:?} policy)", cfg.policy);
            spawn_frame_source(crate::source::LeapFrameSource { policy: cfg.policy })
        }
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => {
            log::warn!("Built without the `leap` feature; using simulated hands");
            spawn_frame_source(SimFrameSource::new(cfg.sim_rate_hz))
        }
        SourceKind::Simulated => {
            log::info!("Source: simulated hands at {} Hz", cfg.sim_rate_hz);
            spawn_frame_source(SimFrameSource::new(cfg.sim_rate_hz))
        }
    };

    let mut bridge = Bridge::new(transport);
    let stats = bridge.pump(&rx, &running);

    log::info!(
        "Stopped after {} frames: {} sent, {} without hands, {} write failures, {} unconnected",
        stats.frames, stats.sent, stats.empty_frames, stats.write_failures, stats.unconnected
    );
    Ok(stats)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
