//! Frame sources: LeapMotion hardware and a synthetic simulator.
//!
//! Both deliver [`SourceEvent`]s over an `mpsc` channel from their own
//! thread. The consumer handles them one at a time and does not care which
//! source produced them.

use std::f32::consts::PI;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use hand_wire::{Bone, BoneKind, FingerKind, FingerRecord, FrameSnapshot, HandSnapshot, Handedness, Vector3};

#[cfg(feature = "leap")]
use crate::config::TrackingPolicy;

// ════════════════════════════════════════════════════════════════════════════
// SourceEvent
// ════════════════════════════════════════════════════════════════════════════

/// Something the sensor side wants the bridge to know about.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// A tracking frame, possibly with no hands in it.
    Frame(FrameSnapshot),

    /// Link to the tracking service is up.
    ServiceConnected,

    /// Link to the tracking service dropped.
    ServiceDisconnected,

    /// A sensor was detected, or reported a new status.
    DeviceAttached(DeviceInfo),

    /// The sensor went away: unplugged, closed, or no more frames coming.
    DeviceLost,

    /// The sensor reported a hardware failure; the text is its status.
    DeviceFailed(String),

    /// The source has nothing more to deliver.
    Stop,
}

/// Identity and streaming state of an attached sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id:        u32,
    pub streaming: bool,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.streaming { "streaming" } else { "not streaming" };
        write!(f, "device {} ({})", self.id, state)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.
///
/// `run` should return once a send fails: the receiving side is gone.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Frame source backed by the LeapMotion tracking service.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
#[cfg(feature = "leap")]
pub struct LeapFrameSource {
    pub policy: TrackingPolicy,
}

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        use leaprs::{Connection, ConnectionConfig, DeviceStatus, EventRef, PolicyFlags};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to create LeapC connection: {:?}", e);
                let _ = tx.send(SourceEvent::Stop);
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::error!("Failed to open LeapMotion service: {:?}", e);
            let _ = tx.send(SourceEvent::Stop);
            return;
        }

        if self.policy == TrackingPolicy::Background {
            if let Err(e) = connection.set_policy_flags(PolicyFlags::BACKGROUND_FRAMES, PolicyFlags::empty()) {
                log::warn!("Background policy not applied: {:?}", e);
            }
        }

        let mut frame_id = 0u64;

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            let event = match msg.event() {
                EventRef::Connection(_)      => SourceEvent::ServiceConnected,
                EventRef::ConnectionLost(_)  => SourceEvent::ServiceDisconnected,
                EventRef::Device(dev)        => SourceEvent::DeviceAttached(DeviceInfo {
                    id:        dev.device().id,
                    streaming: dev.status().contains(DeviceStatus::STREAMING),
                }),
                EventRef::DeviceLost         => SourceEvent::DeviceLost,
                EventRef::DeviceFailure(dev) => SourceEvent::DeviceFailed(format!("{:?}", dev.status())),
                EventRef::Tracking(frame)    => {
                    frame_id += 1;
                    let hands = frame.hands().iter().map(leap_hand).collect();
                    SourceEvent::Frame(FrameSnapshot::new(frame_id, hands))
                }
                _ => continue,
            };

            if tx.send(event).is_err() { return; }
        }
    }
}

/// Copy one LeapC hand into an owned snapshot.
#[cfg(feature = "leap")]
fn leap_hand(hand: &leaprs::HandRef) -> HandSnapshot {
    let handedness = match hand.hand_type() {
        leaprs::HandType::Left => Handedness::Left,
        _                      => Handedness::Right,
    };

    let palm = hand.palm();
    // The arm bone ends at the wrist.
    let arm = hand.arm();
    let fingers = hand
        .digits()
        .into_iter()
        .zip(FingerKind::ALL)
        .map(|(digit, kind)| {
            FingerRecord::new(kind, [
                leap_bone(digit.metacarpal()),
                leap_bone(digit.proximal()),
                leap_bone(digit.intermediate()),
                leap_bone(digit.distal()),
            ])
        })
        .collect();

    HandSnapshot {
        handedness,
        palm_position:  leap_vec(palm.position()),
        palm_normal:    leap_vec(palm.normal()),
        direction:      leap_vec(palm.direction()),
        fingers,
        wrist_position: leap_vec(arm.next_joint()),
    }
}

#[cfg(feature = "leap")]
fn leap_bone(bone: leaprs::BoneRef) -> Bone {
    Bone::between(leap_vec(bone.prev_joint()), leap_vec(bone.next_joint()))
}

#[cfg(feature = "leap")]
fn leap_vec(v: leaprs::LeapVectorRef) -> Vector3 {
    Vector3::from(v.array())
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource: synthetic hands (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Frames per phase of the simulated routine.
const SIM_PHASE_FRAMES: u64 = 120;

/// Frame source that moves synthetic hands through a fixed routine:
/// both hands, right alone, left alone with degraded tracking, hands
/// crossed, then no hands. Positions and finger bends sweep smoothly.
pub struct SimFrameSource {
    pub rate_hz: u32,
    /// Stop after this many frames; `None` runs until the receiver hangs up.
    pub limit:   Option<u64>,
}

impl SimFrameSource {
    pub fn new(rate_hz: u32) -> Self {
        SimFrameSource { rate_hz: rate_hz.max(1), limit: None }
    }
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let period = Duration::from_secs_f64(1.0 / self.rate_hz as f64);

        if tx.send(SourceEvent::ServiceConnected).is_err() { return; }
        let sensor = DeviceInfo { id: 0, streaming: true };
        if tx.send(SourceEvent::DeviceAttached(sensor)).is_err() { return; }

        let mut id = 0u64;
        loop {
            if self.limit.map_or(false, |n| id >= n) {
                let _ = tx.send(SourceEvent::Stop);
                return;
            }
            if tx.send(SourceEvent::Frame(sim_frame(id))).is_err() { return; }
            id += 1;
            thread::sleep(period);
        }
    }
}

/// The simulated frame at index `id`. Deterministic.
pub fn sim_frame(id: u64) -> FrameSnapshot {
    let phase = (id / SIM_PHASE_FRAMES) % 5;
    let t = (id % SIM_PHASE_FRAMES) as f32 / SIM_PHASE_FRAMES as f32;
    let swing = (2.0 * PI * t).sin();

    let hands = match phase {
        0 => vec![sim_hand(Handedness::Left, -90.0, swing, 5), sim_hand(Handedness::Right, 90.0, swing, 5)],
        1 => vec![sim_hand(Handedness::Right, 60.0 * swing, swing, 5)],
        2 => vec![sim_hand(Handedness::Left, 60.0 * swing, swing, 3)],
        3 => vec![sim_hand(Handedness::Left, 70.0, swing, 5), sim_hand(Handedness::Right, -70.0, swing, 5)],
        _ => Vec::new(),
    };

    FrameSnapshot::new(id, hands)
}

/// A hand at palm x `x` mm; `swing` in `[-1, 1]` drives tilt and finger bend.
fn sim_hand(handedness: Handedness, x: f32, swing: f32, finger_count: usize) -> HandSnapshot {
    let tilt = 0.3 * swing;
    let direction = Vector3::new(0.2 * swing, tilt.sin(), -tilt.cos()).normalized();
    let palm_normal = Vector3::new(0.3 * swing, -1.0, 0.0).normalized();

    // Fingers curl as the swing goes positive.
    let bend = 0.5 * (1.0 + swing) * (PI / 3.0);
    let curled = Vector3::new(direction.x, -(bend.sin()), -(bend.cos())).normalized();

    let fingers = FingerKind::ALL[..finger_count.min(5)]
        .iter()
        .map(|&kind| {
            let mut f = FingerRecord::straight(kind, direction);
            match kind {
                FingerKind::Thumb => {
                    let side = if handedness.is_left() { 1.0 } else { -1.0 };
                    f.bones[BoneKind::Distal as usize] =
                        Bone::new(Vector3::new(side * bend.sin(), 0.0, -1.0).normalized());
                }
                _ => {
                    f.bones[BoneKind::Middle as usize] = Bone::new(curled);
                    f.bones[BoneKind::Distal as usize] = Bone::new(curled);
                }
            }
            f
        })
        .collect();

    let y = 220.0 + 40.0 * swing;
    HandSnapshot {
        handedness,
        palm_position:  Vector3::new(x, y, 0.0),
        palm_normal,
        direction,
        fingers,
        wrist_position: Vector3::new(x, y - 10.0, 60.0),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
