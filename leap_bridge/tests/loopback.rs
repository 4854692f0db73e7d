//! End-to-end: simulated frames → bridge → real TCP socket → splitter.

use std::io::Read;
use std::net::TcpListener;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

use hand_wire::{MessageSplitter, PLACEHOLDER};
use leap_bridge::bridge::Bridge;
use leap_bridge::source::{sim_frame, spawn_frame_source, SimFrameSource};
use leap_bridge::transport::StreamTransport;

/// Reads until the peer closes, returning every message body.
fn collect_bodies(listener: TcpListener) -> thread::JoinHandle<Vec<String>> {
    thread::spawn(move || {
        let (mut sock, _) = listener.accept().expect("accept");
        let mut rx = MessageSplitter::default();
        let mut bodies = Vec::new();
        let mut buf = [0u8; 512];
        loop {
            match sock.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => bodies.extend(rx.push(&buf[..n])),
            }
        }
        assert!(rx.pending().is_empty(), "trailing bytes without terminator");
        bodies
    })
}

#[test]
fn simulated_session_reaches_receiver_in_order() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = listener.local_addr().unwrap().to_string();
    let reader = collect_bodies(listener);

    const FRAMES: u64 = 650;
    let transport = StreamTransport::connect(&endpoint, 3, Duration::from_millis(20));
    assert!(transport.is_connected());

    let mut bridge = Bridge::new(transport);
    let rx = spawn_frame_source(SimFrameSource { rate_hz: 1000, limit: Some(FRAMES) });
    let stats = bridge.pump(&rx, &AtomicBool::new(true));
    drop(bridge);

    let bodies = reader.join().unwrap();
    let expected: Vec<u64> = (0..FRAMES).filter(|&id| !sim_frame(id).is_empty()).collect();

    assert_eq!(stats.frames, FRAMES);
    assert_eq!(stats.sent as usize, expected.len());
    assert_eq!(bodies.len(), expected.len());

    for (body, id) in bodies.iter().zip(&expected) {
        let hands = sim_frame(*id).hands.len();
        let fields: Vec<&str> = body.split_whitespace().collect();
        assert_eq!(fields[0], hands.to_string(), "frame {}: {}", id, body);
        assert!(body.starts_with(' '));

        let placeholders = body.matches(PLACEHOLDER).count();
        if hands == 1 {
            assert_eq!(placeholders, 1, "frame {}: {}", id, body);
        } else {
            assert_eq!(placeholders, 0, "frame {}: {}", id, body);
            // Left-handed group first, then right-handed.
            assert_eq!(fields[1], "1", "frame {}: {}", id, body);
        }
    }
}

#[test]
fn unreachable_receiver_is_not_fatal() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let transport = StreamTransport::connect(&format!("127.0.0.1:{}", port), 1, Duration::ZERO);
    assert!(!transport.is_connected());

    let mut bridge = Bridge::new(transport);
    let rx = spawn_frame_source(SimFrameSource { rate_hz: 1000, limit: Some(20) });
    let stats = bridge.pump(&rx, &AtomicBool::new(true));

    assert_eq!(stats.frames, 20);
    assert_eq!(stats.sent, 0);
    assert_eq!(stats.unconnected, 20);
}
