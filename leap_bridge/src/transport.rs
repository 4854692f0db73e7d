//! The single outbound connection to the receiver.
//!
//! Opened once at startup. If that fails the bridge keeps running without
//! a connection, and every [`StreamTransport::send`] reports
//! [`TransportError::NotConnected`] without touching the network. A failed
//! write drops that one message; the connection is neither closed nor
//! reopened, and the next message is tried on its own.
//!
//! Writes block until the OS takes the bytes. Frame arrival is paced by the
//! sensor, so a slow receiver just delays the next frame.

use std::io::{self, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("no connection to the receiver")]
    NotConnected,

    #[error("could not connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// StreamTransport
// ════════════════════════════════════════════════════════════════════════════

/// Owns the connection for the life of the process.
///
/// Generic over the sink so tests can stand in for the socket; the bridge
/// uses the `TcpStream` default.
pub struct StreamTransport<W: Write = TcpStream> {
    endpoint: String,
    conn:     Option<W>,
}

impl StreamTransport<TcpStream> {
    /// Connect to `endpoint` (`host:port`), trying up to `attempts` times.
    ///
    /// Never fails: on error the transport comes back disconnected.
    pub fn connect(endpoint: &str, attempts: u32, retry_delay: Duration) -> Self {
        match open_stream(endpoint, attempts, retry_delay) {
            Ok(stream) => {
                log::info!("Connected to receiver at {}", endpoint);
                StreamTransport::from_writer(endpoint, stream)
            }
            Err(e) => {
                log::error!("{}; running without a connection", e);
                StreamTransport::disconnected(endpoint)
            }
        }
    }
}

impl<W: Write> StreamTransport<W> {
    /// Wrap an already open sink.
    pub fn from_writer(endpoint: &str, writer: W) -> Self {
        StreamTransport { endpoint: endpoint.to_string(), conn: Some(writer) }
    }

    /// A transport with nothing behind it.
    pub fn disconnected(endpoint: &str) -> Self {
        StreamTransport { endpoint: endpoint.to_string(), conn: None }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// The underlying sink, if connected.
    pub fn writer(&self) -> Option<&W> {
        self.conn.as_ref()
    }

    /// Write the whole payload, once.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        let conn = self.conn.as_mut().ok_or(TransportError::NotConnected)?;
        conn.write_all(payload).map_err(TransportError::Write)?;
        conn.flush().map_err(TransportError::Write)
    }
}

fn open_stream(endpoint: &str, attempts: u32, retry_delay: Duration) -> Result<TcpStream, TransportError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match TcpStream::connect(endpoint) {
            Ok(stream) => {
                // Messages are tiny and latency matters more than packing.
                if let Err(e) = stream.set_nodelay(true) {
                    log::debug!("TCP_NODELAY not set: {}", e);
                }
                return Ok(stream);
            }
            Err(source) if attempt >= attempts => {
                return Err(TransportError::Connect { endpoint: endpoint.to_string(), source });
            }
            Err(e) => {
                log::warn!(
                    "Connection to {} failed ({}), attempt {}/{}; retrying in {:?}",
                    endpoint, e, attempt, attempts, retry_delay
                );
                attempt += 1;
                thread::sleep(retry_delay);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
