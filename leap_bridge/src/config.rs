//! Startup configuration from the command line.
//!
//! ```text
//! leap_bridge [--bg] [--host NAME] [--port N] [--retries N] [--sim] [--rate HZ]
//! ```
//!
//! Bad arguments are the only errors that stop the bridge before its loop
//! starts; everything after that degrades instead of aborting.

use std::time::Duration;

use thiserror::Error;

/// Where the MamuLEDs patch listens by default.
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 17780;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("help requested")]
    Help,

    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("{0} needs a value")]
    MissingValue(&'static str),

    #[error("invalid port {0:?} (expected 1-65535)")]
    InvalidPort(String),

    #[error("invalid {flag} value {value:?}")]
    InvalidNumber { flag: &'static str, value: String },

    #[error("host name is empty")]
    EmptyHost,
}

// ════════════════════════════════════════════════════════════════════════════
// Options
// ════════════════════════════════════════════════════════════════════════════

/// Whether the sensor keeps sending frames while this app is unfocused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingPolicy {
    Foreground,
    /// `--bg`: always-on tracking.
    Background,
}

/// Where frames come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// The LeapMotion service (needs the `leap` feature).
    Leap,
    /// Synthetic hands, no hardware.
    Simulated,
}

impl SourceKind {
    /// Hardware when compiled in, simulation otherwise.
    pub fn default_for_build() -> Self {
        if cfg!(feature = "leap") { SourceKind::Leap } else { SourceKind::Simulated }
    }
}

/// Configuration for one bridge run.
#[derive(Clone, Debug, PartialEq)]
pub struct BridgeConfig {
    pub host:   String,
    pub port:   u16,
    pub policy: TrackingPolicy,
    pub source: SourceKind,
    /// Connection attempts at startup before running disconnected.
    pub connect_attempts:    u32,
    pub connect_retry_delay: Duration,
    /// Frame rate of the simulated source.
    pub sim_rate_hz: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            host:   DEFAULT_HOST.to_string(),
            port:   DEFAULT_PORT,
            policy: TrackingPolicy::Foreground,
            source: SourceKind::default_for_build(),
            connect_attempts:    1,
            connect_retry_delay: Duration::from_secs(1),
            sim_rate_hz: 60,
        }
    }
}

impl BridgeConfig {
    /// `host:port`, as handed to the resolver.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse arguments, program name excluded.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cfg = BridgeConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bg" => cfg.policy = TrackingPolicy::Background,
                "--sim" => cfg.source = SourceKind::Simulated,
                "--host" => {
                    let host = args.next().ok_or(ConfigError::MissingValue("--host"))?;
                    if host.trim().is_empty() {
                        return Err(ConfigError::EmptyHost);
                    }
                    cfg.host = host;
                }
                "--port" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--port"))?;
                    cfg.port = match value.parse::<u16>() {
                        Ok(p) if p > 0 => p,
                        _ => return Err(ConfigError::InvalidPort(value)),
                    };
                }
                "--retries" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--retries"))?;
                    let n = parse_number("--retries", &value)?;
                    cfg.connect_attempts = n.max(1);
                }
                "--rate" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--rate"))?;
                    let hz = parse_number("--rate", &value)?;
                    cfg.sim_rate_hz = hz.clamp(1, 1000);
                }
                "-h" | "--help" => return Err(ConfigError::Help),
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }

        Ok(cfg)
    }
}

fn parse_number(flag: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
        flag,
        value: value.to_string(),
    })
}

/// Usage text for `--help` and argument errors.
pub fn usage() -> String {
    format!(
        "\
USAGE:
    leap_bridge [OPTIONS]

OPTIONS:
    --bg              Track in the background (frames keep coming when unfocused)
    --host <NAME>     Receiver host (default: {host})
    --port <N>        Receiver port (default: {port})
    --retries <N>     Connection attempts at startup (default: 1)
    --sim             Use simulated hands even when built with `leap`
    --rate <HZ>       Simulated frame rate (default: 60)
    -h, --help        Print this help

Stop with Ctrl-C.",
        host = DEFAULT_HOST,
        port = DEFAULT_PORT,
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
