// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the NTP client.
//!
//! Failures fall into two families that callers report differently:
//!
//! - **Network** ([`FailureKind::Network`]): name resolution, socket I/O, or no reply from the
//!   server within the timeout. Shown as "Timeout".
//! - **Data** ([`FailureKind::Data`]): a reply that cannot be decoded against the fixed packet
//!   layout. Shown as "Bad data".
//!
//! ```no_run
//! use ntp_clock::{Client, FailureKind};
//!
//! match Client::new().query_time() {
//!     Ok(secs) => println!("unix time: {secs}"),
//!     Err(e) => match e.failure_kind() {
//!         FailureKind::Network => eprintln!("Timeout ({e})"),
//!         FailureKind::Data => eprintln!("Bad data ({e})"),
//!     },
//! }
//! ```
//!
//! [`NtpError`] converts into [`std::io::Error`] for callers that prefer `io::Result`; the
//! original value can be recovered with `get_ref()` and `downcast_ref::<NtpError>()`.

use std::fmt;
use std::io;

/// The two ways a time query can fail, as far as the caller is concerned.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FailureKind {
    /// The server could not be reached or did not answer in time.
    Network,
    /// The server answered with something that is not a valid packet.
    Data,
}

/// Errors that can occur during NTP client operations.
#[derive(Debug)]
pub enum NtpError {
    /// Packet encoding or decoding failure.
    Protocol(ProtocolError),
    /// No reply arrived within the configured timeout.
    Timeout(TimeoutError),
    /// The configured server could not be turned into a usable address.
    Config(ConfigError),
    /// Underlying I/O error (socket bind, send, receive, DNS resolution).
    Io(io::Error),
}

/// NTP packet encoding and decoding errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProtocolError {
    /// Response is not exactly one 48-byte packet.
    ResponseLength {
        /// Number of bytes received.
        received: usize,
    },
    /// Origin timestamp cannot be expressed as 32-bit NTP seconds.
    OriginOutOfRange {
        /// The requested origin, in Unix seconds.
        origin: i64,
    },
    /// Decoded time has no calendar representation.
    TimeOutOfRange {
        /// The offending value, in Unix seconds.
        unix_seconds: i64,
    },
    /// Generic protocol error.
    Other(String),
}

/// Timeout errors for NTP operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TimeoutError {
    /// No datagram from the server arrived before the deadline.
    Recv,
}

/// Configuration errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// Address resolved to no IPv4 socket addresses.
    NoAddresses {
        /// The `host:port` that failed to resolve.
        address: String,
    },
}

impl NtpError {
    /// Which family this error belongs to.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            NtpError::Protocol(_) => FailureKind::Data,
            NtpError::Timeout(_) | NtpError::Config(_) | NtpError::Io(_) => FailureKind::Network,
        }
    }

    /// Shorthand for `failure_kind() == FailureKind::Network`.
    pub fn is_network(&self) -> bool {
        self.failure_kind() == FailureKind::Network
    }

    /// Shorthand for `failure_kind() == FailureKind::Data`.
    pub fn is_data(&self) -> bool {
        self.failure_kind() == FailureKind::Data
    }
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::Data => write!(f, "data"),
        }
    }
}

impl fmt::Display for NtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NtpError::Protocol(e) => write!(f, "NTP protocol error: {e}"),
            NtpError::Timeout(e) => write!(f, "NTP timeout: {e}"),
            NtpError::Config(e) => write!(f, "NTP config error: {e}"),
            NtpError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::ResponseLength { received } => {
                write!(f, "NTP response must be 48 bytes (got {received})")
            }
            ProtocolError::OriginOutOfRange { origin } => {
                write!(f, "origin timestamp {origin} does not fit NTP era 0")
            }
            ProtocolError::TimeOutOfRange { unix_seconds } => {
                write!(f, "time {unix_seconds} has no calendar representation")
            }
            ProtocolError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutError::Recv => write!(f, "NTP recv timed out"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoAddresses { address } => {
                write!(f, "address resolved to no IPv4 socket addresses: {address}")
            }
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for NtpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NtpError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ProtocolError {}
impl std::error::Error for TimeoutError {}
impl std::error::Error for ConfigError {}

// ── From conversions ────────────────────────────────────────────────

impl From<NtpError> for io::Error {
    fn from(err: NtpError) -> io::Error {
        let kind = match &err {
            NtpError::Protocol(_) => io::ErrorKind::InvalidData,
            NtpError::Timeout(_) => io::ErrorKind::TimedOut,
            NtpError::Config(_) => io::ErrorKind::InvalidInput,
            NtpError::Io(e) => e.kind(),
        };
        // Preserve the original io::Error directly for the Io variant.
        if let NtpError::Io(e) = err {
            return e;
        }
        io::Error::new(kind, err)
    }
}

impl From<io::Error> for NtpError {
    fn from(err: io::Error) -> NtpError {
        NtpError::Io(err)
    }
}

impl From<ProtocolError> for NtpError {
    fn from(err: ProtocolError) -> NtpError {
        NtpError::Protocol(err)
    }
}

impl From<TimeoutError> for NtpError {
    fn from(err: TimeoutError) -> NtpError {
        NtpError::Timeout(err)
    }
}

impl From<ConfigError> for NtpError {
    fn from(err: ConfigError) -> NtpError {
        NtpError::Config(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
