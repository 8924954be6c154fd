// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
NTPv3 client and clock synchronization for a small networked LCD clock.

The crate speaks the fixed 48-byte NTP packet format against a single configured server and
hands back the server's transmit time as whole seconds since the Unix epoch. Around that core
sit the pieces the clock firmware needs: a calendar decomposition for the real-time clock, a
sync orchestrator that decides when to re-query and what status to show, and a loader for the
`ntp` section of the device `settings.json`.

# Example

```rust,no_run
use chrono::TimeZone;

fn main() -> Result<(), ntp_clock::NtpError> {
    let client = ntp_clock::Client::builder().host("pool.ntp.org").build();
    let response = client.query()?;
    println!("stratum {} via {}", response.stratum.0, response.reference_id);

    let local_time = chrono::Local.timestamp_opt(response.transmit_timestamp, 0).unwrap();
    println!("{}", local_time);
    Ok(())
}
```
*/

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Calendar decomposition of Unix seconds for the real-time clock.
pub mod calendar;
/// Blocking single-server NTP client.
pub mod client;
/// Error types and the network/data failure taxonomy.
pub mod error;
pub mod protocol;
/// Loading client and sync settings from the device `settings.json`.
///
/// Enable with the `settings` feature flag (on by default).
#[cfg(feature = "settings")]
pub mod settings;
/// Periodic clock synchronization against an NTP time source.
pub mod sync;
/// Whole-second conversions between the NTP and Unix epochs.
pub mod unix_time;

pub use client::{Client, ClientBuilder};
pub use error::{FailureKind, NtpError};

use protocol::{
    ConstPackedSizeBytes, LeapIndicator, Mode, Packet, ReadBytes, ReferenceId, ShortFormat,
    Stratum, TimestampFormat, Version, WriteBytes,
};

use error::ProtocolError;
use std::net::SocketAddr;

/// Select the appropriate bind address based on the target address family.
///
/// Returns `"0.0.0.0:0"` for IPv4 targets and `"[::]:0"` for IPv6 targets.
pub(crate) fn bind_addr_for(target: &SocketAddr) -> &'static str {
    match target {
        SocketAddr::V4(_) => "0.0.0.0:0",
        SocketAddr::V6(_) => "[::]:0",
    }
}

/// A decoded NTP reply.
///
/// Built fresh for every query and never mutated afterwards. All four timestamps are converted
/// to whole seconds since the Unix epoch by dropping the fraction and subtracting
/// [`unix_time::EPOCH_DELTA`]; a zeroed timestamp therefore shows up as `-2208988800`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NtpResponse {
    /// Leap indicator; [`LeapIndicator::Unknown`] means the server is unsynchronized.
    pub leap_indicator: LeapIndicator,
    /// Version number the server answered with.
    pub version: Version,
    /// Association mode of the reply.
    pub mode: Mode,
    /// Stratum of the server.
    pub stratum: Stratum,
    /// Poll exponent, as sent.
    pub poll: i8,
    /// Precision exponent, as sent.
    pub precision: i8,
    /// Root delay, as sent.
    pub root_delay: ShortFormat,
    /// Root dispersion, as sent.
    pub root_dispersion: ShortFormat,
    /// Reference identifier interpreted against the stratum.
    pub reference_id: ReferenceId,
    /// When the server clock was last set, in Unix seconds.
    pub reference_timestamp: i64,
    /// The origin timestamp echoed back, in Unix seconds.
    pub origin_timestamp: i64,
    /// When the request reached the server, in Unix seconds.
    pub receive_timestamp: i64,
    /// When the reply left the server, in Unix seconds.
    pub transmit_timestamp: i64,
    /// The packet this response was decoded from.
    pub packet: Packet,
}

impl From<Packet> for NtpResponse {
    fn from(packet: Packet) -> Self {
        NtpResponse {
            leap_indicator: packet.leap_indicator,
            version: packet.version,
            mode: packet.mode,
            stratum: packet.stratum,
            poll: packet.poll,
            precision: packet.precision,
            root_delay: packet.root_delay,
            root_dispersion: packet.root_dispersion,
            reference_id: packet.classified_reference_id(),
            reference_timestamp: packet.reference_timestamp.to_unix_seconds(),
            origin_timestamp: packet.origin_timestamp.to_unix_seconds(),
            receive_timestamp: packet.receive_timestamp.to_unix_seconds(),
            transmit_timestamp: packet.transmit_timestamp.to_unix_seconds(),
            packet,
        }
    }
}

/// Build the 48-byte client request.
///
/// The header is always version 3, client mode, no leap warning (`0x1B`). Every other field is
/// zero except the origin timestamp, whose seconds are `origin_unix_secs` moved to the NTP epoch.
/// Only whole seconds are carried: the origin fraction is always zero.
///
/// # Errors
///
/// Returns a data-kind [`NtpError`] if `origin_unix_secs` falls outside the 32-bit NTP era 0
/// window.
pub fn pack_request(
    origin_unix_secs: i64,
) -> Result<[u8; Packet::PACKED_SIZE_BYTES], NtpError> {
    let origin_timestamp = TimestampFormat::from_unix_seconds(origin_unix_secs).ok_or(
        ProtocolError::OriginOutOfRange {
            origin: origin_unix_secs,
        },
    )?;
    let packet = Packet {
        leap_indicator: LeapIndicator::NoWarning,
        version: Version::V3,
        mode: Mode::Client,
        stratum: Stratum::UNSPECIFIED,
        poll: 0,
        precision: 0,
        root_delay: ShortFormat::default(),
        root_dispersion: ShortFormat::default(),
        reference_id: [0; 4],
        reference_timestamp: TimestampFormat::default(),
        origin_timestamp,
        receive_timestamp: TimestampFormat::default(),
        transmit_timestamp: TimestampFormat::default(),
    };
    let mut send_buf = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut send_buf[..]).write_bytes(packet)?;
    Ok(send_buf)
}

/// Decode a server reply.
///
/// # Errors
///
/// Returns a data-kind [`NtpError`] unless `data` is exactly 48 bytes. Any 48-byte input decodes.
pub fn unpack_response(data: &[u8]) -> Result<NtpResponse, NtpError> {
    if data.len() != Packet::PACKED_SIZE_BYTES {
        return Err(ProtocolError::ResponseLength {
            received: data.len(),
        }
        .into());
    }
    let packet: Packet = (&data[..])
        .read_bytes()
        .map_err(|e| ProtocolError::Other(e.to_string()))?;
    Ok(NtpResponse::from(packet))
}
