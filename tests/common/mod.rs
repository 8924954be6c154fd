// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests: loopback NTP servers that misbehave on demand.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but not every file uses every helper.
#![allow(dead_code, unreachable_pub)]

use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use ntp_clock::protocol::{
    ConstPackedSizeBytes, LeapIndicator, Mode, Packet, ShortFormat, Stratum, TimestampFormat,
    Version, WriteBytes,
};

/// How long a mock server waits for the client's request before giving up.
const SERVER_WAIT: Duration = Duration::from_secs(5);

/// A well-formed stratum 2 server reply whose transmit time is `transmit_unix`.
pub fn server_packet(transmit_unix: i64) -> [u8; Packet::PACKED_SIZE_BYTES] {
    let transmit = TimestampFormat::from_unix_seconds(transmit_unix).unwrap();
    let packet = Packet {
        leap_indicator: LeapIndicator::NoWarning,
        version: Version::V3,
        mode: Mode::Server,
        stratum: Stratum(2),
        poll: 6,
        precision: -20,
        root_delay: ShortFormat {
            seconds: 0,
            fraction: 512,
        },
        root_dispersion: ShortFormat {
            seconds: 0,
            fraction: 1024,
        },
        reference_id: [192, 168, 1, 1],
        reference_timestamp: TimestampFormat {
            seconds: transmit.seconds - 30,
            fraction: 0,
        },
        origin_timestamp: TimestampFormat::default(),
        receive_timestamp: transmit,
        transmit_timestamp: transmit,
    };
    let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut buf[..]).write_bytes(packet).unwrap();
    buf
}

fn bind_loopback() -> UdpSocket {
    let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
    sock.set_read_timeout(Some(SERVER_WAIT)).unwrap();
    sock
}

/// A server that answers the first request with `reply` and returns the request it received.
pub fn spawn_responder(reply: Vec<u8>) -> (SocketAddr, JoinHandle<Vec<u8>>) {
    let sock = bind_loopback();
    let addr = sock.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut buf = [0u8; 512];
        let (len, client) = sock.recv_from(&mut buf).unwrap();
        sock.send_to(&reply, client).unwrap();
        buf[..len].to_vec()
    });
    (addr, handle)
}

/// A bound socket that never answers. Keep it alive for the duration of the test.
pub fn silent_server() -> (SocketAddr, UdpSocket) {
    let sock = bind_loopback();
    let addr = sock.local_addr().unwrap();
    (addr, sock)
}

/// A server that lets `strays` datagrams from a different socket reach the client first, then
/// answers with `reply`.
pub fn spawn_with_intruder(reply: Vec<u8>, strays: usize) -> (SocketAddr, JoinHandle<()>) {
    let sock = bind_loopback();
    let intruder = bind_loopback();
    let addr = sock.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut buf = [0u8; 512];
        let (_, client) = sock.recv_from(&mut buf).unwrap();
        let decoy = server_packet(0);
        for _ in 0..strays {
            intruder.send_to(&decoy, client).unwrap();
        }
        thread::sleep(Duration::from_millis(20));
        sock.send_to(&reply, client).unwrap();
    });
    (addr, handle)
}

/// A server that never answers while a different socket keeps sending to the client every
/// `every` until `for_at_least` has passed.
pub fn spawn_flooded(every: Duration, for_at_least: Duration) -> (SocketAddr, JoinHandle<usize>) {
    let sock = bind_loopback();
    let intruder = bind_loopback();
    let addr = sock.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut buf = [0u8; 512];
        let (_, client) = sock.recv_from(&mut buf).unwrap();
        let decoy = server_packet(0);
        let start = Instant::now();
        let mut sent = 0;
        while start.elapsed() < for_at_least {
            // The client socket may already be closed; later sends can fail.
            if intruder.send_to(&decoy, client).is_ok() {
                sent += 1;
            }
            thread::sleep(every);
        }
        drop(sock);
        sent
    });
    (addr, handle)
}
