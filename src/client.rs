// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Blocking single-server NTP client.
//!
//! A [`Client`] holds nothing but its configuration (host, port, timeout), so one instance can
//! be reused for every sync and shared between threads. Each query opens its own socket, performs
//! exactly one request/response exchange, and returns a freshly decoded [`NtpResponse`].
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), ntp_clock::NtpError> {
//! let client = ntp_clock::Client::builder()
//!     .host("time.nist.gov")
//!     .timeout(Duration::from_secs(3))
//!     .build();
//!
//! let unix_secs = client.query_time()?;
//! println!("server time: {unix_secs}");
//! # Ok(())
//! # }
//! ```

use log::debug;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use crate::error::{ConfigError, NtpError, TimeoutError};
use crate::{NtpResponse, pack_request, protocol, unpack_response};

/// Server queried when no host is configured.
pub const DEFAULT_HOST: &str = "0.north-america.pool.ntp.org";

/// Port queried when no port is configured.
pub const DEFAULT_PORT: u16 = protocol::PORT;

/// How long to wait for a reply when no timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest datagram read while waiting for the reply. Anything longer is truncated and then
/// rejected by the length check.
pub const RECV_BUFFER_BYTES: usize = 256;

/// Builder for configuring and creating a [`Client`].
#[derive(Clone, Debug)]
pub struct ClientBuilder {
    host: String,
    port: u16,
    timeout: Duration,
}

impl ClientBuilder {
    fn new() -> Self {
        ClientBuilder {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the server host name or IPv4 address (default: `0.north-america.pool.ntp.org`).
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server UDP port (default: 123).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set how long a query waits for the reply (default: 5 seconds).
    ///
    /// A zero timeout makes every query fail with a timeout error without waiting.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client. No network activity happens until the first query.
    pub fn build(self) -> Client {
        Client {
            host: self.host,
            port: self.port,
            timeout: self.timeout,
        }
    }
}

/// A one-shot NTP client bound to a single configured server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Client {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        ClientBuilder::new().build()
    }
}

impl Client {
    /// A client for the default pool server on port 123 with a 5 second timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The configured server host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The configured server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The configured reply timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Query the server and return its transmit timestamp in whole seconds since the Unix epoch.
    ///
    /// The value is the time the server sent its reply, so it is already slightly stale on
    /// arrival. No timezone or other offset is applied.
    ///
    /// # Errors
    ///
    /// See [`Client::query`].
    pub fn query_time(&self) -> Result<i64, NtpError> {
        Ok(self.query()?.transmit_timestamp)
    }

    /// Perform one request/response exchange and return the decoded reply.
    ///
    /// # Errors
    ///
    /// Network-kind errors (see [`NtpError::failure_kind`]):
    /// - the host does not resolve, or resolves to no IPv4 address
    /// - the local socket cannot be bound, or the send/receive fails
    /// - no datagram from the resolved address arrives within the timeout
    ///
    /// Data-kind errors:
    /// - the reply from the server is not exactly 48 bytes
    pub fn query(&self) -> Result<NtpResponse, NtpError> {
        let target_addr = self.resolve()?;
        let send_buf = pack_request(0)?;

        // The socket is closed when it drops, on every path out of this function.
        let sock = UdpSocket::bind(crate::bind_addr_for(&target_addr))?;
        let sz = sock.send_to(&send_buf, target_addr)?;
        debug!("{:?}", sock.local_addr());
        debug!("sent: {} bytes to {}", sz, target_addr);

        let mut recv_buf = [0u8; RECV_BUFFER_BYTES];
        let recv_len = recv_from_source(&sock, target_addr, self.timeout, &mut recv_buf)?;
        debug!("recv: {} bytes from {}", recv_len, target_addr);

        unpack_response(&recv_buf[..recv_len])
    }

    /// Resolve `host:port` to the first IPv4 socket address.
    fn resolve(&self) -> Result<SocketAddr, NtpError> {
        let mut addrs = (self.host.as_str(), self.port).to_socket_addrs()?;
        addrs.find(SocketAddr::is_ipv4).ok_or_else(|| {
            ConfigError::NoAddresses {
                address: format!("{}:{}", self.host, self.port),
            }
            .into()
        })
    }
}

/// Wait for a datagram from `expected`, discarding anything from other sources.
///
/// The timeout bounds the whole wait, so a stream of stray datagrams cannot extend it.
fn recv_from_source(
    sock: &UdpSocket,
    expected: SocketAddr,
    timeout: Duration,
    buf: &mut [u8],
) -> Result<usize, NtpError> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(TimeoutError::Recv.into());
        }
        sock.set_read_timeout(Some(remaining))?;

        let (len, src_addr) = match sock.recv_from(buf) {
            Ok(received) => received,
            Err(e) if is_timeout(&e) => return Err(TimeoutError::Recv.into()),
            Err(e) => return Err(e.into()),
        };
        if src_addr == expected {
            return Ok(len);
        }
        debug!(
            "discarding {} bytes from unexpected source {} (expected {})",
            len, src_addr, expected
        );
    }
}

/// Read timeouts surface as `WouldBlock` on Unix and `TimedOut` on Windows.
fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
