// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The `ntp` section of the device `settings.json`.
//!
//! ```json
//! {
//!     "wlan": { "ssid": "...", "key": "..." },
//!     "ntp": { "host": "pool.ntp.org", "offset": -5 }
//! }
//! ```
//!
//! Only the `ntp` object is read. Every key in it is optional, and a document without an `ntp`
//! object yields the defaults.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::client::{Client, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT};
use crate::sync::TimeSync;

/// Default re-sync interval, in seconds.
pub const DEFAULT_INTERVAL_SECS: u32 = 3600;

/// Client and sync settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct NtpSettings {
    /// Server host name or IPv4 address.
    pub host: String,
    /// Server UDP port.
    pub port: u16,
    /// Minimum seconds between re-syncs.
    pub interval: u32,
    /// Whole hours added to the server time before the clock is set.
    pub offset: i32,
    /// Reply timeout, in seconds.
    pub timeout: u64,
}

impl Default for NtpSettings {
    fn default() -> Self {
        NtpSettings {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            interval: DEFAULT_INTERVAL_SECS,
            offset: 0,
            timeout: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Deserialize)]
struct SettingsFile {
    #[serde(default)]
    ntp: NtpSettings,
}

impl NtpSettings {
    /// Parse a whole `settings.json` document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = serde_json::from_str(json)?;
        Ok(file.ntp)
    }

    /// Read and parse `settings.json` from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// A client for the configured server.
    pub fn client(&self) -> Client {
        Client::builder()
            .host(self.host.as_str())
            .port(self.port)
            .timeout(Duration::from_secs(self.timeout))
            .build()
    }

    /// A sync tracker for the configured interval and offset.
    pub fn time_sync(&self) -> TimeSync {
        TimeSync::new(self.interval, self.offset)
    }
}

/// Failure to load settings.
#[derive(Debug)]
pub enum SettingsError {
    /// The file could not be read.
    Io(io::Error),
    /// The file is not valid JSON, or a value has the wrong type.
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "cannot read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_keys_missing() {
        let settings = NtpSettings::from_json(r#"{"ntp": {}}"#).unwrap();
        assert_eq!(settings, NtpSettings::default());
        assert_eq!(settings.host, "0.north-america.pool.ntp.org");
        assert_eq!(settings.port, 123);
        assert_eq!(settings.interval, 3600);
        assert_eq!(settings.offset, 0);
        assert_eq!(settings.timeout, 5);
    }

    #[test]
    fn test_missing_ntp_section() {
        let settings = NtpSettings::from_json("{}").unwrap();
        assert_eq!(settings, NtpSettings::default());
    }

    #[test]
    fn test_full_document() {
        let json = r#"{
            "wlan": {"ssid": "home", "key": "hunter2"},
            "ntp": {"host": "time.nist.gov", "port": 10123, "interval": 600, "offset": -5, "timeout": 2},
            "sht31": {"unit": "C"},
            "app": {"loops": 100, "delay": 5000}
        }"#;
        let settings = NtpSettings::from_json(json).unwrap();
        assert_eq!(settings.host, "time.nist.gov");
        assert_eq!(settings.port, 10123);
        assert_eq!(settings.interval, 600);
        assert_eq!(settings.offset, -5);

        let client = settings.client();
        assert_eq!(client.host(), "time.nist.gov");
        assert_eq!(client.port(), 10123);
        assert_eq!(client.timeout(), Duration::from_secs(2));

        let sync = settings.time_sync();
        assert_eq!(sync.interval_secs(), 600);
        assert_eq!(sync.offset_secs(), -18_000);
    }

    #[test]
    fn test_partial_ntp_section() {
        let settings = NtpSettings::from_json(r#"{"ntp": {"offset": 9}}"#).unwrap();
        assert_eq!(settings.offset, 9);
        assert_eq!(settings.host, DEFAULT_HOST);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            NtpSettings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            NtpSettings::from_json(r#"{"ntp": {"port": "123"}}"#),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = NtpSettings::load("/nonexistent/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
        assert!(err.to_string().starts_with("cannot read settings"));
    }
}
