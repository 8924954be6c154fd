// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Periodic clock synchronization.
//!
//! [`TimeSync`] decides when the device clock is due for a refresh, fetches the time from a
//! [`TimeSource`] (normally a [`Client`](crate::Client)), shifts it by the configured hour
//! offset, and pushes the result into a [`ClockSink`]. Progress is reported to a [`StatusSink`]
//! as short [`SyncStatus`] messages sized for a 16-character display.
//!
//! A failed sync is never fatal: the status reports "Timeout" or "Bad data", the previously
//! set time stays in place, and the next call to [`TimeSync::needs_update`] still asks for a
//! refresh.
//!
//! ```no_run
//! use ntp_clock::calendar::CalendarTime;
//! use ntp_clock::sync::{ClockSink, StatusSink, SyncStatus, TimeSync};
//!
//! struct Rtc;
//! impl ClockSink for Rtc {
//!     fn set_time(&mut self, _unix_secs: i64, calendar: &CalendarTime) {
//!         println!("rtc <- {:?}", calendar.to_rtc_tuple());
//!     }
//! }
//!
//! struct Console;
//! impl StatusSink for Console {
//!     fn show(&mut self, status: SyncStatus) {
//!         println!("{status}");
//!     }
//! }
//!
//! let mut client = ntp_clock::Client::new();
//! let mut sync = TimeSync::new(3600, -5);
//! if sync.needs_update(ntp_clock::unix_time::now_unix_seconds()) {
//!     let _ = sync.update(&mut client, &mut Rtc, &mut Console);
//! }
//! ```

use log::{info, warn};
use std::fmt;

use crate::calendar::CalendarTime;
use crate::error::{FailureKind, NtpError, ProtocolError};
use crate::Client;

/// Seconds in one hour of offset.
const SECS_PER_HOUR: i64 = 3600;

/// Anything that can report the current time in whole Unix seconds.
pub trait TimeSource {
    /// Fetch the current time.
    fn query_time(&mut self) -> Result<i64, NtpError>;
}

impl TimeSource for Client {
    fn query_time(&mut self) -> Result<i64, NtpError> {
        Client::query_time(self)
    }
}

/// The device clock that a successful sync writes into.
pub trait ClockSink {
    /// Set the clock. `unix_secs` already includes the hour offset and `calendar` is its UTC
    /// decomposition.
    fn set_time(&mut self, unix_secs: i64, calendar: &CalendarTime);
}

/// Where sync progress is reported.
pub trait StatusSink {
    /// Show one status message.
    fn show(&mut self, status: SyncStatus);
}

/// Progress of a single sync attempt.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SyncStatus {
    /// A query is about to be sent.
    GettingTime,
    /// The clock was set.
    GotTime,
    /// The query failed; the clock was left alone.
    NoTime(FailureKind),
}

impl SyncStatus {
    /// Main message line.
    pub fn headline(&self) -> &'static str {
        match self {
            SyncStatus::GettingTime => "Getting time...",
            SyncStatus::GotTime => "Got time",
            SyncStatus::NoTime(_) => "No time",
        }
    }

    /// Second line explaining a failure, if any.
    pub fn detail(&self) -> Option<&'static str> {
        match self {
            SyncStatus::NoTime(FailureKind::Network) => Some("Timeout"),
            SyncStatus::NoTime(FailureKind::Data) => Some("Bad data"),
            _ => None,
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{}: {}", self.headline(), detail),
            None => f.write_str(self.headline()),
        }
    }
}

/// Tracks when the clock was last synchronized and performs refreshes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeSync {
    interval_secs: i64,
    offset_hours: i32,
    last_sync: Option<i64>,
}

impl TimeSync {
    /// Refresh at most every `interval_secs` seconds, shifting server time by `offset_hours`.
    pub fn new(interval_secs: u32, offset_hours: i32) -> Self {
        TimeSync {
            interval_secs: i64::from(interval_secs),
            offset_hours,
            last_sync: None,
        }
    }

    /// Minimum time between refreshes, in seconds.
    pub fn interval_secs(&self) -> i64 {
        self.interval_secs
    }

    /// The configured offset in seconds.
    pub fn offset_secs(&self) -> i64 {
        i64::from(self.offset_hours) * SECS_PER_HOUR
    }

    /// Offset-adjusted time written by the last successful sync, if there was one.
    pub fn last_sync(&self) -> Option<i64> {
        self.last_sync
    }

    /// Whether a refresh is due.
    ///
    /// `now` must be read from the clock this object sets, i.e. with the offset already applied.
    /// Always true before the first successful sync.
    pub fn needs_update(&self, now: i64) -> bool {
        match self.last_sync {
            None => true,
            Some(last) => now - last > self.interval_secs,
        }
    }

    /// Query `source`, set `clock`, and report progress to `status`.
    ///
    /// Returns the offset-adjusted time that was written to the clock.
    ///
    /// # Errors
    ///
    /// Returns the source's error unchanged, after reporting it as [`SyncStatus::NoTime`]. Also
    /// fails with a data-kind error if the adjusted time has no calendar representation. In
    /// both cases the clock and [`TimeSync::last_sync`] are left as they were.
    pub fn update<T, C, S>(
        &mut self,
        source: &mut T,
        clock: &mut C,
        status: &mut S,
    ) -> Result<i64, NtpError>
    where
        T: TimeSource + ?Sized,
        C: ClockSink + ?Sized,
        S: StatusSink + ?Sized,
    {
        status.show(SyncStatus::GettingTime);
        match self.fetch(source) {
            Ok((unix_secs, calendar)) => {
                clock.set_time(unix_secs, &calendar);
                self.last_sync = Some(unix_secs);
                info!("clock set to {} ({})", calendar, unix_secs);
                status.show(SyncStatus::GotTime);
                Ok(unix_secs)
            }
            Err(e) => {
                warn!("time sync failed: {}", e);
                status.show(SyncStatus::NoTime(e.failure_kind()));
                Err(e)
            }
        }
    }

    fn fetch<T>(&self, source: &mut T) -> Result<(i64, CalendarTime), NtpError>
    where
        T: TimeSource + ?Sized,
    {
        let server_secs = source.query_time()?;
        let unix_secs = server_secs.saturating_add(self.offset_secs());
        let calendar = CalendarTime::from_unix(unix_secs).ok_or(ProtocolError::TimeOutOfRange {
            unix_seconds: unix_secs,
        })?;
        Ok((unix_secs, calendar))
    }
}
