// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Breaks whole Unix seconds into calendar fields.
//!
//! The real-time clock on the board is set from a broken-down date rather than a counter, in the
//! field order `(year, month, day, weekday, hour, minute, second, subseconds)`. The conversion is
//! done in UTC; any timezone shift is applied to the seconds beforehand.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use std::fmt;

/// Field layout expected by the real-time clock:
/// `(year, month, day, weekday, hour, minute, second, subseconds)`.
pub type RtcDateTime = (i32, u8, u8, u8, u8, u8, u8, u32);

/// A UTC instant broken into calendar fields, at one-second resolution.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CalendarTime {
    /// Full year, e.g. 2025.
    pub year: i32,
    /// Month, 1-12.
    pub month: u8,
    /// Day of the month, 1-31.
    pub day: u8,
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
    /// Day of the week, 0 = Monday through 6 = Sunday.
    pub weekday: u8,
    /// Day of the year, 1-366.
    pub yearday: u16,
}

impl CalendarTime {
    /// Decompose `secs` seconds since the Unix epoch.
    ///
    /// Returns `None` if the instant is outside the range chrono can represent.
    pub fn from_unix(secs: i64) -> Option<Self> {
        let dt = DateTime::<Utc>::from_timestamp(secs, 0)?;
        Some(CalendarTime {
            year: dt.year(),
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            weekday: dt.weekday().num_days_from_monday() as u8,
            yearday: dt.ordinal() as u16,
        })
    }

    /// Recompose into seconds since the Unix epoch.
    ///
    /// `weekday` and `yearday` are ignored. Returns `None` if the date or time fields are out of
    /// range.
    pub fn to_unix(&self) -> Option<i64> {
        let date = NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))?;
        let dt = date.and_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )?;
        Some(dt.and_utc().timestamp())
    }

    /// The tuple handed to the real-time clock. Subseconds are always zero.
    pub fn to_rtc_tuple(&self) -> RtcDateTime {
        (
            self.year,
            self.month,
            self.day,
            self.weekday,
            self.hour,
            self.minute,
            self.second,
            0,
        )
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}/{:02}/{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
