// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Whole-second conversions between the NTP prime epoch and the Unix epoch.

use std::time;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

/// Convert the seconds half of an NTP timestamp to seconds since the Unix epoch.
///
/// No era disambiguation is applied: the value is read as era 0, so anything before
/// 1970-01-01 comes back negative.
pub fn ntp_to_unix_seconds(ntp_seconds: u32) -> i64 {
    i64::from(ntp_seconds) - EPOCH_DELTA
}

/// Convert seconds since the Unix epoch to the seconds half of an NTP timestamp.
///
/// Returns `None` if the result does not fit in 32 bits.
pub fn unix_to_ntp_seconds(unix_seconds: i64) -> Option<u32> {
    let ntp_seconds = unix_seconds.checked_add(EPOCH_DELTA)?;
    u32::try_from(ntp_seconds).ok()
}

/// The current system time in whole seconds since the Unix epoch.
///
/// Times before the epoch come back negative.
pub fn now_unix_seconds() -> i64 {
    match time::SystemTime::now().duration_since(time::UNIX_EPOCH) {
        Ok(duration) => duration.as_secs() as i64,
        Err(sys_time_err) => -(sys_time_err.duration().as_secs() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_delta_maps_to_zero() {
        assert_eq!(ntp_to_unix_seconds(2_208_988_800), 0);
        assert_eq!(ntp_to_unix_seconds(2_208_988_800 + 1_700_000_000), 1_700_000_000);
    }

    #[test]
    fn zero_ntp_seconds_is_negative() {
        assert_eq!(ntp_to_unix_seconds(0), -EPOCH_DELTA);
    }

    #[test]
    fn unix_to_ntp_bounds() {
        assert_eq!(unix_to_ntp_seconds(-EPOCH_DELTA), Some(0));
        assert_eq!(unix_to_ntp_seconds(-EPOCH_DELTA - 1), None);
        let last = i64::from(u32::MAX) - EPOCH_DELTA;
        assert_eq!(unix_to_ntp_seconds(last), Some(u32::MAX));
        assert_eq!(unix_to_ntp_seconds(last + 1), None);
        assert_eq!(unix_to_ntp_seconds(i64::MAX), None);
    }

    #[test]
    fn now_is_after_2020() {
        assert!(now_unix_seconds() > 1_577_836_800);
    }
}
