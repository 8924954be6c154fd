//! Keep a console "clock" in sync using the `ntp` section of a settings file.
//!
//! Run with:
//! ```sh
//! RUST_LOG=info cargo run --example sync_clock -- settings.json
//! ```
//!
//! Without a path the defaults are used. The loop checks once per second whether a re-sync is
//! due, the same way the clock firmware does between display refreshes.

use std::thread;
use std::time::Duration;

use ntp_clock::calendar::CalendarTime;
use ntp_clock::settings::NtpSettings;
use ntp_clock::sync::{ClockSink, StatusSink, SyncStatus};
use ntp_clock::unix_time;

/// A software clock: the last time it was set plus the host time elapsed since.
struct SoftClock {
    offset: i64,
}

impl SoftClock {
    fn now(&self) -> i64 {
        unix_time::now_unix_seconds() + self.offset
    }
}

impl ClockSink for SoftClock {
    fn set_time(&mut self, unix_secs: i64, calendar: &CalendarTime) {
        self.offset = unix_secs - unix_time::now_unix_seconds();
        println!("RTC <- {:?}", calendar.to_rtc_tuple());
    }
}

struct Console;

impl StatusSink for Console {
    fn show(&mut self, status: SyncStatus) {
        match status.detail() {
            Some(detail) => println!("[{:<16}]\n[{:<16}]", status.headline(), detail),
            None => println!("[{:<16}]", status.headline()),
        }
    }
}

fn main() {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match NtpSettings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => NtpSettings::default(),
    };

    let mut client = settings.client();
    let mut sync = settings.time_sync();
    let mut clock = SoftClock { offset: 0 };
    let mut status = Console;

    for _ in 0..10 {
        if sync.needs_update(clock.now()) {
            // Failures are already reported on the console; keep showing the old time.
            let _ = sync.update(&mut client, &mut clock, &mut status);
        }
        if let Some(cal) = CalendarTime::from_unix(clock.now()) {
            println!("{cal}");
        }
        thread::sleep(Duration::from_secs(1));
    }
}
