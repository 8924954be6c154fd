//! How to query an NTP server once and print the decoded reply.
//!
//! Run with:
//! ```sh
//! RUST_LOG=debug cargo run --example request -- time.nist.gov
//! ```

use chrono::TimeZone;

fn local_time(unix_secs: i64) -> String {
    match chrono::Local.timestamp_opt(unix_secs, 0).single() {
        Some(t) => t.to_string(),
        None => format!("{unix_secs} (out of range)"),
    }
}

fn main() {
    env_logger::init();

    let host = std::env::args()
        .nth(1)
        .unwrap_or_else(|| ntp_clock::client::DEFAULT_HOST.to_string());
    let client = ntp_clock::Client::builder().host(host.as_str()).build();

    println!("Requesting time from {}:{}...\n", client.host(), client.port());

    let result = match client.query() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} error: {}", e.failure_kind(), e);
            std::process::exit(1);
        }
    };

    println!("Header:");
    println!("  leap indicator: {:?}", result.leap_indicator);
    println!("  version:        {}", result.version.value());
    println!("  mode:           {:?}", result.mode);
    println!("  stratum:        {}", result.stratum.0);
    println!("  poll:           {}", result.poll);
    println!("  precision:      {}", result.precision);
    println!("  reference id:   {}", result.reference_id);
    println!("\nTimestamps in local time:");
    println!("  reference: {}", local_time(result.reference_timestamp));
    println!("  origin:    {}", local_time(result.origin_timestamp));
    println!("  receive:   {}", local_time(result.receive_timestamp));
    println!("  transmit:  {}", local_time(result.transmit_timestamp));
}
