// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use ntp_clock::protocol::{
    ConstPackedSizeBytes, LeapIndicator, Mode, Packet, ReadBytes, ReferenceId, ShortFormat,
    Stratum, TimestampFormat, Version, WriteBytes,
};
use ntp_clock::unix_time::EPOCH_DELTA;
use ntp_clock::{pack_request, unpack_response};

const CDMA_REPLY: [u8; 48] = [
    20, 1, 3, 240, 0, 0, 0, 0, 0, 0, 0, 24, 67, 68, 77, 65, 215, 188, 128, 105, 198, 169, 46, 99,
    215, 187, 177, 194, 159, 47, 120, 0, 215, 188, 128, 113, 45, 236, 230, 45, 215, 188, 128, 113,
    46, 35, 158, 108,
];

fn cdma_packet() -> Packet {
    Packet {
        leap_indicator: LeapIndicator::NoWarning,
        version: Version::V2,
        mode: Mode::Server,
        stratum: Stratum::PRIMARY,
        poll: 3,
        precision: -16,
        root_delay: ShortFormat {
            seconds: 0,
            fraction: 0,
        },
        root_dispersion: ShortFormat {
            seconds: 0,
            fraction: 24,
        },
        reference_id: *b"CDMA",
        reference_timestamp: TimestampFormat {
            seconds: 3619455081,
            fraction: 3332976227,
        },
        origin_timestamp: TimestampFormat {
            seconds: 3619402178,
            fraction: 2670688256,
        },
        receive_timestamp: TimestampFormat {
            seconds: 3619455089,
            fraction: 770500141,
        },
        transmit_timestamp: TimestampFormat {
            seconds: 3619455089,
            fraction: 774086252,
        },
    }
}

#[test]
fn packet_from_bytes() {
    let packet = (&CDMA_REPLY[..]).read_bytes::<Packet>().unwrap();
    assert_eq!(cdma_packet(), packet);
}

#[test]
fn packet_to_bytes() {
    let mut bytes = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut bytes[..]).write_bytes(cdma_packet()).unwrap();
    assert_eq!(&bytes[..], &CDMA_REPLY[..]);
}

#[test]
fn unpack_response_fields() {
    let response = unpack_response(&CDMA_REPLY).unwrap();
    assert_eq!(response.leap_indicator, LeapIndicator::NoWarning);
    assert_eq!(response.version, Version::V2);
    assert_eq!(response.mode, Mode::Server);
    assert_eq!(response.stratum, Stratum::PRIMARY);
    assert_eq!(response.poll, 3);
    assert_eq!(response.precision, -16);
    assert_eq!(response.root_dispersion.fraction, 24);
    assert_eq!(response.reference_id, ReferenceId::ClockSource(*b"CDMA"));
    assert_eq!(response.reference_id.to_string(), "CDMA");
    assert_eq!(response.reference_timestamp, 1410466281);
    assert_eq!(response.origin_timestamp, 1410413378);
    assert_eq!(response.receive_timestamp, 1410466289);
    assert_eq!(response.transmit_timestamp, 1410466289);
    assert_eq!(response.packet, cdma_packet());
}

/// Helper: a 48-byte server reply with the given stratum and reference id bytes.
fn make_test_packet(stratum: u8, ref_id: [u8; 4]) -> [u8; 48] {
    let mut buf = CDMA_REPLY;
    // LI=0, VN=3, Mode=4 (Server) => 0b00_011_100
    buf[0] = 0x1C;
    buf[1] = stratum;
    buf[12..16].copy_from_slice(&ref_id);
    buf
}

#[test]
fn stratum_1_ascii_tag_trims_nul() {
    let response = unpack_response(&make_test_packet(1, *b"GPS\0")).unwrap();
    assert_eq!(response.reference_id.to_string(), "GPS");

    let response = unpack_response(&make_test_packet(1, *b"LOCL")).unwrap();
    assert_eq!(response.reference_id.to_string(), "LOCL");
}

#[test]
fn stratum_0_kiss_code_is_ascii() {
    let response = unpack_response(&make_test_packet(0, *b"RATE")).unwrap();
    assert_eq!(response.stratum, Stratum::UNSPECIFIED);
    assert_eq!(response.reference_id, ReferenceId::ClockSource(*b"RATE"));
    assert_eq!(response.reference_id.to_string(), "RATE");
}

#[test]
fn secondary_stratum_is_ipv4() {
    for stratum in [2, 3, 15] {
        let response = unpack_response(&make_test_packet(stratum, [192, 168, 1, 1])).unwrap();
        assert_eq!(
            response.reference_id,
            ReferenceId::Address(Ipv4Addr::new(192, 168, 1, 1))
        );
        assert_eq!(response.reference_id.to_string(), "192.168.1.1");
    }
}

#[test]
fn unsynchronized_and_reserved_strata_are_invalid() {
    for stratum in [16, 17, 200, 255] {
        let response = unpack_response(&make_test_packet(stratum, *b"LOCL")).unwrap();
        assert_eq!(response.reference_id, ReferenceId::Invalid);
        assert_eq!(response.reference_id.to_string(), "INVALID");
    }
}

#[test]
fn unsynchronized_header_byte() {
    let mut input = CDMA_REPLY;
    input[0] = 0xDC;
    let response = unpack_response(&input).unwrap();
    assert_eq!(response.leap_indicator, LeapIndicator::Unknown);
    assert_eq!(response.version, Version::V3);
    assert_eq!(response.mode, Mode::Server);
}

#[test]
fn request_layout() {
    let request = pack_request(0).unwrap();
    assert_eq!(request.len(), Packet::PACKED_SIZE_BYTES);
    assert_eq!(request[0], 0x1B);

    let packet = (&request[..]).read_bytes::<Packet>().unwrap();
    assert_eq!(packet.leap_indicator, LeapIndicator::NoWarning);
    assert_eq!(packet.version, Version::V3);
    assert_eq!(packet.mode, Mode::Client);
    assert_eq!(packet.origin_timestamp.seconds, EPOCH_DELTA as u32);
    assert_eq!(packet.origin_timestamp.fraction, 0);
    assert_eq!(packet.transmit_timestamp, TimestampFormat::default());
}

#[test]
fn request_origin_seconds() {
    let request = pack_request(1_700_000_000).unwrap();
    let packet = (&request[..]).read_bytes::<Packet>().unwrap();
    assert_eq!(packet.origin_timestamp.seconds, 3_908_988_800);
    assert_eq!(packet.origin_timestamp.to_unix_seconds(), 1_700_000_000);
}

#[test]
fn request_origin_bounds() {
    assert!(pack_request(-EPOCH_DELTA).is_ok());
    assert!(pack_request(u32::MAX as i64 - EPOCH_DELTA).is_ok());

    assert!(pack_request(-EPOCH_DELTA - 1).unwrap_err().is_data());
    assert!(pack_request(u32::MAX as i64 - EPOCH_DELTA + 1)
        .unwrap_err()
        .is_data());
}

#[test]
fn response_must_be_48_bytes() {
    assert!(unpack_response(&CDMA_REPLY[..47]).unwrap_err().is_data());
    let mut long = CDMA_REPLY.to_vec();
    long.push(0);
    assert!(unpack_response(&long).unwrap_err().is_data());
    assert!(unpack_response(&[]).unwrap_err().is_data());
}

#[test]
fn epoch_conversions() {
    assert_eq!(
        TimestampFormat {
            seconds: 2_208_988_800,
            fraction: 0
        }
        .to_unix_seconds(),
        0
    );
    assert_eq!(TimestampFormat::default().to_unix_seconds(), -2_208_988_800);
    assert_eq!(
        TimestampFormat {
            seconds: 3_913_056_000,
            fraction: u32::MAX
        }
        .to_unix_seconds(),
        1_704_067_200
    );
}
