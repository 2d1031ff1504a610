// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use ntpset::error::ParseError;
use ntpset::protocol::{
    decode_transmit_timestamp, encode_request, ConstPackedSizeBytes, LeapIndicator, Mode, Packet,
    ReadBytes, ReferenceId, ShortFormat, Stratum, TimestampFormat, Version, WriteBytes,
};

// A captured v2 server reply from a CDMA-disciplined stratum-1 source.
const SAMPLE_BYTES: [u8; 48] = [
    20, 1, 3, 240, 0, 0, 0, 0, 0, 0, 0, 24, 67, 68, 77, 65, 215, 188, 128, 105, 198, 169, 46, 99,
    215, 187, 177, 194, 159, 47, 120, 0, 215, 188, 128, 113, 45, 236, 230, 45, 215, 188, 128, 113,
    46, 35, 158, 108,
];

fn sample_packet() -> Packet {
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
        reference_id: ReferenceId(*b"CDMA"),
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
fn test_packet_from_bytes() {
    let packet = (&SAMPLE_BYTES[..]).read_bytes::<Packet>().unwrap();
    assert_eq!(packet, sample_packet());

    // The offset-based extraction agrees with the full decode.
    let ts = decode_transmit_timestamp(&SAMPLE_BYTES).unwrap();
    assert_eq!(ts, packet.transmit_timestamp);
}

#[test]
fn test_packet_to_bytes() {
    let mut bytes = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut bytes[..]).write_bytes(sample_packet()).unwrap();
    assert_eq!(&bytes[..], &SAMPLE_BYTES[..]);
}

#[test]
fn test_request_image() {
    let bytes = encode_request().unwrap();
    assert_eq!(bytes.len(), Packet::PACKED_SIZE_BYTES);
    // LI=0, VN=4, Mode=3 packs to 0b00_100_011.
    assert_eq!(bytes[0], 0x23);
    assert!(bytes[1..].iter().all(|&b| b == 0));

    // The request is deterministic.
    assert_eq!(encode_request().unwrap(), bytes);
}

#[test]
fn test_client_request_fields() {
    let packet = Packet::client_request();
    assert_eq!(packet.leap_indicator, LeapIndicator::NoWarning);
    assert_eq!(packet.version, Version::V4);
    assert_eq!(packet.mode, Mode::Client);
    assert_eq!(packet.stratum, Stratum::UNSPECIFIED);
    assert_eq!(packet.transmit_timestamp, TimestampFormat::default());
}

#[test]
fn test_decode_transmit_timestamp() {
    let mut buf = [0u8; 48];
    buf[40..44].copy_from_slice(&0xD7BC_8071u32.to_be_bytes());
    buf[44..48].copy_from_slice(&0x2E23_9E6Cu32.to_be_bytes());

    let ts = decode_transmit_timestamp(&buf).unwrap();
    assert_eq!(ts.seconds, 0xD7BC_8071);
    assert_eq!(ts.fraction, 0x2E23_9E6C);
}

#[test]
fn test_decode_rejects_short_buffers() {
    for len in [0usize, 1, 47] {
        let buf = vec![0u8; len];
        let err = decode_transmit_timestamp(&buf).unwrap_err();
        assert_eq!(
            err,
            ParseError::PacketTooShort {
                needed: 48,
                available: len,
            }
        );
    }
}

#[test]
fn test_decode_ignores_header_fields() {
    // Only bytes 40..48 matter to the outcome; the rest can hold anything.
    let mut buf = [0xFFu8; 48];
    buf[40..44].copy_from_slice(&3_910_377_600u32.to_be_bytes());
    buf[44..48].copy_from_slice(&0u32.to_be_bytes());

    let ts = decode_transmit_timestamp(&buf).unwrap();
    assert_eq!(ts.seconds, 3_910_377_600);
    assert_eq!(ts.fraction, 0);
}

#[test]
fn test_decode_accepts_trailing_bytes() {
    // Replies may carry extension fields past the 48-byte header.
    let mut buf = [0u8; 60];
    buf[40..44].copy_from_slice(&1u32.to_be_bytes());
    buf[44..48].copy_from_slice(&2u32.to_be_bytes());
    buf[48..].fill(0xAB);

    let ts = decode_transmit_timestamp(&buf).unwrap();
    assert_eq!(
        ts,
        TimestampFormat {
            seconds: 1,
            fraction: 2,
        }
    );
}

#[test]
fn test_packet_round_trip() {
    let input = Packet {
        leap_indicator: LeapIndicator::AddOne,
        version: Version::V3,
        mode: Mode::Server,
        stratum: Stratum::PRIMARY,
        poll: 6,
        precision: -20,
        root_delay: ShortFormat {
            seconds: 0,
            fraction: 291,
        },
        root_dispersion: ShortFormat {
            seconds: 1,
            fraction: 1000,
        },
        reference_id: ReferenceId(*b"GPS\0"),
        reference_timestamp: TimestampFormat {
            seconds: 3_910_377_000,
            fraction: 1,
        },
        origin_timestamp: TimestampFormat {
            seconds: 3_910_377_100,
            fraction: 2,
        },
        receive_timestamp: TimestampFormat {
            seconds: 3_910_377_200,
            fraction: 3,
        },
        transmit_timestamp: TimestampFormat {
            seconds: 3_910_377_300,
            fraction: 4,
        },
    };

    let mut bytes = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut bytes[..]).write_bytes(input).unwrap();
    let decoded = (&bytes[..]).read_bytes::<Packet>().unwrap();
    assert_eq!(decoded, input);

    // The transmit timestamp lands where decode_transmit_timestamp looks.
    let ts = decode_transmit_timestamp(&bytes).unwrap();
    assert_eq!(ts, input.transmit_timestamp);
}

#[test]
fn test_packed_header_byte() {
    let mut packet = Packet::client_request();
    packet.leap_indicator = LeapIndicator::Unknown;
    packet.version = Version::V3;
    packet.mode = Mode::Broadcast;

    let mut bytes = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut bytes[..]).write_bytes(packet).unwrap();
    // LI=3, VN=3, Mode=5 packs to 0b11_011_101.
    assert_eq!(bytes[0], 0xDD);
}

#[test]
fn test_reference_id_display() {
    assert_eq!(ReferenceId(*b"GPS\0").to_string(), "GPS");
    assert_eq!(ReferenceId([192, 168, 1, 1]).to_string(), "192.168.1.1");
}
