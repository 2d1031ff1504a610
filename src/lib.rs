// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
One-shot NTP client that reads the time from a server and sets the local
system clock from it.

The flow is a single request/response exchange: send an NTPv4 client packet,
pull the transmit timestamp out of the reply, convert it to civil time in the
host's local timezone, and hand that reading to a clock sink.

# Example

```rust,no_run
use ntpset::clock::SystemClock;

fn main() -> Result<(), ntpset::error::SyncError> {
    let addr = ntpset::resolve_ipv4("pool.ntp.org")?;
    let time = ntpset::sync_clock(addr, &mut SystemClock)?;
    println!("clock set to {}", time);
    Ok(())
}
```

Setting the clock requires elevated privileges (root/admin); [`query`] on its
own does not.
*/

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod civil;
pub mod clock;
pub mod error;
pub mod protocol;

use log::{debug, log_enabled, Level};
use std::io;
use std::net::{SocketAddr, SocketAddrV4, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use crate::civil::CivilTime;
use crate::clock::ClockSink;
use crate::error::SyncError;
use crate::protocol::{ConstPackedSizeBytes, ReadBytes, TimestampFormat};

/// Timeout applied to the exchange when the caller does not supply one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve a server name to an IPv4 address on the NTP port.
///
/// When the name resolves to several addresses the first IPv4 one wins;
/// IPv6 addresses are skipped.
///
/// # Errors
///
/// Returns [`SyncError::NoAddress`] if resolution fails outright or yields
/// no IPv4 address.
pub fn resolve_ipv4(host: &str) -> Result<SocketAddrV4, SyncError> {
    let addrs = (host, protocol::PORT)
        .to_socket_addrs()
        .map_err(|e| SyncError::NoAddress {
            host: host.to_string(),
            source: Some(e),
        })?;

    for addr in addrs {
        match addr {
            SocketAddr::V4(v4) => {
                debug!("{} resolved to {}", host, v4.ip());
                return Ok(v4);
            }
            SocketAddr::V6(v6) => {
                debug!("skipping IPv6 address {} for {}", v6.ip(), host);
            }
        }
    }

    Err(SyncError::NoAddress {
        host: host.to_string(),
        source: None,
    })
}

/// Ask a server for its current time, with the default timeout.
///
/// This is a convenience wrapper around [`query_with_timeout`] using
/// [`DEFAULT_TIMEOUT`].
pub fn query(addr: SocketAddrV4) -> Result<TimestampFormat, SyncError> {
    query_with_timeout(addr, DEFAULT_TIMEOUT)
}

/// Ask a server for its current time.
///
/// Sends a single NTPv4 client-mode packet to `addr` and returns the
/// transmit timestamp from the reply. The reply's other header fields do not
/// affect the outcome; with debug logging enabled they are decoded and
/// logged for diagnosis.
///
/// # Errors
///
/// Returns [`SyncError::Timeout`] if no reply arrives within `timeout`, and
/// [`SyncError::Malformed`] if the reply is shorter than a full NTP header.
/// Socket failures map to the [`SyncError`] variant naming the step that
/// failed.
pub fn query_with_timeout(
    addr: SocketAddrV4,
    timeout: Duration,
) -> Result<TimestampFormat, SyncError> {
    let sock = UdpSocket::bind("0.0.0.0:0").map_err(SyncError::SocketSetup)?;
    sock.set_read_timeout(Some(timeout))
        .map_err(SyncError::SocketSetup)?;
    sock.set_write_timeout(Some(timeout))
        .map_err(SyncError::SocketSetup)?;
    sock.connect(addr).map_err(SyncError::Connect)?;
    debug!("{:?}", sock.local_addr());

    let send_buf = protocol::encode_request().map_err(SyncError::Send)?;
    let sz = sock.send(&send_buf).map_err(SyncError::Send)?;
    debug!("sent: {} bytes to {}", sz, addr);

    // Receive into a larger buffer; replies may carry extension fields.
    let mut recv_buf = [0u8; 1024];
    let recv_len = sock.recv(&mut recv_buf[..]).map_err(|e| match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => SyncError::Timeout,
        _ => SyncError::Recv(e),
    })?;
    debug!("recv: {} bytes", recv_len);

    let transmit = protocol::decode_transmit_timestamp(&recv_buf[..recv_len])?;
    if log_enabled!(Level::Debug) {
        log_response_details(&recv_buf[..recv_len]);
    }
    debug!("server transmit timestamp: {:?}", transmit);

    Ok(transmit)
}

/// Decode the full response header and log what the server said about
/// itself. Purely diagnostic; the sync flow only needs the transmit
/// timestamp. The caller has already length-checked the buffer.
fn log_response_details(buf: &[u8]) {
    let packet: protocol::Packet =
        match (&buf[..protocol::Packet::PACKED_SIZE_BYTES]).read_bytes() {
            Ok(packet) => packet,
            Err(e) => {
                debug!("response header did not decode: {}", e);
                return;
            }
        };

    debug!(
        "response header: leap {:?}, version {:?}, mode {:?}, stratum {}",
        packet.leap_indicator, packet.version, packet.mode, packet.stratum.0
    );
    debug!("reference id: {}", packet.reference_id);

    if !packet.version.is_known() {
        debug!("server sent an unrecognized protocol version");
    }
    if packet.leap_indicator == protocol::LeapIndicator::Unknown
        || packet.stratum == protocol::Stratum::UNSPECIFIED
        || packet.stratum >= protocol::Stratum::UNSYNCHRONIZED
    {
        debug!("server does not claim a synchronized clock");
    }
}

/// Query a server and set the clock from its reply, with the default timeout.
///
/// This is a convenience wrapper around [`sync_clock_with_timeout`] using
/// [`DEFAULT_TIMEOUT`].
pub fn sync_clock<S: ClockSink>(addr: SocketAddrV4, sink: &mut S) -> Result<CivilTime, SyncError> {
    sync_clock_with_timeout(addr, DEFAULT_TIMEOUT, sink)
}

/// Query a server and set the clock from its reply.
///
/// The server's transmit timestamp is converted to civil time in the host's
/// local timezone and handed to `sink` in a single call. The sink is not
/// touched unless the exchange and the conversion both succeed, so a failed
/// run leaves the clock alone. Returns the civil time the sink was given.
///
/// # Errors
///
/// Any [`SyncError`] from [`query_with_timeout`], plus
/// [`SyncError::TimeOutOfRange`] if the timestamp cannot be expressed as a
/// date and [`SyncError::Clock`] if the sink rejects the reading.
pub fn sync_clock_with_timeout<S: ClockSink>(
    addr: SocketAddrV4,
    timeout: Duration,
    sink: &mut S,
) -> Result<CivilTime, SyncError> {
    let transmit = query_with_timeout(addr, timeout)?;

    let time = civil::from_timestamp_local(transmit).ok_or(SyncError::TimeOutOfRange)?;
    debug!("server time in the local zone: {}", time);
    debug!(
        "decomposed: day {:02}, month {:02}, year {}, century {}, time {:06}",
        time.day,
        time.month,
        time.year,
        time.century(),
        time.hhmmss()
    );

    sink.set_clock(&time)?;
    Ok(time)
}

#[cfg(test)]
#[test]
#[ignore] // Requires network access.
fn test_query_pool_ntp_org() {
    let addr = resolve_ipv4("pool.ntp.org").unwrap();
    let transmit = query(addr).unwrap();
    assert!(transmit.seconds > 0);
}
