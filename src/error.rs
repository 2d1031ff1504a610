// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for packet decoding and the one-shot sync flow.
//!
//! [`ParseError`] covers the byte-level codec. [`SyncError`] covers the whole
//! flow from name resolution through setting the clock; its variants follow
//! the order of the steps themselves, so matching on it tells the caller how
//! far the run got.

use std::fmt;
use std::io;

use crate::clock::ClockError;

// ── Parse errors ────────────────────────────────────────────────────

/// Errors produced when decoding a server datagram.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The datagram is shorter than the fixed 48-byte NTP header.
    PacketTooShort {
        /// Number of bytes required for a full header.
        needed: usize,
        /// Number of bytes actually received.
        available: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::PacketTooShort { needed, available } => {
                write!(f, "packet too short: needed {needed} bytes, got {available}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

// ── Sync flow errors ────────────────────────────────────────────────

/// Errors produced by a one-shot synchronization attempt.
#[derive(Debug)]
pub enum SyncError {
    /// The server name yielded no usable IPv4 address.
    NoAddress {
        /// The name that was being resolved.
        host: String,
        /// The resolver error, if resolution itself failed. `None` means the
        /// name resolved but returned no IPv4 records.
        source: Option<io::Error>,
    },
    /// Creating or configuring the local UDP socket failed.
    SocketSetup(io::Error),
    /// Fixing the server as the socket's peer failed.
    Connect(io::Error),
    /// Sending the request datagram failed.
    Send(io::Error),
    /// Receiving the response datagram failed.
    Recv(io::Error),
    /// No response arrived before the receive deadline.
    Timeout,
    /// The response datagram could not be decoded.
    Malformed(ParseError),
    /// The server's timestamp cannot be expressed as a calendar date.
    TimeOutOfRange,
    /// Applying the civil time to the system clock failed.
    Clock(ClockError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::NoAddress { host, source } => match source {
                Some(err) => write!(f, "failed to resolve {host}: {err}"),
                None => write!(f, "no IPv4 address found for {host}"),
            },
            SyncError::SocketSetup(err) => write!(f, "couldn't create the UDP socket: {err}"),
            SyncError::Connect(err) => write!(f, "couldn't connect to the server: {err}"),
            SyncError::Send(err) => write!(f, "couldn't write to the socket: {err}"),
            SyncError::Recv(err) => write!(f, "couldn't read from the socket: {err}"),
            SyncError::Timeout => write!(f, "timed out waiting for the server to reply"),
            SyncError::Malformed(err) => write!(f, "bad response from the server: {err}"),
            SyncError::TimeOutOfRange => {
                write!(f, "the server's timestamp is outside the representable date range")
            }
            SyncError::Clock(err) => write!(f, "couldn't set the system clock: {err}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::NoAddress { source, .. } => {
                source.as_ref().map(|err| err as &(dyn std::error::Error + 'static))
            }
            SyncError::SocketSetup(err)
            | SyncError::Connect(err)
            | SyncError::Send(err)
            | SyncError::Recv(err) => Some(err),
            SyncError::Malformed(err) => Some(err),
            SyncError::Clock(err) => Some(err),
            SyncError::Timeout | SyncError::TimeOutOfRange => None,
        }
    }
}

// ── From conversions ────────────────────────────────────────────────

impl From<ParseError> for SyncError {
    fn from(err: ParseError) -> SyncError {
        SyncError::Malformed(err)
    }
}

impl From<ClockError> for SyncError {
    fn from(err: ClockError) -> SyncError {
        SyncError::Clock(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
