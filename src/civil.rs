// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Conversion between NTP timestamps and civil (calendar) time.
//!
//! An NTP timestamp counts seconds from the era 0 epoch, 1900-01-01 00:00:00
//! UTC. [`unix_seconds`] rebases that count onto the Unix epoch, and
//! [`from_timestamp_local`] decomposes the result into the year, month, day
//! and time-of-day fields of the host's local timezone, which is what the
//! system clock is set from.
//!
//! Conversions work at whole-second resolution; the timestamp's fractional
//! field plays no part in the civil fields. The 32-bit seconds count wraps in
//! February 2036 and no era correction is applied.

use chrono::{DateTime, Datelike, Local, LocalResult, TimeZone, Timelike};
use std::fmt;

use crate::protocol::TimestampFormat;

/// Offset in seconds between the NTP era 0 epoch (1900-01-01 00:00:00 UTC)
/// and the Unix epoch (1970-01-01 00:00:00 UTC).
pub const EPOCH_DELTA: i64 = 2_208_988_800;

/// A wall-clock date and time of day, at one-second resolution.
///
/// The fields carry no timezone of their own; they mean whatever zone they
/// were derived in. [`from_timestamp_local`] produces readings in the host's
/// local zone.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CivilTime {
    /// Full calendar year (e.g. 2024).
    pub year: i32,
    /// Month of the year, 1-12.
    pub month: u32,
    /// Day of the month, 1-31.
    pub day: u32,
    /// Hour of the day, 0-23.
    pub hour: u32,
    /// Minute of the hour, 0-59.
    pub minute: u32,
    /// Second of the minute, 0-59.
    pub second: u32,
}

impl CivilTime {
    /// Century flag for clocks that store two-digit years: 1 for years 2000
    /// and later, 0 for earlier years.
    pub fn century(&self) -> u8 {
        if self.year >= 2000 {
            1
        } else {
            0
        }
    }

    /// The year reduced to its final two digits.
    pub fn short_year(&self) -> u8 {
        self.year.rem_euclid(100) as u8
    }

    /// The time of day packed into a single integer as HHMMSS, so 13:45:01
    /// becomes `134501`.
    pub fn hhmmss(&self) -> u32 {
        self.hour * 10_000 + self.minute * 100 + self.second
    }
}

impl fmt::Display for CivilTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04} {:02}:{:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute, self.second
        )
    }
}

/// Rebase an NTP timestamp onto the Unix epoch.
///
/// Timestamps before 1970 produce negative values rather than wrapping.
pub fn unix_seconds(timestamp: TimestampFormat) -> i64 {
    i64::from(timestamp.seconds) - EPOCH_DELTA
}

/// Decompose a server timestamp into civil time in the given zone.
///
/// Returns `None` only if the instant falls outside chrono's representable
/// range, which cannot happen for 32-bit NTP seconds.
pub fn from_timestamp_in<Tz: TimeZone>(timestamp: TimestampFormat, tz: &Tz) -> Option<CivilTime> {
    let utc = DateTime::from_timestamp(unix_seconds(timestamp), 0)?;
    let local = utc.with_timezone(tz);
    Some(CivilTime {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
        second: local.second(),
    })
}

/// Decompose a server timestamp into civil time in the host's local zone.
pub fn from_timestamp_local(timestamp: TimestampFormat) -> Option<CivilTime> {
    from_timestamp_in(timestamp, &Local)
}

/// Reconstruct the Unix epoch second for a civil reading interpreted in `tz`.
///
/// A reading inside a DST fold maps to the earlier of its two instants. A
/// reading inside a DST gap corresponds to no instant and yields `None`.
pub fn epoch_seconds_in<Tz: TimeZone>(time: &CivilTime, tz: &Tz) -> Option<i64> {
    match tz.with_ymd_and_hms(
        time.year,
        time.month,
        time.day,
        time.hour,
        time.minute,
        time.second,
    ) {
        LocalResult::Single(dt) => Some(dt.timestamp()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp()),
        LocalResult::None => None,
    }
}

/// Reconstruct the Unix epoch second for a civil reading in the host's local
/// zone.
pub fn local_epoch_seconds(time: &CivilTime) -> Option<i64> {
    epoch_seconds_in(time, &Local)
}
