// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Setting the system clock from a civil time reading.
//!
//! This module provides the [`ClockSink`](self::ClockSink) seam between the sync flow and the
//! host clock. The real implementation, [`SystemClock`](self::SystemClock), sets the clock to
//! the given local date and time in one absolute step; tests substitute their
//! own sinks to observe the flow without touching the host.
//!
//! # Privileges
//!
//! Setting the clock requires elevated privileges (root on Unix,
//! Administrator on Windows).
//!
//! # Platform Support
//!
//! - **Linux**: Uses `clock_settime(2)` with `CLOCK_REALTIME`.
//! - **macOS**: Uses `settimeofday(2)`.
//! - **Windows**: Uses `SetLocalTime`, which takes the local calendar fields
//!   directly.
//! - **Other platforms**: Returns [`ClockError::Unsupported`](self::ClockError::Unsupported).

#![allow(unsafe_code)]

use std::fmt;

use crate::civil::CivilTime;

/// Error type for clock setting operations.
#[derive(Debug)]
pub enum ClockError {
    /// The operation requires elevated privileges (root/admin).
    PermissionDenied,
    /// The civil reading falls inside a DST gap and names no instant in the
    /// host's timezone.
    NonexistentLocalTime(CivilTime),
    /// Platform-specific error with an OS error code.
    OsError(i32),
    /// Setting the clock is not supported on this platform.
    Unsupported,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::PermissionDenied => write!(f, "permission denied (requires root/admin)"),
            ClockError::NonexistentLocalTime(time) => {
                write!(f, "local time {} does not exist in this timezone", time)
            }
            ClockError::OsError(code) => write!(f, "OS error: {}", code),
            ClockError::Unsupported => {
                write!(f, "setting the clock is not supported on this platform")
            }
        }
    }
}

impl std::error::Error for ClockError {}

/// Destination for the civil time obtained from a server.
///
/// The sync flow calls [`set_clock`](ClockSink::set_clock) exactly once per
/// run, and only after the server's reply decoded cleanly.
pub trait ClockSink {
    /// Set the clock to the given local date and time.
    fn set_clock(&mut self, time: &CivilTime) -> Result<(), ClockError>;
}

/// The host's real clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl ClockSink for SystemClock {
    fn set_clock(&mut self, time: &CivilTime) -> Result<(), ClockError> {
        platform::set(time)
    }
}

/// Convert an OS errno to a [`ClockError`].
#[cfg(unix)]
fn os_error_from_errno() -> ClockError {
    let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(-1);
    if errno == libc::EPERM {
        ClockError::PermissionDenied
    } else {
        ClockError::OsError(errno)
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use super::*;
    use crate::civil;

    pub(super) fn set(time: &CivilTime) -> Result<(), ClockError> {
        let secs = civil::local_epoch_seconds(time)
            .ok_or(ClockError::NonexistentLocalTime(*time))?;

        let tp = libc::timespec {
            tv_sec: secs as _,
            tv_nsec: 0,
        };

        let ret = unsafe { libc::clock_settime(libc::CLOCK_REALTIME, &tp) };
        if ret < 0 {
            return Err(os_error_from_errno());
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use super::*;
    use crate::civil;

    pub(super) fn set(time: &CivilTime) -> Result<(), ClockError> {
        let secs = civil::local_epoch_seconds(time)
            .ok_or(ClockError::NonexistentLocalTime(*time))?;

        let tv = libc::timeval {
            tv_sec: secs as _,
            tv_usec: 0,
        };

        let ret = unsafe { libc::settimeofday(&tv, std::ptr::null_mut()) };
        if ret < 0 {
            return Err(os_error_from_errno());
        }
        Ok(())
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use super::*;
    use windows_sys::Win32::Foundation::SYSTEMTIME;
    use windows_sys::Win32::System::SystemInformation::SetLocalTime;

    /// Windows `ERROR_ACCESS_DENIED` (0x5).
    const ERROR_ACCESS_DENIED: i32 = 5;

    fn os_error() -> ClockError {
        let code = std::io::Error::last_os_error().raw_os_error().unwrap_or(-1);
        if code == ERROR_ACCESS_DENIED {
            ClockError::PermissionDenied
        } else {
            ClockError::OsError(code)
        }
    }

    pub(super) fn set(time: &CivilTime) -> Result<(), ClockError> {
        // SetLocalTime ignores wDayOfWeek.
        let st = SYSTEMTIME {
            wYear: time.year as u16,
            wMonth: time.month as u16,
            wDayOfWeek: 0,
            wDay: time.day as u16,
            wHour: time.hour as u16,
            wMinute: time.minute as u16,
            wSecond: time.second as u16,
            wMilliseconds: 0,
        };

        let ret = unsafe { SetLocalTime(&st) };
        if ret == 0 {
            return Err(os_error());
        }
        Ok(())
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod platform {
    use super::*;

    pub(super) fn set(_time: &CivilTime) -> Result<(), ClockError> {
        Err(ClockError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_error_display() {
        assert_eq!(
            ClockError::PermissionDenied.to_string(),
            "permission denied (requires root/admin)"
        );
        assert_eq!(ClockError::OsError(42).to_string(), "OS error: 42");
        assert_eq!(
            ClockError::Unsupported.to_string(),
            "setting the clock is not supported on this platform"
        );

        let time = CivilTime {
            year: 2024,
            month: 3,
            day: 10,
            hour: 2,
            minute: 30,
            second: 0,
        };
        assert_eq!(
            ClockError::NonexistentLocalTime(time).to_string(),
            "local time 10/03/2024 02:30:00 does not exist in this timezone"
        );
    }

    #[test]
    fn test_clock_error_debug() {
        let debug = format!("{:?}", ClockError::PermissionDenied);
        assert!(debug.contains("PermissionDenied"));

        let debug = format!("{:?}", ClockError::OsError(13));
        assert!(debug.contains("OsError"));
        assert!(debug.contains("13"));

        let debug = format!("{:?}", ClockError::Unsupported);
        assert!(debug.contains("Unsupported"));
    }

    #[test]
    fn test_system_clock_is_a_sink() {
        // Only checks that the trait object wiring holds together; setting
        // the clock for real requires root and is covered by the ignored
        // test below.
        let mut clock = SystemClock;
        let _sink: &mut dyn ClockSink = &mut clock;
    }

    #[test]
    #[ignore] // Requires root privileges.
    fn test_set_clock_to_current_time() {
        use chrono::{Datelike, Local, Timelike};

        // Sets the clock to the time it already reads, so a privileged run
        // loses at most the current sub-second fraction.
        let now = Local::now();
        let time = CivilTime {
            year: now.year(),
            month: now.month(),
            day: now.day(),
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
        };

        let mut clock = SystemClock;
        clock.set_clock(&time).unwrap();
    }
}
