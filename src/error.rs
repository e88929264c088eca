//! Unified error type for the alarm clock.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (feature `defmt`) for on-target logging.

use core::fmt;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Time
    /// Network time fetch failed. Recovered inside the time source.
    TimeSync,

    /// Civil date/time fields or epoch seconds out of range.
    InvalidDateTime,

    // Alarms
    /// Alarm given neither a full datetime nor an (h, m, s) time,
    /// or one with out-of-range fields.
    InvalidAlarmSpec,

    /// The alarm table is full.
    AlarmCapacity,

    // Hardware
    /// Digital input/output or PWM operation failed.
    Pin,

    /// Draw call to the display failed.
    Display,

    /// Flash read/write failed.
    Storage,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::TimeSync => "network time sync failed",
            Error::InvalidDateTime => "date/time out of range",
            Error::InvalidAlarmSpec => {
                "alarm must be a datetime 8-tuple or an (hour, minute, second) 3-tuple"
            }
            Error::AlarmCapacity => "alarm table is full",
            Error::Pin => "pin i/o failed",
            Error::Display => "display i/o failed",
            Error::Storage => "flash storage failed",
        };
        f.write_str(msg)
    }
}

impl From<::time::error::ComponentRange> for Error {
    fn from(_: ::time::error::ComponentRange) -> Self {
        Error::InvalidDateTime
    }
}
