//! Time keeping - monotonic ticks, wall clock and network sync.
//!
//! ## Components
//!
//! - **Civil time**: [`CivilDateTime`] with epoch conversions.
//! - **Time source**: wall clock plus best-effort periodic network sync,
//!   reporting local time at a fixed UTC offset.
//!
//! The traits below are the seams to the board: whatever keeps the RTC,
//! the millisecond counter and the network connection.

pub mod civil;
pub mod source;

pub use civil::{from_epoch, to_epoch, CivilDateTime, SECONDS_PER_DAY};
pub use source::TimeSource;

/// Free-running millisecond counter. Wraps at `u32::MAX`.
pub trait Monotonic {
    fn now_ms(&self) -> u32;
}

/// Real-time clock reporting UTC.
pub trait WallClock {
    fn utc_now(&self) -> CivilDateTime;
}

/// Network connection able to set the wall clock.
pub trait Network {
    type Error;

    fn is_connected(&self) -> bool;

    /// Blocking time fetch (e.g. SNTP) that updates the wall clock.
    fn sync_time(&mut self) -> Result<(), Self::Error>;
}

/// Signed difference `later - earlier` of two wrapping tick counts.
///
/// Correct as long as the real distance is below `i32::MAX` ms.
pub fn ticks_diff(later: u32, earlier: u32) -> i32 {
    later.wrapping_sub(earlier) as i32
}

/// Milliseconds from `earlier` to `now`, assuming `now` is not before
/// `earlier`. Correct across one wrap of the counter (about 49.7 days).
pub fn ticks_since(now: u32, earlier: u32) -> u32 {
    now.wrapping_sub(earlier)
}
