//! Civil (wall-clock) date and time.
//!
//! The 8-field view is year, month, day, hour, minute, second, weekday
//! (0 = Monday) and year-day (1-based). Weekday and year-day are always
//! derived from the date, never stored.

use ::time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time};

use crate::error::{Error, Result};

/// Seconds in one civil day.
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A timezone-less calendar date and time of day, second resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime(PrimitiveDateTime);

impl CivilDateTime {
    /// Build from calendar fields, rejecting anything out of range.
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self> {
        let month = Month::try_from(month)?;
        let date = Date::from_calendar_date(year, month, day)?;
        let time = Time::from_hms(hour, minute, second)?;
        Ok(Self(PrimitiveDateTime::new(date, time)))
    }

    /// Same date, different time of day.
    pub fn with_time(self, hour: u8, minute: u8, second: u8) -> Result<Self> {
        let time = Time::from_hms(hour, minute, second)?;
        Ok(Self(self.0.replace_time(time)))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u8 {
        u8::from(self.0.month())
    }

    pub fn day(&self) -> u8 {
        self.0.day()
    }

    pub fn hour(&self) -> u8 {
        self.0.hour()
    }

    pub fn minute(&self) -> u8 {
        self.0.minute()
    }

    pub fn second(&self) -> u8 {
        self.0.second()
    }

    /// Day of the week, 0 = Monday.
    pub fn weekday(&self) -> u8 {
        self.0.weekday().number_days_from_monday()
    }

    /// Day of the year, 1-based.
    pub fn yearday(&self) -> u16 {
        self.0.ordinal()
    }

    /// `None` if the result leaves the representable range.
    pub fn checked_add_seconds(self, seconds: i64) -> Option<Self> {
        self.0.checked_add(Duration::seconds(seconds)).map(Self)
    }

    /// The same wall-clock time one day later.
    pub fn next_day(self) -> Option<Self> {
        self.checked_add_seconds(SECONDS_PER_DAY)
    }
}

/// Seconds since 1970-01-01 00:00:00, treating the fields as UTC.
pub fn to_epoch(dt: CivilDateTime) -> i64 {
    dt.0.assume_utc().unix_timestamp()
}

/// Inverse of [`to_epoch`].
pub fn from_epoch(seconds: i64) -> Result<CivilDateTime> {
    let odt = OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| Error::InvalidDateTime)?;
    Ok(CivilDateTime(PrimitiveDateTime::new(odt.date(), odt.time())))
}

#[cfg(feature = "defmt")]
impl defmt::Format for CivilDateTime {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "{}-{}-{} {}:{}:{}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_of_unix_origin_is_zero() {
        let dt = CivilDateTime::new(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_epoch(dt), 0);
        assert_eq!(from_epoch(0).unwrap(), dt);
    }

    #[test]
    fn derived_fields() {
        // 2024-03-01 was a Friday, day 61 of a leap year.
        let dt = CivilDateTime::new(2024, 3, 1, 7, 30, 15).unwrap();
        assert_eq!(dt.weekday(), 4);
        assert_eq!(dt.yearday(), 61);
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (7, 30, 15));
    }

    #[test]
    fn next_day_crosses_month_and_year() {
        let dt = CivilDateTime::new(2023, 12, 31, 23, 0, 0).unwrap();
        let next = dt.next_day().unwrap();
        assert_eq!((next.year(), next.month(), next.day()), (2024, 1, 1));
        assert_eq!(next.hour(), 23);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(CivilDateTime::new(2024, 13, 1, 0, 0, 0), Err(Error::InvalidDateTime));
        assert_eq!(CivilDateTime::new(2023, 2, 29, 0, 0, 0), Err(Error::InvalidDateTime));
        assert_eq!(CivilDateTime::new(2024, 1, 1, 24, 0, 0), Err(Error::InvalidDateTime));
    }

    #[test]
    fn with_time_keeps_date() {
        let dt = CivilDateTime::new(2024, 6, 10, 12, 0, 0).unwrap();
        let at = dt.with_time(6, 45, 0).unwrap();
        assert_eq!((at.day(), at.hour(), at.minute()), (10, 6, 45));
    }
}
