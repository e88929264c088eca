//! Alarm scheduling.
//!
//! An [`Alarm`] is a target local datetime with a repeat flag. The
//! [`AlarmManager`] holds alarms keyed by identity and, once per tick,
//! reports the ones that came due. Repeating alarms are rolled forward
//! one day at a time until they are back in the future; one-shot alarms
//! are dropped after firing.


use heapless::Vec;

use crate::clock::{to_epoch, CivilDateTime};
use crate::config::MAX_ALARMS;
use crate::error::{Error, Result};

/// Unique alarm identity. Adding an alarm with an existing identity
/// replaces the old one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmId(pub &'static str);

/// When an alarm should ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlarmSpec {
    /// A full local datetime.
    At(CivilDateTime),
    /// A time of day, today (rolled to tomorrow if already past).
    TimeOfDay { hour: u8, minute: u8, second: u8 },
}

impl<'a> TryFrom<&'a [i32]> for AlarmSpec {
    type Error = Error;

    /// Accepts an 8-field datetime (Y, M, D, h, m, s, weekday, yearday)
    /// or a 3-field time (h, m, s). Weekday and yearday are recomputed
    /// from the date.
    fn try_from(fields: &'a [i32]) -> Result<Self> {
        match *fields {
            [year, month, day, hour, minute, second, _weekday, _yearday] => {
                let dt = CivilDateTime::new(
                    year,
                    field(month)?,
                    field(day)?,
                    field(hour)?,
                    field(minute)?,
                    field(second)?,
                )
                .map_err(|_| Error::InvalidAlarmSpec)?;
                Ok(AlarmSpec::At(dt))
            }
            [hour, minute, second] => Ok(AlarmSpec::TimeOfDay {
                hour: field(hour)?,
                minute: field(minute)?,
                second: field(second)?,
            }),
            _ => Err(Error::InvalidAlarmSpec),
        }
    }
}

fn field(value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::InvalidAlarmSpec)
}

/// A scheduled alarm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alarm {
    id: AlarmId,
    target: CivilDateTime,
    repeating: bool,
}

impl Alarm {
    /// Resolve `spec` against `now` and roll the target forward until it
    /// lies in the future.
    pub fn new(id: AlarmId, spec: AlarmSpec, repeating: bool, now: CivilDateTime) -> Result<Self> {
        let target = match spec {
            AlarmSpec::At(dt) => dt,
            AlarmSpec::TimeOfDay { hour, minute, second } => now
                .with_time(hour, minute, second)
                .map_err(|_| Error::InvalidAlarmSpec)?,
        };

        let mut alarm = Self { id, target, repeating };
        alarm.roll_forward(now);
        Ok(alarm)
    }

    pub fn id(&self) -> AlarmId {
        self.id
    }

    pub fn target(&self) -> CivilDateTime {
        self.target
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Due once local time reaches the target.
    pub fn is_due(&self, now: CivilDateTime) -> bool {
        to_epoch(now) >= to_epoch(self.target)
    }

    /// Skip forward one day at a time while overdue.
    fn roll_forward(&mut self, now: CivilDateTime) {
        while self.is_due(now) {
            match self.target.next_day() {
                Some(next) => self.target = next,
                None => break,
            }
        }
    }
}

/// An alarm that came due during [`AlarmManager::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fired {
    pub id: AlarmId,
    /// The target that was reached (before any reschedule).
    pub at: CivilDateTime,
}

/// Fixed-capacity set of alarms, kept in identity order.
#[derive(Default)]
pub struct AlarmManager {
    alarms: Vec<Alarm, MAX_ALARMS>,
}

impl AlarmManager {
    pub const fn new() -> Self {
        Self { alarms: Vec::new() }
    }

    /// Insert `alarm`, replacing any alarm with the same identity.
    pub fn add(&mut self, alarm: Alarm) -> Result<()> {
        self.cancel(alarm.id);

        let pos = self
            .alarms
            .iter()
            .position(|a| a.id > alarm.id)
            .unwrap_or(self.alarms.len());
        info!("Alarm {} set for {}", alarm.id, alarm.target);
        self.alarms.insert(pos, alarm).map_err(|_| Error::AlarmCapacity)
    }

    /// Remove the alarm with identity `id`. No-op if absent.
    pub fn cancel(&mut self, id: AlarmId) {
        let before = self.alarms.len();
        self.alarms.retain(|a| a.id != id);
        if self.alarms.len() != before {
            info!("Alarm {} cancelled", id);
        }
    }

    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter()
    }

    /// Collect every alarm due at `now`, in identity order.
    ///
    /// Each due alarm is reported exactly once. Repeating alarms are
    /// rescheduled past `now`; one-shot alarms are removed.
    pub fn tick(&mut self, now: CivilDateTime) -> Vec<Fired, MAX_ALARMS> {
        let mut fired = Vec::new();

        self.alarms.retain_mut(|alarm| {
            if !alarm.is_due(now) {
                return true;
            }

            // Capacity matches the table, so this cannot overflow.
            let _ = fired.push(Fired { id: alarm.id, at: alarm.target });

            if alarm.repeating {
                alarm.roll_forward(now);
                debug!("Alarm {} rescheduled to {}", alarm.id, alarm.target);
                true
            } else {
                false
            }
        });

        fired
    }
}
