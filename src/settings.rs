//! Persisted user settings.
//!
//! The record is tiny and fixed-size so it can live in a single
//! `sequential-storage` map entry:
//!
//! | byte | meaning            |
//! |------|--------------------|
//! | 0    | format version     |
//! | 1    | alarm 1 hour       |
//! | 2    | alarm 1 minute     |
//! | 3    | alarm 1 enabled    |

/// Size of a serialized [`AppConfig`].
pub const SETTINGS_RECORD_SIZE: usize = 4;

const SETTINGS_VERSION: u8 = 1;

/// Editable fields of one alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmConfig {
    pub hour: u8,
    pub minute: u8,
    pub enabled: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            hour: 7,
            minute: 30,
            enabled: false,
        }
    }
}

impl AlarmConfig {
    fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60
    }
}

/// Everything the device remembers across power cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppConfig {
    pub alarm1: AlarmConfig,
}

impl AppConfig {
    /// Write the record into `buf`, returning the number of bytes used.
    /// Returns 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SETTINGS_RECORD_SIZE {
            return 0;
        }
        buf[0] = SETTINGS_VERSION;
        buf[1] = self.alarm1.hour;
        buf[2] = self.alarm1.minute;
        buf[3] = u8::from(self.alarm1.enabled);
        SETTINGS_RECORD_SIZE
    }

    /// Parse a record, rejecting anything that is not a valid current
    /// version record.
    pub fn deserialize(buf: &[u8]) -> Option<Self> {
        let [version, hour, minute, enabled, ..] = *buf else {
            return None;
        };
        if version != SETTINGS_VERSION {
            return None;
        }
        let enabled = match enabled {
            0 => false,
            1 => true,
            _ => return None,
        };
        let alarm1 = AlarmConfig {
            hour,
            minute,
            enabled,
        };
        alarm1.is_valid().then_some(Self { alarm1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alarm_is_seven_thirty_off() {
        let config = AppConfig::default();
        assert_eq!(config.alarm1.hour, 7);
        assert_eq!(config.alarm1.minute, 30);
        assert!(!config.alarm1.enabled);
    }

    #[test]
    fn serialize_layout() {
        let config = AppConfig {
            alarm1: AlarmConfig {
                hour: 6,
                minute: 40,
                enabled: true,
            },
        };
        let mut buf = [0u8; 8];
        assert_eq!(config.serialize(&mut buf), SETTINGS_RECORD_SIZE);
        assert_eq!(&buf[..4], &[SETTINGS_VERSION, 6, 40, 1]);
        assert_eq!(AppConfig::deserialize(&buf[..4]), Some(config));
    }

    #[test]
    fn serialize_needs_room() {
        let mut buf = [0u8; 3];
        assert_eq!(AppConfig::default().serialize(&mut buf), 0);
    }

    #[test]
    fn deserialize_rejects_bad_records() {
        assert_eq!(AppConfig::deserialize(&[]), None);
        assert_eq!(AppConfig::deserialize(&[SETTINGS_VERSION, 7, 30]), None);
        assert_eq!(AppConfig::deserialize(&[99, 7, 30, 0]), None);
        assert_eq!(AppConfig::deserialize(&[SETTINGS_VERSION, 24, 30, 0]), None);
        assert_eq!(AppConfig::deserialize(&[SETTINGS_VERSION, 7, 60, 0]), None);
        assert_eq!(AppConfig::deserialize(&[SETTINGS_VERSION, 7, 30, 2]), None);
    }
}
