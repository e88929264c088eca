//! Persistent settings in internal flash.
//!
//! Uses the nRF52840's internal flash via the `sequential-storage` map
//! API. The whole [`AppConfig`] is a single map item, so a save is one
//! append and `sequential-storage` takes care of wear levelling and GC.
//!
//! Storage layout:
//!   - Key [`KEY_APP_CONFIG`] holds the serialized settings record.
//!   - Anything unreadable or from an older format is ignored and the
//!     defaults are used.

use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;

use crate::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use crate::error::{Error, Result};
use crate::settings::{AppConfig, SETTINGS_RECORD_SIZE};

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Map key of the settings record.
pub const KEY_APP_CONFIG: u8 = 0x01;

/// Scratch buffer for `sequential-storage` (item header + record).
const BUFFER_SIZE: usize = 64;

/// Cached settings, synced with flash.
pub struct SettingsStore {
    config: AppConfig,
    /// True if the cache differs from flash.
    dirty: bool,
}

impl SettingsStore {
    pub const fn new(config: AppConfig) -> Self {
        Self { config, dirty: false }
    }

    pub fn config(&self) -> AppConfig {
        self.config
    }

    /// Read the settings record. Falls back to defaults if flash holds
    /// nothing usable.
    pub async fn load_from_flash(&mut self, flash: &mut impl NorFlash) -> AppConfig {
        let mut buf = [0u8; BUFFER_SIZE];

        let loaded = match sequential_storage::map::fetch_item::<u8, &[u8], _>(
            flash,
            STORAGE_START..STORAGE_END,
            &mut NoCache::new(),
            &mut buf,
            &KEY_APP_CONFIG,
        )
        .await
        {
            Ok(Some(data)) => {
                let config = AppConfig::deserialize(data);
                if config.is_none() {
                    warn!("Settings record rejected, using defaults");
                }
                config
            }
            Ok(None) => {
                info!("No settings in flash, using defaults");
                None
            }
            Err(e) => {
                error!("Flash read error: {:?}", defmt::Debug2Format(&e));
                None
            }
        };

        self.config = loaded.unwrap_or_default();
        self.dirty = false;
        info!("Settings: {}", self.config);
        self.config
    }

    /// Replace the cached settings. Only a real change is marked for saving.
    pub fn update(&mut self, config: AppConfig) {
        if config != self.config {
            self.config = config;
            self.dirty = true;
        }
    }

    /// Write the settings record if it changed since the last load/save.
    pub async fn save_to_flash(&mut self, flash: &mut impl NorFlash) -> Result<()> {
        if !self.dirty {
            debug!("SettingsStore: no changes to save");
            return Ok(());
        }

        let mut buf = [0u8; BUFFER_SIZE];
        let mut record = [0u8; SETTINGS_RECORD_SIZE];
        let len = self.config.serialize(&mut record);
        let item: &[u8] = &record[..len];

        match sequential_storage::map::store_item::<u8, &[u8], _>(
            flash,
            STORAGE_START..STORAGE_END,
            &mut NoCache::new(),
            &mut buf,
            &KEY_APP_CONFIG,
            &item,
        )
        .await
        {
            Ok(()) => {
                info!("Saved settings to flash");
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                error!("Flash write error: {:?}", defmt::Debug2Format(&e));
                Err(Error::Storage)
            }
        }
    }
}
