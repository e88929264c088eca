//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters and UI defaults live here so
//! they can be tuned in one place.

// Buttons

/// Level changes closer together than this (ms) are contact bounce.
pub const DEBOUNCE_INTERVAL_MS: u32 = 10;

/// A press held at least this long (ms) is reported as a long press.
pub const LONG_PRESS_THRESH_MS: u32 = 1000;

/// Number of physical buttons polled by the firmware.
pub const BUTTON_COUNT: usize = 1;

// Time sync

/// Seconds between successful network time syncs.
pub const TIME_SYNC_INTERVAL_S: i64 = 60;

/// Seconds to wait before retrying a failed sync.
pub const TIME_SYNC_RETRY_S: i64 = 5;

/// Fixed offset of local time from UTC (seconds). No DST handling.
pub const UTC_OFFSET_S: i64 = 2 * 60 * 60;

// Alarms

/// Maximum number of alarms the scheduler can hold.
pub const MAX_ALARMS: usize = 4;

// Audio

/// An alarm signal stops on its own after this long (ms).
pub const AUDIO_DURATION_MS: u32 = 30_000;

/// Half-period of the trigger pulse sent to the sound module (ms).
pub const AUDIO_PULSE_MS: u32 = 50;

// Display

/// Brightness change per tick while fading (brightness units, 0..=1).
pub const DIMMER_ADAPT_SPEED: f32 = 0.005;

/// Inactivity before the backlight fades out when auto-off is enabled (ms).
pub const DISPLAY_AUTO_OFF_TIMEOUT_MS: u32 = 120_000;

/// Capacity of a single text label.
pub const TEXT_CAPACITY: usize = 24;

/// Default UI colours as (r, g, b).
pub const STYLE_BACKGROUND_RGB: (u8, u8, u8) = (81, 45, 168);
pub const STYLE_COLOR_RGB: (u8, u8, u8) = (255, 64, 129);

// Main loop

/// Period of the cooperative polling loop (ms).
pub const TICK_PERIOD_MS: u64 = 10;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Primary button  → P0.11
//   Audio trigger   → P0.13
//   Backlight PWM   → P0.14
//   TFT SCK         → P0.19
//   TFT MOSI        → P0.20
//   TFT CS          → P0.21
//   TFT DC          → P0.22
//   TFT RST         → P0.23

/// Native (portrait) geometry of the ST7735 panel. `main.rs` rotates it
/// 90 degrees so the UI sees 160x128.
pub const TFT_WIDTH: u16 = 128;
pub const TFT_HEIGHT: u16 = 160;

// Persisted settings

/// Flash page index where settings storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 2;
