//! Alarm clock firmware core.
//!
//! Everything that decides *what* the clock does lives here and builds on
//! the host: button debouncing, time sync policy, alarm scheduling, the
//! backlight dimmer and the TFT view tree. Hardware is reached only
//! through `embedded-hal` / `embedded-graphics` traits and the seams in
//! [`clock`] and [`firmware::Board`].
//!
//! Usage: `cargo test` on the host, `cargo run --release --features embedded`
//! on an nRF52840 board (see `main.rs`).

#![cfg_attr(not(test), no_std)]

// must come first so the log macros are visible everywhere
mod fmt;

pub mod alarm;
pub mod app;
pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod firmware;
pub mod power;
pub mod power_logic;
pub mod settings;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod storage;

#[cfg(test)]
mod testing;

pub use alarm::{Alarm, AlarmId, AlarmManager, AlarmSpec, Fired};
pub use app::{App, Screen, ALARM1};
pub use clock::{CivilDateTime, Monotonic, Network, TimeSource, WallClock};
pub use error::{Error, Result};
pub use firmware::{Board, Firmware, Parts};
pub use power::{DimPolicy, Dimmer, InputRoute};
pub use settings::{AlarmConfig, AppConfig};
pub use ui::{ButtonAction, ButtonEvent, ButtonId, Canvas, GraphicsCanvas, Style};
