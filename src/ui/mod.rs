//! User interface subsystem - TFT view tree + physical buttons.
//!
//! ## Components
//!
//! - **Buttons**: polled, debounced, reported as click / long press
//! - **Display**: [`Canvas`] drawing seam and an `embedded-graphics` adapter
//! - **Widgets**: container, text label, spinner, underline
//! - **Screens**: clock face and alarm editor

pub mod buttons;
pub mod display;
pub mod input_logic;
pub mod screens;
pub mod widgets;


use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::Point;

use crate::config::{STYLE_BACKGROUND_RGB, STYLE_COLOR_RGB};

pub use buttons::ButtonTracker;
pub use display::{Canvas, GraphicsCanvas};
pub use screens::{ClockView, Focus, SetAlarmOutcome, SetAlarmView};
pub use widgets::{Container, Spinner, TextView, Underline, Widget};

/// Identity of a physical button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonId(pub u8);

impl ButtonId {
    pub const PRIMARY: ButtonId = ButtonId(0);
}

/// Debounced gesture on a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Pressed and released before the long-press threshold.
    Click,
    /// Held past the long-press threshold (reported once per press).
    LongPress,
}

/// A gesture on a specific button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub action: ButtonAction,
}

/// Colours and font shared by every widget.
#[derive(Clone, Copy)]
pub struct Style {
    pub background: Rgb565,
    pub color: Rgb565,
    pub font: &'static MonoFont<'static>,
}

impl Style {
    /// Place text at `(left, top)` with the font scaled `scale` times.
    pub fn text(self, left: i32, top: i32, scale: u8) -> TextStyle {
        TextStyle {
            style: self,
            origin: Point::new(left, top),
            scale,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        let (br, bg, bb) = STYLE_BACKGROUND_RGB;
        let (r, g, b) = STYLE_COLOR_RGB;
        Self {
            background: rgb(br, bg, bb),
            color: rgb(r, g, b),
            font: &FONT_6X10,
        }
    }
}

/// Style plus anchor and scale for a single text element.
#[derive(Clone, Copy)]
pub struct TextStyle {
    pub style: Style,
    pub origin: Point,
    pub scale: u8,
}

/// 24-bit colour to the panel's RGB565.
pub fn rgb(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::from(Rgb888::new(r, g, b))
}
