//! Host-side stand-ins for the hardware traits, shared by unit tests.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use crate::clock::{from_epoch, CivilDateTime, Network, WallClock};
use crate::error::Result;
use crate::ui::Canvas;

/// Output pin that remembers every level it was driven to.
#[derive(Default)]
pub struct RecordingPin {
    pub levels: Vec<bool>,
}

impl RecordingPin {
    pub fn high_count(&self) -> usize {
        self.levels.iter().filter(|&&high| high).count()
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.push(true);
        Ok(())
    }
}

/// Delay that returns immediately and sums what it was asked to wait.
#[derive(Default)]
pub struct NoDelay {
    pub total_ms: u32,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms;
    }
}

/// PWM channel recording each duty written.
pub struct FakePwm {
    max: u16,
    pub duties: Vec<u16>,
}

impl FakePwm {
    pub fn new(max: u16) -> Self {
        Self {
            max,
            duties: Vec::new(),
        }
    }
}

impl pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duties.push(duty);
        Ok(())
    }
}

/// Active-low input whose level the test controls through a shared flag.
#[derive(Clone, Default)]
pub struct InputLine {
    pressed: Rc<Cell<bool>>,
}

impl InputLine {
    pub fn press(&self) {
        self.pressed.set(true);
    }

    pub fn release(&self) {
        self.pressed.set(false);
    }
}

impl ErrorType for InputLine {
    type Error = Infallible;
}

impl InputPin for InputLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.pressed.get())
    }
}

/// One call made on a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Rgb565),
    Text {
        origin: Point,
        text: String,
        color: Rgb565,
        scale: u8,
    },
    HLine {
        origin: Point,
        length: u32,
        color: Rgb565,
    },
}

#[derive(Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    /// Strings drawn in `color`, in order.
    pub fn texts_in(&self, color: Rgb565) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, color: c, .. } if *c == color => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clears(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Clear(_))).count()
    }

    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Rgb565) -> Result<()> {
        self.ops.push(DrawOp::Clear(color));
        Ok(())
    }

    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        _font: &'static MonoFont<'static>,
        color: Rgb565,
        scale: u8,
    ) -> Result<()> {
        self.ops.push(DrawOp::Text {
            origin,
            text: text.to_string(),
            color,
            scale,
        });
        Ok(())
    }

    fn draw_hline(&mut self, origin: Point, length: u32, color: Rgb565) -> Result<()> {
        self.ops.push(DrawOp::HLine {
            origin,
            length,
            color,
        });
        Ok(())
    }
}

/// UTC wall clock at an epoch second the test sets.
#[derive(Clone)]
pub struct SettableClock(pub Rc<Cell<i64>>);

impl SettableClock {
    pub fn at(epoch_s: i64) -> Self {
        Self(Rc::new(Cell::new(epoch_s)))
    }

    pub fn set(&self, epoch_s: i64) {
        self.0.set(epoch_s);
    }
}

impl WallClock for SettableClock {
    fn utc_now(&self) -> CivilDateTime {
        from_epoch(self.0.get()).unwrap()
    }
}

/// Network that is never connected.
pub struct Offline;

impl Network for Offline {
    type Error = ();

    fn is_connected(&self) -> bool {
        false
    }

    fn sync_time(&mut self) -> Result<(), ()> {
        Err(())
    }
}
