//! Top-level wiring of one clock.
//!
//! [`Firmware`] owns every subsystem and runs one cooperative tick at a
//! time: sample buttons, route gestures through the dimmer into the app,
//! fire alarms, fade the backlight and redraw. The embedded binary calls
//! [`Firmware::tick`] from a fixed-period timer; tests call it directly.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;

use crate::app::App;
use crate::audio::Audio;
use crate::clock::{Monotonic, Network, TimeSource, WallClock};
use crate::config::DIMMER_ADAPT_SPEED;
use crate::error::Result;
use crate::power::{DimPolicy, Dimmer, InputRoute};
use crate::settings::AppConfig;
use crate::ui::{ButtonId, ButtonTracker, Canvas, Style};

/// Concrete peripheral types of a board.
pub trait Board {
    type Button: InputPin;
    type Buzzer: OutputPin;
    type Delay: DelayNs;
    type Backlight: SetDutyCycle;
    type Network: Network;
    type WallClock: WallClock;
    type Monotonic: Monotonic;
    type Canvas: Canvas;
}

/// Peripheral instances handed to [`Firmware::init`].
pub struct Parts<B: Board, const N: usize> {
    pub buttons: [(ButtonId, B::Button); N],
    pub buzzer: B::Buzzer,
    pub delay: B::Delay,
    pub backlight: B::Backlight,
    pub network: B::Network,
    pub wall_clock: B::WallClock,
    pub monotonic: B::Monotonic,
    pub canvas: B::Canvas,
}

pub struct Firmware<B: Board, const N: usize> {
    buttons: ButtonTracker<B::Button, N>,
    dimmer: Dimmer<B::Backlight>,
    app: App<B::Buzzer, B::Delay, B::Network, B::WallClock>,
    monotonic: B::Monotonic,
    canvas: B::Canvas,
}

impl<B: Board, const N: usize> Firmware<B, N> {
    /// Build every subsystem and switch the backlight on.
    pub fn init(
        style: Style,
        config: AppConfig,
        parts: Parts<B, N>,
        policy: DimPolicy,
    ) -> Result<Self> {
        let Parts {
            buttons,
            buzzer,
            delay,
            backlight,
            network,
            wall_clock,
            monotonic,
            canvas,
        } = parts;

        let audio = Audio::new(buzzer, delay)?;
        let time = TimeSource::new(network, wall_clock);
        let app = App::new(style, config, audio, time)?;

        let mut dimmer = Dimmer::new(backlight, DIMMER_ADAPT_SPEED, policy);
        dimmer.wake(monotonic.now_ms());

        info!("Firmware: ready, alarm 1 {}", config.alarm1);
        Ok(Self {
            buttons: ButtonTracker::new(buttons),
            dimmer,
            app,
            monotonic,
            canvas,
        })
    }

    /// One pass of the main loop.
    ///
    /// Every input event of the tick is delivered even if an earlier one
    /// failed; the first error is returned after the pass completes.
    pub fn tick(&mut self) -> Result<()> {
        let now_ms = self.monotonic.now_ms();
        self.app.refresh_time();

        let mut first_err = None;
        let mut note = |result: Result<()>| {
            if let Err(e) = result {
                error!("Firmware: {}", e);
                first_err.get_or_insert(e);
            }
        };

        match self.buttons.poll(now_ms) {
            Ok(events) => {
                for event in events {
                    if self.dimmer.on_input(now_ms) == InputRoute::Forward {
                        note(self.app.on_input(event, now_ms));
                    } else {
                        debug!("Firmware: {} swallowed by dimmer", event.action);
                    }
                }
            }
            Err(e) => note(Err(e)),
        }

        match self.app.check_alarms(now_ms) {
            Ok(true) => self.dimmer.wake(now_ms),
            Ok(false) => {}
            Err(e) => note(Err(e)),
        }

        note(self.dimmer.update(now_ms));
        note(self.app.render(&mut self.canvas));

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Config committed in the alarm editor since the last call.
    pub fn take_saved_config(&mut self) -> Option<AppConfig> {
        self.app.take_saved_config()
    }

    pub fn app(&self) -> &App<B::Buzzer, B::Delay, B::Network, B::WallClock> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App<B::Buzzer, B::Delay, B::Network, B::WallClock> {
        &mut self.app
    }

    pub fn dimmer(&self) -> &Dimmer<B::Backlight> {
        &self.dimmer
    }

    pub fn canvas(&self) -> &B::Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut B::Canvas {
        &mut self.canvas
    }
}
