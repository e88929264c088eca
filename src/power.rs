//! Backlight dimmer.
//!
//! Fades the TFT backlight toward on/off with a fixed step per tick and
//! sits in front of the UI input chain: depending on the policy it may
//! swallow the press that wakes the screen.

use embedded_hal::pwm::SetDutyCycle;

use crate::clock::ticks_since;
use crate::error::{Error, Result};
use crate::power_logic;

/// How the dimmer reacts to inactivity and input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DimPolicy {
    /// Never dims on its own. Input is forwarded only once fully lit.
    AlwaysOn,
    /// Fades out after `timeout_ms` without input. The press that wakes
    /// the screen is swallowed.
    AutoOff { timeout_ms: u32 },
}

/// What to do with an input event after the dimmer has seen it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputRoute {
    Forward,
    Swallow,
}

pub struct Dimmer<PWM> {
    pwm: PWM,
    policy: DimPolicy,
    adapt_speed: f32,
    current: f32,
    target: f32,
    last_input_ms: u32,
}

impl<PWM: SetDutyCycle> Dimmer<PWM> {
    /// Starts dark with the display switched off.
    pub fn new(pwm: PWM, adapt_speed: f32, policy: DimPolicy) -> Self {
        Self {
            pwm,
            policy,
            adapt_speed,
            current: 0.0,
            target: 0.0,
            last_input_ms: 0,
        }
    }

    pub fn display_on(&mut self) {
        self.target = 1.0;
    }

    pub fn display_off(&mut self) {
        self.target = 0.0;
    }

    /// Any light at all.
    pub fn is_display_on(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_fully_lit(&self) -> bool {
        self.current >= 1.0
    }

    /// Display has been switched on (it may still be fading in).
    pub fn is_awake(&self) -> bool {
        self.target > 0.0
    }

    pub fn brightness(&self) -> f32 {
        self.current
    }

    pub fn policy(&self) -> DimPolicy {
        self.policy
    }

    /// External wake-up (e.g. an alarm firing).
    pub fn wake(&mut self, now_ms: u32) {
        if !self.is_awake() {
            info!("Dimmer: woken");
        }
        self.last_input_ms = now_ms;
        self.display_on();
    }

    /// Record a button event and decide whether the UI gets it.
    pub fn on_input(&mut self, now_ms: u32) -> InputRoute {
        match self.policy {
            DimPolicy::AlwaysOn => {
                let route = if self.is_fully_lit() {
                    InputRoute::Forward
                } else {
                    InputRoute::Swallow
                };
                self.display_on();
                route
            }
            DimPolicy::AutoOff { .. } => {
                let awake = self.is_awake();
                self.wake(now_ms);
                if awake {
                    InputRoute::Forward
                } else {
                    InputRoute::Swallow
                }
            }
        }
    }

    /// Periodic tick - apply the inactivity policy, step the ramp and
    /// write the duty cycle.
    pub fn update(&mut self, now_ms: u32) -> Result<()> {
        if let DimPolicy::AutoOff { timeout_ms } = self.policy {
            let idle_ms = ticks_since(now_ms, self.last_input_ms);
            if self.is_awake() && power_logic::idle_timed_out(idle_ms, timeout_ms) {
                info!("Dimmer: idle for {} ms, fading out", idle_ms);
                self.display_off();
            }
        }

        self.current = power_logic::step_brightness(self.current, self.target, self.adapt_speed);

        let duty = power_logic::duty_for(self.current, self.pwm.max_duty_cycle());
        self.pwm.set_duty_cycle(duty).map_err(|_| Error::Pin)
    }
}
