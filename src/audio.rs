//! Pulse-triggered alarm sound.
//!
//! The sound module toggles between silent and ringing on each trigger
//! pulse (low 50 ms, high 50 ms, low). Playback is one-shot: the module
//! is assumed silent again once [`AUDIO_DURATION_MS`] has passed since
//! [`Audio::play`], and `stop()` only pulses while that has not happened.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::clock::ticks_diff;
use crate::config::{AUDIO_DURATION_MS, AUDIO_PULSE_MS};
use crate::error::{Error, Result};

pub struct Audio<P, D> {
    pin: P,
    delay: D,
    started_ms: u32,
    stopped: bool,
    /// Sticky: once the duration is observed elapsed it stays elapsed,
    /// so a wrapped tick counter cannot revive an old signal.
    went_out: bool,
}

impl<P: OutputPin, D: DelayNs> Audio<P, D> {
    /// Drives the trigger line low and starts idle.
    pub fn new(mut pin: P, delay: D) -> Result<Self> {
        pin.set_low().map_err(|_| Error::Pin)?;
        Ok(Self {
            pin,
            delay,
            started_ms: 0,
            stopped: true,
            went_out: true,
        })
    }

    /// Silence any running signal, then start a new one.
    pub fn play(&mut self, now_ms: u32) -> Result<()> {
        self.stop(now_ms)?;
        self.pulse()?;
        self.started_ms = now_ms;
        self.stopped = false;
        self.went_out = false;
        info!("Audio: playing");
        Ok(())
    }

    /// Silence the signal if it is still running.
    pub fn stop(&mut self, now_ms: u32) -> Result<()> {
        if self.is_playing(now_ms) {
            self.pulse()?;
            info!("Audio: stopped");
        }
        self.stopped = true;
        Ok(())
    }

    pub fn is_playing(&mut self, now_ms: u32) -> bool {
        !(self.went_out(now_ms) || self.stopped)
    }

    fn went_out(&mut self, now_ms: u32) -> bool {
        if !self.went_out && ticks_diff(now_ms, self.started_ms) >= AUDIO_DURATION_MS as i32 {
            debug!("Audio: timed out");
            self.went_out = true;
        }
        self.went_out
    }

    fn pulse(&mut self) -> Result<()> {
        self.pin.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(AUDIO_PULSE_MS);
        self.pin.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(AUDIO_PULSE_MS);
        self.pin.set_low().map_err(|_| Error::Pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{NoDelay, RecordingPin};

    fn audio() -> Audio<RecordingPin, NoDelay> {
        Audio::new(RecordingPin::default(), NoDelay::default()).unwrap()
    }

    #[test]
    fn idle_after_construction() {
        let mut a = audio();
        assert!(!a.is_playing(0));
        assert_eq!(a.pin.levels, [false]);
    }

    #[test]
    fn play_emits_one_pulse_and_plays() {
        let mut a = audio();
        a.play(1000).unwrap();
        assert!(a.is_playing(1000));
        assert_eq!(a.pin.levels, [false, false, true, false]);
        assert_eq!(a.delay.total_ms, 2 * AUDIO_PULSE_MS);
    }

    #[test]
    fn times_out_and_stays_out() {
        let mut a = audio();
        a.play(1000).unwrap();
        assert!(a.is_playing(1000 + AUDIO_DURATION_MS - 1));
        assert!(!a.is_playing(1000 + AUDIO_DURATION_MS));
        // Far enough later that the wrapping difference looks negative.
        assert!(!a.is_playing(1000u32.wrapping_add(u32::MAX / 2 + 10)));
        assert!(!a.is_playing(1001));
    }

    #[test]
    fn stop_pulses_only_while_playing() {
        let mut a = audio();
        a.play(0).unwrap();
        a.stop(10).unwrap();
        assert!(!a.is_playing(10));
        assert_eq!(a.pin.high_count(), 2);

        a.stop(20).unwrap();
        assert_eq!(a.pin.high_count(), 2);
    }

    #[test]
    fn stop_after_timeout_does_not_pulse() {
        let mut a = audio();
        a.play(0).unwrap();
        a.stop(AUDIO_DURATION_MS).unwrap();
        assert_eq!(a.pin.high_count(), 1);
    }

    #[test]
    fn replay_silences_previous_signal_first() {
        let mut a = audio();
        a.play(0).unwrap();
        a.play(100).unwrap();
        assert_eq!(a.pin.high_count(), 3);
        assert!(a.is_playing(100 + AUDIO_DURATION_MS - 1));
    }
}
