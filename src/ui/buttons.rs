//! Polled GPIO buttons with debouncing.
//!
//! Buttons are active-low (internal pull-up): a low level means pressed.
//! Each call to [`ButtonTracker::poll`] samples every pin once and runs
//! its debounce state machine; gestures come back in pin order.

use embedded_hal::digital::InputPin;
use heapless::Vec;

use super::input_logic::{next_phase, Phase};
use super::{ButtonEvent, ButtonId};
use crate::clock::ticks_since;
use crate::error::{Error, Result};

/// Debounce state of one monitored input.
pub struct ButtonState<P> {
    id: ButtonId,
    pin: P,
    phase: Phase,
    last_transition_ms: u32,
}

impl<P: InputPin> ButtonState<P> {
    fn new(id: ButtonId, pin: P) -> Self {
        Self {
            id,
            pin,
            phase: Phase::Up,
            last_transition_ms: 0,
        }
    }

    fn sample(&mut self, now_ms: u32) -> Result<Option<ButtonEvent>> {
        let pressed = self.pin.is_low().map_err(|_| Error::Pin)?;
        let elapsed = ticks_since(now_ms, self.last_transition_ms);

        let t = next_phase(self.phase, pressed, elapsed);
        if t.phase != self.phase {
            trace!("Button {}: {} -> {}", self.id, self.phase, t.phase);
        }
        self.phase = t.phase;
        if t.restamp {
            self.last_transition_ms = now_ms;
        }

        Ok(t.action.map(|action| ButtonEvent { button: self.id, action }))
    }
}

/// Watches `N` buttons.
pub struct ButtonTracker<P, const N: usize> {
    buttons: [ButtonState<P>; N],
}

impl<P: InputPin, const N: usize> ButtonTracker<P, N> {
    pub fn new(pins: [(ButtonId, P); N]) -> Self {
        Self {
            buttons: pins.map(|(id, pin)| ButtonState::new(id, pin)),
        }
    }

    /// Sample every button once. A pin read failure aborts the poll.
    pub fn poll(&mut self, now_ms: u32) -> Result<Vec<ButtonEvent, N>> {
        let mut events = Vec::new();
        for button in self.buttons.iter_mut() {
            if let Some(event) = button.sample(now_ms)? {
                debug!("Button {}: {}", event.button, event.action);
                // One event per button per poll; capacity is N.
                let _ = events.push(event);
            }
        }
        Ok(events)
    }

    pub fn phase(&self, id: ButtonId) -> Option<Phase> {
        self.buttons.iter().find(|b| b.id == id).map(|b| b.phase)
    }
}
