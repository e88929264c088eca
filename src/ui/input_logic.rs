//! Pure button state machine and selection helpers.

use super::ButtonAction;
use crate::config::{DEBOUNCE_INTERVAL_MS, LONG_PRESS_THRESH_MS};

/// Debounced phase of one button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    #[default]
    Up,
    Down,
    /// Held past the long-press threshold; the long press was reported.
    LongDown,
}

/// Result of feeding one sample into [`next_phase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub phase: Phase,
    pub action: Option<ButtonAction>,
    /// Move the transition timestamp to now.
    pub restamp: bool,
}

impl Transition {
    const fn stay(phase: Phase) -> Self {
        Self { phase, action: None, restamp: false }
    }
}

/// Advance a button given the sampled level and the time since its last
/// accepted transition. `elapsed_ms` is a wrapping distance, valid for up
/// to one full `u32` period of the tick counter.
pub fn next_phase(phase: Phase, pressed: bool, elapsed_ms: u32) -> Transition {
    if elapsed_ms < DEBOUNCE_INTERVAL_MS {
        return Transition::stay(phase);
    }

    match (phase, pressed) {
        (Phase::Up, true) => Transition { phase: Phase::Down, action: None, restamp: true },
        (Phase::Up, false) => Transition::stay(Phase::Up),
        (Phase::Down, true) if elapsed_ms >= LONG_PRESS_THRESH_MS => Transition {
            // Keep the press timestamp: the long press fires once per press.
            phase: Phase::LongDown,
            action: Some(ButtonAction::LongPress),
            restamp: false,
        },
        (Phase::Down, true) => Transition::stay(Phase::Down),
        (Phase::Down, false) => Transition {
            phase: Phase::Up,
            action: Some(ButtonAction::Click),
            restamp: true,
        },
        (Phase::LongDown, true) => Transition::stay(Phase::LongDown),
        (Phase::LongDown, false) => Transition { phase: Phase::Up, action: None, restamp: true },
    }
}

/// Move selection cursor one item forward, wrapping to the start.
pub fn select_next_wrapping(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        0
    } else {
        (selected + 1) % item_count
    }
}
