//! Pure backlight ramp and auto-off decisions.

/// Move `current` one `step` toward `target` without overshooting.
pub fn step_brightness(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else if current > target {
        (current - step).max(target)
    } else {
        current
    }
}

/// PWM duty for a brightness in `[0, 1]`, rounded to the nearest step.
pub fn duty_for(brightness: f32, max_duty: u16) -> u16 {
    let clamped = brightness.clamp(0.0, 1.0);
    libm::roundf(clamped * f32::from(max_duty)) as u16
}

/// Inactivity long enough to switch the backlight off.
pub fn idle_timed_out(idle_ms: u32, timeout_ms: u32) -> bool {
    idle_ms >= timeout_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_stops_exactly_at_target() {
        let mut b = 0.0;
        for _ in 0..300 {
            b = step_brightness(b, 1.0, 0.005);
        }
        assert_eq!(b, 1.0);
        for _ in 0..300 {
            b = step_brightness(b, 0.0, 0.005);
        }
        assert_eq!(b, 0.0);
    }

    #[test]
    fn ramp_does_not_overshoot_with_coarse_step() {
        assert_eq!(step_brightness(0.9, 1.0, 0.3), 1.0);
        assert_eq!(step_brightness(0.1, 0.0, 0.3), 0.0);
    }

    #[test]
    fn duty_rounds_and_clamps() {
        assert_eq!(duty_for(0.0, 1023), 0);
        assert_eq!(duty_for(1.0, 1023), 1023);
        assert_eq!(duty_for(0.5, 1023), 512);
        assert_eq!(duty_for(1.5, 1023), 1023);
        assert_eq!(duty_for(-0.2, 1023), 0);
    }

    #[test]
    fn times_out_at_threshold() {
        assert!(!idle_timed_out(999, 1000));
        assert!(idle_timed_out(1000, 1000));
        assert!(idle_timed_out(u32::MAX, 1000));
    }
}
