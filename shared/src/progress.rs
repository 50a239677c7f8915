//! Simulated progress shown while an upscale request is outstanding.
//!
//! The service reports no progress of its own, so the value is a schedule that
//! moves quickly at first and slows down near completion, never passing
//! [`CEILING_PERCENT`] until the real response arrives.

/// Value a run starts from.
pub const START_PERCENT: f64 = 10.0;
/// Highest value the simulation may reach on its own.
pub const CEILING_PERCENT: f64 = 98.0;
/// Value forced on success.
pub const COMPLETE_PERCENT: f64 = 100.0;
/// Value forced on failure and on a fresh selection.
pub const RESET_PERCENT: f64 = 0.0;
/// Simulated value at which the label switches from uploading to processing.
pub const UPLOAD_PHASE_THRESHOLD: f64 = 25.0;
/// Milliseconds between two ticks.
pub const TICK_INTERVAL_MS: u32 = 100;

/// Amount added by one tick at the given value.
pub fn step_for(value: f64) -> f64 {
    if value < 20.0 {
        1.0
    } else if value < 70.0 {
        0.5
    } else if value < 90.0 {
        0.1
    } else {
        0.05
    }
}

/// Value after one tick. Never decreases and never exceeds the ceiling.
pub fn next_value(value: f64) -> f64 {
    if value >= CEILING_PERCENT {
        return value;
    }
    (value + step_for(value)).min(CEILING_PERCENT)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedProgress {
    value: f64,
    uploading: bool,
}

impl SimulatedProgress {
    pub fn start() -> Self {
        Self {
            value: START_PERCENT,
            uploading: true,
        }
    }

    /// Advances by one tick and returns the new value.
    pub fn advance(&mut self) -> f64 {
        self.value = next_value(self.value);
        if self.value >= UPLOAD_PHASE_THRESHOLD {
            self.uploading = false;
        }
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }
}

impl Default for SimulatedProgress {
    fn default() -> Self {
        Self::start()
    }
}

/// Whole percent for display.
pub fn display_percent(value: f64) -> u8 {
    value.clamp(RESET_PERCENT, COMPLETE_PERCENT).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn schedule_decelerates() {
        assert_eq!(step_for(10.0), 1.0);
        assert_eq!(step_for(19.9), 1.0);
        assert_eq!(step_for(20.0), 0.5);
        assert_eq!(step_for(69.5), 0.5);
        assert_eq!(step_for(70.0), 0.1);
        assert_eq!(step_for(89.9), 0.1);
        assert_eq!(step_for(90.0), 0.05);
    }

    #[test]
    fn value_is_capped_at_ceiling() {
        assert!(approx(next_value(97.99), CEILING_PERCENT));
        assert_eq!(next_value(CEILING_PERCENT), CEILING_PERCENT);
    }

    #[test]
    fn uploading_flag_flips_at_threshold() {
        let mut progress = SimulatedProgress::start();
        assert!(progress.is_uploading());

        // 10 -> 20 takes ten ticks at +1, then +0.5 per tick up to 25.
        for _ in 0..19 {
            progress.advance();
        }
        assert!(progress.value() < UPLOAD_PHASE_THRESHOLD);
        assert!(progress.is_uploading());

        progress.advance();
        assert!(approx(progress.value(), UPLOAD_PHASE_THRESHOLD));
        assert!(!progress.is_uploading());
    }

    #[test]
    fn long_simulation_is_monotonic_and_bounded() {
        let mut progress = SimulatedProgress::start();
        let mut last = progress.value();
        for _ in 0..10_000 {
            let next = progress.advance();
            assert!(next >= last);
            assert!(next <= CEILING_PERCENT);
            last = next;
        }
        assert_eq!(last, CEILING_PERCENT);
    }

    #[test]
    fn display_percent_rounds_and_clamps() {
        assert_eq!(display_percent(24.6), 25);
        assert_eq!(display_percent(-3.0), 0);
        assert_eq!(display_percent(140.0), 100);
    }
}
