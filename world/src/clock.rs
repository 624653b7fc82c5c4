//! Game-time clock tracking the day counter and the time spent in the active phase.

use std::time::Duration;

/// Pausable clock advanced only by scaled game time.
#[derive(Clone, Debug, Default)]
pub struct PhaseClock {
    day: u32,
    in_phase: Duration,
    total: Duration,
}

impl PhaseClock {
    /// Creates a clock on day zero with no elapsed time.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            day: 0,
            in_phase: Duration::ZERO,
            total: Duration::ZERO,
        }
    }

    /// Current value of the day counter.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Game time spent in the active phase.
    #[must_use]
    pub const fn in_phase(&self) -> Duration {
        self.in_phase
    }

    /// Game time elapsed since the clock was created.
    #[must_use]
    pub const fn total(&self) -> Duration {
        self.total
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.in_phase = self.in_phase.saturating_add(dt);
        self.total = self.total.saturating_add(dt);
    }

    pub(crate) fn restart_phase(&mut self) {
        self.in_phase = Duration::ZERO;
    }

    pub(crate) fn advance_day(&mut self) -> u32 {
        self.day = self.day.saturating_add(1);
        self.day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restarting_phase_keeps_total_time() {
        let mut clock = PhaseClock::new();
        clock.advance(Duration::from_secs(3));
        clock.restart_phase();
        clock.advance(Duration::from_secs(2));

        assert_eq!(clock.in_phase(), Duration::from_secs(2));
        assert_eq!(clock.total(), Duration::from_secs(5));
    }

    #[test]
    fn day_counter_only_moves_forward() {
        let mut clock = PhaseClock::new();
        assert_eq!(clock.day(), 0);
        assert_eq!(clock.advance_day(), 1);
        assert_eq!(clock.advance_day(), 2);
    }
}
