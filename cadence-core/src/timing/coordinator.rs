//! Tick barrier timing
//!
//! Both actuators step in lockstep. After a tick the coordinator holds the
//! loop for the longest move, then the longest wait, so neither actuator
//! reads its next instruction while the other is still travelling.

use embedded_hal::delay::DelayNs;

use crate::actuator::StepReport;
use crate::config::TimingConfig;

/// Delays to apply before the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Barrier {
    /// Travel time for the longest move (µs)
    pub move_us: u32,
    /// Hold time for the longest wait (µs)
    pub wait_us: u32,
}

impl Barrier {
    /// Total blocking time (µs)
    pub fn total_us(&self) -> u32 {
        self.move_us.saturating_add(self.wait_us)
    }

    /// Check if the barrier blocks at all
    pub fn is_zero(&self) -> bool {
        self.move_us == 0 && self.wait_us == 0
    }
}

/// Computes and applies the per-tick barrier
#[derive(Debug, Clone, Copy)]
pub struct TimingCoordinator {
    config: TimingConfig,
}

impl TimingCoordinator {
    /// Create a coordinator with the given time units
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Time units in use
    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Size the barrier from this tick's step reports
    pub fn barrier(&self, reports: &[StepReport]) -> Barrier {
        let max_move = reports.iter().map(|r| r.moved_distance).max().unwrap_or(0);
        let max_wait = reports.iter().map(|r| r.wait_units).max().unwrap_or(0);

        Barrier {
            move_us: self.config.move_unit_us.saturating_mul(u32::from(max_move)),
            wait_us: self.config.wait_unit_us.saturating_mul(u32::from(max_wait)),
        }
    }

    /// Block for the move delay, then the wait delay
    pub fn apply<D: DelayNs>(&self, barrier: Barrier, delay: &mut D) {
        if barrier.move_us > 0 {
            delay.delay_us(barrier.move_us);
        }
        if barrier.wait_us > 0 {
            delay.delay_us(barrier.wait_us);
        }
    }

    /// Block for one slot of travel after an operator move
    pub fn settle<D: DelayNs>(&self, delay: &mut D) {
        delay.delay_us(self.config.settle_us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDelay;

    fn report(moved_distance: u8, wait_units: u8) -> StepReport {
        StepReport {
            moved_distance,
            wait_units,
            ..StepReport::default()
        }
    }

    #[test]
    fn test_barrier_takes_maximum() {
        let coordinator = TimingCoordinator::new(TimingConfig::default());
        let barrier = coordinator.barrier(&[report(2, 0), report(5, 31)]);
        assert_eq!(barrier.move_us, 5 * 200_000);
        assert_eq!(barrier.wait_us, 31 * 100_000);
        assert_eq!(barrier.total_us(), 4_100_000);
    }

    #[test]
    fn test_idle_tick_has_no_barrier() {
        let coordinator = TimingCoordinator::new(TimingConfig::default());
        let barrier = coordinator.barrier(&[StepReport::default(), StepReport::default()]);
        assert!(barrier.is_zero());

        let mut delay = RecordingDelay::default();
        coordinator.apply(barrier, &mut delay);
        assert!(delay.calls_us.is_empty());
    }

    #[test]
    fn test_apply_moves_then_waits() {
        let coordinator = TimingCoordinator::new(TimingConfig::default());
        let mut delay = RecordingDelay::default();
        coordinator.apply(coordinator.barrier(&[report(1, 3)]), &mut delay);
        assert_eq!(delay.calls_us, vec![200_000, 300_000]);
    }
}
