//! Periodic drivers for the simulation: tick accrual, golden-event
//! spawning, and autosave.
//!
//! The scheduler never reads a wall clock; the external driver supplies
//! `now` from the injected monotonic clock. Tick accounting stores only
//! the last tick timestamp and always computes elapsed time from absolute
//! instants, so drift or missed ticks never double-count or lose time.

use crate::constants::{AUTOSAVE_INTERVAL_SECS, GOLDEN_SPAWN_INTERVAL_SECS, TICK_INTERVAL_SECS};
use crate::numbers::non_negative_secs;

/// Cadence state for the engine's periodic drivers. Never persisted;
/// saves re-arm the drivers from the load timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduler {
    running: bool,
    last_tick: f64,
    next_spawn_at: f64,
    next_autosave_at: f64,
}

impl Scheduler {
    /// Arm all drivers relative to `now`.
    #[must_use]
    pub fn started_at(now: f64) -> Self {
        Self {
            running: true,
            last_tick: now,
            next_spawn_at: now + GOLDEN_SPAWN_INTERVAL_SECS,
            next_autosave_at: now + AUTOSAVE_INTERVAL_SECS,
        }
    }

    /// Whether the periodic drivers are live.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Cancel both periodic drivers. Subsequent pumps are no-ops until
    /// [`Scheduler::resume`].
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Re-arm the drivers relative to `now`. The paused span is not
    /// replayed as tick income.
    pub fn resume(&mut self, now: f64) {
        *self = Self::started_at(now);
    }

    /// Fire the tick driver if due, returning the elapsed seconds since
    /// the previous tick. The last-tick timestamp is updated
    /// unconditionally on fire.
    pub fn take_tick(&mut self, now: f64) -> Option<f64> {
        if !self.running || now - self.last_tick < TICK_INTERVAL_SECS {
            return None;
        }
        let elapsed = non_negative_secs(now - self.last_tick);
        self.last_tick = now;
        Some(elapsed)
    }

    /// Fire the golden-event spawner if due. Missed intervals collapse
    /// into a single fire; the spawner is a chance roll, not owed income.
    pub fn take_spawn(&mut self, now: f64) -> bool {
        if !self.running || now < self.next_spawn_at {
            return false;
        }
        self.next_spawn_at = now + GOLDEN_SPAWN_INTERVAL_SECS;
        true
    }

    /// Fire the autosave driver if due.
    pub fn take_autosave(&mut self, now: f64) -> bool {
        if !self.running || now < self.next_autosave_at {
            return false;
        }
        self.next_autosave_at = now + AUTOSAVE_INTERVAL_SECS;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_elapsed_spans_full_gap() {
        let mut sched = Scheduler::started_at(100.0);
        assert_eq!(sched.take_tick(100.01), None);
        // One late fire accounts for the whole gap, not one interval.
        let elapsed = sched.take_tick(100.75).unwrap();
        assert!((elapsed - 0.75).abs() < 1e-9);
        // Immediately after, nothing is due.
        assert_eq!(sched.take_tick(100.76), None);
    }

    #[test]
    fn missed_spawn_windows_collapse_to_one_fire() {
        let mut sched = Scheduler::started_at(0.0);
        assert!(!sched.take_spawn(29.9));
        assert!(sched.take_spawn(95.0));
        assert!(!sched.take_spawn(95.0));
        assert!(sched.take_spawn(125.0));
    }

    #[test]
    fn stop_cancels_all_drivers() {
        let mut sched = Scheduler::started_at(0.0);
        sched.stop();
        assert!(!sched.is_running());
        assert_eq!(sched.take_tick(1_000.0), None);
        assert!(!sched.take_spawn(1_000.0));
        assert!(!sched.take_autosave(1_000.0));

        // Resuming re-arms without replaying the paused span.
        sched.resume(1_000.0);
        assert_eq!(sched.take_tick(1_000.0), None);
        let elapsed = sched.take_tick(1_000.1).unwrap();
        assert!((elapsed - 0.1).abs() < 1e-9);
    }

    #[test]
    fn autosave_fires_on_its_own_cadence() {
        let mut sched = Scheduler::started_at(0.0);
        assert!(!sched.take_autosave(29.0));
        assert!(sched.take_autosave(30.0));
        assert!(!sched.take_autosave(31.0));
        assert!(sched.take_autosave(60.0));
    }
}
