//! Golden event state machine.
//!
//! Dormant -> Active (on spawn) -> Claimed | Expired -> Dormant. At most
//! one instance is live at a time and no instance is ever reactivated; a
//! new spawn creates a fresh one.

use crate::EngineError;
use crate::constants::GOLDEN_LIFETIME_SECS;

/// Transient bonus opportunity with an expiry deadline. Never persisted;
/// a live instance simply lapses across a save/load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GoldenEvent {
    active: bool,
    expires_at: f64,
}

impl GoldenEvent {
    /// Whether an instance is live at `now`. Expiry is checked lazily, so
    /// a timed-out instance reads as inactive even before the scheduler
    /// sweeps it.
    #[must_use]
    pub fn is_active(&self, now: f64) -> bool {
        self.active && now < self.expires_at
    }

    /// Deadline of the live instance, if any.
    #[must_use]
    pub fn expires_at(&self, now: f64) -> Option<f64> {
        self.is_active(now).then_some(self.expires_at)
    }

    /// Activate a fresh instance. A spawn while one is live is skipped;
    /// returns whether a new instance went live.
    pub fn spawn(&mut self, now: f64) -> bool {
        if self.is_active(now) {
            return false;
        }
        self.active = true;
        self.expires_at = now + GOLDEN_LIFETIME_SECS;
        true
    }

    /// Deactivate a timed-out instance. Returns whether an expiry
    /// transition happened.
    pub fn expire_if_due(&mut self, now: f64) -> bool {
        if self.active && now >= self.expires_at {
            self.active = false;
            return true;
        }
        false
    }

    /// Consume the live instance. Only the first claim succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoActiveEvent`] when no instance is live at
    /// `now`.
    pub fn claim(&mut self, now: f64) -> Result<(), EngineError> {
        if !self.is_active(now) {
            return Err(EngineError::NoActiveEvent);
        }
        self.active = false;
        Ok(())
    }
}
