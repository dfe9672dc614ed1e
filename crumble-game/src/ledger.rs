//! Spendable balance and lifetime production accounting.
//!
//! Lifetime tracking is kept separate from the spendable balance so that
//! unlock and achievement thresholds measure cumulative production. A
//! threshold can never be satisfied by accumulating, spending, and
//! re-accumulating the same cookies.

use crate::EngineError;

/// Cookie balance with a monotonically non-decreasing lifetime counter.
/// Persistence goes through the snapshot codec, not this type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceLedger {
    current: f64,
    lifetime_earned: f64,
}

impl ResourceLedger {
    /// Rebuild a ledger from persisted totals.
    #[must_use]
    pub(crate) const fn restore(current: f64, lifetime_earned: f64) -> Self {
        Self {
            current,
            lifetime_earned,
        }
    }

    /// Spendable balance.
    #[must_use]
    pub const fn current(&self) -> f64 {
        self.current
    }

    /// Cumulative cookies ever produced. Never decreases.
    #[must_use]
    pub const fn lifetime_earned(&self) -> f64 {
        self.lifetime_earned
    }

    /// Add `amount` to the spendable balance, optionally counting it
    /// toward the lifetime total.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAmount`] for negative or non-finite
    /// amounts. State is unchanged on error.
    pub fn credit(
        &mut self,
        amount: f64,
        counts_toward_lifetime: bool,
    ) -> Result<(), EngineError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(EngineError::InvalidAmount { amount });
        }
        self.current += amount;
        if counts_toward_lifetime {
            self.lifetime_earned += amount;
        }
        Ok(())
    }

    /// Subtract `amount` from the spendable balance.
    ///
    /// Callers are expected to pre-check affordability; failure here is a
    /// programming-error guard, not a recoverable game condition.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAmount`] for negative or non-finite
    /// amounts and [`EngineError::InsufficientFunds`] when `amount`
    /// exceeds the balance. State is unchanged on error.
    pub fn debit(&mut self, amount: f64) -> Result<(), EngineError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(EngineError::InvalidAmount { amount });
        }
        if amount > self.current {
            return Err(EngineError::InsufficientFunds {
                needed: amount,
                available: self.current,
            });
        }
        self.current -= amount;
        Ok(())
    }
}
