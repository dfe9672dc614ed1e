//! Centralized balance and tuning constants for Crumble engine logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Simulation cadence -------------------------------------------------------
pub(crate) const TICK_INTERVAL_SECS: f64 = 0.05;
pub(crate) const GOLDEN_SPAWN_INTERVAL_SECS: f64 = 30.0;
pub(crate) const AUTOSAVE_INTERVAL_SECS: f64 = 30.0;

// Golden event tuning ------------------------------------------------------
pub(crate) const GOLDEN_SPAWN_CHANCE: f64 = 0.3;
pub(crate) const GOLDEN_LIFETIME_SECS: f64 = 10.0;
pub(crate) const GOLDEN_BONUS_RATE_MIN: f64 = 10.0;
pub(crate) const GOLDEN_BONUS_RATE_MAX: f64 = 30.0;

// Economy tuning -----------------------------------------------------------
pub(crate) const COST_GROWTH_FACTOR: f64 = 1.15;
pub(crate) const MANUAL_CLICK_YIELD: f64 = 1.0;

// Persistence --------------------------------------------------------------
pub(crate) const SNAPSHOT_VERSION: &str = "1.1";
