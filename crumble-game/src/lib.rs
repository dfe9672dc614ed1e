//! Crumble Game Engine
//!
//! Platform-agnostic core economy logic for the Crumble incremental game.
//! This crate provides the tick-driven accumulation simulator without UI
//! or platform-specific dependencies: the presentation layer injects a
//! monotonic clock and a persistence store and consumes typed events and
//! view projections.

pub mod achievements;
pub mod catalog;
pub mod constants;
pub mod engine;
pub mod events;
pub mod golden;
pub mod ledger;
pub mod numbers;
pub mod rng;
pub mod scheduler;
pub mod snapshot;

// Re-export commonly used types
pub use achievements::{
    AchievementDef, AchievementRoster, Condition, DEFAULT_ACHIEVEMENTS, Grant, ProgressProbe,
};
pub use catalog::{DEFAULT_PRODUCERS, Producer, ProducerCatalog, ProducerDef, cost_for_count};
pub use engine::{
    AchievementView, Engine, GoldenEventView, LedgerView, ProducerView, PumpOutcome, StatsView,
};
pub use events::{EngineEvent, EventBatch};
pub use golden::GoldenEvent;
pub use ledger::ResourceLedger;
pub use rng::RngBundle;
pub use scheduler::Scheduler;
pub use snapshot::{ProducerRecord, Snapshot};

use thiserror::Error;

/// Recoverable command and persistence failures.
///
/// Every variant is a local condition returned to the caller with state
/// unchanged; nothing here is process-fatal. [`EngineError::InvalidSnapshot`]
/// additionally degrades to default-state initialization at the
/// persistence facade rather than propagating.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("amount must be a non-negative finite number (got {amount})")]
    InvalidAmount { amount: f64 },
    #[error("insufficient funds: need {needed:.0}, have {available:.0}")]
    InsufficientFunds { needed: f64, available: f64 },
    #[error("unknown producer {id:?}")]
    UnknownProducer { id: String },
    #[error("producer {id:?} has not been unlocked")]
    Locked { id: String },
    #[error("no golden event is active")]
    NoActiveEvent,
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },
}

/// Trait for abstracting monotonic time reads.
/// Platform-specific implementations should provide this; the engine
/// never reads a wall clock directly.
pub trait Clock {
    /// Current monotonic time in seconds.
    fn now(&self) -> f64;
}

/// Trait for abstracting snapshot save/load operations.
/// Platform-specific implementations should provide this.
pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a snapshot under the named slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    fn save(&self, slot: &str, snapshot: &Snapshot) -> Result<(), Self::Error>;

    /// Load the snapshot stored under the named slot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot cannot be read.
    fn load(&self, slot: &str) -> Result<Option<Snapshot>, Self::Error>;

    /// Delete the snapshot stored under the named slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete(&self, slot: &str) -> Result<(), Self::Error>;
}

/// Persistence and lifecycle facade wiring an [`Engine`] to the injected
/// clock and store.
///
/// Saves are synchronous best-effort: a failed save is logged at this
/// boundary and never retried, and it never fails the triggering command.
pub struct GameEngine<C, S>
where
    C: Clock,
    S: SnapshotStore,
{
    clock: C,
    store: S,
    slot: String,
}

impl<C, S> GameEngine<C, S>
where
    C: Clock,
    S: SnapshotStore,
{
    /// Create a facade with the provided clock, store, and save slot.
    pub fn new(clock: C, store: S, slot: impl Into<String>) -> Self {
        Self {
            clock,
            store,
            slot: slot.into(),
        }
    }

    /// Start a session: load the stored snapshot when present and valid,
    /// otherwise begin from a fresh default state. A malformed stored
    /// snapshot or a store read failure degrades to the default state
    /// rather than propagating.
    pub fn start(&self, seed: u64) -> Engine {
        let now = self.clock.now();
        match self.store.load(&self.slot) {
            Ok(Some(snapshot)) => match Engine::from_snapshot(&snapshot, seed, now) {
                Ok(engine) => engine,
                Err(e) => {
                    log::warn!("discarding stored snapshot: {e}");
                    Engine::new(seed, now)
                }
            },
            Ok(None) => Engine::new(seed, now),
            Err(e) => {
                log::warn!("snapshot load failed: {e}");
                Engine::new(seed, now)
            }
        }
    }

    /// Stop a session: cancel the periodic drivers and make a final
    /// best-effort save.
    pub fn stop(&self, engine: &mut Engine) {
        engine.stop();
        self.save_best_effort(engine);
    }

    /// Pump the periodic drivers at the current clock reading, persisting
    /// when the autosave driver fires.
    pub fn pump(&self, engine: &mut Engine) -> PumpOutcome {
        let outcome = engine.pump(self.clock.now());
        if outcome.autosave_due {
            self.save_best_effort(engine);
        }
        outcome
    }

    /// Purchase one producer unit, persisting on success.
    ///
    /// # Errors
    ///
    /// Propagates the engine's purchase errors; state is unchanged and
    /// nothing is saved on error.
    pub fn purchase(&self, engine: &mut Engine, id: &str) -> Result<(), EngineError> {
        engine.purchase(id)?;
        self.save_best_effort(engine);
        Ok(())
    }

    /// Claim the live golden event, persisting on success.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoActiveEvent`] when no event is live.
    pub fn claim_golden_event(&self, engine: &mut Engine) -> Result<f64, EngineError> {
        let amount = engine.claim_golden_event(self.clock.now())?;
        self.save_best_effort(engine);
        Ok(amount)
    }

    /// Credit one manual click.
    pub fn credit_manual_click(&self, engine: &mut Engine) {
        engine.credit_manual_click();
    }

    /// Explicitly persist the session.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the snapshot cannot be saved.
    pub fn save(&self, engine: &Engine) -> Result<(), anyhow::Error> {
        let snapshot = engine.to_snapshot(self.clock.now());
        self.store
            .save(&self.slot, &snapshot)
            .map_err(anyhow::Error::new)
    }

    fn save_best_effort(&self, engine: &Engine) {
        if let Err(e) = self.save(engine) {
            log::warn!("snapshot save failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct ManualClock(Rc<Cell<f64>>);

    impl ManualClock {
        fn set(&self, now: f64) {
            self.0.set(now);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> f64 {
            self.0.get()
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        slots: Rc<RefCell<HashMap<String, Snapshot>>>,
    }

    impl SnapshotStore for MemoryStore {
        type Error = Infallible;

        fn save(&self, slot: &str, snapshot: &Snapshot) -> Result<(), Self::Error> {
            self.slots
                .borrow_mut()
                .insert(slot.to_string(), snapshot.clone());
            Ok(())
        }

        fn load(&self, slot: &str) -> Result<Option<Snapshot>, Self::Error> {
            Ok(self.slots.borrow().get(slot).cloned())
        }

        fn delete(&self, slot: &str) -> Result<(), Self::Error> {
            self.slots.borrow_mut().remove(slot);
            Ok(())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("store offline")]
    struct StoreOffline;

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        type Error = StoreOffline;

        fn save(&self, _slot: &str, _snapshot: &Snapshot) -> Result<(), Self::Error> {
            Err(StoreOffline)
        }

        fn load(&self, _slot: &str) -> Result<Option<Snapshot>, Self::Error> {
            Err(StoreOffline)
        }

        fn delete(&self, _slot: &str) -> Result<(), Self::Error> {
            Err(StoreOffline)
        }
    }

    #[test]
    fn facade_roundtrips_session_state() {
        let clock = ManualClock::default();
        let store = MemoryStore::default();
        let facade = GameEngine::new(clock.clone(), store.clone(), "slot-one");

        let mut engine = facade.start(42);
        engine.credit_clicks(100.0).unwrap();
        facade.purchase(&mut engine, "cursor").unwrap();
        clock.set(10.0);
        facade.stop(&mut engine);
        assert!(!engine.is_running());

        let resumed = facade.start(42);
        let cursor = resumed
            .producer_views()
            .into_iter()
            .find(|p| p.id == "cursor")
            .unwrap();
        assert_eq!(cursor.count, 1);
        assert!((resumed.ledger_view().lifetime_earned - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_stored_snapshot_degrades_to_fresh_state() {
        let store = MemoryStore::default();
        let mut bad = Engine::new(1, 0.0).to_snapshot(0.0);
        bad.version = "0.0".to_string();
        store.save("slot-one", &bad).unwrap();

        let facade = GameEngine::new(ManualClock::default(), store, "slot-one");
        let engine = facade.start(1);
        let view = engine.ledger_view();
        assert!((view.current - 0.0).abs() < f64::EPSILON);
        assert!((view.lifetime_earned - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_save_never_fails_the_command() {
        let facade = GameEngine::new(ManualClock::default(), FailingStore, "slot-one");
        let mut engine = facade.start(7);
        engine.credit_clicks(20.0).unwrap();
        facade.purchase(&mut engine, "cursor").unwrap();
        assert_eq!(
            engine
                .producer_views()
                .iter()
                .find(|p| p.id == "cursor")
                .unwrap()
                .count,
            1
        );
        assert!(facade.save(&engine).is_err());
    }

    #[test]
    fn autosave_persists_on_scheduler_cadence() {
        let clock = ManualClock::default();
        let store = MemoryStore::default();
        let facade = GameEngine::new(clock.clone(), store.clone(), "slot-one");
        let mut engine = facade.start(9);
        engine.credit_clicks(5.0).unwrap();

        clock.set(1.0);
        facade.pump(&mut engine);
        assert!(store.load("slot-one").unwrap().is_none());

        clock.set(31.0);
        let outcome = facade.pump(&mut engine);
        assert!(outcome.autosave_due);
        let saved = store.load("slot-one").unwrap().expect("autosaved");
        assert!((saved.lifetime_earned - 5.0).abs() < f64::EPSILON);
    }
}
