//! Engine orchestrator binding the ledger, catalog, achievements, golden
//! events, and scheduler into one explicit instance.
//!
//! All mutation happens on one logical execution context: the external
//! driver pumps the engine with the current clock reading, and commands
//! issued between pumps apply immediately and atomically. The engine
//! never reads a wall clock and never touches rendering; the presentation
//! layer drains typed events instead.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::EngineError;
use crate::achievements::{AchievementRoster, GrantBatch, ProgressProbe};
use crate::catalog::ProducerCatalog;
use crate::constants::{
    GOLDEN_BONUS_RATE_MAX, GOLDEN_BONUS_RATE_MIN, GOLDEN_SPAWN_CHANCE, MANUAL_CLICK_YIELD,
};
use crate::events::{EngineEvent, EventBatch};
use crate::golden::GoldenEvent;
use crate::ledger::ResourceLedger;
use crate::numbers::{floor_f64_to_u64, non_negative_secs};
use crate::rng::RngBundle;
use crate::scheduler::Scheduler;
use crate::snapshot::{ProducerRecord, Snapshot};

/// Result of a single pump of the periodic drivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PumpOutcome {
    /// Whether the tick driver fired.
    pub ticked: bool,
    /// Whether the autosave driver fired; the persistence facade reacts.
    pub autosave_due: bool,
}

/// Presentation projection of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerView {
    pub current: f64,
    /// Whole-cookie display value, truncated toward zero.
    pub current_whole: u64,
    pub lifetime_earned: f64,
    pub production_rate: f64,
}

/// Presentation projection of one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerView {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub count: u32,
    pub current_cost: f64,
    pub yield_per_unit: f64,
    pub unlocked: bool,
    pub affordable: bool,
}

/// Presentation projection of one achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementView {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub bonus_percent: f64,
    pub granted: bool,
}

/// Presentation projection of the golden event slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldenEventView {
    pub active: bool,
    pub expires_at: Option<f64>,
}

/// Session statistics for the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
    pub started_at: f64,
    pub golden_events_claimed: u32,
    pub achievements_granted: u32,
    pub total_units: u32,
}

/// The incremental economy engine.
#[derive(Debug, Clone)]
pub struct Engine {
    seed: u64,
    ledger: ResourceLedger,
    catalog: ProducerCatalog,
    achievements: AchievementRoster,
    golden: GoldenEvent,
    scheduler: Scheduler,
    rng: RngBundle,
    golden_events_claimed: u32,
    started_at: f64,
    events: Vec<EngineEvent>,
}

impl Engine {
    /// Fresh default state with all drivers armed at `now`.
    #[must_use]
    pub fn new(seed: u64, now: f64) -> Self {
        Self {
            seed,
            ledger: ResourceLedger::default(),
            catalog: ProducerCatalog::with_defaults(),
            achievements: AchievementRoster::with_defaults(),
            golden: GoldenEvent::default(),
            scheduler: Scheduler::started_at(now),
            rng: RngBundle::from_user_seed(seed),
            golden_events_claimed: 0,
            started_at: now,
            events: Vec::new(),
        }
    }

    /// Rebuild an engine from a persisted snapshot, applying offline
    /// catch-up once.
    ///
    /// Elapsed offline time is `now - last_saved_at` (clamped to zero for
    /// backward clocks); the catch-up credit is `rate * elapsed`, applied
    /// as a single lifetime-counted credit before normal ticking resumes.
    /// Achievement grants are not persisted; predicates re-evaluate here
    /// and re-apply their bonuses, matching the grant-once-per-session
    /// contract.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSnapshot`] when the snapshot fails
    /// validation. Callers degrade to [`Engine::new`] rather than crash.
    pub fn from_snapshot(snapshot: &Snapshot, seed: u64, now: f64) -> Result<Self, EngineError> {
        snapshot.validate()?;
        let mut engine = Self::new(seed, now);
        engine.ledger = ResourceLedger::restore(snapshot.current, snapshot.lifetime_earned);
        engine.golden_events_claimed = snapshot.golden_events_claimed;
        for (id, record) in &snapshot.producers {
            engine.catalog.restore_entry(id, record.count);
        }

        if let Some(saved_at) = snapshot.last_saved_at {
            let elapsed = non_negative_secs(now - saved_at);
            let amount = engine.catalog.production_rate() * elapsed;
            if amount > 0.0 {
                engine.ledger.credit(amount, true)?;
                engine.events.push(EngineEvent::OfflineProgress { amount });
            }
        }

        engine.refresh_unlocks();
        engine.evaluate_achievements();
        Ok(engine)
    }

    /// Seed this engine was constructed with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the periodic drivers are live.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Cancel the periodic drivers. Commands keep working; ticks and
    /// spawns stop until [`Engine::resume`].
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Re-arm the periodic drivers at `now` without replaying the pause.
    pub fn resume(&mut self, now: f64) {
        self.scheduler.resume(now);
    }

    /// Run every periodic driver that is due at `now`.
    ///
    /// Order per pump: golden expiry sweep, tick accrual (production
    /// credit, unlock refresh, achievement evaluation), spawner roll,
    /// autosave check. Everything runs to completion atomically.
    pub fn pump(&mut self, now: f64) -> PumpOutcome {
        let mut outcome = PumpOutcome::default();
        if !self.scheduler.is_running() {
            return outcome;
        }

        self.golden.expire_if_due(now);

        if let Some(elapsed) = self.scheduler.take_tick(now) {
            outcome.ticked = true;
            let income = self.catalog.production_rate() * elapsed;
            if income > 0.0 {
                // Tick income is real production and counts toward lifetime.
                let _ = self.ledger.credit(income, true);
            }
            self.refresh_unlocks();
            self.evaluate_achievements();
        }

        if self.scheduler.take_spawn(now) {
            let roll: f64 = self.rng.spawn().gen_range(0.0..1.0);
            if roll < GOLDEN_SPAWN_CHANCE && self.golden.spawn(now) {
                self.events.push(EngineEvent::GoldenEventSpawned {
                    expires_at: now + crate::constants::GOLDEN_LIFETIME_SECS,
                });
            }
        }

        outcome.autosave_due = self.scheduler.take_autosave(now);
        outcome
    }

    /// Buy one unit of `id` at its current cost.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError::UnknownProducer`], [`EngineError::Locked`],
    /// or [`EngineError::InsufficientFunds`]; state is unchanged on error.
    pub fn purchase(&mut self, id: &str) -> Result<(), EngineError> {
        self.catalog.purchase(id, &mut self.ledger)?;
        Ok(())
    }

    /// Credit one manual click.
    pub fn credit_manual_click(&mut self) {
        // The fixed click yield is always a valid amount.
        let _ = self.credit_clicks(MANUAL_CLICK_YIELD);
    }

    /// Credit an explicit click amount, counted toward lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAmount`] for negative or non-finite
    /// amounts.
    pub fn credit_clicks(&mut self, amount: f64) -> Result<(), EngineError> {
        self.ledger.credit(amount, true)
    }

    /// Claim the live golden event for a one-time credit of
    /// `production_rate * uniform(10, 30)`. Returns the credited amount.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoActiveEvent`] when no event is live at
    /// `now`; only the first claim on an active event succeeds.
    pub fn claim_golden_event(&mut self, now: f64) -> Result<f64, EngineError> {
        self.golden.claim(now)?;
        let multiplier: f64 = self
            .rng
            .bonus()
            .gen_range(GOLDEN_BONUS_RATE_MIN..GOLDEN_BONUS_RATE_MAX);
        let amount = self.catalog.production_rate() * multiplier;
        self.ledger.credit(amount, true)?;
        self.golden_events_claimed = self.golden_events_claimed.saturating_add(1);
        self.events.push(EngineEvent::GoldenEventClaimed { amount });
        Ok(amount)
    }

    /// Pure affordability query: unlocked and within the current balance.
    #[must_use]
    pub fn affordable(&self, id: &str) -> bool {
        self.catalog.affordable(id, self.ledger.current())
    }

    /// Drain events accumulated since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ledger projection.
    #[must_use]
    pub fn ledger_view(&self) -> LedgerView {
        LedgerView {
            current: self.ledger.current(),
            current_whole: floor_f64_to_u64(self.ledger.current()),
            lifetime_earned: self.ledger.lifetime_earned(),
            production_rate: self.catalog.production_rate(),
        }
    }

    /// Catalog projection in declaration order.
    #[must_use]
    pub fn producer_views(&self) -> Vec<ProducerView> {
        let current = self.ledger.current();
        self.catalog
            .iter()
            .map(|p| ProducerView {
                id: p.id.clone(),
                name: p.name.clone(),
                desc: p.desc.clone(),
                count: p.count,
                current_cost: p.current_cost,
                yield_per_unit: p.yield_per_unit,
                unlocked: p.unlocked,
                affordable: p.unlocked && current >= p.current_cost,
            })
            .collect()
    }

    /// Achievement projection in declaration order.
    #[must_use]
    pub fn achievement_views(&self) -> Vec<AchievementView> {
        self.achievements
            .iter()
            .map(|a| AchievementView {
                id: a.def.id.to_string(),
                name: a.def.name.to_string(),
                desc: a.def.desc.to_string(),
                bonus_percent: a.def.bonus_percent,
                granted: a.granted,
            })
            .collect()
    }

    /// Golden event projection at `now`.
    #[must_use]
    pub fn golden_event_view(&self, now: f64) -> GoldenEventView {
        GoldenEventView {
            active: self.golden.is_active(now),
            expires_at: self.golden.expires_at(now),
        }
    }

    /// Session statistics projection.
    #[must_use]
    pub fn stats_view(&self) -> StatsView {
        StatsView {
            started_at: self.started_at,
            golden_events_claimed: self.golden_events_claimed,
            achievements_granted: u32::try_from(self.achievements.granted_count()).unwrap_or(0),
            total_units: self.catalog.total_units(),
        }
    }

    /// Pure serializable projection of the persistent state, stamped with
    /// the save instant.
    #[must_use]
    pub fn to_snapshot(&self, now: f64) -> Snapshot {
        Snapshot {
            version: Snapshot::current_version().to_string(),
            current: self.ledger.current(),
            lifetime_earned: self.ledger.lifetime_earned(),
            golden_events_claimed: self.golden_events_claimed,
            producers: self
                .catalog
                .iter()
                .map(|p| {
                    (
                        p.id.clone(),
                        ProducerRecord {
                            count: p.count,
                            current_cost: p.current_cost,
                        },
                    )
                })
                .collect(),
            last_saved_at: Some(now),
        }
    }

    fn refresh_unlocks(&mut self) {
        let newly = self.catalog.refresh_unlocks(self.ledger.lifetime_earned());
        for id in newly {
            self.events.push(EngineEvent::CatalogChanged { id });
        }
    }

    fn evaluate_achievements(&mut self) {
        let probe = self.probe();
        let grants: GrantBatch = self.achievements.evaluate(&probe);
        for grant in grants {
            self.catalog
                .scale_all_yields(1.0 + grant.bonus_percent / 100.0);
            self.events.push(EngineEvent::AchievementGranted {
                id: grant.id.to_string(),
            });
        }
    }

    fn probe(&self) -> ProgressProbe {
        ProgressProbe {
            lifetime_earned: self.ledger.lifetime_earned(),
            production_rate: self.catalog.production_rate(),
            total_units: self.catalog.total_units(),
            any_producer_owned: self.catalog.any_owned(),
            golden_events_claimed: self.golden_events_claimed,
        }
    }

    /// Force a golden event live, bypassing the spawner roll. Test hook.
    #[doc(hidden)]
    pub fn force_spawn_for_testing(&mut self, now: f64) -> bool {
        self.golden.spawn(now)
    }

    /// Batch of events pending drain. Test hook.
    #[doc(hidden)]
    #[must_use]
    pub fn pending_events_for_testing(&self) -> EventBatch {
        self.events.iter().cloned().collect()
    }
}
