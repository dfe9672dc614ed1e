//! Producer catalog: purchasable production units and their cost curve.
//!
//! Costs grow geometrically with each unit owned:
//! `current_cost = floor(base_cost * 1.15^count)`, computed from the count
//! *after* the purchase. Purchases are processed one unit at a time.

use smallvec::SmallVec;

use crate::EngineError;
use crate::constants::COST_GROWTH_FACTOR;
use crate::ledger::ResourceLedger;

/// Static definition of a producer, fixed at engine initialization.
#[derive(Debug, Clone, Copy)]
pub struct ProducerDef {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
    pub base_cost: f64,
    pub yield_per_unit: f64,
    /// Lifetime-earned threshold gating purchasability. `None` means
    /// unlocked from the start.
    pub unlock_threshold: Option<f64>,
}

/// Default producer roster. Declaration order is the display order.
pub const DEFAULT_PRODUCERS: [ProducerDef; 6] = [
    ProducerDef {
        id: "cursor",
        name: "Cursor",
        desc: "Autoclicks every 10 seconds",
        base_cost: 15.0,
        yield_per_unit: 0.1,
        unlock_threshold: None,
    },
    ProducerDef {
        id: "grandma",
        name: "Grandma",
        desc: "A nice grandma to bake more cookies",
        base_cost: 100.0,
        yield_per_unit: 1.0,
        unlock_threshold: Some(10.0),
    },
    ProducerDef {
        id: "farm",
        name: "Farm",
        desc: "Grows cookie plants from cookie seeds",
        base_cost: 1_100.0,
        yield_per_unit: 8.0,
        unlock_threshold: Some(50.0),
    },
    ProducerDef {
        id: "factory",
        name: "Factory",
        desc: "Produces large quantities of cookies",
        base_cost: 12_000.0,
        yield_per_unit: 47.0,
        unlock_threshold: Some(500.0),
    },
    ProducerDef {
        id: "mine",
        name: "Mine",
        desc: "Mines out cookie dough and chocolate chips",
        base_cost: 130_000.0,
        yield_per_unit: 260.0,
        unlock_threshold: Some(5_000.0),
    },
    ProducerDef {
        id: "shipment",
        name: "Shipment",
        desc: "Brings in fresh cookies from the cookie planet",
        base_cost: 1_400_000.0,
        yield_per_unit: 1_400.0,
        unlock_threshold: Some(50_000.0),
    },
];

/// A catalog entry with its mutable purchase and unlock state. Saves
/// record only the per-id counts; everything else is rebuilt from the
/// defaults and the cost curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Producer {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub base_cost: f64,
    pub current_cost: f64,
    pub count: u32,
    /// Scaled upward permanently by achievement bonuses.
    pub yield_per_unit: f64,
    pub unlock_threshold: Option<f64>,
    /// One-way false-to-true transition; never reverts.
    pub unlocked: bool,
}

impl Producer {
    fn from_def(def: &ProducerDef) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            desc: def.desc.to_string(),
            base_cost: def.base_cost,
            current_cost: cost_for_count(def.base_cost, 0),
            count: 0,
            yield_per_unit: def.yield_per_unit,
            unlock_threshold: def.unlock_threshold,
            unlocked: def.unlock_threshold.is_none(),
        }
    }
}

/// Geometric cost curve with whole-cookie truncation.
#[must_use]
pub fn cost_for_count(base_cost: f64, count: u32) -> f64 {
    (base_cost * COST_GROWTH_FACTOR.powf(f64::from(count))).floor()
}

/// Ids of producers that changed unlock state during a refresh pass.
pub type UnlockedIds = SmallVec<[String; 2]>;

/// Ordered collection of producers. Order is declaration order and is
/// stable across save/load.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerCatalog {
    producers: Vec<Producer>,
}

impl ProducerCatalog {
    /// Build the catalog from the static default roster.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            producers: DEFAULT_PRODUCERS.iter().map(Producer::from_def).collect(),
        }
    }

    /// Look up a producer by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Producer> {
        self.producers.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Producer> {
        self.producers.iter_mut().find(|p| p.id == id)
    }

    /// Iterate producers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Producer> {
        self.producers.iter()
    }

    /// Derived production rate: sum of `count * yield_per_unit`.
    #[must_use]
    pub fn production_rate(&self) -> f64 {
        self.producers
            .iter()
            .map(|p| f64::from(p.count) * p.yield_per_unit)
            .sum()
    }

    /// Total units owned across all producers.
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.producers
            .iter()
            .fold(0u32, |sum, p| sum.saturating_add(p.count))
    }

    /// Whether any producer has been purchased at least once.
    #[must_use]
    pub fn any_owned(&self) -> bool {
        self.producers.iter().any(|p| p.count > 0)
    }

    /// Pure affordability query. Unknown ids are simply not affordable.
    #[must_use]
    pub fn affordable(&self, id: &str, current: f64) -> bool {
        self.get(id)
            .is_some_and(|p| p.unlocked && current >= p.current_cost)
    }

    /// Buy one unit of `id`, debiting its current cost from the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownProducer`] for an absent id,
    /// [`EngineError::Locked`] when the producer has not been unlocked,
    /// and [`EngineError::InsufficientFunds`] when the balance does not
    /// cover the current cost. State is unchanged on error.
    pub fn purchase(
        &mut self,
        id: &str,
        ledger: &mut ResourceLedger,
    ) -> Result<&Producer, EngineError> {
        let producer = self
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownProducer { id: id.to_string() })?;
        if !producer.unlocked {
            return Err(EngineError::Locked { id: id.to_string() });
        }
        if ledger.current() < producer.current_cost {
            return Err(EngineError::InsufficientFunds {
                needed: producer.current_cost,
                available: ledger.current(),
            });
        }
        ledger.debit(producer.current_cost)?;
        producer.count = producer.count.saturating_add(1);
        producer.current_cost = cost_for_count(producer.base_cost, producer.count);
        Ok(producer)
    }

    /// Flip unlock flags for every producer whose threshold is now met.
    /// Transitions are one-way; already-unlocked entries are untouched.
    /// Returns newly unlocked ids in declaration order.
    pub fn refresh_unlocks(&mut self, lifetime_earned: f64) -> UnlockedIds {
        let mut changed = UnlockedIds::new();
        for producer in &mut self.producers {
            if producer.unlocked {
                continue;
            }
            if producer
                .unlock_threshold
                .is_some_and(|threshold| lifetime_earned >= threshold)
            {
                producer.unlocked = true;
                changed.push(producer.id.clone());
            }
        }
        changed
    }

    /// Scale every producer's yield by `factor`. Achievement bonuses call
    /// this once per grant, so simultaneous grants compound in grant order.
    pub(crate) fn scale_all_yields(&mut self, factor: f64) {
        for producer in &mut self.producers {
            producer.yield_per_unit *= factor;
        }
    }

    /// Restore one entry from a persisted snapshot record.
    ///
    /// The cost curve is authoritative: the stored cost is recomputed from
    /// `count` rather than trusted. Entries with units owned are unlocked
    /// regardless of threshold. Unknown ids are ignored.
    pub(crate) fn restore_entry(&mut self, id: &str, count: u32) {
        if let Some(producer) = self.get_mut(id) {
            producer.count = count;
            producer.current_cost = cost_for_count(producer.base_cost, count);
            if count > 0 {
                producer.unlocked = true;
            }
        }
    }
}

impl Default for ProducerCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}
