//! Achievement roster and predicate evaluation.
//!
//! Grants are permanent for the session and apply a compounding
//! multiplicative bonus to every producer's yield. When several
//! achievements qualify in the same pass they are granted in declaration
//! order; the resulting yields differ under reordering, so the order is
//! part of the game balance and must stay fixed.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Threshold predicate over a progress probe.
///
/// Predicates are data, not closures, so the roster stays serializable
/// and the evaluation order stays auditable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    LifetimeAtLeast(f64),
    ProductionRateAtLeast(f64),
    AnyProducerOwned,
    TotalUnitsAtLeast(u32),
    GoldenEventsClaimedAtLeast(u32),
}

/// Read-only projection of engine state consumed by predicates.
///
/// Captured once per evaluation pass, so every predicate in the pass sees
/// the same pre-pass production rate even as grants scale yields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressProbe {
    pub lifetime_earned: f64,
    pub production_rate: f64,
    pub total_units: u32,
    pub any_producer_owned: bool,
    pub golden_events_claimed: u32,
}

impl Condition {
    /// Whether the predicate holds for the given probe.
    #[must_use]
    pub fn is_met(&self, probe: &ProgressProbe) -> bool {
        match *self {
            Self::LifetimeAtLeast(threshold) => probe.lifetime_earned >= threshold,
            Self::ProductionRateAtLeast(threshold) => probe.production_rate >= threshold,
            Self::AnyProducerOwned => probe.any_producer_owned,
            Self::TotalUnitsAtLeast(threshold) => probe.total_units >= threshold,
            Self::GoldenEventsClaimedAtLeast(threshold) => {
                probe.golden_events_claimed >= threshold
            }
        }
    }
}

/// Static definition of an achievement.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
    pub condition: Condition,
    /// Permanent multiplicative yield bonus, in percent.
    pub bonus_percent: f64,
}

/// Default achievement set. Declaration order is the grant order.
pub const DEFAULT_ACHIEVEMENTS: [AchievementDef; 8] = [
    AchievementDef {
        id: "first_click",
        name: "First Click",
        desc: "Bake your first cookie",
        condition: Condition::LifetimeAtLeast(1.0),
        bonus_percent: 0.1,
    },
    AchievementDef {
        id: "hundred",
        name: "Hundred",
        desc: "Bake 100 cookies",
        condition: Condition::LifetimeAtLeast(100.0),
        bonus_percent: 0.2,
    },
    AchievementDef {
        id: "thousand",
        name: "Thousand",
        desc: "Bake 1,000 cookies",
        condition: Condition::LifetimeAtLeast(1_000.0),
        bonus_percent: 0.5,
    },
    AchievementDef {
        id: "million",
        name: "Millionaire",
        desc: "Bake 1,000,000 cookies",
        condition: Condition::LifetimeAtLeast(1_000_000.0),
        bonus_percent: 2.0,
    },
    AchievementDef {
        id: "first_upgrade",
        name: "First Upgrade",
        desc: "Purchase your first upgrade",
        condition: Condition::AnyProducerOwned,
        bonus_percent: 0.1,
    },
    AchievementDef {
        id: "golden_cookie",
        name: "Golden Cookie!",
        desc: "Click a golden cookie",
        condition: Condition::GoldenEventsClaimedAtLeast(1),
        bonus_percent: 0.5,
    },
    AchievementDef {
        id: "speed_baker",
        name: "Speed Baker",
        desc: "Reach 100 cookies per second",
        condition: Condition::ProductionRateAtLeast(100.0),
        bonus_percent: 1.0,
    },
    AchievementDef {
        id: "cookie_tycoon",
        name: "Cookie Tycoon",
        desc: "Own 100 buildings",
        condition: Condition::TotalUnitsAtLeast(100),
        bonus_percent: 2.0,
    },
];

/// One achievement with its session grant state.
#[derive(Debug, Clone)]
pub struct Achievement {
    pub def: AchievementDef,
    /// One-way false-to-true transition. A granted achievement is never
    /// re-evaluated.
    pub granted: bool,
}

/// Grant emitted by an evaluation pass, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grant {
    pub id: &'static str,
    pub bonus_percent: f64,
}

/// Newly granted achievements from one evaluation pass.
pub type GrantBatch = SmallVec<[Grant; 2]>;

/// Ordered roster of achievements with grant tracking.
#[derive(Debug, Clone)]
pub struct AchievementRoster {
    entries: Vec<Achievement>,
}

impl AchievementRoster {
    /// Build the roster from the static default set.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            entries: DEFAULT_ACHIEVEMENTS
                .iter()
                .map(|def| Achievement {
                    def: *def,
                    granted: false,
                })
                .collect(),
        }
    }

    /// Iterate achievements in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.entries.iter()
    }

    /// Number of achievements granted so far this session.
    #[must_use]
    pub fn granted_count(&self) -> usize {
        self.entries.iter().filter(|a| a.granted).count()
    }

    /// Mark every ungranted achievement whose predicate holds and return
    /// the grants in declaration order. Re-evaluating with the same probe
    /// grants nothing twice; the caller applies each bonus sequentially.
    pub fn evaluate(&mut self, probe: &ProgressProbe) -> GrantBatch {
        let mut grants = GrantBatch::new();
        for achievement in &mut self.entries {
            if achievement.granted {
                continue;
            }
            if achievement.def.condition.is_met(probe) {
                achievement.granted = true;
                grants.push(Grant {
                    id: achievement.def.id,
                    bonus_percent: achievement.def.bonus_percent,
                });
            }
        }
        grants
    }
}

impl Default for AchievementRoster {
    fn default() -> Self {
        Self::with_defaults()
    }
}
