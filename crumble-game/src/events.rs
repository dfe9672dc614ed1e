//! Typed events emitted by the engine for the presentation layer.
//!
//! The engine never touches rendering; notifications, pulses, and newly
//! visible catalog entries are all driven by draining this stream.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Events emitted while handling a single pump or command, stored inline.
pub type EventBatch = SmallVec<[EngineEvent; 4]>;

/// Notification emitted by the engine. Consumed by the presentation layer
/// only; not part of engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    /// An achievement was granted and its yield bonus applied.
    AchievementGranted { id: String },
    /// A producer became visible (unlocked) in the catalog.
    CatalogChanged { id: String },
    /// A golden event went live.
    GoldenEventSpawned { expires_at: f64 },
    /// A golden event was claimed for a one-time credit.
    GoldenEventClaimed { amount: f64 },
    /// Offline catch-up was credited on snapshot load.
    OfflineProgress { amount: f64 },
}
