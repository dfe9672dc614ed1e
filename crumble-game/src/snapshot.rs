//! Persisted snapshot of the engine state.
//!
//! The snapshot is a logical projection, not the full engine: producer
//! yields and achievement grants are re-derived from the static catalog
//! and from predicate re-evaluation after load, so only counters and
//! costs are stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::EngineError;
use crate::constants::SNAPSHOT_VERSION;

/// Persisted per-producer state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProducerRecord {
    pub count: u32,
    pub current_cost: f64,
}

/// Serializable projection of the engine state.
///
/// Required fields deliberately carry no serde defaults: a snapshot with
/// missing fields must fail validation rather than silently zero-fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub current: f64,
    pub lifetime_earned: f64,
    pub golden_events_claimed: u32,
    pub producers: HashMap<String, ProducerRecord>,
    /// Save instant in clock seconds; drives offline catch-up on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<f64>,
}

impl Snapshot {
    /// Current on-disk format tag.
    #[must_use]
    pub const fn current_version() -> &'static str {
        SNAPSHOT_VERSION
    }

    /// Check structural invariants beyond what serde enforces.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSnapshot`] for a wrong version tag or
    /// non-finite / negative totals.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(EngineError::InvalidSnapshot {
                reason: format!(
                    "unsupported version {:?} (expected {SNAPSHOT_VERSION:?})",
                    self.version
                ),
            });
        }
        for (label, value) in [
            ("current", self.current),
            ("lifetime_earned", self.lifetime_earned),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidSnapshot {
                    reason: format!("{label} must be a non-negative finite number (got {value})"),
                });
            }
        }
        if let Some(saved_at) = self.last_saved_at
            && !saved_at.is_finite()
        {
            return Err(EngineError::InvalidSnapshot {
                reason: format!("last_saved_at must be finite (got {saved_at})"),
            });
        }
        Ok(())
    }

    /// Parse and validate a snapshot from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSnapshot`] for malformed JSON,
    /// missing fields, or invariant violations.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidSnapshot {
                reason: e.to_string(),
            })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Serialize to the JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns the underlying serializer error; snapshots built by the
    /// engine always serialize.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION.to_string(),
            current: 12.5,
            lifetime_earned: 40.0,
            golden_events_claimed: 1,
            producers: HashMap::from([(
                "cursor".to_string(),
                ProducerRecord {
                    count: 2,
                    current_cost: 19.0,
                },
            )]),
            last_saved_at: Some(1_000.0),
        }
    }

    #[test]
    fn json_roundtrip_preserves_state() {
        let snapshot = sample();
        let json = snapshot.to_json().expect("serialize");
        let restored = Snapshot::from_json(&json).expect("deserialize");
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut snapshot = sample();
        snapshot.version = "0.9".to_string();
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidSnapshot { .. }));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = Snapshot::from_json(r#"{"version":"1.1","current":3.0}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSnapshot { .. }));
    }

    #[test]
    fn non_finite_totals_are_rejected() {
        let mut snapshot = sample();
        snapshot.lifetime_earned = -1.0;
        assert!(snapshot.validate().is_err());
        snapshot.lifetime_earned = 40.0;
        snapshot.current = f64::INFINITY;
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn last_saved_at_is_optional() {
        let json = r#"{"version":"1.1","current":0.0,"lifetime_earned":0.0,"golden_events_claimed":0,"producers":{}}"#;
        let snapshot = Snapshot::from_json(json).expect("valid without last_saved_at");
        assert_eq!(snapshot.last_saved_at, None);
    }
}
