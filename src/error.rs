//! Error taxonomy for planning operations.
//!
//! Only genuine failures are errors: malformed input, missing records,
//! storage conflicts. Business-rule outcomes (an incompatible vehicle, a
//! driver at the weekly trajet cap, an incoherent tournée) are *data* —
//! they travel in the result structures of the owning module so the
//! caller can decide whether to override.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised by a [`PlanningStore`](crate::store::PlanningStore)
/// implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("course", "tournee", ...).
        entity: &'static str,
        /// The missing identifier, echoed back to the caller.
        id: String,
    },

    /// A uniqueness constraint rejected a write.
    ///
    /// Raised for duplicate `(prestation_id, date)` course keys and
    /// duplicate `(week_start, version_number)` planning versions. The
    /// write is not applied; callers retry or surface the conflict.
    #[error("conflict on {constraint}: {detail}")]
    Conflict {
        /// Name of the violated constraint.
        constraint: &'static str,
        /// Offending key, for diagnostics.
        detail: String,
    },
}

/// Failures raised by the engine operations.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Malformed input, rejected before any write.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Storage-layer failure, passed through.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The publisher lost the version race repeatedly and gave up.
    #[error("publication for week {week_start} kept conflicting after {attempts} attempts")]
    PublishContention {
        /// Week whose version sequence was contended.
        week_start: NaiveDate,
        /// Number of read-compute-insert attempts made.
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_id() {
        let err = StoreError::NotFound {
            entity: "course",
            id: "crs-42".into(),
        };
        assert_eq!(err.to_string(), "course not found: crs-42");
    }

    #[test]
    fn test_store_error_converts() {
        let err: PlanningError = StoreError::Conflict {
            constraint: "planning_version_week_number",
            detail: "2025-01-06 v3".into(),
        }
        .into();
        assert!(matches!(err, PlanningError::Store(_)));
        assert!(err.to_string().contains("planning_version_week_number"));
    }
}
