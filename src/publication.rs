//! Planning publication: immutable weekly snapshots.
//!
//! Publishing a week allocates the next version number for that week,
//! freezes the per-status course tallies into a new `PlanningVersion`,
//! and flips the week's draft tournées to published, stamped with the
//! version id. Versions are never updated; republishing a week appends
//! the next number in the sequence.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{PlanningError, StoreError};
use crate::models::{PlanningStats, PlanningVersion};
use crate::store::PlanningStore;
use crate::week::is_monday;

/// Attempts before giving up on a contended version sequence.
const PUBLISH_RETRY_LIMIT: u32 = 3;

/// Publishes the week starting at `week_start`.
///
/// The version number is `max(existing for the week) + 1`, defaulting
/// to 1. The read-compute-insert cycle races under concurrent publish
/// calls for the same week; the store's unique
/// `(week_start, version_number)` constraint detects the loser, which
/// retries with a fresh read up to [`PUBLISH_RETRY_LIMIT`] times before
/// surfacing [`PlanningError::PublishContention`]. Already-published
/// tournées of the week are left untouched.
pub fn publish_planning<S: PlanningStore>(
    store: &mut S,
    week_start: NaiveDate,
    published_by: Option<&str>,
    notes: Option<&str>,
) -> Result<PlanningVersion, PlanningError> {
    if !is_monday(week_start) {
        return Err(PlanningError::Validation(format!(
            "week start {week_start} is not a Monday"
        )));
    }

    let mut attempts = 0;
    let version = loop {
        attempts += 1;

        let next_number = store.latest_version_number(week_start)? + 1;
        let stats = PlanningStats::tally(&store.courses_in_week(week_start)?);

        let mut version = PlanningVersion::new(week_start, next_number, stats);
        if let Some(publisher) = published_by {
            version = version.with_publisher(publisher);
        }
        if let Some(notes) = notes {
            version = version.with_notes(notes);
        }

        match store.insert_version(&version) {
            Ok(()) => break version,
            Err(StoreError::Conflict { .. }) if attempts < PUBLISH_RETRY_LIMIT => {
                warn!(week = %week_start, attempt = attempts, "version race lost, retrying");
            }
            Err(StoreError::Conflict { .. }) => {
                return Err(PlanningError::PublishContention {
                    week_start,
                    attempts,
                });
            }
            Err(err) => return Err(err.into()),
        }
    };

    for mut tournee in store.tournees_for_week(week_start)? {
        if tournee.is_draft() {
            tournee.publish(&version.id);
            store.update_tournee(&tournee)?;
        }
    }

    info!(
        week = %week_start,
        version = version.version_number,
        total = version.stats.total,
        "planning published"
    );
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, PlanningVersion, Tournee, TourneeStatus};
    use crate::store::{MemoryStore, PlanningStore};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .insert_courses(&[
                Course::new("C1", monday())
                    .with_driver("D1", "A")
                    .with_vehicle("V1", "AB"),
                Course::new("C2", monday()).with_driver("D1", "A"),
                Course::new("C3", monday()),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_version_numbers_increase_per_week() {
        let mut store = seeded_store();

        let v1 = publish_planning(&mut store, monday(), None, None).unwrap();
        let v2 = publish_planning(&mut store, monday(), None, None).unwrap();
        assert_eq!(v1.version_number, 1);
        assert_eq!(v2.version_number, 2);

        // Another week starts its own sequence.
        let next_monday = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
        let other = publish_planning(&mut store, next_monday, None, None).unwrap();
        assert_eq!(other.version_number, 1);
    }

    #[test]
    fn test_stats_frozen_at_publication() {
        let mut store = seeded_store();
        let version =
            publish_planning(&mut store, monday(), Some("dispatch"), Some("first cut")).unwrap();

        assert_eq!(version.stats.total, 3);
        assert_eq!(version.stats.assigned, 1);
        assert_eq!(version.stats.partial, 1);
        assert_eq!(version.stats.unassigned, 1);
        assert_eq!(
            version.stats.assigned + version.stats.partial + version.stats.unassigned,
            version.stats.total
        );
        assert_eq!(version.published_by.as_deref(), Some("dispatch"));
        assert_eq!(version.notes.as_deref(), Some("first cut"));
    }

    #[test]
    fn test_draft_tournees_flip_to_published() {
        let mut store = seeded_store();
        store.add_tournee(Tournee::new("T1", monday(), "T-LYO-01"));
        let mut already = Tournee::new("T2", monday(), "T-LYO-02");
        already.publish("ver-older");
        store.add_tournee(already);

        let version = publish_planning(&mut store, monday(), None, None).unwrap();

        let tournees = store.tournees_for_week(monday()).unwrap();
        let t1 = tournees.iter().find(|t| t.id == "T1").unwrap();
        let t2 = tournees.iter().find(|t| t.id == "T2").unwrap();
        assert_eq!(t1.status, TourneeStatus::Published);
        assert_eq!(t1.version_id.as_deref(), Some(version.id.as_str()));
        // Previously published tournée keeps its original stamp.
        assert_eq!(t2.version_id.as_deref(), Some("ver-older"));
    }

    #[test]
    fn test_empty_week_publishes_zero_stats() {
        let mut store = MemoryStore::new();
        let version = publish_planning(&mut store, monday(), None, None).unwrap();
        assert_eq!(version.stats.total, 0);
        assert_eq!(version.version_number, 1);
    }

    #[test]
    fn test_non_monday_rejected() {
        let mut store = MemoryStore::new();
        let friday = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let err = publish_planning(&mut store, friday, None, None).unwrap_err();
        assert!(matches!(err, PlanningError::Validation(_)));
    }

    /// Store that loses the version race a fixed number of times.
    struct ContendedStore {
        inner: MemoryStore,
        conflicts_left: u32,
    }

    impl PlanningStore for ContendedStore {
        fn active_prestations(&self) -> Result<Vec<crate::models::Prestation>, StoreError> {
            self.inner.active_prestations()
        }
        fn courses_in_range(
            &self,
            from: NaiveDate,
            to: NaiveDate,
        ) -> Result<Vec<Course>, StoreError> {
            self.inner.courses_in_range(from, to)
        }
        fn insert_courses(&mut self, courses: &[Course]) -> Result<usize, StoreError> {
            self.inner.insert_courses(courses)
        }
        fn course(&self, id: &str) -> Result<Course, StoreError> {
            self.inner.course(id)
        }
        fn update_course(&mut self, course: &Course) -> Result<(), StoreError> {
            self.inner.update_course(course)
        }
        fn tournees_for_week(&self, week_start: NaiveDate) -> Result<Vec<Tournee>, StoreError> {
            self.inner.tournees_for_week(week_start)
        }
        fn update_tournee(&mut self, tournee: &Tournee) -> Result<(), StoreError> {
            self.inner.update_tournee(tournee)
        }
        fn latest_version_number(&self, week_start: NaiveDate) -> Result<u32, StoreError> {
            self.inner.latest_version_number(week_start)
        }
        fn insert_version(&mut self, version: &PlanningVersion) -> Result<(), StoreError> {
            if self.conflicts_left > 0 {
                self.conflicts_left -= 1;
                // Simulate a concurrent publisher winning the slot.
                return Err(StoreError::Conflict {
                    constraint: "planning_version_week_number",
                    detail: format!("{} v{}", version.week_start, version.version_number),
                });
            }
            self.inner.insert_version(version)
        }
        fn weekly_counts(
            &self,
            driver_id: &str,
            week_key: &str,
        ) -> Result<Vec<crate::models::WeeklyAssignmentCount>, StoreError> {
            self.inner.weekly_counts(driver_id, week_key)
        }
        fn increment_weekly_count(
            &mut self,
            driver_id: &str,
            route_signature: &str,
            week_key: &str,
        ) -> Result<u32, StoreError> {
            self.inner.increment_weekly_count(driver_id, route_signature, week_key)
        }
    }

    #[test]
    fn test_version_race_retries_then_succeeds() {
        let mut store = ContendedStore {
            inner: MemoryStore::new(),
            conflicts_left: 2,
        };
        let version = publish_planning(&mut store, monday(), None, None).unwrap();
        assert_eq!(version.version_number, 1);
    }

    #[test]
    fn test_version_race_exhausted_surfaces_contention() {
        let mut store = ContendedStore {
            inner: MemoryStore::new(),
            conflicts_left: 10,
        };
        let err = publish_planning(&mut store, monday(), None, None).unwrap_err();
        assert!(matches!(
            err,
            PlanningError::PublishContention { attempts: 3, .. }
        ));
    }
}
