//! In-memory reference store.
//!
//! Enforces the same uniqueness constraints a SQL schema would carry
//! (`(prestation_id, date)` on courses, `(week_start, version_number)`
//! on planning versions) and keeps batch inserts all-or-nothing, so the
//! engine's concurrency backstops are exercised even in tests. Owned
//! state only — no process-wide globals.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::{Course, PlanningVersion, Prestation, Tournee, WeeklyAssignmentCount};

use super::{AddressResolver, PlanningStore};

/// Constraint-enforcing in-memory [`PlanningStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    prestations: Vec<Prestation>,
    courses: BTreeMap<String, Course>,
    tournees: BTreeMap<String, Tournee>,
    versions: Vec<PlanningVersion>,
    weekly_counts: HashMap<(String, String, String), u32>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a prestation (registry-style bootstrap; no constraints).
    pub fn add_prestation(&mut self, prestation: Prestation) {
        self.prestations.push(prestation);
    }

    /// Seeds a tournée.
    pub fn add_tournee(&mut self, tournee: Tournee) {
        self.tournees.insert(tournee.id.clone(), tournee);
    }

    /// Number of stored courses.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// All stored planning versions, in insertion order.
    pub fn versions(&self) -> &[PlanningVersion] {
        &self.versions
    }

    fn dedup_keys(&self) -> HashSet<(String, NaiveDate)> {
        self.courses
            .values()
            .filter_map(|c| c.prestation_id.clone().map(|p| (p, c.date)))
            .collect()
    }
}

impl PlanningStore for MemoryStore {
    fn active_prestations(&self) -> Result<Vec<Prestation>, StoreError> {
        Ok(self
            .prestations
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect())
    }

    fn courses_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Course>, StoreError> {
        Ok(self
            .courses
            .values()
            .filter(|c| c.date >= from && c.date <= to)
            .cloned()
            .collect())
    }

    fn insert_courses(&mut self, courses: &[Course]) -> Result<usize, StoreError> {
        // Validate the whole batch before touching storage.
        let mut keys = self.dedup_keys();
        let mut ids: HashSet<&str> = self.courses.keys().map(String::as_str).collect();
        for course in courses {
            if !ids.insert(&course.id) {
                return Err(StoreError::Conflict {
                    constraint: "course_id",
                    detail: course.id.clone(),
                });
            }
            if let Some(prestation_id) = &course.prestation_id {
                if !keys.insert((prestation_id.clone(), course.date)) {
                    return Err(StoreError::Conflict {
                        constraint: "course_prestation_date",
                        detail: format!("{prestation_id} on {}", course.date),
                    });
                }
            }
        }

        for course in courses {
            self.courses.insert(course.id.clone(), course.clone());
        }
        Ok(courses.len())
    }

    fn course(&self, id: &str) -> Result<Course, StoreError> {
        self.courses.get(id).cloned().ok_or(StoreError::NotFound {
            entity: "course",
            id: id.to_string(),
        })
    }

    fn update_course(&mut self, course: &Course) -> Result<(), StoreError> {
        match self.courses.get_mut(&course.id) {
            Some(stored) => {
                *stored = course.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "course",
                id: course.id.clone(),
            }),
        }
    }

    fn tournees_for_week(&self, week_start: NaiveDate) -> Result<Vec<Tournee>, StoreError> {
        Ok(self
            .tournees
            .values()
            .filter(|t| t.week_start == week_start)
            .cloned()
            .collect())
    }

    fn update_tournee(&mut self, tournee: &Tournee) -> Result<(), StoreError> {
        match self.tournees.get_mut(&tournee.id) {
            Some(stored) => {
                *stored = tournee.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "tournee",
                id: tournee.id.clone(),
            }),
        }
    }

    fn latest_version_number(&self, week_start: NaiveDate) -> Result<u32, StoreError> {
        Ok(self
            .versions
            .iter()
            .filter(|v| v.week_start == week_start)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0))
    }

    fn insert_version(&mut self, version: &PlanningVersion) -> Result<(), StoreError> {
        let duplicate = self.versions.iter().any(|v| {
            v.week_start == version.week_start && v.version_number == version.version_number
        });
        if duplicate {
            return Err(StoreError::Conflict {
                constraint: "planning_version_week_number",
                detail: format!("{} v{}", version.week_start, version.version_number),
            });
        }
        self.versions.push(version.clone());
        Ok(())
    }

    fn weekly_counts(
        &self,
        driver_id: &str,
        week_key: &str,
    ) -> Result<Vec<WeeklyAssignmentCount>, StoreError> {
        Ok(self
            .weekly_counts
            .iter()
            .filter(|((driver, _, week), _)| driver == driver_id && week == week_key)
            .map(|((driver, route, week), count)| {
                WeeklyAssignmentCount::new(driver.clone(), route.clone(), week.clone(), *count)
            })
            .collect())
    }

    fn increment_weekly_count(
        &mut self,
        driver_id: &str,
        route_signature: &str,
        week_key: &str,
    ) -> Result<u32, StoreError> {
        let count = self
            .weekly_counts
            .entry((
                driver_id.to_string(),
                route_signature.to_string(),
                week_key.to_string(),
            ))
            .or_insert(0);
        *count += 1;
        Ok(*count)
    }
}

/// In-memory stop id → label directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAddressBook {
    labels: HashMap<String, String>,
}

impl MemoryAddressBook {
    /// Creates an empty address book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stop label.
    pub fn with_stop(mut self, stop_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(stop_id.into(), label.into());
        self
    }
}

impl AddressResolver for MemoryAddressBook {
    fn resolve(&self, stop_id: &str) -> Option<String> {
        self.labels.get(stop_id).cloned()
    }
}
