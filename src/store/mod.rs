//! Persistence and lookup ports.
//!
//! The engine owns no storage: it reads and writes through
//! [`PlanningStore`], and resolves stop labels through
//! [`AddressResolver`]. Any relational store with transactions can back
//! the trait; [`MemoryStore`] is the constraint-enforcing reference
//! implementation used in tests and demos.
//!
//! # Atomicity contract
//!
//! Each engine operation (generate, assign, publish) is expected to run
//! inside one storage transaction on real backends. The trait encodes
//! the backstops that must hold even without one:
//!
//! - [`PlanningStore::insert_courses`] is all-or-nothing and enforces a
//!   unique `(prestation_id, date)` key, so concurrent double
//!   generation cannot duplicate courses;
//! - [`PlanningStore::insert_version`] enforces a unique
//!   `(week_start, version_number)` key, so a version race surfaces as
//!   a [`StoreError::Conflict`] instead of a silent overwrite;
//! - [`PlanningStore::increment_weekly_count`] is a single atomic
//!   read-modify-write on the counter.

mod memory;

pub use memory::{MemoryAddressBook, MemoryStore};

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::{Course, PlanningVersion, Prestation, Tournee, WeeklyAssignmentCount};
use crate::week::week_end;

/// Stop id → display label lookup (external geocoding/address service).
pub trait AddressResolver {
    /// Resolves a stop id to its display label, if known.
    fn resolve(&self, stop_id: &str) -> Option<String>;
}

/// Transactional CRUD surface over the planning entities.
pub trait PlanningStore {
    /// All active prestations (contract lines in force).
    fn active_prestations(&self) -> Result<Vec<Prestation>, StoreError>;

    /// Courses dated within `[from, to]` inclusive.
    fn courses_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Course>, StoreError>;

    /// Courses of the week starting at `week_start` (Monday..Sunday).
    fn courses_in_week(&self, week_start: NaiveDate) -> Result<Vec<Course>, StoreError> {
        self.courses_in_range(week_start, week_end(week_start))
    }

    /// Inserts a batch of courses, all-or-nothing.
    ///
    /// Rejects the whole batch with [`StoreError::Conflict`] if any
    /// course repeats an existing (or in-batch) `(prestation_id, date)`
    /// key or course id. Returns the number inserted.
    fn insert_courses(&mut self, courses: &[Course]) -> Result<usize, StoreError>;

    /// Fetches one course by id.
    fn course(&self, id: &str) -> Result<Course, StoreError>;

    /// Replaces a stored course.
    fn update_course(&mut self, course: &Course) -> Result<(), StoreError>;

    /// Tournées whose week-start matches.
    fn tournees_for_week(&self, week_start: NaiveDate) -> Result<Vec<Tournee>, StoreError>;

    /// Replaces a stored tournée.
    fn update_tournee(&mut self, tournee: &Tournee) -> Result<(), StoreError>;

    /// Highest version number published for a week; 0 if none.
    fn latest_version_number(&self, week_start: NaiveDate) -> Result<u32, StoreError>;

    /// Inserts an immutable planning version.
    ///
    /// Rejects a duplicate `(week_start, version_number)` with
    /// [`StoreError::Conflict`]; the publisher retries on that.
    fn insert_version(&mut self, version: &PlanningVersion) -> Result<(), StoreError>;

    /// Weekly assignment counters for a driver in a given ISO week.
    fn weekly_counts(
        &self,
        driver_id: &str,
        week_key: &str,
    ) -> Result<Vec<WeeklyAssignmentCount>, StoreError>;

    /// Atomically increments one weekly counter; returns the new count.
    fn increment_weekly_count(
        &mut self,
        driver_id: &str,
        route_signature: &str,
        week_key: &str,
    ) -> Result<u32, StoreError>;
}
