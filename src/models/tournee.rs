//! Tournée (course grouping) model.
//!
//! A tournée groups same-day courses meant to run under one driver and
//! one vehicle. It is a first-class entity with a stable id — never an
//! implicit grouping re-derived from (driver, vehicle, date). Once its
//! driver or vehicle is set, every member course must carry the same
//! one; the coherence manager enforces that invariant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a tournée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourneeStatus {
    /// Editable working copy.
    Draft,
    /// Frozen into a planning version; archived, never deleted.
    Published,
}

/// A same-day grouping of courses sharing one driver and one vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournee {
    /// Stable identifier.
    pub id: String,
    /// Monday of the week the tournée belongs to.
    pub week_start: NaiveDate,
    /// Dispatch reference code (e.g. "T-LYO-03").
    pub reference: String,
    /// Operating site.
    pub site: String,
    /// Driver shared by all member courses, once set.
    pub driver_id: Option<String>,
    /// Vehicle shared by all member courses, once set.
    pub vehicle_id: Option<String>,
    /// Body type of the shared vehicle.
    pub vehicle_type: Option<String>,
    /// Energy of the shared vehicle.
    pub energy: Option<String>,
    /// Lifecycle state.
    pub status: TourneeStatus,
    /// Planning version that froze this tournée, once published.
    pub version_id: Option<String>,
    /// Dispatcher notes.
    pub notes: Option<String>,
}

impl Tournee {
    /// Creates a draft tournée.
    pub fn new(
        id: impl Into<String>,
        week_start: NaiveDate,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            week_start,
            reference: reference.into(),
            site: String::new(),
            driver_id: None,
            vehicle_id: None,
            vehicle_type: None,
            energy: None,
            status: TourneeStatus::Draft,
            version_id: None,
            notes: None,
        }
    }

    /// Sets the operating site.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    /// Sets the shared driver.
    pub fn with_driver(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_id = Some(driver_id.into());
        self
    }

    /// Sets the shared vehicle.
    pub fn with_vehicle(mut self, vehicle_id: impl Into<String>) -> Self {
        self.vehicle_id = Some(vehicle_id.into());
        self
    }

    /// Sets the vehicle body type.
    pub fn with_vehicle_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = Some(vehicle_type.into());
        self
    }

    /// Sets dispatcher notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Whether neither driver nor vehicle is set.
    ///
    /// Such a tournée is trivially coherent.
    pub fn is_unassigned(&self) -> bool {
        self.driver_id.is_none() && self.vehicle_id.is_none()
    }

    /// Whether the tournée is still editable.
    pub fn is_draft(&self) -> bool {
        self.status == TourneeStatus::Draft
    }

    /// Freezes the tournée into a planning version.
    pub fn publish(&mut self, version_id: impl Into<String>) {
        self.status = TourneeStatus::Published;
        self.version_id = Some(version_id.into());
    }
}
