//! Planning version snapshots and weekly assignment counters.
//!
//! A `PlanningVersion` is the immutable record of one publication of a
//! week: its version number is monotonically increasing *per week*, and
//! its statistics are frozen at publication time. Versions are never
//! updated or deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AssignmentStatus, Course};

/// Frozen per-status course tallies for a published week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningStats {
    /// Total courses in the week at publication time.
    pub total: u32,
    /// Fully resourced courses.
    pub assigned: u32,
    /// Courses with exactly one resource.
    pub partial: u32,
    /// Courses with no resources.
    pub unassigned: u32,
}

impl PlanningStats {
    /// Tallies the statuses of a set of courses.
    pub fn tally<'a>(courses: impl IntoIterator<Item = &'a Course>) -> Self {
        let mut stats = Self::default();
        for course in courses {
            stats.total += 1;
            match course.assignment_status {
                AssignmentStatus::Assigned => stats.assigned += 1,
                AssignmentStatus::PartiallyAssigned => stats.partial += 1,
                AssignmentStatus::Unassigned => stats.unassigned += 1,
            }
        }
        stats
    }
}

/// Lifecycle state of a planning version.
///
/// Stored rows are immutable and always carry `Published`; whether a
/// version has since been superseded is derived from its position in
/// the week's sequence (see
/// [`PlanningVersion::status_in_sequence`]), never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionStatus {
    /// Current published snapshot of its week.
    Published,
    /// Superseded by a later version of the same week.
    Superseded,
}

/// An immutable weekly publication snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningVersion {
    /// Snapshot identifier (`ver-{week_start}-v{version_number}`).
    pub id: String,
    /// Monday of the published week.
    pub week_start: NaiveDate,
    /// Monotonically increasing per week, starting at 1.
    pub version_number: u32,
    /// Lifecycle state.
    pub status: VersionStatus,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
    /// Identity of the publisher, when known.
    pub published_by: Option<String>,
    /// Free-text publication notes.
    pub notes: Option<String>,
    /// Statistics frozen at publication time.
    pub stats: PlanningStats,
}

impl PlanningVersion {
    /// Creates a published snapshot; the id is derived from the key.
    pub fn new(week_start: NaiveDate, version_number: u32, stats: PlanningStats) -> Self {
        Self {
            id: format!("ver-{week_start}-v{version_number}"),
            week_start,
            version_number,
            status: VersionStatus::Published,
            published_at: Utc::now(),
            published_by: None,
            notes: None,
            stats,
        }
    }

    /// Sets the publisher identity.
    pub fn with_publisher(mut self, published_by: impl Into<String>) -> Self {
        self.published_by = Some(published_by.into());
        self
    }

    /// Sets the publication notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Status of this version given the week's latest version number.
    ///
    /// `latest_version_number` comes from
    /// [`PlanningStore::latest_version_number`](crate::store::PlanningStore::latest_version_number);
    /// any earlier number in the sequence is superseded.
    pub fn status_in_sequence(&self, latest_version_number: u32) -> VersionStatus {
        if self.version_number < latest_version_number {
            VersionStatus::Superseded
        } else {
            VersionStatus::Published
        }
    }
}

/// Counter of assignments of one driver to one route within one week.
///
/// Ephemeral, advisory data: the weekly trajet limit reads it, and the
/// assignment application increments it atomically with the assignment
/// write. It has no lifecycle beyond the week it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAssignmentCount {
    /// Driver being counted.
    pub driver_id: String,
    /// Route signature, as produced by
    /// [`Course::route_signature`](super::Course::route_signature).
    pub route_signature: String,
    /// ISO week key (`YYYY-Www`).
    pub week_key: String,
    /// Number of persisted assignments for this key.
    pub count: u32,
}

impl WeeklyAssignmentCount {
    /// Creates a counter record.
    pub fn new(
        driver_id: impl Into<String>,
        route_signature: impl Into<String>,
        week_key: impl Into<String>,
        count: u32,
    ) -> Self {
        Self {
            driver_id: driver_id.into(),
            route_signature: route_signature.into(),
            week_key: week_key.into(),
            count,
        }
    }
}
