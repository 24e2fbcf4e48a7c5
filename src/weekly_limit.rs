//! Weekly trajet limit checking.
//!
//! Fairness/fatigue control: one driver must not be over-concentrated
//! on one repeated route within a calendar week. The check sums the
//! persisted weekly counter with the other already-planned courses of
//! the same driver, route and week, and compares against the cap.
//!
//! Read-only by design: the counter itself is incremented by whatever
//! persists the new assignment (see
//! [`apply_assignment`](crate::assignment::apply_assignment)), never by
//! this check.

use crate::models::{Course, WeeklyAssignmentCount};
use crate::week::week_key;

/// Maximum assignments of one driver to one route per week.
pub const MAX_WEEKLY_TRAJETS: u32 = 5;

/// Outcome of a weekly limit check.
#[derive(Debug, Clone)]
pub struct WeeklyLimitCheck {
    /// Whether the assignment may proceed.
    pub allowed: bool,
    /// Assignments already counted for (driver, route, week).
    pub current_count: u32,
    /// The cap ([`MAX_WEEKLY_TRAJETS`]).
    pub max_count: u32,
    /// Set when the next assignment would reach the cap.
    pub warning: bool,
    /// Human-readable explanation, always present.
    pub message: String,
}

/// Weekly trajet limit checker.
///
/// Route matching is exact signature equality. An older heuristic also
/// accepted any in-flight course whose signature merely contained the
/// candidate's start location; it conflates distinct routes sharing a
/// depot and survives only as an opt-in compatibility shim, pending
/// product clarification.
#[derive(Debug, Clone, Default)]
pub struct WeeklyLimitChecker {
    legacy_prefix_match: bool,
}

impl WeeklyLimitChecker {
    /// Creates a checker with exact route matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the legacy start-location containment match.
    pub fn with_legacy_prefix_match(mut self) -> Self {
        self.legacy_prefix_match = true;
        self
    }

    /// Checks whether `driver_id` may take `candidate`.
    ///
    /// Sums the persisted counter for (driver, route signature, ISO
    /// week) with the other in-flight courses of the same driver, week
    /// and route. The candidate itself is excluded from the in-flight
    /// count. Decision policy:
    /// - total ≥ cap → blocked;
    /// - total == cap − 1 → allowed with a warning;
    /// - otherwise → allowed.
    pub fn check(
        &self,
        driver_id: &str,
        candidate: &Course,
        in_flight: &[Course],
        counts: &[WeeklyAssignmentCount],
    ) -> WeeklyLimitCheck {
        let signature = candidate.route_signature();
        let week = week_key(candidate.date);

        let persisted = counts
            .iter()
            .find(|c| {
                c.driver_id == driver_id && c.week_key == week && c.route_signature == signature
            })
            .map(|c| c.count)
            .unwrap_or(0);

        let planned = in_flight
            .iter()
            .filter(|course| {
                course.id != candidate.id
                    && course.driver_id.as_deref() == Some(driver_id)
                    && week_key(course.date) == week
                    && self.route_matches(&course.route_signature(), &signature, candidate)
            })
            .count() as u32;

        let total = persisted + planned;

        if total >= MAX_WEEKLY_TRAJETS {
            WeeklyLimitCheck {
                allowed: false,
                current_count: total,
                max_count: MAX_WEEKLY_TRAJETS,
                warning: false,
                message: format!(
                    "driver {driver_id} already has {total} assignments on this route in week \
                     {week} (cap {MAX_WEEKLY_TRAJETS})"
                ),
            }
        } else if total == MAX_WEEKLY_TRAJETS - 1 {
            WeeklyLimitCheck {
                allowed: true,
                current_count: total,
                max_count: MAX_WEEKLY_TRAJETS,
                warning: true,
                message: format!(
                    "driver {driver_id} has {total} assignments on this route in week {week}, \
                     approaching the cap of {MAX_WEEKLY_TRAJETS}"
                ),
            }
        } else {
            WeeklyLimitCheck {
                allowed: true,
                current_count: total,
                max_count: MAX_WEEKLY_TRAJETS,
                warning: false,
                message: format!(
                    "driver {driver_id} has {total} of {MAX_WEEKLY_TRAJETS} assignments on this \
                     route in week {week}"
                ),
            }
        }
    }

    fn route_matches(
        &self,
        in_flight_signature: &str,
        candidate_signature: &str,
        candidate: &Course,
    ) -> bool {
        if in_flight_signature == candidate_signature {
            return true;
        }
        // Compatibility shim: legacy matching by start location containment.
        self.legacy_prefix_match
            && !candidate.start_location.is_empty()
            && in_flight_signature.contains(&candidate.start_location)
    }
}
