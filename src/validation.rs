//! Assignment validation.
//!
//! Single entry point gating any driver/vehicle write on a course:
//! resource compatibility ([`compatibility`](crate::compatibility)) plus
//! the weekly trajet limit ([`weekly_limit`](crate::weekly_limit)).
//! Violations are returned as structured error and warning lists, never
//! as hard failures — overriding a warning ("force the assignment") is
//! an explicit caller choice.

use crate::compatibility::{check_compatibility, CompatibilityReport};
use crate::models::{Course, Driver, Vehicle, WeeklyAssignmentCount};
use crate::weekly_limit::{WeeklyLimitCheck, WeeklyLimitChecker};

/// Combined validation verdict for a candidate assignment.
#[derive(Debug, Clone)]
pub struct AssignmentValidation {
    /// Whether the assignment passes every blocking rule.
    pub valid: bool,
    /// Blocking violations (incompatibilities, weekly cap reached).
    pub errors: Vec<String>,
    /// Non-blocking advisories (approaching the weekly cap).
    pub warnings: Vec<String>,
    /// Full weekly limit detail.
    pub weekly_limit: WeeklyLimitCheck,
    /// Full compatibility detail.
    pub compatibility: CompatibilityReport,
}

/// Validates assigning `driver` and `vehicle` to `course`.
///
/// `in_flight` is the driver's other already-planned courses and
/// `counts` the persisted weekly counters, both supplied by the caller
/// from the store. Pure: nothing is written, and the counter is not
/// incremented here.
pub fn validate_assignment(
    course: &Course,
    vehicle: &Vehicle,
    driver: &Driver,
    in_flight: &[Course],
    counts: &[WeeklyAssignmentCount],
    checker: &WeeklyLimitChecker,
) -> AssignmentValidation {
    let compatibility = check_compatibility(&course.requirements, vehicle, driver);
    let weekly_limit = checker.check(&driver.id, course, in_flight, counts);

    let mut errors = compatibility.all_issues();
    let mut warnings = Vec::new();

    if !weekly_limit.allowed {
        errors.push(weekly_limit.message.clone());
    } else if weekly_limit.warning {
        warnings.push(weekly_limit.message.clone());
    }

    AssignmentValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
        weekly_limit,
        compatibility,
    }
}
