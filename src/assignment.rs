//! Assignment application: persisting a validated driver/vehicle write.
//!
//! [`validate_assignment`](crate::validation::validate_assignment) is
//! advisory and read-only; this module does the actual write. The
//! weekly counter increment happens in the same store call as the
//! course update so a persisted assignment can never go uncounted —
//! on real backends both run inside the assignment's transaction.

use tracing::debug;

use crate::error::PlanningError;
use crate::models::Course;
use crate::store::PlanningStore;
use crate::week::week_key;

/// Applies a driver and/or vehicle to a stored course.
///
/// `driver` is `(id, name)`, `vehicle` is `(id, immatriculation)`;
/// `None` leaves that field untouched. The assignment status is
/// recomputed from the resulting fields, and when a new driver lands
/// the weekly counter for (driver, route signature, ISO week) is
/// incremented. Returns the updated course; a missing course id
/// surfaces as [`StoreError::NotFound`](crate::error::StoreError).
pub fn apply_assignment<S: PlanningStore>(
    store: &mut S,
    course_id: &str,
    driver: Option<(&str, &str)>,
    vehicle: Option<(&str, &str)>,
) -> Result<Course, PlanningError> {
    let mut course = store.course(course_id)?;

    let driver_changed = driver
        .map(|(id, _)| course.driver_id.as_deref() != Some(id))
        .unwrap_or(false);

    if let Some((id, name)) = driver {
        course.driver_id = Some(id.to_string());
        course.driver_name = Some(name.to_string());
    }
    if let Some((id, immat)) = vehicle {
        course.vehicle_id = Some(id.to_string());
        course.vehicle_immat = Some(immat.to_string());
    }
    course.recompute_assignment_status();

    store.update_course(&course)?;

    if driver_changed {
        if let Some(driver_id) = course.driver_id.clone() {
            let count = store.increment_weekly_count(
                &driver_id,
                &course.route_signature(),
                &week_key(course.date),
            )?;
            debug!(course = %course.id, driver = %driver_id, count, "weekly counter advanced");
        }
    }

    Ok(course)
}
