//! Course generation: expanding recurring contracts into dated jobs.
//!
//! Triggered per target week. Every active prestation contributes one
//! course per recurrence weekday, deduplicated against the courses
//! already stored for that week on the `(prestation_id, date)` key.
//! Re-running the generation for the same week after a partial or full
//! prior run creates no duplicates; generated course ids are derived
//! from the dedup key itself, so a concurrent double generation trips
//! the store's unique constraint instead of inserting near-duplicates.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::error::PlanningError;
use crate::models::{Course, Prestation};
use crate::store::{AddressResolver, PlanningStore};
use crate::week::{is_monday, weekday_offset};

/// Outcome of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Courses newly created by this run. Zero is a normal outcome.
    pub generated_count: usize,
    /// Human-readable summary.
    pub message: String,
}

/// Generates the courses of the week starting at `week_start`.
///
/// `week_start` must be a Monday. Prestations with an empty recurrence
/// set or an empty itinerary are skipped, as are unrecognized weekday
/// names. Stop ids that the resolver does not know keep the raw id as
/// their display label. All surviving candidates are inserted in one
/// all-or-nothing batch; run this inside a storage transaction on real
/// backends.
pub fn generate_courses_for_week<S, A>(
    store: &mut S,
    resolver: &A,
    week_start: NaiveDate,
) -> Result<GenerationReport, PlanningError>
where
    S: PlanningStore,
    A: AddressResolver,
{
    if !is_monday(week_start) {
        return Err(PlanningError::Validation(format!(
            "week start {week_start} is not a Monday"
        )));
    }

    let mut existing: HashSet<(String, NaiveDate)> = store
        .courses_in_week(week_start)?
        .into_iter()
        .filter_map(|c| c.prestation_id.map(|p| (p, c.date)))
        .collect();

    let mut batch = Vec::new();
    for prestation in store.active_prestations()? {
        if prestation.recurrence.is_empty() {
            debug!(prestation = %prestation.id, "empty recurrence, skipped");
            continue;
        }
        if prestation.stops.is_empty() {
            debug!(prestation = %prestation.id, "no stops, skipped");
            continue;
        }

        let labels: Vec<String> = prestation
            .stops
            .iter()
            .map(|stop| resolver.resolve(stop).unwrap_or_else(|| stop.clone()))
            .collect();

        for day in &prestation.recurrence {
            let Some(offset) = weekday_offset(day) else {
                debug!(prestation = %prestation.id, day = %day, "unrecognized weekday, skipped");
                continue;
            };
            let date = week_start + Days::new(offset);
            if !existing.insert((prestation.id.clone(), date)) {
                continue;
            }
            batch.push(build_course(&prestation, date, &labels));
        }
    }

    let generated_count = if batch.is_empty() {
        0
    } else {
        store.insert_courses(&batch)?
    };

    let message = if generated_count == 0 {
        format!("no new courses to generate for week {week_start}")
    } else {
        format!("generated {generated_count} courses for week {week_start}")
    };
    info!(week = %week_start, count = generated_count, "course generation finished");

    Ok(GenerationReport {
        generated_count,
        message,
    })
}

fn build_course(prestation: &Prestation, date: NaiveDate, labels: &[String]) -> Course {
    let start_location = labels.first().cloned().unwrap_or_default();
    let end_location = labels.last().cloned().unwrap_or_default();

    let mut course = Course::new(format!("crs-{}-{date}", prestation.id), date)
        .with_prestation(&prestation.id)
        .with_time_window(prestation.start_time, prestation.end_time)
        .with_route(start_location, end_location)
        .with_client(&prestation.client_name)
        .with_requirements(prestation.requirements.clone());
    course.sensitive = prestation.sensitive;
    if labels.len() > 2 {
        for label in &labels[1..labels.len() - 1] {
            course = course.with_intermediate_stop(label.clone());
        }
    }
    if let Some(driver) = &prestation.preset_driver {
        course = course.with_driver(&driver.id, &driver.label);
    }
    if let Some(vehicle) = &prestation.preset_vehicle {
        course = course.with_vehicle(&vehicle.id, &vehicle.label);
    }
    course
}
