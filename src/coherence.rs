//! Tournée coherence: invariant checking, reassignment propagation and
//! split detection.
//!
//! Invariant: once a tournée has a driver and/or vehicle, every course
//! referencing it must carry the same one(s). Reassignment propagates a
//! new resource across the member courses and the tournée record; when
//! the result still violates the invariant the operation *succeeds* and
//! carries a needs-split warning — splitting is a separate,
//! user-triggered action, and the engine only ever proposes groupings.

use std::collections::BTreeMap;

use tracing::warn;

use crate::models::{Course, Tournee, Vehicle};

/// Outcome of a coherence check.
#[derive(Debug, Clone)]
pub struct CoherenceReport {
    /// Whether the invariant holds.
    pub is_coherent: bool,
    /// Human-readable violations, empty when coherent.
    pub issues: Vec<String>,
}

/// Outcome of a bulk reassignment.
///
/// The engine returns the updated records; persisting them (as one
/// atomic write per tournée) is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct ReassignmentResult {
    /// Courses with the new resource applied and status recomputed.
    pub updated_courses: Vec<Course>,
    /// Tournée records updated to the new resource.
    pub updated_tournees: Vec<Tournee>,
    /// Advisories (unknown tournée references, residual violations).
    pub warnings: Vec<String>,
    /// Tournées left incoherent by the update, candidates for a split.
    pub needs_split: Vec<String>,
}

/// A proposed split of an incoherent tournée.
#[derive(Debug, Clone)]
pub struct SplitProposal {
    /// Whether more than one (driver, vehicle) group exists.
    pub should_split: bool,
    /// Explanation when a split is suggested.
    pub reason: Option<String>,
    /// Course id groupings the caller may materialize as new tournées.
    pub suggested_groups: Vec<Vec<String>>,
}

/// Checks the coherence invariant for one tournée.
///
/// `courses` may be any superset; only courses referencing the tournée
/// are considered. A tournée with neither driver nor vehicle assigned
/// is trivially coherent. Members with no driver or vehicle of their
/// own are not violations either: the invariant constrains assigned
/// resources, and filling the gaps is reassignment's job, not the
/// check's.
pub fn check_coherence(tournee: &Tournee, courses: &[Course]) -> CoherenceReport {
    let members: Vec<&Course> = courses
        .iter()
        .filter(|c| c.tournee_id.as_deref() == Some(tournee.id.as_str()))
        .collect();

    let mut issues = Vec::new();

    let mut driver_ids: Vec<&str> = members
        .iter()
        .filter_map(|c| c.driver_id.as_deref())
        .collect();
    driver_ids.sort_unstable();
    driver_ids.dedup();
    if driver_ids.len() > 1 {
        issues.push(format!(
            "tournée {} spans {} distinct drivers: {}",
            tournee.reference,
            driver_ids.len(),
            driver_ids.join(", ")
        ));
    }

    let mut vehicle_ids: Vec<&str> = members
        .iter()
        .filter_map(|c| c.vehicle_id.as_deref())
        .collect();
    vehicle_ids.sort_unstable();
    vehicle_ids.dedup();
    if vehicle_ids.len() > 1 {
        issues.push(format!(
            "tournée {} spans {} distinct vehicles: {}",
            tournee.reference,
            vehicle_ids.len(),
            vehicle_ids.join(", ")
        ));
    }

    if let Some(tournee_driver) = tournee.driver_id.as_deref() {
        for course in &members {
            if let Some(course_driver) = course.driver_id.as_deref() {
                if course_driver != tournee_driver {
                    issues.push(format!(
                        "course {} carries driver {course_driver} but tournée {} is assigned \
                         to {tournee_driver}",
                        course.id, tournee.reference
                    ));
                }
            }
        }
    }

    if let Some(tournee_vehicle) = tournee.vehicle_id.as_deref() {
        for course in &members {
            if let Some(course_vehicle) = course.vehicle_id.as_deref() {
                if course_vehicle != tournee_vehicle {
                    issues.push(format!(
                        "course {} carries vehicle {course_vehicle} but tournée {} is assigned \
                         to {tournee_vehicle}",
                        course.id, tournee.reference
                    ));
                }
            }
        }
    }

    CoherenceReport {
        is_coherent: issues.is_empty(),
        issues,
    }
}

/// Reassigns a driver across a set of courses, tournée-aware.
///
/// Courses are partitioned by tournée; courses without one get the new
/// driver and nothing else. Within a tournée, courses lacking a vehicle
/// inherit the tournée's vehicle when it has one, otherwise an
/// assignable vehicle matching the course's required body type is
/// searched among `available_vehicles`. The tournée record itself moves
/// to the new driver. Residual coherence violations do not fail the
/// operation; they are reported through `needs_split`.
pub fn reassign_driver(
    courses: Vec<Course>,
    new_driver_id: &str,
    new_driver_name: &str,
    tournees: &[Tournee],
    available_vehicles: &[Vehicle],
) -> ReassignmentResult {
    reassign(courses, tournees, |course, tournee| {
        course.driver_id = Some(new_driver_id.to_string());
        course.driver_name = Some(new_driver_name.to_string());

        // Vehicle preservation/search only applies inside a tournée;
        // a loose course gets the driver change and nothing more.
        if let Some(tournee) = tournee {
            if course.vehicle_id.is_none() {
                if let Some(vehicle_id) = tournee.vehicle_id.as_deref() {
                    course.vehicle_id = Some(vehicle_id.to_string());
                    course.vehicle_immat = available_vehicles
                        .iter()
                        .find(|v| v.id == vehicle_id)
                        .map(|v| v.immatriculation.clone());
                } else if let Some(found) = find_vehicle(course, available_vehicles) {
                    course.vehicle_id = Some(found.id.clone());
                    course.vehicle_immat = Some(found.immatriculation.clone());
                }
            }
        }
        course.recompute_assignment_status();
    })
    .finish(|tournee| tournee.driver_id = Some(new_driver_id.to_string()))
}

/// Reassigns a vehicle across a set of courses, tournée-aware.
///
/// Mirror of [`reassign_driver`]: courses lacking a driver inherit the
/// tournée's driver when it has one, and the tournée record moves to
/// the new vehicle.
pub fn reassign_vehicle(
    courses: Vec<Course>,
    new_vehicle_id: &str,
    new_vehicle_immat: &str,
    tournees: &[Tournee],
) -> ReassignmentResult {
    reassign(courses, tournees, |course, tournee| {
        course.vehicle_id = Some(new_vehicle_id.to_string());
        course.vehicle_immat = Some(new_vehicle_immat.to_string());

        if course.driver_id.is_none() {
            if let Some(driver_id) = tournee.and_then(|t| t.driver_id.as_deref()) {
                course.driver_id = Some(driver_id.to_string());
            }
        }
        course.recompute_assignment_status();
    })
    .finish(|tournee| tournee.vehicle_id = Some(new_vehicle_id.to_string()))
}

/// Proposes a split of a tournée by (driver, vehicle) grouping.
///
/// Unassigned resources count as their own sentinel group. The engine
/// never materializes the split; it only returns the course groupings.
pub fn split_proposal(tournee: &Tournee, courses: &[Course]) -> SplitProposal {
    let mut groups: BTreeMap<(Option<String>, Option<String>), Vec<String>> = BTreeMap::new();
    for course in courses
        .iter()
        .filter(|c| c.tournee_id.as_deref() == Some(tournee.id.as_str()))
    {
        groups
            .entry((course.driver_id.clone(), course.vehicle_id.clone()))
            .or_default()
            .push(course.id.clone());
    }

    if groups.len() > 1 {
        SplitProposal {
            should_split: true,
            reason: Some(format!(
                "tournée {} has {} distinct driver/vehicle groups",
                tournee.reference,
                groups.len()
            )),
            suggested_groups: groups.into_values().collect(),
        }
    } else {
        SplitProposal {
            should_split: false,
            reason: None,
            suggested_groups: Vec::new(),
        }
    }
}

fn find_vehicle<'a>(course: &Course, available: &'a [Vehicle]) -> Option<&'a Vehicle> {
    available.iter().find(|v| {
        v.status.is_assignable()
            && course
                .requirements
                .vehicle_type
                .as_deref()
                .map_or(true, |required| v.vehicle_type.eq_ignore_ascii_case(required))
    })
}

/// Working state for a tournée-partitioned bulk update.
struct Propagation {
    updated_courses: Vec<Course>,
    affected: Vec<(Tournee, Vec<usize>)>,
    warnings: Vec<String>,
}

fn reassign<F>(courses: Vec<Course>, tournees: &[Tournee], mut update: F) -> Propagation
where
    F: FnMut(&mut Course, Option<&Tournee>),
{
    let mut updated_courses = Vec::with_capacity(courses.len());
    let mut by_tournee: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    let mut warnings = Vec::new();

    for mut course in courses {
        let tournee = course
            .tournee_id
            .as_deref()
            .and_then(|id| tournees.iter().find(|t| t.id == id));

        if let (Some(id), None) = (course.tournee_id.as_deref(), tournee) {
            warnings.push(format!(
                "course {} references unknown tournée {id}; updated independently",
                course.id
            ));
        }

        update(&mut course, tournee);

        if let Some(tournee) = tournee {
            by_tournee
                .entry(tournee.id.clone())
                .or_default()
                .push(updated_courses.len());
        }
        updated_courses.push(course);
    }

    let affected = by_tournee
        .into_iter()
        .filter_map(|(id, indices)| {
            tournees
                .iter()
                .find(|t| t.id == id)
                .map(|t| (t.clone(), indices))
        })
        .collect();

    Propagation {
        updated_courses,
        affected,
        warnings,
    }
}

impl Propagation {
    /// Applies the tournée-record update, re-checks coherence and
    /// assembles the result.
    fn finish<G>(mut self, mut update_tournee: G) -> ReassignmentResult
    where
        G: FnMut(&mut Tournee),
    {
        let mut updated_tournees = Vec::with_capacity(self.affected.len());
        let mut needs_split = Vec::new();

        for (mut tournee, indices) in self.affected {
            update_tournee(&mut tournee);

            let members: Vec<Course> = indices
                .iter()
                .map(|&i| self.updated_courses[i].clone())
                .collect();
            let report = check_coherence(&tournee, &members);
            if !report.is_coherent {
                warn!(
                    tournee = %tournee.id,
                    issues = report.issues.len(),
                    "reassignment left tournée incoherent"
                );
                for issue in report.issues {
                    self.warnings.push(issue);
                }
                needs_split.push(tournee.id.clone());
            }
            updated_tournees.push(tournee);
        }

        ReassignmentResult {
            updated_courses: self.updated_courses,
            updated_tournees,
            warnings: self.warnings,
            needs_split,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn tournee() -> Tournee {
        Tournee::new("T1", monday(), "T-LYO-03")
    }

    fn member(id: &str) -> Course {
        Course::new(id, monday())
            .with_route("Lyon", "Paris")
            .with_tournee("T1")
    }

    #[test]
    fn test_unassigned_tournee_is_trivially_coherent() {
        let courses = vec![member("C1"), member("C2").with_driver("D9", "X")];
        let report = check_coherence(&tournee(), &courses);
        // No tournée-level driver/vehicle and a single distinct driver.
        assert!(report.is_coherent);
    }

    #[test]
    fn test_unassigned_member_of_assigned_tournee_is_not_a_violation() {
        let t = tournee().with_driver("D1").with_vehicle("V1");
        let courses = vec![member("C1").with_driver("D1", "A"), member("C2")];
        let report = check_coherence(&t, &courses);
        assert!(report.is_coherent);
    }

    #[test]
    fn test_distinct_drivers_violate() {
        let courses = vec![
            member("C1").with_driver("D1", "A"),
            member("C2").with_driver("D2", "B"),
        ];
        let report = check_coherence(&tournee(), &courses);
        assert!(!report.is_coherent);
        assert!(report.issues[0].contains("distinct drivers"));
    }

    #[test]
    fn test_course_mismatching_tournee_driver_violates() {
        let t = tournee().with_driver("D1");
        let courses = vec![member("C1").with_driver("D2", "B")];
        let report = check_coherence(&t, &courses);
        assert!(!report.is_coherent);
        assert!(report.issues[0].contains("D2"));
        assert!(report.issues[0].contains("D1"));
    }

    #[test]
    fn test_non_member_courses_ignored() {
        let stray = Course::new("C9", monday()).with_driver("D9", "Z");
        let report = check_coherence(&tournee().with_driver("D1"), &[stray]);
        assert!(report.is_coherent);
    }

    #[test]
    fn test_reassign_driver_propagates_across_tournee() {
        let t = tournee().with_driver("D1").with_vehicle("V1");
        let courses = vec![
            member("C1").with_driver("D1", "A").with_vehicle("V1", "AB-123-CD"),
            member("C2").with_driver("D1", "A"),
        ];
        let fleet = vec![Vehicle::new("V1", "AB-123-CD", "Porteur", "Diesel")];

        let result = reassign_driver(courses, "D7", "C. Durand", &[t], &fleet);

        for course in &result.updated_courses {
            assert_eq!(course.driver_id.as_deref(), Some("D7"));
            assert_eq!(course.driver_name.as_deref(), Some("C. Durand"));
            // C2 inherited the tournée's vehicle.
            assert_eq!(course.vehicle_id.as_deref(), Some("V1"));
            assert!(course.is_fully_assigned());
        }
        assert_eq!(result.updated_tournees[0].driver_id.as_deref(), Some("D7"));
        assert!(result.needs_split.is_empty());

        // The full set is coherent afterwards.
        let report = check_coherence(&result.updated_tournees[0], &result.updated_courses);
        assert!(report.is_coherent);
    }

    #[test]
    fn test_reassign_driver_searches_fleet_when_tournee_has_no_vehicle() {
        let t = tournee();
        let mut course = member("C1");
        course.requirements = course.requirements.with_vehicle_type("Semi");
        let fleet = vec![
            Vehicle::new("V1", "AB-123-CD", "Porteur", "Diesel"),
            Vehicle::new("V2", "EF-456-GH", "Semi", "Diesel"),
        ];

        let result = reassign_driver(vec![course], "D7", "C. Durand", &[t], &fleet);
        assert_eq!(result.updated_courses[0].vehicle_id.as_deref(), Some("V2"));
        assert_eq!(
            result.updated_courses[0].vehicle_immat.as_deref(),
            Some("EF-456-GH")
        );
    }

    #[test]
    fn test_reassign_courses_without_tournee_updated_independently() {
        let loose = Course::new("C1", monday()).with_route("Lyon", "Paris");
        let result = reassign_driver(vec![loose], "D7", "C. Durand", &[], &[]);

        assert_eq!(result.updated_courses[0].driver_id.as_deref(), Some("D7"));
        assert!(result.updated_tournees.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_reassign_driver_leaves_loose_course_vehicle_untouched() {
        // A course outside any tournée only gets the driver change,
        // even with assignable vehicles on hand.
        let loose = Course::new("C1", monday()).with_route("Lyon", "Paris");
        let fleet = vec![Vehicle::new("V1", "AB-123-CD", "Porteur", "Diesel")];

        let result = reassign_driver(vec![loose], "D7", "C. Durand", &[], &fleet);

        let course = &result.updated_courses[0];
        assert_eq!(course.driver_id.as_deref(), Some("D7"));
        assert!(course.vehicle_id.is_none());
        assert!(!course.is_fully_assigned());
    }

    #[test]
    fn test_reassign_warns_on_unknown_tournee_reference() {
        let orphan = member("C1");
        let result = reassign_driver(vec![orphan], "D7", "C. Durand", &[], &[]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("T1"));
        assert_eq!(result.updated_courses[0].driver_id.as_deref(), Some("D7"));
    }

    #[test]
    fn test_reassignment_flags_needs_split_but_succeeds() {
        // C1 keeps vehicle V1 while the tournée is assigned V2: the
        // update goes through, with a split suggestion.
        let t = tournee().with_vehicle("V2");
        let courses = vec![
            member("C1").with_vehicle("V1", "AB-123-CD"),
            member("C2"),
        ];
        let fleet = vec![Vehicle::new("V2", "EF-456-GH", "Porteur", "Diesel")];

        let result = reassign_driver(courses, "D7", "C. Durand", &[t], &fleet);
        assert_eq!(result.needs_split, vec!["T1".to_string()]);
        assert!(!result.warnings.is_empty());
        // Both courses still got the new driver.
        assert!(result
            .updated_courses
            .iter()
            .all(|c| c.driver_id.as_deref() == Some("D7")));
    }

    #[test]
    fn test_reassign_vehicle_inherits_tournee_driver() {
        let t = tournee().with_driver("D1");
        let courses = vec![member("C1")];

        let result = reassign_vehicle(courses, "V9", "ZZ-999-ZZ", &[t]);
        let course = &result.updated_courses[0];
        assert_eq!(course.vehicle_id.as_deref(), Some("V9"));
        assert_eq!(course.vehicle_immat.as_deref(), Some("ZZ-999-ZZ"));
        assert_eq!(course.driver_id.as_deref(), Some("D1"));
        assert!(course.is_fully_assigned());
        assert_eq!(result.updated_tournees[0].vehicle_id.as_deref(), Some("V9"));
    }

    #[test]
    fn test_split_proposal_groups_by_driver_vehicle_pair() {
        let courses = vec![
            member("C1").with_driver("D1", "A").with_vehicle("V1", "AB"),
            member("C2").with_driver("D1", "A").with_vehicle("V1", "AB"),
            member("C3").with_driver("D2", "B").with_vehicle("V2", "EF"),
            member("C4"), // unassigned sentinel group
        ];

        let proposal = split_proposal(&tournee(), &courses);
        assert!(proposal.should_split);
        assert_eq!(proposal.suggested_groups.len(), 3);
        let sizes: Vec<usize> = proposal.suggested_groups.iter().map(Vec::len).collect();
        assert!(sizes.contains(&2));
        assert!(proposal.reason.unwrap().contains("3"));
    }

    #[test]
    fn test_split_proposal_single_group_no_split() {
        let courses = vec![
            member("C1").with_driver("D1", "A").with_vehicle("V1", "AB"),
            member("C2").with_driver("D1", "A").with_vehicle("V1", "AB"),
        ];
        let proposal = split_proposal(&tournee(), &courses);
        assert!(!proposal.should_split);
        assert!(proposal.suggested_groups.is_empty());
        assert!(proposal.reason.is_none());
    }
}
