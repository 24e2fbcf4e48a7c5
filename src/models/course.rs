//! Course (dated transport job) model and assignment status derivation.
//!
//! A course is one schedulable occurrence of a prestation, or a
//! standalone job created by hand. Its `assignment_status` is never set
//! directly: it is a pure function of the driver and vehicle fields,
//! recomputed after every mutation of either.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::ResourceRequirements;

/// Separator used when joining stop labels into a route signature.
pub const ROUTE_SIGNATURE_SEPARATOR: &str = " > ";

/// Derived resourcing state of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    /// Neither driver nor vehicle assigned.
    Unassigned,
    /// Exactly one of driver/vehicle assigned.
    PartiallyAssigned,
    /// Both driver and vehicle assigned.
    Assigned,
}

impl AssignmentStatus {
    /// Derives the status from the two resource fields.
    ///
    /// Idempotent: re-deriving from the same fields always yields the
    /// same status. There is no stored transition log.
    pub fn derive(driver_id: Option<&str>, vehicle_id: Option<&str>) -> Self {
        match (driver_id, vehicle_id) {
            (Some(_), Some(_)) => AssignmentStatus::Assigned,
            (None, None) => AssignmentStatus::Unassigned,
            _ => AssignmentStatus::PartiallyAssigned,
        }
    }
}

/// Realized execution data, recorded after the fact for comparison
/// against the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActualExecution {
    /// Actual departure time.
    pub start_time: Option<NaiveTime>,
    /// Actual arrival time.
    pub end_time: Option<NaiveTime>,
    /// Driver who actually ran the course.
    pub driver_id: Option<String>,
    /// Vehicle actually used.
    pub vehicle_id: Option<String>,
}

/// One dated, schedulable transport job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Identifier. Generated courses use `crs-{prestation_id}-{date}`.
    pub id: String,
    /// Originating prestation; `None` for manually created jobs.
    pub prestation_id: Option<String>,
    /// Service date.
    pub date: NaiveDate,
    /// Planned departure time.
    pub start_time: NaiveTime,
    /// Planned arrival time.
    pub end_time: NaiveTime,
    /// Resolved label of the departure location.
    pub start_location: String,
    /// Resolved labels of intermediate stops, in itinerary order.
    pub intermediate_stops: Vec<String>,
    /// Resolved label of the arrival location.
    pub end_location: String,
    /// Client display name.
    pub client_name: String,
    /// Resource requirements for this job.
    pub requirements: ResourceRequirements,
    /// Sensitive cargo flag.
    pub sensitive: bool,
    /// Exceptional one-off request layered on top of recurring service.
    pub sup: bool,
    /// Assigned driver id.
    pub driver_id: Option<String>,
    /// Assigned driver display name.
    pub driver_name: Option<String>,
    /// Assigned vehicle id.
    pub vehicle_id: Option<String>,
    /// Assigned vehicle number plate.
    pub vehicle_immat: Option<String>,
    /// Derived resourcing state; see [`AssignmentStatus::derive`].
    pub assignment_status: AssignmentStatus,
    /// Recorded cause when the course could not be fully resourced.
    pub non_placement_reason: Option<String>,
    /// Which resource kind is missing ("driver", "vehicle").
    pub missing_resource: Option<String>,
    /// Grouping tournée, if the course belongs to one.
    pub tournee_id: Option<String>,
    /// Free-text dispatcher comments.
    pub comments: Option<String>,
    /// Realized execution, for post-hoc comparison.
    pub actual: ActualExecution,
}

impl Course {
    /// Creates an unassigned course.
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            prestation_id: None,
            date,
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            start_location: String::new(),
            intermediate_stops: Vec::new(),
            end_location: String::new(),
            client_name: String::new(),
            requirements: ResourceRequirements::none(),
            sensitive: false,
            sup: false,
            driver_id: None,
            driver_name: None,
            vehicle_id: None,
            vehicle_immat: None,
            assignment_status: AssignmentStatus::Unassigned,
            non_placement_reason: None,
            missing_resource: None,
            tournee_id: None,
            comments: None,
            actual: ActualExecution::default(),
        }
    }

    /// Sets the originating prestation.
    pub fn with_prestation(mut self, prestation_id: impl Into<String>) -> Self {
        self.prestation_id = Some(prestation_id.into());
        self
    }

    /// Sets the planned time window.
    pub fn with_time_window(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Sets the departure and arrival location labels.
    pub fn with_route(
        mut self,
        start_location: impl Into<String>,
        end_location: impl Into<String>,
    ) -> Self {
        self.start_location = start_location.into();
        self.end_location = end_location.into();
        self
    }

    /// Appends an intermediate stop label.
    pub fn with_intermediate_stop(mut self, label: impl Into<String>) -> Self {
        self.intermediate_stops.push(label.into());
        self
    }

    /// Sets the client name.
    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    /// Sets the resource requirements.
    pub fn with_requirements(mut self, requirements: ResourceRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Assigns a driver and recomputes the status.
    pub fn with_driver(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.driver_id = Some(id.into());
        self.driver_name = Some(name.into());
        self.recompute_assignment_status();
        self
    }

    /// Assigns a vehicle and recomputes the status.
    pub fn with_vehicle(mut self, id: impl Into<String>, immat: impl Into<String>) -> Self {
        self.vehicle_id = Some(id.into());
        self.vehicle_immat = Some(immat.into());
        self.recompute_assignment_status();
        self
    }

    /// Attaches the course to a tournée.
    pub fn with_tournee(mut self, tournee_id: impl Into<String>) -> Self {
        self.tournee_id = Some(tournee_id.into());
        self
    }

    /// Marks the course as an exceptional (SUP) request.
    pub fn sup(mut self) -> Self {
        self.sup = true;
        self
    }

    /// Recomputes `assignment_status` from the driver/vehicle fields.
    ///
    /// Must be called after any mutation of either field. On entering
    /// [`AssignmentStatus::Assigned`] the non-placement reason and
    /// missing-resource tag are cleared: they are meaningless once the
    /// course is fully resourced.
    pub fn recompute_assignment_status(&mut self) {
        self.assignment_status =
            AssignmentStatus::derive(self.driver_id.as_deref(), self.vehicle_id.as_deref());
        if self.assignment_status == AssignmentStatus::Assigned {
            self.non_placement_reason = None;
            self.missing_resource = None;
        }
    }

    /// Whether both resources are assigned.
    pub fn is_fully_assigned(&self) -> bool {
        self.assignment_status == AssignmentStatus::Assigned
    }

    /// Route signature: ordered join of all stop labels.
    ///
    /// Identical stop sequences collapse to the same signature whichever
    /// course they come from; the weekly trajet limit keys on it.
    pub fn route_signature(&self) -> String {
        let mut parts = Vec::with_capacity(self.intermediate_stops.len() + 2);
        parts.push(self.start_location.as_str());
        parts.extend(self.intermediate_stops.iter().map(String::as_str));
        parts.push(self.end_location.as_str());
        parts.join(ROUTE_SIGNATURE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_derivation() {
        assert_eq!(
            AssignmentStatus::derive(None, None),
            AssignmentStatus::Unassigned
        );
        assert_eq!(
            AssignmentStatus::derive(Some("D1"), None),
            AssignmentStatus::PartiallyAssigned
        );
        assert_eq!(
            AssignmentStatus::derive(None, Some("V1")),
            AssignmentStatus::PartiallyAssigned
        );
        assert_eq!(
            AssignmentStatus::derive(Some("D1"), Some("V1")),
            AssignmentStatus::Assigned
        );
    }

    #[test]
    fn test_recompute_clears_placement_fields_when_assigned() {
        let mut course = Course::new("C1", date(2025, 1, 6));
        course.non_placement_reason = Some("no ADR driver on site".into());
        course.missing_resource = Some("driver".into());

        course.driver_id = Some("D1".into());
        course.recompute_assignment_status();
        // Partial: the diagnostic fields stay.
        assert_eq!(
            course.assignment_status,
            AssignmentStatus::PartiallyAssigned
        );
        assert!(course.non_placement_reason.is_some());

        course.vehicle_id = Some("V1".into());
        course.recompute_assignment_status();
        assert_eq!(course.assignment_status, AssignmentStatus::Assigned);
        assert!(course.non_placement_reason.is_none());
        assert!(course.missing_resource.is_none());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut course = Course::new("C1", date(2025, 1, 6)).with_driver("D1", "A. Martin");
        let before = course.assignment_status;
        course.recompute_assignment_status();
        course.recompute_assignment_status();
        assert_eq!(course.assignment_status, before);
    }

    #[test]
    fn test_route_signature_joins_all_stops() {
        let course = Course::new("C1", date(2025, 1, 6))
            .with_route("Lyon Dépôt", "Marseille Port")
            .with_intermediate_stop("Valence Hub");
        assert_eq!(
            course.route_signature(),
            "Lyon Dépôt > Valence Hub > Marseille Port"
        );
    }

    #[test]
    fn test_route_signature_collapses_identical_routes() {
        let a = Course::new("C1", date(2025, 1, 6)).with_route("Lyon", "Paris");
        let b = Course::new("C2", date(2025, 1, 7)).with_route("Lyon", "Paris");
        assert_eq!(a.route_signature(), b.route_signature());
    }

    #[test]
    fn test_builder_assignments_update_status() {
        let course = Course::new("C1", date(2025, 1, 6))
            .with_driver("D1", "A. Martin")
            .with_vehicle("V1", "AB-123-CD");
        assert!(course.is_fully_assigned());
        assert_eq!(course.driver_name.as_deref(), Some("A. Martin"));
        assert_eq!(course.vehicle_immat.as_deref(), Some("AB-123-CD"));
    }
}
