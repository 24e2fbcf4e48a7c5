//! Prestation (recurring service contract) model.
//!
//! A prestation is one contract line sold by the commercial team: a
//! recurring transport between an ordered list of stops, with resource
//! requirements. Prestations are created by commercial onboarding and
//! are strictly read-only to the planning engine — the generator expands
//! them into dated courses but never mutates them.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::DriverType;

/// Resource requirements attached to a prestation or a course.
///
/// Every field is optional/empty by default: an unconstrained job
/// accepts any assignable driver and vehicle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceRequirements {
    /// Required body type, if any.
    pub vehicle_type: Option<String>,
    /// Required energy, if any.
    pub energy: Option<String>,
    /// Required driver licence type, if any.
    pub driver_type: Option<DriverType>,
    /// Required skills, all of which the driver must cover.
    pub skills: Vec<String>,
}

impl ResourceRequirements {
    /// No requirements.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the required vehicle type.
    pub fn with_vehicle_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = Some(vehicle_type.into());
        self
    }

    /// Sets the required energy.
    pub fn with_energy(mut self, energy: impl Into<String>) -> Self {
        self.energy = Some(energy.into());
        self
    }

    /// Sets the required driver licence type.
    pub fn with_driver_type(mut self, driver_type: DriverType) -> Self {
        self.driver_type = Some(driver_type);
        self
    }

    /// Adds a required skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Whether a given skill is required.
    pub fn requires_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}

/// Reference to a pre-selected resource (id plus display label).
///
/// Some contracts name a dedicated driver or vehicle up front; the
/// generator copies the reference onto every generated course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Registry identifier.
    pub id: String,
    /// Display label (driver name or number plate).
    pub label: String,
}

impl ResourceRef {
    /// Creates a resource reference.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A recurring service contract line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prestation {
    /// Contract line identifier.
    pub id: String,
    /// Commercial contract reference.
    pub client_ref: String,
    /// Client display name, copied onto generated courses.
    pub client_name: String,
    /// Ordered stop ids; resolved to labels through the address service.
    pub stops: Vec<String>,
    /// Weekday names on which the service runs (French or English).
    pub recurrence: Vec<String>,
    /// Service start time.
    pub start_time: NaiveTime,
    /// Service end time.
    pub end_time: NaiveTime,
    /// Resource requirements inherited by every generated course.
    pub requirements: ResourceRequirements,
    /// Sensitive cargo flag (inherited by generated courses).
    pub sensitive: bool,
    /// Whether the contract is in force; inactive lines are not expanded.
    pub active: bool,
    /// Contractually dedicated driver, if any.
    pub preset_driver: Option<ResourceRef>,
    /// Contractually dedicated vehicle, if any.
    pub preset_vehicle: Option<ResourceRef>,
}

impl Prestation {
    /// Creates an active prestation with an all-day time window.
    pub fn new(id: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_ref: String::new(),
            client_name: client_name.into(),
            stops: Vec::new(),
            recurrence: Vec::new(),
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            requirements: ResourceRequirements::none(),
            sensitive: false,
            active: true,
            preset_driver: None,
            preset_vehicle: None,
        }
    }

    /// Sets the commercial reference.
    pub fn with_client_ref(mut self, client_ref: impl Into<String>) -> Self {
        self.client_ref = client_ref.into();
        self
    }

    /// Appends a stop id to the itinerary.
    pub fn with_stop(mut self, stop_id: impl Into<String>) -> Self {
        self.stops.push(stop_id.into());
        self
    }

    /// Adds a weekday name to the recurrence set.
    pub fn with_recurrence_day(mut self, day: impl Into<String>) -> Self {
        self.recurrence.push(day.into());
        self
    }

    /// Sets the service time window.
    pub fn with_time_window(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Sets the resource requirements.
    pub fn with_requirements(mut self, requirements: ResourceRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Marks the cargo as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Deactivates the contract line.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Sets the contractually dedicated driver.
    pub fn with_preset_driver(mut self, driver: ResourceRef) -> Self {
        self.preset_driver = Some(driver);
        self
    }

    /// Sets the contractually dedicated vehicle.
    pub fn with_preset_vehicle(mut self, vehicle: ResourceRef) -> Self {
        self.preset_vehicle = Some(vehicle);
        self
    }

    /// First stop id, if the itinerary is non-empty.
    pub fn first_stop(&self) -> Option<&str> {
        self.stops.first().map(String::as_str)
    }

    /// Last stop id, if the itinerary is non-empty.
    pub fn last_stop(&self) -> Option<&str> {
        self.stops.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DriverType;

    #[test]
    fn test_prestation_builder() {
        let p = Prestation::new("P1", "ACME")
            .with_client_ref("CT-2025-017")
            .with_stop("stop-a")
            .with_stop("stop-b")
            .with_recurrence_day("Lundi")
            .with_recurrence_day("Mercredi")
            .with_time_window(
                NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
            )
            .with_requirements(
                ResourceRequirements::none()
                    .with_vehicle_type("Porteur")
                    .with_driver_type(DriverType::Pl),
            )
            .sensitive();

        assert!(p.active);
        assert!(p.sensitive);
        assert_eq!(p.first_stop(), Some("stop-a"));
        assert_eq!(p.last_stop(), Some("stop-b"));
        assert_eq!(p.recurrence.len(), 2);
        assert_eq!(p.requirements.driver_type, Some(DriverType::Pl));
    }

    #[test]
    fn test_empty_itinerary() {
        let p = Prestation::new("P1", "ACME");
        assert_eq!(p.first_stop(), None);
        assert_eq!(p.last_stop(), None);
    }

    #[test]
    fn test_requirements_skill_lookup() {
        let req = ResourceRequirements::none()
            .with_skill("hayon")
            .with_skill("ADR");
        assert!(req.requires_skill("Hayon"));
        assert!(req.requires_skill("adr"));
        assert!(!req.requires_skill("frigo"));
    }
}
