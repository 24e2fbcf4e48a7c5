//! Resource compatibility validation.
//!
//! Checks a candidate driver and vehicle against a course's
//! requirements. Every rule is evaluated independently and every
//! violation is collected — no short-circuiting — so the dispatcher sees
//! the full picture in one pass. Pure and deterministic; no side
//! effects.

use crate::models::{Driver, DriverStatus, ResourceRequirements, Vehicle, HAZMAT_SKILL};

/// Outcome of a compatibility check: two independent issue lists.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityReport {
    /// Violations attributable to the vehicle.
    pub vehicle_issues: Vec<String>,
    /// Violations attributable to the driver.
    pub driver_issues: Vec<String>,
}

impl CompatibilityReport {
    /// Whether the vehicle satisfies every rule.
    pub fn vehicle_compatible(&self) -> bool {
        self.vehicle_issues.is_empty()
    }

    /// Whether the driver satisfies every rule.
    pub fn driver_compatible(&self) -> bool {
        self.driver_issues.is_empty()
    }

    /// Whether the pair is fully compatible.
    pub fn is_compatible(&self) -> bool {
        self.vehicle_compatible() && self.driver_compatible()
    }

    /// All issues, vehicle first, for flat error reporting.
    pub fn all_issues(&self) -> Vec<String> {
        self.vehicle_issues
            .iter()
            .chain(self.driver_issues.iter())
            .cloned()
            .collect()
    }
}

/// Checks a candidate vehicle and driver against a course's requirements.
///
/// Rules, all independent:
/// 1. Vehicle energy must equal the required energy, if one is set.
/// 2. A hazardous-materials skill requirement demands an ADR-certified
///    vehicle.
/// 3. Driver licence type must equal the required type, if one is set.
/// 4. The driver's inferred skill set must cover every required skill;
///    each missing skill is reported by name.
/// 5. The driver must be active; the vehicle must be available or in
///    mission (not in maintenance or broken).
pub fn check_compatibility(
    requirements: &ResourceRequirements,
    vehicle: &Vehicle,
    driver: &Driver,
) -> CompatibilityReport {
    let mut report = CompatibilityReport::default();

    if let Some(required_energy) = &requirements.energy {
        if !vehicle.energy.eq_ignore_ascii_case(required_energy) {
            report.vehicle_issues.push(format!(
                "vehicle {} runs on {} but the course requires {required_energy}",
                vehicle.immatriculation, vehicle.energy
            ));
        }
    }

    if requirements.requires_skill(HAZMAT_SKILL) && !vehicle.is_hazmat_certified() {
        report.vehicle_issues.push(format!(
            "vehicle {} is not ADR-certified for hazardous materials",
            vehicle.immatriculation
        ));
    }

    if !vehicle.status.is_assignable() {
        report.vehicle_issues.push(format!(
            "vehicle {} is not operational ({:?})",
            vehicle.immatriculation, vehicle.status
        ));
    }

    if let Some(required_type) = requirements.driver_type {
        if driver.driver_type != required_type {
            report.driver_issues.push(format!(
                "driver {} holds {} but the course requires {}",
                driver.name,
                driver.driver_type.label(),
                required_type.label()
            ));
        }
    }

    for skill in &requirements.skills {
        if !driver.driver_type.has_skill(skill) {
            report
                .driver_issues
                .push(format!("driver {} lacks required skill: {skill}", driver.name));
        }
    }

    if driver.status != DriverStatus::Active {
        report.driver_issues.push(format!(
            "driver {} is not active ({:?})",
            driver.name, driver.status
        ));
    }

    report
}
