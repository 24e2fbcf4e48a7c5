//! Driver and vehicle registry records.
//!
//! The registries are external, read-only data sources: the engine
//! receives these records as candidates for assignment and never writes
//! them back. Skills are not stored per driver — they are inferred from
//! the driver's licence type through a fixed table, the way the dispatch
//! desk reasons about qualifications.

use serde::{Deserialize, Serialize};

/// Skill name gating hazardous-materials transport.
///
/// A course requiring this skill also requires an ADR-certified vehicle.
pub const HAZMAT_SKILL: &str = "ADR";

/// Vehicle equipment tag carried by ADR-certified vehicles.
pub const HAZMAT_EQUIPMENT: &str = "ADR";

/// Driver licence classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverType {
    /// Véhicule léger (light vehicle, < 3.5 t).
    Vl,
    /// Poids lourd (heavy goods).
    Pl,
    /// Super poids lourd (articulated heavy goods).
    Spl,
    /// Poids lourd with ADR certification.
    PlAdr,
    /// Super poids lourd with ADR certification.
    SplAdr,
}

impl DriverType {
    /// Skill set inferred from the licence type.
    ///
    /// Fixed table; the registry stores only the type and the engine
    /// derives what the driver is qualified for.
    pub fn skills(&self) -> &'static [&'static str] {
        match self {
            DriverType::Vl => &["messagerie", "livraison urbaine"],
            DriverType::Pl => &["palettes", "hayon"],
            DriverType::Spl => &["palettes", "hayon", "lots complets"],
            DriverType::PlAdr => &["palettes", "hayon", HAZMAT_SKILL],
            DriverType::SplAdr => &["palettes", "hayon", "lots complets", HAZMAT_SKILL],
        }
    }

    /// Whether this licence type covers a named skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills().iter().any(|s| s.eq_ignore_ascii_case(skill))
    }

    /// Display label, as the registry prints it.
    pub fn label(&self) -> &'static str {
        match self {
            DriverType::Vl => "VL",
            DriverType::Pl => "PL",
            DriverType::Spl => "SPL",
            DriverType::PlAdr => "PL ADR",
            DriverType::SplAdr => "SPL ADR",
        }
    }
}

/// Driver operational status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverStatus {
    /// On duty, assignable.
    Active,
    /// Temporarily absent (leave, training).
    OnLeave,
    /// Off the roster.
    Inactive,
}

/// Vehicle operational status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Parked and assignable.
    Available,
    /// Currently on a course; still assignable for later slots.
    InMission,
    /// In the workshop.
    InMaintenance,
    /// Out of service.
    Broken,
}

impl VehicleStatus {
    /// Whether the vehicle may be assigned to a course.
    pub fn is_assignable(&self) -> bool {
        matches!(self, VehicleStatus::Available | VehicleStatus::InMission)
    }
}

/// A driver, as read from the driver registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    /// Registry identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Licence classification, source of the inferred skill set.
    pub driver_type: DriverType,
    /// Operational status.
    pub status: DriverStatus,
}

impl Driver {
    /// Creates an active driver.
    pub fn new(id: impl Into<String>, name: impl Into<String>, driver_type: DriverType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            driver_type,
            status: DriverStatus::Active,
        }
    }

    /// Sets the operational status.
    pub fn with_status(mut self, status: DriverStatus) -> Self {
        self.status = status;
        self
    }
}

/// A vehicle, as read from the fleet registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Registry identifier.
    pub id: String,
    /// Number plate.
    pub immatriculation: String,
    /// Body type ("Porteur", "Semi", "VUL", ...).
    pub vehicle_type: String,
    /// Energy ("Diesel", "Gaz", "Electrique", ...).
    pub energy: String,
    /// Equipment tags ("ADR", "Hayon", "Frigo", ...).
    pub equipment: Vec<String>,
    /// Operational status.
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Creates an available vehicle.
    pub fn new(
        id: impl Into<String>,
        immatriculation: impl Into<String>,
        vehicle_type: impl Into<String>,
        energy: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            immatriculation: immatriculation.into(),
            vehicle_type: vehicle_type.into(),
            energy: energy.into(),
            equipment: Vec::new(),
            status: VehicleStatus::Available,
        }
    }

    /// Adds an equipment tag.
    pub fn with_equipment(mut self, tag: impl Into<String>) -> Self {
        self.equipment.push(tag.into());
        self
    }

    /// Sets the operational status.
    pub fn with_status(mut self, status: VehicleStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the vehicle carries a given equipment tag.
    pub fn has_equipment(&self, tag: &str) -> bool {
        self.equipment.iter().any(|e| e.eq_ignore_ascii_case(tag))
    }

    /// Whether the vehicle is ADR-certified.
    pub fn is_hazmat_certified(&self) -> bool {
        self.has_equipment(HAZMAT_EQUIPMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_table() {
        assert!(DriverType::Pl.has_skill("hayon"));
        assert!(!DriverType::Pl.has_skill(HAZMAT_SKILL));
        assert!(DriverType::PlAdr.has_skill(HAZMAT_SKILL));
        assert!(DriverType::SplAdr.has_skill("lots complets"));
        assert!(!DriverType::Vl.has_skill("palettes"));
    }

    #[test]
    fn test_skill_lookup_case_insensitive() {
        assert!(DriverType::PlAdr.has_skill("adr"));
        assert!(DriverType::Pl.has_skill("Hayon"));
    }

    #[test]
    fn test_vehicle_assignability() {
        assert!(VehicleStatus::Available.is_assignable());
        assert!(VehicleStatus::InMission.is_assignable());
        assert!(!VehicleStatus::InMaintenance.is_assignable());
        assert!(!VehicleStatus::Broken.is_assignable());
    }

    #[test]
    fn test_vehicle_builder() {
        let v = Vehicle::new("V1", "AB-123-CD", "Porteur", "Diesel")
            .with_equipment("Hayon")
            .with_equipment("ADR")
            .with_status(VehicleStatus::InMission);

        assert!(v.has_equipment("hayon"));
        assert!(v.is_hazmat_certified());
        assert_eq!(v.status, VehicleStatus::InMission);
    }

    #[test]
    fn test_driver_labels() {
        assert_eq!(DriverType::SplAdr.label(), "SPL ADR");
        let d = Driver::new("D1", "A. Martin", DriverType::Spl);
        assert_eq!(d.status, DriverStatus::Active);
    }
}
