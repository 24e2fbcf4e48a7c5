//! Planning domain models.
//!
//! Typed records for the entities the engine plans with. Prestations
//! and the driver/vehicle registries are read-only inputs; courses,
//! tournées and planning versions are owned by the engine through the
//! [`store`](crate::store) port.
//!
//! # Entity map
//!
//! | Type | Role |
//! |------|------|
//! | `Prestation` | Recurring contract line, expanded into dated jobs |
//! | `Course` | One dated, schedulable transport job |
//! | `Tournee` | Same-day course grouping sharing one driver/vehicle |
//! | `PlanningVersion` | Immutable weekly publication snapshot |
//! | `WeeklyAssignmentCount` | Driver × route × week fairness counter |
//! | `Driver`, `Vehicle` | Registry records offered as candidates |

mod course;
mod planning;
mod prestation;
mod registry;
mod tournee;

pub use course::{ActualExecution, AssignmentStatus, Course, ROUTE_SIGNATURE_SEPARATOR};
pub use planning::{PlanningStats, PlanningVersion, VersionStatus, WeeklyAssignmentCount};
pub use prestation::{Prestation, ResourceRef, ResourceRequirements};
pub use registry::{
    Driver, DriverStatus, DriverType, Vehicle, VehicleStatus, HAZMAT_EQUIPMENT, HAZMAT_SKILL,
};
pub use tournee::{Tournee, TourneeStatus};
