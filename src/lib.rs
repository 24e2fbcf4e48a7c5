//! Planning engine for a road transport back office.
//!
//! Turns recurring service contracts ("prestations") into dated,
//! resource-assigned transport jobs ("courses"), enforces fairness and
//! compatibility rules on assignments, keeps grouped jobs ("tournées")
//! coherent under reassignment, and produces immutable weekly
//! publication snapshots.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Prestation`, `Course`, `Tournee`,
//!   `PlanningVersion`, `WeeklyAssignmentCount`, registry records
//! - **`compatibility`**: Driver/vehicle compatibility rules (pure)
//! - **`weekly_limit`**: Per-driver weekly trajet cap (pure)
//! - **`validation`**: Combined assignment validation entry point
//! - **`coherence`**: Tournée invariants, reassignment, split proposals
//! - **`generation`**: Contract → dated course expansion (idempotent)
//! - **`publication`**: Per-week version snapshots
//! - **`assignment`**: Persisting validated assignments
//! - **`store`**: Persistence and address-lookup ports, in-memory impl
//! - **`week`**: Weekday names, ISO week keys
//!
//! # Architecture
//!
//! The pure components (`compatibility`, `weekly_limit`, `validation`,
//! `coherence`) operate on data the caller already holds. The
//! store-coupled operations (`generation`, `publication`, `assignment`)
//! go through the [`store::PlanningStore`] port and expect to run
//! inside one storage transaction each; the port documents the
//! uniqueness backstops that hold either way.

pub mod assignment;
pub mod coherence;
pub mod compatibility;
pub mod error;
pub mod generation;
pub mod models;
pub mod publication;
pub mod store;
pub mod validation;
pub mod week;
pub mod weekly_limit;
