//! Domain logic: turn the literal correction catalog into an ordered, idempotent plan.
//!
//! This crate owns *what* gets corrected and in which order. Turning a plan into text is the
//! `meterfix-render` crate's job.

mod catalog;
mod error;
mod expected;
mod planner;
pub mod simulate;

pub use catalog::{CATALOG, CatalogEntry, VERIFICATION_ZONES, lookup_entry};
pub use error::PlanError;
pub use expected::{expected_zone_summary, validate_zone_summary};
pub use planner::{Planner, PlannerConfig, validate_table_name};
