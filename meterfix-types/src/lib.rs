//! Shared DTOs (schemas-as-code) for the meterfix workspace.
//!
//! # Design constraints
//! - These types are serialized into `plan.json` artifacts.
//! - Prefer adding optional fields over changing semantics.

pub mod plan;
pub mod rule;
pub mod summary;

/// Schema identifiers.
pub mod schema {
    pub const METERFIX_PLAN_V1: &str = "meterfix.plan.v1";
}

/// Default table the correction script targets.
pub const DEFAULT_TABLE: &str = "water_meters";
