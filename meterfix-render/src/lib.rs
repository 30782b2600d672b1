//! Rendering helpers for the correction script and its human-readable companions.

mod markdown;
mod sql;
mod summary;

pub use markdown::render_plan_md;
pub use sql::{quote_literal, render_section, render_sql_script, render_verification};
pub use summary::render_zone_summary;
