//! Error types for plan construction.

use meterfix_types::rule::MeterField;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("invalid table name '{0}': expected an identifier, optionally schema-qualified")]
    InvalidTableName(String),

    #[error("duplicate rule id '{0}'")]
    DuplicateRuleId(String),

    #[error("rule '{id}' has an empty {which} value")]
    EmptyValue { id: String, which: &'static str },

    /// Old and new value are identical, so the rule would match its own output.
    #[error("rule '{0}' does not change its value")]
    NoOpRule(String),

    /// A section must render to one statement, so its rules share field and scope.
    #[error("section '{section}' mixes fields or scopes (rule '{rule}')")]
    MixedSection { section: String, rule: String },

    #[error("rules '{first}' and '{second}' both rewrite {} value '{value}' in overlapping scopes", .field.column())]
    OverlappingRules {
        first: String,
        second: String,
        field: MeterField,
        value: String,
    },

    /// One rule produces a value another rule matches; the end state would depend on order.
    #[error("rule '{producer}' writes '{value}', which rule '{consumer}' rewrites again")]
    ChainedRules {
        producer: String,
        consumer: String,
        value: String,
    },

    #[error("zone summary for {zone} lists {counted} meters but states a total of {stated}")]
    SummaryMismatch {
        zone: String,
        stated: u32,
        counted: u32,
    },
}
