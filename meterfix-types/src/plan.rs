use crate::rule::{CorrectionRule, MeterField, RuleScope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionPlan {
    pub schema: String,
    pub tool: ToolInfo,
    pub table: String,

    #[serde(default)]
    pub sections: Vec<CorrectionSection>,

    pub verification: VerificationQuery,

    pub summary: PlanSummary,
}

impl CorrectionPlan {
    pub fn new(tool: ToolInfo, table: impl Into<String>, verification: VerificationQuery) -> Self {
        Self {
            schema: crate::schema::METERFIX_PLAN_V1.to_string(),
            tool,
            table: table.into(),
            sections: vec![],
            verification,
            summary: PlanSummary::default(),
        }
    }

    /// All rules in execution order.
    pub fn rules(&self) -> impl Iterator<Item = &CorrectionRule> {
        self.sections.iter().flat_map(|s| s.rules.iter())
    }

    pub fn section_of(&self, rule_id: &str) -> Option<&CorrectionSection> {
        self.sections
            .iter()
            .find(|s| s.rules.iter().any(|r| r.id == rule_id))
    }
}

/// A titled group of rules that renders as a single `UPDATE`.
///
/// Every rule in a section shares the same field and scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionSection {
    pub title: String,
    pub rules: Vec<CorrectionRule>,
}

impl CorrectionSection {
    pub fn field(&self) -> Option<MeterField> {
        self.rules.first().map(|r| r.field)
    }

    pub fn scope(&self) -> Option<&RuleScope> {
        self.rules.first().map(|r| &r.scope)
    }

    pub fn old_values(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.old_value.as_str()).collect()
    }

    /// New value for a row currently holding `current`, if any rule maps it.
    pub fn replacement_for(&self, current: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.old_value == current)
            .map(|r| r.new_value.as_str())
    }
}

/// Read-only aggregation for manual inspection after the updates ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationQuery {
    pub zones: Vec<String>,
    pub group_by: Vec<String>,
    pub order_by: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub sections_total: u64,
    pub rules_total: u64,
    pub parent_meter_rules: u64,
    pub type_rules: u64,
}
