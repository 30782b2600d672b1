//! In-memory evaluation of a correction plan against exported rows.
//!
//! Mirrors what the rendered script does when run statement by statement: a section touches a
//! row when the row is in scope and its column currently holds one of the section's old values.
//! `NULL` never equals a literal.

use meterfix_types::plan::{CorrectionPlan, CorrectionSection, VerificationQuery};
use meterfix_types::rule::{MeterField, RuleScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The `water_meters` columns the plan reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_name: Option<String>,

    #[serde(default)]
    pub zone: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub parent_meter: Option<String>,

    #[serde(default, rename = "type")]
    pub meter_type: Option<String>,
}

impl MeterRow {
    fn column_mut(&mut self, field: MeterField) -> &mut Option<String> {
        match field {
            MeterField::ParentMeter => &mut self.parent_meter,
            MeterField::Type => &mut self.meter_type,
        }
    }

    fn in_scope(&self, scope: &RuleScope) -> bool {
        scope.matches(self.zone.as_deref(), self.label.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOutcome {
    pub title: String,
    pub rows_affected: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub sections: Vec<SectionOutcome>,
}

impl ApplyOutcome {
    pub fn rows_affected(&self) -> u64 {
        self.sections.iter().map(|s| s.rows_affected).sum()
    }
}

/// Run every section of `plan` over `rows`, in plan order.
pub fn apply_plan(plan: &CorrectionPlan, rows: &mut [MeterRow]) -> ApplyOutcome {
    ApplyOutcome {
        sections: plan
            .sections
            .iter()
            .map(|section| SectionOutcome {
                title: section.title.clone(),
                rows_affected: apply_section(section, rows),
            })
            .collect(),
    }
}

fn apply_section(section: &CorrectionSection, rows: &mut [MeterRow]) -> u64 {
    let (Some(field), Some(scope)) = (section.field(), section.scope()) else {
        return 0;
    };

    let mut affected = 0;
    for row in rows.iter_mut() {
        if !row.in_scope(scope) {
            continue;
        }
        let column = row.column_mut(field);
        let replacement = column
            .as_deref()
            .and_then(|current| section.replacement_for(current))
            .map(str::to_string);
        if let Some(new_value) = replacement {
            *column = Some(new_value);
            affected += 1;
        }
    }
    affected
}

/// One output row of the verification `SELECT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRow {
    pub zone: String,
    pub label: Option<String>,
    pub parent_meter: Option<String>,
    pub count: u64,
}

/// Evaluate the verification aggregation (zone, label, parent meter) over `rows`.
///
/// Rows come back ordered by zone, then label, then parent meter; missing values sort first.
pub fn verification_rows(query: &VerificationQuery, rows: &[MeterRow]) -> Vec<VerificationRow> {
    let mut groups: BTreeMap<(String, Option<String>, Option<String>), u64> = BTreeMap::new();
    for row in rows {
        let Some(zone) = row.zone.as_deref() else {
            continue;
        };
        if !query.zones.iter().any(|z| z == zone) {
            continue;
        }
        *groups
            .entry((zone.to_string(), row.label.clone(), row.parent_meter.clone()))
            .or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((zone, label, parent_meter), count)| VerificationRow {
            zone,
            label,
            parent_meter,
            count,
        })
        .collect()
}
