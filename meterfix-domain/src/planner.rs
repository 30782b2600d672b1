use crate::catalog::{self, CatalogEntry};
use crate::error::PlanError;
use meterfix_types::plan::{
    CorrectionPlan, CorrectionSection, PlanSummary, ToolInfo, VerificationQuery,
};
use meterfix_types::rule::{CorrectionRule, MeterField};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub table: String,
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            table: meterfix_types::DEFAULT_TABLE.to_string(),
            allow: vec![],
            deny: vec![],
        }
    }
}

pub struct Planner {
    entries: Vec<CatalogEntry>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    pub fn new() -> Self {
        Self {
            entries: catalog::CATALOG.to_vec(),
        }
    }

    pub fn with_catalog(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn plan(
        &self,
        config: &PlannerConfig,
        tool: ToolInfo,
    ) -> Result<CorrectionPlan, PlanError> {
        validate_table_name(&config.table)?;

        let mut plan = CorrectionPlan::new(tool, config.table.clone(), verification_query());

        let mut sections: Vec<CorrectionSection> = Vec::new();
        for entry in &self.entries {
            if !allowed_by_id(&config.allow, &config.deny, entry.id) {
                debug!("rule {} filtered out by policy", entry.id);
                continue;
            }

            match sections.last_mut() {
                Some(last) if last.title == entry.section => last.rules.push(entry.to_rule()),
                _ => sections.push(CorrectionSection {
                    title: entry.section.to_string(),
                    rules: vec![entry.to_rule()],
                }),
            }
        }

        validate_sections(&sections)?;

        plan.summary = summarize(&sections);
        plan.sections = sections;
        debug!(
            "planned {} rules in {} sections against {}",
            plan.summary.rules_total, plan.summary.sections_total, plan.table
        );
        Ok(plan)
    }
}

fn verification_query() -> VerificationQuery {
    VerificationQuery {
        zones: catalog::VERIFICATION_ZONES
            .iter()
            .map(|z| z.to_string())
            .collect(),
        group_by: vec![
            "zone".to_string(),
            "label".to_string(),
            MeterField::ParentMeter.column().to_string(),
        ],
        order_by: vec!["zone".to_string(), "label".to_string()],
    }
}

/// Accepts `name` or `schema.name`, each part `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_table_name(table: &str) -> Result<(), PlanError> {
    let parts: Vec<&str> = table.split('.').collect();
    let valid = parts.len() <= 2 && parts.iter().all(|p| is_identifier(p));
    if valid {
        Ok(())
    } else {
        Err(PlanError::InvalidTableName(table.to_string()))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_sections(sections: &[CorrectionSection]) -> Result<(), PlanError> {
    let mut ids = BTreeSet::new();
    for section in sections {
        for rule in &section.rules {
            if !ids.insert(rule.id.as_str()) {
                return Err(PlanError::DuplicateRuleId(rule.id.clone()));
            }
            validate_rule(rule)?;
        }

        if let Some(first) = section.rules.first()
            && let Some(odd) = section
                .rules
                .iter()
                .find(|r| r.field != first.field || r.scope != first.scope)
        {
            return Err(PlanError::MixedSection {
                section: section.title.clone(),
                rule: odd.id.clone(),
            });
        }
    }

    let rules: Vec<&CorrectionRule> = sections.iter().flat_map(|s| s.rules.iter()).collect();
    for (i, a) in rules.iter().enumerate() {
        for b in &rules[i + 1..] {
            if a.field != b.field || !a.scope.overlaps(&b.scope) {
                continue;
            }
            if a.old_value == b.old_value {
                return Err(PlanError::OverlappingRules {
                    first: a.id.clone(),
                    second: b.id.clone(),
                    field: a.field,
                    value: a.old_value.clone(),
                });
            }
            for (producer, consumer) in [(a, b), (b, a)] {
                if producer.new_value == consumer.old_value {
                    return Err(PlanError::ChainedRules {
                        producer: producer.id.clone(),
                        consumer: consumer.id.clone(),
                        value: producer.new_value.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

fn validate_rule(rule: &CorrectionRule) -> Result<(), PlanError> {
    if rule.old_value.is_empty() {
        return Err(PlanError::EmptyValue {
            id: rule.id.clone(),
            which: "old",
        });
    }
    if rule.new_value.is_empty() {
        return Err(PlanError::EmptyValue {
            id: rule.id.clone(),
            which: "new",
        });
    }
    if rule.old_value == rule.new_value {
        return Err(PlanError::NoOpRule(rule.id.clone()));
    }
    Ok(())
}

fn summarize(sections: &[CorrectionSection]) -> PlanSummary {
    let mut summary = PlanSummary {
        sections_total: sections.len() as u64,
        ..Default::default()
    };
    for rule in sections.iter().flat_map(|s| s.rules.iter()) {
        summary.rules_total += 1;
        match rule.field {
            MeterField::ParentMeter => summary.parent_meter_rules += 1,
            MeterField::Type => summary.type_rules += 1,
        }
    }
    summary
}

fn allowed_by_id(allow: &[String], deny: &[String], id: &str) -> bool {
    if deny.iter().any(|p| glob_match(p, id)) {
        return false;
    }
    allow.is_empty() || allow.iter().any(|p| glob_match(p, id))
}

fn glob_match(pat: &str, text: &str) -> bool {
    // Simple wildcard matcher: '*' and '?'.
    let p = pat.as_bytes();
    let t = text.as_bytes();
    let mut dp = vec![vec![false; t.len() + 1]; p.len() + 1];
    dp[0][0] = true;

    for i in 1..=p.len() {
        if p[i - 1] == b'*' {
            dp[i][0] = dp[i - 1][0];
        }
    }

    for i in 1..=p.len() {
        for j in 1..=t.len() {
            dp[i][j] = match p[i - 1] {
                b'*' => dp[i - 1][j] || dp[i][j - 1],
                b'?' => dp[i - 1][j - 1],
                c => dp[i - 1][j - 1] && c == t[j - 1],
            };
        }
    }

    dp[p.len()][t.len()]
}
