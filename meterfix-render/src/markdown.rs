use meterfix_types::plan::CorrectionPlan;
use meterfix_types::rule::RuleScope;

pub fn render_plan_md(plan: &CorrectionPlan) -> String {
    let mut out = String::new();
    out.push_str("# meterfix plan\n\n");
    out.push_str(&format!("- Table: `{}`\n", plan.table));
    out.push_str(&format!(
        "- Statements: {} (rules {})\n",
        plan.summary.sections_total, plan.summary.rules_total
    ));
    out.push_str(&format!(
        "- Parent meter rules: {}\n- Type rules: {}\n",
        plan.summary.parent_meter_rules, plan.summary.type_rules
    ));
    out.push_str(&format!(
        "- Verification zones: {}\n\n",
        plan.verification
            .zones
            .iter()
            .map(|z| format!("`{z}`"))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    out.push_str("## Sections\n\n");
    if plan.sections.is_empty() {
        out.push_str("_No corrections planned._\n");
        return out;
    }

    for (i, section) in plan.sections.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n\n", i + 1, section.title));
        if let Some(scope) = section.scope() {
            out.push_str(&format!("- Scope: {}\n", scope_label(scope)));
        }
        out.push('\n');
        out.push_str("| Rule | Field | Old value | New value |\n");
        out.push_str("|---|---|---|---|\n");
        for rule in &section.rules {
            out.push_str(&format!(
                "| `{}` | `{}` | {} | {} |\n",
                rule.id,
                rule.field.column(),
                rule.old_value,
                rule.new_value
            ));
        }
        out.push('\n');
    }

    out
}

fn scope_label(scope: &RuleScope) -> String {
    if scope.is_unscoped() {
        return "all rows".to_string();
    }
    let mut parts = Vec::new();
    if let Some(zone) = &scope.zone {
        parts.push(format!("zone `{zone}`"));
    }
    if !scope.labels.is_empty() {
        parts.push(format!("labels {}", scope.labels.join(", ")));
    }
    parts.join("; ")
}
