use meterfix_types::plan::{CorrectionPlan, CorrectionSection, VerificationQuery};

const BANNER_RULE: &str = "-- =====================================================";

pub fn render_sql_script(plan: &CorrectionPlan) -> String {
    let mut out = String::new();
    out.push_str(BANNER_RULE);
    out.push('\n');
    out.push_str("-- FIX WATER DATABASE\n");
    out.push_str("-- Run these updates to fix parent references and types\n");
    out.push_str(BANNER_RULE);
    out.push_str("\n\n");

    for section in &plan.sections {
        out.push_str(&format!("-- {}\n", section.title));
        out.push_str(&render_section(&plan.table, section));
        out.push_str("\n\n");
    }

    out.push_str("-- Verify the fixes\n");
    out.push_str(&render_verification(&plan.table, &plan.verification));
    out.push('\n');
    out
}

/// One `UPDATE` for a section; a multi-rule section maps its old values through `CASE`.
pub fn render_section(table: &str, section: &CorrectionSection) -> String {
    let (Some(field), Some(scope)) = (section.field(), section.scope()) else {
        return String::new();
    };
    let column = field.column();

    let mut out = format!("UPDATE {table}\n");
    if let [rule] = section.rules.as_slice() {
        out.push_str(&format!("SET {column} = {}\n", quote_literal(&rule.new_value)));
    } else {
        out.push_str(&format!("SET {column} = CASE\n"));
        for rule in &section.rules {
            out.push_str(&format!(
                "    WHEN {column} = {} THEN {}\n",
                quote_literal(&rule.old_value),
                quote_literal(&rule.new_value)
            ));
        }
        out.push_str(&format!("    ELSE {column}\nEND\n"));
    }

    let mut predicates = Vec::new();
    if let Some(zone) = &scope.zone {
        predicates.push(format!("zone = {}", quote_literal(zone)));
    }
    if let Some(p) = equals_or_in("label", &scope.labels) {
        predicates.push(p);
    }
    if let Some(p) = equals_or_in(column, &section.old_values()) {
        predicates.push(p);
    }

    out.push_str(&format!("WHERE {}", predicates.join("\n  AND ")));
    out.push(';');
    out
}

pub fn render_verification(table: &str, query: &VerificationQuery) -> String {
    let group_by = query.group_by.join(", ");
    let mut out = format!("SELECT {group_by}, COUNT(*) AS count\nFROM {table}\n");
    if let Some(p) = equals_or_in("zone", &query.zones) {
        out.push_str(&format!("WHERE {p}\n"));
    }
    out.push_str(&format!("GROUP BY {group_by}\n"));
    out.push_str(&format!("ORDER BY {};", query.order_by.join(", ")));
    out
}

/// Single-quoted SQL string literal with embedded quotes doubled.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn equals_or_in<S: AsRef<str>>(column: &str, values: &[S]) -> Option<String> {
    match values {
        [] => None,
        [one] => Some(format!("{column} = {}", quote_literal(one.as_ref()))),
        many => {
            let quoted: Vec<String> = many.iter().map(|v| quote_literal(v.as_ref())).collect();
            Some(format!("{column} IN ({})", quoted.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meterfix_types::rule::{CorrectionRule, MeterField, RuleScope};
    use pretty_assertions::assert_eq;

    fn rule(old: &str, new: &str, scope: RuleScope) -> CorrectionRule {
        CorrectionRule {
            id: format!("type.{old}"),
            field: MeterField::Type,
            scope,
            old_value: old.to_string(),
            new_value: new.to_string(),
        }
    }

    #[test]
    fn quote_literal_doubles_quotes() {
        assert_eq!(quote_literal("Main Bulk"), "'Main Bulk'");
        assert_eq!(quote_literal("O'Brien's"), "'O''Brien''s'");
        assert_eq!(quote_literal(""), "''");
    }

    #[test]
    fn single_rule_section_sets_literal() {
        let section = CorrectionSection {
            title: "t".to_string(),
            rules: vec![rule("Main BULK", "Main Bulk", RuleScope::any())],
        };
        assert_eq!(
            render_section("water_meters", &section),
            "UPDATE water_meters\nSET type = 'Main Bulk'\nWHERE type = 'Main BULK';"
        );
    }

    #[test]
    fn multi_rule_section_uses_case() {
        let section = CorrectionSection {
            title: "t".to_string(),
            rules: vec![
                rule("a", "b", RuleScope::any()),
                rule("c", "d", RuleScope::any()),
            ],
        };
        assert_eq!(
            render_section("m", &section),
            "UPDATE m\nSET type = CASE\n    WHEN type = 'a' THEN 'b'\n    WHEN type = 'c' THEN 'd'\n    ELSE type\nEND\nWHERE type IN ('a', 'c');"
        );
    }

    #[test]
    fn scoped_section_filters_zone_and_labels() {
        let scope = RuleScope {
            zone: Some("Zone_03_(A)".to_string()),
            labels: vec!["L3".to_string(), "L4".to_string()],
        };
        let section = CorrectionSection {
            title: "t".to_string(),
            rules: vec![rule("x", "y", scope)],
        };
        assert_eq!(
            render_section("public.water_meters", &section),
            "UPDATE public.water_meters\nSET type = 'y'\nWHERE zone = 'Zone_03_(A)'\n  AND label IN ('L3', 'L4')\n  AND type = 'x';"
        );
    }

    #[test]
    fn empty_section_renders_nothing() {
        let section = CorrectionSection {
            title: "t".to_string(),
            rules: vec![],
        };
        assert_eq!(render_section("m", &section), "");
    }

    #[test]
    fn verification_without_zones_has_no_where() {
        let query = VerificationQuery {
            zones: vec![],
            group_by: vec!["zone".to_string(), "label".to_string()],
            order_by: vec!["zone".to_string()],
        };
        assert_eq!(
            render_verification("m", &query),
            "SELECT zone, label, COUNT(*) AS count\nFROM m\nGROUP BY zone, label\nORDER BY zone;"
        );
    }
}
