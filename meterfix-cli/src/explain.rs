//! Rule explanations for the `meterfix explain` and `meterfix list-fixes` commands.

use meterfix_domain::{CATALOG, CatalogEntry};
use meterfix_types::rule::MeterField;

const RULE: &str =
    "================================================================================";
const UNDERLINE: &str =
    "--------------------------------------------------------------------------------";

pub fn list_rule_ids() -> Vec<&'static str> {
    CATALOG.iter().map(|e| e.id).collect()
}

pub fn format_field(field: MeterField) -> &'static str {
    match field {
        MeterField::ParentMeter => "PARENT_METER",
        MeterField::Type => "TYPE",
    }
}

pub fn format_scope(entry: &CatalogEntry) -> String {
    let zone = entry.zone.unwrap_or("any zone");
    let labels = if entry.labels.is_empty() {
        "any label".to_string()
    } else {
        format!("labels {}", entry.labels.join(", "))
    };
    format!("{zone}, {labels}")
}

/// Full explanation text; `statement` is the rendered `UPDATE` of the rule's section.
pub fn explain_entry(entry: &CatalogEntry, statement: &str) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("FIX: {}\n", entry.id));
    out.push_str(RULE);
    out.push_str("\n\n");

    out.push_str(&format!("Field:    {}\n", format_field(entry.field)));
    out.push_str(&format!("Scope:    {}\n", format_scope(entry)));
    out.push_str(&format!("Section:  {}\n", entry.section));
    out.push_str(&format!("Old:      {}\n", entry.old_value));
    out.push_str(&format!("New:      {}\n\n", entry.new_value));

    out.push_str("RATIONALE\n");
    out.push_str(UNDERLINE);
    out.push('\n');
    out.push_str(entry.rationale);
    out.push_str("\n\n");

    out.push_str("STATEMENT\n");
    out.push_str(UNDERLINE);
    out.push('\n');
    out.push_str(statement);
    out.push_str("\n\n");

    out.push_str("IDEMPOTENCE\n");
    out.push_str(UNDERLINE);
    out.push('\n');
    out.push_str(&format!(
        "The filter requires {} = '{}', so rows already holding '{}' are not\nmatched again when the script is re-run.\n",
        entry.field.column(),
        entry.old_value,
        entry.new_value
    ));
    out
}
