use meterfix_types::summary::{ConsumptionFigure, GroupMembers, MeterGroup, ZoneSummary};

pub fn render_zone_summary(summary: &ZoneSummary) -> String {
    let title = format!("{} EXPECTED DATA SUMMARY:", summary.zone.to_uppercase());
    let mut out = String::new();
    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push('\n');
    out.push_str(&format!("Total Meters: {}\n", summary.total_meters));
    out.push_str(&group_line(&summary.bulk));
    out.push_str(&group_line(&summary.individual));

    if !summary.expected_attributes.is_empty() {
        out.push_str(&format!("\nAll {} meters should have:\n", summary.individual.label));
        for attr in &summary.expected_attributes {
            out.push_str(&format!("- {}: '{}'\n", attr.column, attr.value));
        }
    }

    if let Some(consumption) = &summary.consumption {
        out.push_str(&format!(
            "\nTotal {} Consumption ({}):\n",
            summary.zone, consumption.period
        ));
        for line in &consumption.lines {
            let figure = match &line.figure {
                ConsumptionFigure::CubicMeters { value } => {
                    format!("{} m³", group_thousands(*value))
                }
                ConsumptionFigure::Variable { note } => note.clone(),
            };
            out.push_str(&format!("- {}: {}\n", line.source, figure));
        }
    }

    out
}

fn group_line(group: &MeterGroup) -> String {
    let noun = if group.count == 1 { "meter" } else { "meters" };
    let members = match &group.members {
        GroupMembers::Named { name } => format!("\"{name}\""),
        GroupMembers::Numbered { prefix } => format!("{prefix}1 through {prefix}{}", group.count),
    };
    format!(
        "- {} ({}): {} {} - {}\n",
        group.label, group.description, group.count, noun, members
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
