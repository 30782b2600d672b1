use crate::error::PlanError;
use meterfix_types::summary::{
    ConsumptionFigure, ConsumptionLine, ConsumptionNote, ExpectedAttribute, GroupMembers,
    MeterGroup, ZoneSummary,
};

/// Canonical Zone_08 data the corrected table should show.
pub fn expected_zone_summary() -> ZoneSummary {
    let bulk_name = "ZONE 8 (Bulk Zone 8)";
    ZoneSummary {
        zone: "Zone_08".to_string(),
        total_meters: 23,
        bulk: MeterGroup {
            label: "L2".to_string(),
            description: "Zone Bulk".to_string(),
            count: 1,
            members: GroupMembers::Named {
                name: bulk_name.to_string(),
            },
        },
        individual: MeterGroup {
            label: "L3".to_string(),
            description: "Villas".to_string(),
            count: 22,
            members: GroupMembers::Numbered {
                prefix: "Z8-".to_string(),
            },
        },
        expected_attributes: [
            ("zone", "Zone_08"),
            ("parent_meter", bulk_name),
            ("type", "Residential (Villa)"),
            ("label", "L3"),
        ]
        .into_iter()
        .map(|(column, value)| ExpectedAttribute {
            column: column.to_string(),
            value: value.to_string(),
        })
        .collect(),
        consumption: Some(ConsumptionNote {
            period: "Jan-Jun".to_string(),
            lines: vec![
                ConsumptionLine {
                    source: "Zone Bulk (L2)".to_string(),
                    figure: ConsumptionFigure::CubicMeters { value: 14_932 },
                },
                ConsumptionLine {
                    source: "Individual Villas (L3)".to_string(),
                    figure: ConsumptionFigure::Variable {
                        note: "Variable per villa".to_string(),
                    },
                },
            ],
        }),
    }
}

pub fn validate_zone_summary(summary: &ZoneSummary) -> Result<(), PlanError> {
    let counted = summary.counted_meters();
    if counted != summary.total_meters {
        return Err(PlanError::SummaryMismatch {
            zone: summary.zone.clone(),
            stated: summary.total_meters,
            counted,
        });
    }
    Ok(())
}
