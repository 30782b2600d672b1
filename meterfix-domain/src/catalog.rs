//! The fixed correction catalog.
//!
//! Entries are listed in execution order. Consecutive entries that share a section title are
//! rendered as one statement.

use meterfix_types::rule::{CorrectionRule, MeterField, RuleScope};

/// One literal correction plus the text `meterfix explain` shows for it.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Stable rule id (e.g. `parent_meter.zone_08`).
    pub id: &'static str,
    /// Section the rule is grouped under.
    pub section: &'static str,
    pub field: MeterField,
    /// Zone filter; `None` matches every zone.
    pub zone: Option<&'static str>,
    /// Label filter; empty matches every label.
    pub labels: &'static [&'static str],
    pub old_value: &'static str,
    pub new_value: &'static str,
    /// Why the value is wrong and what the fixed value refers to.
    pub rationale: &'static str,
}

impl CatalogEntry {
    pub fn to_rule(&self) -> CorrectionRule {
        CorrectionRule {
            id: self.id.to_string(),
            field: self.field,
            scope: RuleScope {
                zone: self.zone.map(str::to_string),
                labels: self.labels.iter().map(|l| l.to_string()).collect(),
            },
            old_value: self.old_value.to_string(),
            new_value: self.new_value.to_string(),
        }
    }
}

/// Zones the verification query aggregates over.
pub static VERIFICATION_ZONES: &[&str] = &["Zone_08", "Zone_03_(A)", "Zone_03_(B)", "Zone_05"];

const SECTION_ZONE_08: &str = "Fix Zone_08 parent meter references";
const SECTION_ZONE_03A: &str = "Fix Zone_03_(A) parent meter references";
const SECTION_ZONE_03B: &str = "Fix Zone_03_(B) parent meter references";
const SECTION_ZONE_SC: &str = "Fix Zone_SC parent meter references";
const SECTION_TYPE_SPELLING: &str = "Fix type spelling errors";
const SECTION_RESIDENTIAL: &str = "Fix residential type variations";

pub static CATALOG: &[CatalogEntry] = &[
    // Parent meter references
    CatalogEntry {
        id: "parent_meter.zone_08",
        section: SECTION_ZONE_08,
        field: MeterField::ParentMeter,
        zone: Some("Zone_08"),
        labels: &["L3"],
        old_value: "BULK ZONE 8",
        new_value: "ZONE 8 (Bulk Zone 8)",
        rationale: r#"Zone_08 villas (L3) point at "BULK ZONE 8", a name no meter carries.
The zone bulk meter is registered as "ZONE 8 (Bulk Zone 8)", so the villas
drop out of the zone hierarchy until their parent reference is rewritten."#,
    },
    CatalogEntry {
        id: "parent_meter.zone_03a",
        section: SECTION_ZONE_03A,
        field: MeterField::ParentMeter,
        zone: Some("Zone_03_(A)"),
        labels: &["L3", "L4"],
        old_value: "ZONE 3A (BULK ZONE 3A)",
        new_value: "ZONE 3A (Bulk Zone 3A)",
        rationale: r#"Zone_03_(A) L3 and L4 meters reference the bulk meter with an upper-case
suffix. Parent lookups are case sensitive, so the reference must match the
registered name "ZONE 3A (Bulk Zone 3A)" exactly."#,
    },
    CatalogEntry {
        id: "parent_meter.zone_03b",
        section: SECTION_ZONE_03B,
        field: MeterField::ParentMeter,
        zone: Some("Zone_03_(B)"),
        labels: &["L3", "L4"],
        old_value: "ZONE 3B (BULK ZONE 3B)",
        new_value: "ZONE 3B (Bulk Zone 3B)",
        rationale: r#"Same casing defect as Zone_03_(A): L3 and L4 meters must reference
"ZONE 3B (Bulk Zone 3B)"."#,
    },
    CatalogEntry {
        id: "parent_meter.zone_sc",
        section: SECTION_ZONE_SC,
        field: MeterField::ParentMeter,
        zone: Some("Zone_SC"),
        labels: &[],
        old_value: "Sale Centre (Zone Bulk)",
        new_value: "Sales Center Common Building",
        rationale: r#"Sales centre meters reference "Sale Centre (Zone Bulk)". The parent is
registered as "Sales Center Common Building"."#,
    },
    // Type names
    CatalogEntry {
        id: "type.irr_services",
        section: SECTION_TYPE_SPELLING,
        field: MeterField::Type,
        zone: None,
        labels: &[],
        old_value: "IRR_Servies",
        new_value: "IRR_Services",
        rationale: "Misspelled irrigation services type; consumption-by-type reports group it separately.",
    },
    CatalogEntry {
        id: "type.main_bulk",
        section: SECTION_TYPE_SPELLING,
        field: MeterField::Type,
        zone: None,
        labels: &[],
        old_value: "Main BULK",
        new_value: "Main Bulk",
        rationale: "Upper-case variant of the main bulk type.",
    },
    CatalogEntry {
        id: "type.residential_apartment",
        section: SECTION_RESIDENTIAL,
        field: MeterField::Type,
        zone: None,
        labels: &[],
        old_value: "Residential (Apart)",
        new_value: "Residential (Apartment)",
        rationale: "Truncated apartment type; the canonical name is \"Residential (Apartment)\".",
    },
];

/// Look up a catalog entry by rule id.
pub fn lookup_entry(id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.id == id)
}
