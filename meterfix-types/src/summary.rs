use serde::{Deserialize, Serialize};

/// Expected canonical data for one zone, for eyeballing after the fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone: String,
    pub total_meters: u32,
    pub bulk: MeterGroup,
    pub individual: MeterGroup,

    /// Column values every meter of the individual group should carry.
    #[serde(default)]
    pub expected_attributes: Vec<ExpectedAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption: Option<ConsumptionNote>,
}

impl ZoneSummary {
    pub fn counted_meters(&self) -> u32 {
        self.bulk.count + self.individual.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterGroup {
    pub label: String,
    pub description: String,
    pub count: u32,
    pub members: GroupMembers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupMembers {
    /// A single meter known by name.
    Named { name: String },
    /// Meters numbered `{prefix}1` through `{prefix}{count}`.
    Numbered { prefix: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedAttribute {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionNote {
    pub period: String,
    pub lines: Vec<ConsumptionLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionLine {
    pub source: String,
    pub figure: ConsumptionFigure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsumptionFigure {
    CubicMeters { value: u64 },
    Variable { note: String },
}
