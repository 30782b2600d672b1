use serde::{Deserialize, Serialize};

/// Column a correction rule rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterField {
    ParentMeter,
    Type,
}

impl MeterField {
    /// Column name in the `water_meters` table.
    pub fn column(self) -> &'static str {
        match self {
            MeterField::ParentMeter => "parent_meter",
            MeterField::Type => "type",
        }
    }
}

/// Row filter applied on top of the current-value match.
///
/// `zone: None` and an empty `labels` list both mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl RuleScope {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_unscoped(&self) -> bool {
        self.zone.is_none() && self.labels.is_empty()
    }

    /// True when some row could satisfy both scopes.
    pub fn overlaps(&self, other: &RuleScope) -> bool {
        let zones = match (&self.zone, &other.zone) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        let labels = self.labels.is_empty()
            || other.labels.is_empty()
            || self.labels.iter().any(|l| other.labels.contains(l));
        zones && labels
    }

    /// Row-level check. A missing zone or label never satisfies a filter on it.
    pub fn matches(&self, zone: Option<&str>, label: Option<&str>) -> bool {
        let zone_ok = match &self.zone {
            Some(z) => zone == Some(z.as_str()),
            None => true,
        };
        let label_ok =
            self.labels.is_empty() || label.is_some_and(|l| self.labels.iter().any(|s| s == l));
        zone_ok && label_ok
    }
}

/// One old-value to new-value correction.
///
/// The old value is part of the row predicate, so a rule that already ran
/// matches nothing the second time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRule {
    pub id: String,
    pub field: MeterField,

    #[serde(default)]
    pub scope: RuleScope,

    pub old_value: String,
    pub new_value: String,
}
