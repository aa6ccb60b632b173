//! Interaction rule and detected interaction models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal clinical risk of an interaction.
///
/// Variants are declared in ascending order so `Ord` follows clinical risk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Contraindicated,
}

impl Severity {
    /// Lowercase label as used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Major => "major",
            Severity::Contraindicated => "contraindicated",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A curated pairwise interaction rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRule {
    /// The two medication names (unordered)
    pub medications: [String; 2],
    /// Clinical severity
    pub severity: Severity,
    /// Human-readable mechanism/risk
    pub reason: String,
    /// Whether dose timing alone can mitigate the interaction
    pub can_separate_by_schedule: bool,
    /// Minimum hours between doses when separable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hours_apart: Option<f64>,
}

impl InteractionRule {
    /// Create a rule that cannot be mitigated by timing.
    pub fn new(
        first: impl Into<String>,
        second: impl Into<String>,
        severity: Severity,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            medications: [first.into(), second.into()],
            severity,
            reason: reason.into(),
            can_separate_by_schedule: false,
            min_hours_apart: None,
        }
    }

    /// Mark the rule as separable by keeping doses `hours` apart.
    pub fn separable(mut self, hours: f64) -> Self {
        self.can_separate_by_schedule = true;
        self.min_hours_apart = Some(hours);
        self
    }
}

/// An interaction detected in a concrete treatment plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Display names as supplied in the plan, in detection order
    pub medications: [String; 2],
    pub severity: Severity,
    pub reason: String,
    pub can_separate_by_schedule: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hours_apart: Option<f64>,
}

impl Interaction {
    /// Materialize a rule against the display names of the plan.
    pub fn from_rule(rule: &InteractionRule, first: &str, second: &str) -> Self {
        Self {
            medications: [first.to_string(), second.to_string()],
            severity: rule.severity,
            reason: rule.reason.clone(),
            can_separate_by_schedule: rule.can_separate_by_schedule,
            min_hours_apart: rule.min_hours_apart,
        }
    }

    /// Required separation in whole minutes, if this interaction is a scheduling constraint.
    pub fn required_gap_minutes(&self) -> Option<u32> {
        if !self.can_separate_by_schedule {
            return None;
        }
        self.min_hours_apart
            .map(|hours| (hours * 60.0).ceil().max(0.0) as u32)
    }

    /// Patient-facing timing instruction.
    pub fn separation_instruction(&self) -> Option<String> {
        match (self.can_separate_by_schedule, self.min_hours_apart) {
            (true, Some(hours)) => Some(format!("Separate by at least {} hours.", hours)),
            _ => None,
        }
    }

    /// "A + B" label used in titles.
    pub fn pair_label(&self) -> String {
        format!("{} + {}", self.medications[0], self.medications[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Minor < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Major);
        assert!(Severity::Major < Severity::Contraindicated);
    }

    #[test]
    fn test_severity_json() {
        assert_eq!(
            serde_json::to_string(&Severity::Contraindicated).unwrap(),
            "\"contraindicated\""
        );
        let parsed: Severity = serde_json::from_str("\"moderate\"").unwrap();
        assert_eq!(parsed, Severity::Moderate);
    }

    #[test]
    fn test_required_gap_minutes() {
        let rule = InteractionRule::new("a", "b", Severity::Major, "r").separable(8.0);
        let interaction = Interaction::from_rule(&rule, "A", "B");
        assert_eq!(interaction.required_gap_minutes(), Some(480));

        let rule = InteractionRule::new("a", "b", Severity::Moderate, "r").separable(2.5);
        let interaction = Interaction::from_rule(&rule, "A", "B");
        assert_eq!(interaction.required_gap_minutes(), Some(150));

        let rule = InteractionRule::new("a", "b", Severity::Major, "r");
        let interaction = Interaction::from_rule(&rule, "A", "B");
        assert_eq!(interaction.required_gap_minutes(), None);
    }

    #[test]
    fn test_interaction_json_shape() {
        let rule = InteractionRule::new("warfarin", "aspirin", Severity::Major, "Bleeding risk")
            .separable(8.0);
        let interaction = Interaction::from_rule(&rule, "Warfarin", "Aspirin");
        let json = serde_json::to_value(&interaction).unwrap();

        assert_eq!(json["medications"][0], "Warfarin");
        assert_eq!(json["severity"], "major");
        assert_eq!(json["canSeparateBySchedule"], true);
        assert_eq!(json["minHoursApart"], 8.0);
    }

    #[test]
    fn test_min_hours_omitted_when_absent() {
        let rule = InteractionRule::new("a", "b", Severity::Minor, "r");
        let json = serde_json::to_string(&Interaction::from_rule(&rule, "A", "B")).unwrap();
        assert!(!json.contains("minHoursApart"));
    }

    #[test]
    fn test_separation_instruction() {
        let rule = InteractionRule::new("a", "b", Severity::Moderate, "r").separable(4.0);
        let interaction = Interaction::from_rule(&rule, "A", "B");
        assert_eq!(
            interaction.separation_instruction().as_deref(),
            Some("Separate by at least 4 hours.")
        );
    }
}
