//! Medication models.

use serde::{Deserialize, Serialize};

/// Lowest supported number of doses per day.
pub const MIN_FREQUENCY_PER_DAY: u32 = 1;

/// Highest supported number of doses per day.
pub const MAX_FREQUENCY_PER_DAY: u32 = 4;

/// A medication assigned to a patient as part of a treatment plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Display name as entered by the clinician (e.g., "Warfarin")
    pub name: String,
    /// Free-text dose (e.g., "5mg", "81 mg")
    pub dose: String,
    /// Number of doses per day (1-4)
    pub frequency_per_day: u32,
}

impl Medication {
    /// Create a new medication.
    pub fn new(name: impl Into<String>, dose: impl Into<String>, frequency_per_day: u32) -> Self {
        Self {
            name: name.into(),
            dose: dose.into(),
            frequency_per_day,
        }
    }

    /// Name used for catalog matching.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Check whether the frequency is within the supported range.
    pub fn has_supported_frequency(&self) -> bool {
        (MIN_FREQUENCY_PER_DAY..=MAX_FREQUENCY_PER_DAY).contains(&self.frequency_per_day)
    }
}

/// Normalize a medication name for matching.
///
/// Trims, collapses internal whitespace and case-folds, so `"  Calcium   Carbonate"`
/// and `"calcium carbonate"` refer to the same medication.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Warfarin"), "warfarin");
        assert_eq!(normalize_name("  WARFARIN "), "warfarin");
        assert_eq!(normalize_name("Calcium   Carbonate"), "calcium carbonate");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_supported_frequency() {
        assert!(Medication::new("A", "1mg", 1).has_supported_frequency());
        assert!(Medication::new("A", "1mg", 4).has_supported_frequency());
        assert!(!Medication::new("A", "1mg", 0).has_supported_frequency());
        assert!(!Medication::new("A", "1mg", 5).has_supported_frequency());
    }

    #[test]
    fn test_camel_case_json() {
        let med: Medication =
            serde_json::from_str(r#"{"name":"Aspirin","dose":"81mg","frequencyPerDay":2}"#)
                .unwrap();
        assert_eq!(med, Medication::new("Aspirin", "81mg", 2));
    }
}
