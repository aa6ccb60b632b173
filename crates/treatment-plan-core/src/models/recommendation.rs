//! Clinical recommendation models.

use serde::{Deserialize, Serialize};

/// Action suggested to the clinician for one interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Keep both medications, doses are separated in the schedule
    KeepAndSeparate,
    /// Swap one of the medications for an alternative
    ReplaceMedication,
    /// Do not prescribe the two together
    AvoidCombination,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::KeepAndSeparate => "keep_and_separate",
            RecommendationKind::ReplaceMedication => "replace_medication",
            RecommendationKind::AvoidCombination => "avoid_combination",
        }
    }
}

/// A policy-derived recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub details: String,
}
