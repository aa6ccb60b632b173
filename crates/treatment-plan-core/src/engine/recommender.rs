//! Severity policy: recommendations and the overall safety verdict.
//!
//! | severity        | separated by schedule | otherwise          |
//! |-----------------|-----------------------|--------------------|
//! | minor           | -                     | -                  |
//! | moderate        | keep_and_separate     | avoid_combination  |
//! | major           | keep_and_separate     | replace_medication |
//! | contraindicated | avoid_combination     | avoid_combination  |
//!
//! Whether an interaction is separated is read from the schedule itself, so the
//! verdict is a pure function of the interactions and the schedule.

use crate::models::{
    min_gap_minutes, Interaction, Recommendation, RecommendationKind, ScheduleSlot, Severity,
};

/// Applies the severity policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// One recommendation per actionable interaction, in interaction order.
    pub fn recommend(
        &self,
        interactions: &[Interaction],
        schedule: &[ScheduleSlot],
    ) -> Vec<Recommendation> {
        interactions
            .iter()
            .filter_map(|interaction| {
                let separated = is_separated(interaction, schedule);
                recommendation_for(interaction, separated)
            })
            .collect()
    }

    /// False when any interaction is contraindicated or any major interaction
    /// is not separated by the schedule.
    pub fn is_safe(&self, interactions: &[Interaction], schedule: &[ScheduleSlot]) -> bool {
        interactions.iter().all(|interaction| match interaction.severity {
            Severity::Contraindicated => false,
            Severity::Major => is_separated(interaction, schedule),
            Severity::Minor | Severity::Moderate => true,
        })
    }

    /// Indices of separable interactions whose required gap the schedule misses.
    pub fn unresolved(&self, interactions: &[Interaction], schedule: &[ScheduleSlot]) -> Vec<usize> {
        interactions
            .iter()
            .enumerate()
            .filter(|(_, interaction)| {
                interaction.required_gap_minutes().is_some()
                    && !is_separated(interaction, schedule)
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// Whether dose timing mitigates the interaction in this schedule.
fn is_separated(interaction: &Interaction, schedule: &[ScheduleSlot]) -> bool {
    if !interaction.can_separate_by_schedule {
        return false;
    }
    match interaction.required_gap_minutes() {
        None => true,
        Some(required) => min_gap_minutes(
            schedule,
            &interaction.medications[0],
            &interaction.medications[1],
        )
        .is_some_and(|gap| gap >= required),
    }
}

fn recommendation_for(interaction: &Interaction, separated: bool) -> Option<Recommendation> {
    let [first, second] = &interaction.medications;
    let (first, second) = (first.trim(), second.trim());
    let reason = interaction.reason.trim();

    let kind = match (interaction.severity, separated) {
        (Severity::Minor, _) => return None,
        (Severity::Moderate, true) | (Severity::Major, true) => RecommendationKind::KeepAndSeparate,
        (Severity::Moderate, false) => RecommendationKind::AvoidCombination,
        (Severity::Major, false) => RecommendationKind::ReplaceMedication,
        (Severity::Contraindicated, _) => RecommendationKind::AvoidCombination,
    };

    let (title, details) = match kind {
        RecommendationKind::KeepAndSeparate => (
            format!("Keep {} and {} with separated doses", first, second),
            match interaction.min_hours_apart {
                Some(hours) => format!(
                    "{} The schedule keeps doses at least {} hours apart.",
                    reason, hours
                ),
                None => format!("{} Take the doses at different times of day.", reason),
            },
        ),
        RecommendationKind::ReplaceMedication => (
            format!("Replace {} or {}", first, second),
            if interaction.can_separate_by_schedule {
                format!(
                    "{} The dosing window cannot keep these doses far enough apart; \
                     prescribe an alternative to one of them.",
                    reason
                )
            } else {
                format!(
                    "{} Dose timing does not mitigate this interaction; \
                     prescribe an alternative to one of them.",
                    reason
                )
            },
        ),
        RecommendationKind::AvoidCombination => (
            format!("Avoid combining {} and {}", first, second),
            if interaction.severity == Severity::Contraindicated {
                format!(
                    "{} This combination is contraindicated and must not be prescribed together.",
                    reason
                )
            } else {
                format!(
                    "{} The schedule cannot separate these doses; do not prescribe them together.",
                    reason
                )
            },
        ),
    };

    Some(Recommendation {
        kind,
        title,
        details,
    })
}
