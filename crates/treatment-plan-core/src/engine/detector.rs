//! Pairwise interaction detection against the catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::InteractionCatalog;
use crate::models::{
    Interaction, Medication, MAX_FREQUENCY_PER_DAY, MIN_FREQUENCY_PER_DAY,
};

use super::{EngineError, EngineResult};

/// Fewest medications a plan may contain.
pub const MIN_MEDICATIONS: usize = 2;

/// Most medications a plan may contain.
pub const MAX_MEDICATIONS: usize = 4;

/// A medication the catalog has no rules for.
///
/// Absence of a rule is not evidence of safety; gaps are reported for catalog
/// maintenance only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageGap {
    /// Display name as supplied
    pub medication: String,
    /// Closest catalog name, if one is similar enough
    pub suggestion: Option<String>,
}

/// Finds catalog interactions among a plan's medications.
pub struct InteractionDetector<'a> {
    catalog: &'a InteractionCatalog,
}

impl<'a> InteractionDetector<'a> {
    pub fn new(catalog: &'a InteractionCatalog) -> Self {
        Self { catalog }
    }

    /// Validate a medication list before any analysis work.
    pub fn validate(medications: &[Medication]) -> EngineResult<()> {
        if !(MIN_MEDICATIONS..=MAX_MEDICATIONS).contains(&medications.len()) {
            return Err(EngineError::InvalidInput(format!(
                "expected {} to {} medications, got {}",
                MIN_MEDICATIONS,
                MAX_MEDICATIONS,
                medications.len()
            )));
        }

        for (position, medication) in medications.iter().enumerate() {
            if medication.name.trim().is_empty() {
                return Err(EngineError::InvalidInput(format!(
                    "medication {} has an empty name",
                    position + 1
                )));
            }
            if medication.dose.trim().is_empty() {
                return Err(EngineError::InvalidInput(format!(
                    "medication {} ({}) has an empty dose",
                    position + 1,
                    medication.name
                )));
            }
            if !medication.has_supported_frequency() {
                return Err(EngineError::InvalidInput(format!(
                    "medication {} ({}) has frequencyPerDay {}, expected {} to {}",
                    position + 1,
                    medication.name,
                    medication.frequency_per_day,
                    MIN_FREQUENCY_PER_DAY,
                    MAX_FREQUENCY_PER_DAY
                )));
            }
        }

        Ok(())
    }

    /// Detect all interactions in the plan.
    ///
    /// Each unordered pair of distinct medications is checked once. Results are
    /// ordered by the input position of the pair's first medication, then the
    /// second; the reported names are the first occurrences as supplied.
    pub fn detect(&self, medications: &[Medication]) -> EngineResult<Vec<Interaction>> {
        Self::validate(medications)?;

        let distinct = distinct_medications(medications);
        let mut interactions = Vec::new();

        for (i, first) in distinct.iter().enumerate() {
            for second in &distinct[i + 1..] {
                if let Some(rule) = self.catalog.lookup(&first.name, &second.name) {
                    interactions.push(Interaction::from_rule(rule, &first.name, &second.name));
                }
            }
        }

        Ok(interactions)
    }

    /// Medications with no catalog coverage, one entry per distinct name.
    pub fn coverage_gaps(&self, medications: &[Medication]) -> Vec<CoverageGap> {
        distinct_medications(medications)
            .into_iter()
            .filter(|medication| !self.catalog.knows(&medication.name))
            .map(|medication| CoverageGap {
                medication: medication.name.clone(),
                suggestion: self
                    .catalog
                    .closest_known(&medication.name)
                    .map(str::to_string),
            })
            .collect()
    }
}

/// First occurrence of each normalized name, in input order.
fn distinct_medications(medications: &[Medication]) -> Vec<&Medication> {
    let mut seen: Vec<String> = Vec::with_capacity(medications.len());
    let mut distinct = Vec::with_capacity(medications.len());

    for medication in medications {
        let key = medication.normalized_name();
        if !seen.contains(&key) {
            seen.push(key);
            distinct.push(medication);
        }
    }

    distinct
}
