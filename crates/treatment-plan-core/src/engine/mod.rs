//! Treatment plan analysis engine.
//!
//! Pipeline: Validation → Detection → Schedule Synthesis → Recommendation → Analysis

mod detector;
mod recommender;
mod synthesizer;

pub use detector::*;
pub use recommender::*;
pub use synthesizer::*;

use thiserror::Error;
use tracing::info;

use crate::catalog::InteractionCatalog;
use crate::config::{ConfigResult, EngineConfig};
use crate::models::{Analysis, Medication};

/// Engine errors.
///
/// Only malformed input is an error; unresolved scheduling constraints and
/// unknown medications are reported inside the analysis or the logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Orchestrates the full pipeline into one immutable [`Analysis`].
pub struct AnalysisAssembler<'a> {
    detector: InteractionDetector<'a>,
    synthesizer: ScheduleSynthesizer,
    recommender: RecommendationEngine,
}

impl<'a> AnalysisAssembler<'a> {
    /// Create an assembler with the default dosing window.
    pub fn new(catalog: &'a InteractionCatalog) -> Self {
        Self {
            detector: InteractionDetector::new(catalog),
            synthesizer: ScheduleSynthesizer::default(),
            recommender: RecommendationEngine::new(),
        }
    }

    /// Create an assembler with a custom configuration.
    pub fn with_config(catalog: &'a InteractionCatalog, config: &EngineConfig) -> ConfigResult<Self> {
        Ok(Self {
            detector: InteractionDetector::new(catalog),
            synthesizer: ScheduleSynthesizer::new(config.window.clone())?,
            recommender: RecommendationEngine::new(),
        })
    }

    /// Analyze a condition assignment.
    ///
    /// Identical inputs always yield an identical analysis.
    pub fn build(&self, condition: &str, medications: &[Medication]) -> EngineResult<Analysis> {
        if condition.trim().is_empty() {
            return Err(EngineError::InvalidInput("condition is empty".into()));
        }
        InteractionDetector::validate(medications)?;

        for gap in self.detector.coverage_gaps(medications) {
            match &gap.suggestion {
                Some(suggestion) => info!(
                    "No interaction rules for {} (closest catalog entry: {})",
                    gap.medication, suggestion
                ),
                None => info!("No interaction rules for {}", gap.medication),
            }
        }

        // Step 1: Detect interactions
        let interactions = self.detector.detect(medications)?;

        // Step 2: Build the schedule around separable interactions
        let schedule = self.synthesizer.synthesize(medications, &interactions);

        // Step 3: Apply the severity policy to what the schedule achieved
        let recommendations = self.recommender.recommend(&interactions, &schedule);
        let is_safe = self.recommender.is_safe(&interactions, &schedule);

        info!(
            "Analyzed plan for {}: {} medications, {} interactions, safe={}",
            condition.trim(),
            medications.len(),
            interactions.len(),
            is_safe
        );

        Ok(Analysis::new(is_safe, interactions, recommendations, schedule))
    }

    /// Recompute an edited assignment from scratch, replacing `previous`.
    pub fn rebuild(
        &self,
        previous: &Analysis,
        condition: &str,
        medications: &[Medication],
    ) -> EngineResult<Analysis> {
        let analysis = self.build(condition, medications)?;
        match (previous.fingerprint(), analysis.fingerprint()) {
            (Ok(old), Ok(new)) => info!("Replaced analysis {} with {}", old, new),
            _ => info!("Replaced analysis for {}", condition.trim()),
        }
        Ok(analysis)
    }

    pub fn synthesizer(&self) -> &ScheduleSynthesizer {
        &self.synthesizer
    }
}
