//! Treatment Plan Core Library
//!
//! Medication safety and dosing-schedule engine. Given a condition and 2-4
//! medications it produces a single deterministic analysis: detected drug-drug
//! interactions, a daily dosing schedule, clinical recommendations and a safety
//! verdict.
//!
//! # Architecture
//!
//! ```text
//! condition + medications
//!          │
//!          ▼
//!     Validation ──── InvalidInput (no analysis produced)
//!          │
//!          ▼
//!  InteractionDetector ◄──── InteractionCatalog (immutable, shared)
//!          │
//!          ▼ interactions
//!  ScheduleSynthesizer  (base times → constraint repair)
//!          │
//!          ▼ schedule
//!  RecommendationEngine (severity policy + isSafe)
//!          │
//!          ▼
//!      Analysis ──── canonical JSON / fingerprint ──── doctor & patient views
//! ```
//!
//! # Core Principle
//!
//! **Absence of a catalog rule is not evidence of safety.** Unknown medications are
//! logged as coverage gaps and never produce an interaction.
//!
//! # Modules
//!
//! - [`catalog`]: Curated interaction rules
//! - [`models`]: Domain types (Medication, Interaction, ScheduleSlot, Analysis, etc.)
//! - [`engine`]: Detector, synthesizer, recommendation policy and assembler
//! - [`config`]: Dosing window configuration

pub mod catalog;
pub mod config;
pub mod engine;
pub mod models;

// Re-export commonly used types
pub use catalog::{CatalogError, InteractionCatalog};
pub use config::{ConfigError, DosingWindow, EngineConfig};
pub use engine::{
    AnalysisAssembler, EngineError, InteractionDetector, RecommendationEngine,
    ScheduleSynthesizer,
};
pub use models::{
    Analysis, DoseTime, Interaction, InteractionRule, Medication, PatientGuidance,
    Recommendation, RecommendationKind, ScheduleSlot, Severity, TimelineEntry,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TreatmentPlanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<EngineError> for TreatmentPlanError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidInput(msg) => TreatmentPlanError::InvalidInput(msg),
        }
    }
}

impl From<CatalogError> for TreatmentPlanError {
    fn from(e: CatalogError) -> Self {
        TreatmentPlanError::Catalog(e.to_string())
    }
}

impl From<ConfigError> for TreatmentPlanError {
    fn from(e: ConfigError) -> Self {
        TreatmentPlanError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for TreatmentPlanError {
    fn from(e: serde_json::Error) -> Self {
        TreatmentPlanError::Serialization(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create an engine with the built-in catalog and default dosing window.
#[uniffi::export]
pub fn open_engine() -> Result<Arc<TreatmentPlanEngine>, TreatmentPlanError> {
    Ok(Arc::new(TreatmentPlanEngine {
        catalog: Arc::new(InteractionCatalog::builtin()?),
        config: EngineConfig::default(),
    }))
}

/// Create an engine from a curated catalog file and optional TOML configuration.
#[uniffi::export]
pub fn open_engine_with(
    catalog_json: String,
    config_toml: Option<String>,
) -> Result<Arc<TreatmentPlanEngine>, TreatmentPlanError> {
    let catalog = InteractionCatalog::from_json(&catalog_json)?;
    let config = match config_toml {
        Some(toml) => EngineConfig::from_toml_str(&toml)?,
        None => EngineConfig::default(),
    };
    Ok(Arc::new(TreatmentPlanEngine {
        catalog: Arc::new(catalog),
        config,
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Shareable engine handle. The catalog is read-only, so no locking is needed.
#[derive(uniffi::Object)]
pub struct TreatmentPlanEngine {
    catalog: Arc<InteractionCatalog>,
    config: EngineConfig,
}

impl TreatmentPlanEngine {
    fn analyze(
        &self,
        condition: &str,
        medications: Vec<FfiMedication>,
    ) -> Result<Analysis, TreatmentPlanError> {
        let medications: Vec<Medication> = medications.into_iter().map(Into::into).collect();
        let assembler = AnalysisAssembler::with_config(&self.catalog, &self.config)?;
        Ok(assembler.build(condition, &medications)?)
    }
}

#[uniffi::export]
impl TreatmentPlanEngine {
    // =========================================================================
    // Analysis Operations
    // =========================================================================

    /// Build the analysis for a condition assignment (or an edit of one).
    pub fn build_analysis(
        &self,
        condition: String,
        medications: Vec<FfiMedication>,
    ) -> Result<FfiAnalysis, TreatmentPlanError> {
        let analysis = self.analyze(&condition, medications)?;
        FfiAnalysis::try_from(analysis)
    }

    /// Build the analysis and return it as the JSON document stored per patient.
    pub fn build_analysis_json(
        &self,
        condition: String,
        medications: Vec<FfiMedication>,
    ) -> Result<String, TreatmentPlanError> {
        let analysis = self.analyze(&condition, medications)?;
        Ok(analysis.to_canonical_json()?)
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Number of curated interaction rules.
    pub fn catalog_size(&self) -> u32 {
        self.catalog.len() as u32
    }

    /// Export the curated rules as JSON.
    pub fn export_catalog_json(&self) -> Result<String, TreatmentPlanError> {
        Ok(self.catalog.to_json()?)
    }
}

// =========================================================================
// FFI-Safe Types
// =========================================================================

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub name: String,
    pub dose: String,
    pub frequency_per_day: u32,
}

impl From<FfiMedication> for Medication {
    fn from(med: FfiMedication) -> Self {
        Medication::new(med.name, med.dose, med.frequency_per_day)
    }
}

/// FFI-safe detected interaction.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteraction {
    pub first_medication: String,
    pub second_medication: String,
    pub severity: String,
    pub reason: String,
    pub can_separate_by_schedule: bool,
    pub min_hours_apart: Option<f64>,
    pub instruction: Option<String>,
}

impl From<Interaction> for FfiInteraction {
    fn from(interaction: Interaction) -> Self {
        let instruction = interaction.separation_instruction();
        let [first, second] = interaction.medications;
        Self {
            first_medication: first,
            second_medication: second,
            severity: interaction.severity.to_string(),
            reason: interaction.reason,
            can_separate_by_schedule: interaction.can_separate_by_schedule,
            min_hours_apart: interaction.min_hours_apart,
            instruction,
        }
    }
}

/// FFI-safe recommendation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecommendation {
    pub kind: String,
    pub title: String,
    pub details: String,
}

impl From<Recommendation> for FfiRecommendation {
    fn from(rec: Recommendation) -> Self {
        Self {
            kind: rec.kind.as_str().to_string(),
            title: rec.title,
            details: rec.details,
        }
    }
}

/// FFI-safe schedule slot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScheduleSlot {
    pub medication: String,
    pub times: Vec<String>,
    pub note: Option<String>,
}

impl From<ScheduleSlot> for FfiScheduleSlot {
    fn from(slot: ScheduleSlot) -> Self {
        Self {
            medication: slot.medication,
            times: slot.times.iter().map(|t| t.to_string()).collect(),
            note: slot.note,
        }
    }
}

/// FFI-safe timeline entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTimelineEntry {
    pub time: String,
    pub medication: String,
    pub note: Option<String>,
}

impl From<TimelineEntry> for FfiTimelineEntry {
    fn from(entry: TimelineEntry) -> Self {
        Self {
            time: entry.time.to_string(),
            medication: entry.medication,
            note: entry.note,
        }
    }
}

/// FFI-safe analysis, including the patient-facing views.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnalysis {
    pub is_safe: bool,
    pub interactions: Vec<FfiInteraction>,
    pub recommendations: Vec<FfiRecommendation>,
    pub schedule: Vec<FfiScheduleSlot>,
    pub timeline: Vec<FfiTimelineEntry>,
    pub guidance: String,
    pub fingerprint: String,
}

impl TryFrom<Analysis> for FfiAnalysis {
    type Error = TreatmentPlanError;

    fn try_from(analysis: Analysis) -> Result<Self, Self::Error> {
        Ok(Self {
            is_safe: analysis.is_safe(),
            fingerprint: analysis.fingerprint()?,
            guidance: analysis.guidance().message().to_string(),
            timeline: analysis
                .daily_timeline()
                .into_iter()
                .map(Into::into)
                .collect(),
            interactions: analysis.interactions().iter().cloned().map(Into::into).collect(),
            recommendations: analysis
                .recommendations()
                .iter()
                .cloned()
                .map(Into::into)
                .collect(),
            schedule: analysis.schedule().iter().cloned().map(Into::into).collect(),
        })
    }
}
