//! The treatment plan analysis record and its patient-facing views.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::interaction::Interaction;
use super::recommendation::Recommendation;
use super::schedule::{DoseTime, ScheduleSlot};

/// Complete engine output for one patient's plan.
///
/// Produced once per assignment or edit and never patched afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    is_safe: bool,
    interactions: Vec<Interaction>,
    recommendations: Vec<Recommendation>,
    schedule: Vec<ScheduleSlot>,
}

/// One dose in the merged daily timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub time: DoseTime,
    pub medication: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Summary message shown to the patient alongside the plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatientGuidance {
    /// Safe plan with no detected interactions
    AllClear,
    /// Interactions present, timing matters
    CarefulTiming,
    /// Anything else
    ReviewWithDoctor,
}

impl PatientGuidance {
    pub fn message(&self) -> &'static str {
        match self {
            PatientGuidance::AllClear => {
                "Your treatment plan looks good. Follow the schedule and report any side effects."
            }
            PatientGuidance::CarefulTiming => {
                "Your medications require careful timing. Follow the schedule strictly."
            }
            PatientGuidance::ReviewWithDoctor => {
                "Review this plan with your doctor if you have questions."
            }
        }
    }
}

impl Analysis {
    pub(crate) fn new(
        is_safe: bool,
        interactions: Vec<Interaction>,
        recommendations: Vec<Recommendation>,
        schedule: Vec<ScheduleSlot>,
    ) -> Self {
        Self {
            is_safe,
            interactions,
            recommendations,
            schedule,
        }
    }

    pub fn is_safe(&self) -> bool {
        self.is_safe
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn schedule(&self) -> &[ScheduleSlot] {
        &self.schedule
    }

    /// All doses of the day in time order. Doses at the same time keep schedule order.
    pub fn daily_timeline(&self) -> Vec<TimelineEntry> {
        let mut entries: Vec<TimelineEntry> = self
            .schedule
            .iter()
            .flat_map(|slot| {
                slot.times.iter().map(move |time| TimelineEntry {
                    time: *time,
                    medication: slot.medication.clone(),
                    note: slot.note.clone(),
                })
            })
            .collect();
        entries.sort_by_key(|entry| entry.time);
        entries
    }

    /// Earliest dose of the day.
    pub fn next_dose(&self) -> Option<TimelineEntry> {
        self.daily_timeline().into_iter().next()
    }

    pub fn guidance(&self) -> PatientGuidance {
        if self.is_safe && self.interactions.is_empty() {
            PatientGuidance::AllClear
        } else if !self.interactions.is_empty() {
            PatientGuidance::CarefulTiming
        } else {
            PatientGuidance::ReviewWithDoctor
        }
    }

    /// Serialize to canonical JSON for storage and hashing.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        // Field order is fixed by the struct definition
        serde_json::to_string(self)
    }

    /// SHA-256 (hex) of the canonical JSON; identical plans share a fingerprint.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let payload = self.to_canonical_json()?;
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}
