//! Dosing schedule synthesis.
//!
//! Two passes:
//! 1. Base times: each medication's doses are spread evenly over the dosing
//!    window, one dose at the start of each of `frequency` equal intervals,
//!    rounded to the window granularity.
//! 2. Constraint repair: for each separable interaction (in detection order)
//!    whose doses sit closer than `minHoursApart`, the pair's second medication
//!    is moved later in fixed steps until the gap holds. A step is accepted only
//!    if every previously satisfied constraint still holds and all doses stay
//!    inside the window; otherwise the constraint is left unresolved.

use tracing::{debug, warn};

use crate::config::{ConfigResult, DosingWindow};
use crate::models::{
    normalize_name, DoseTime, Interaction, Medication, ScheduleSlot, MINUTES_PER_DAY,
};

/// A separation requirement between two normalized medication names.
#[derive(Debug, Clone)]
struct Constraint {
    first: String,
    second: String,
    required_minutes: u32,
}

/// Working schedule: per input medication, its normalized name and dose minutes.
#[derive(Debug, Clone)]
struct Draft {
    keys: Vec<String>,
    minutes: Vec<Vec<u32>>,
}

impl Draft {
    /// Smallest wrap-around gap between the two medications, `None` if either is absent.
    fn gap(&self, first: &str, second: &str) -> Option<u32> {
        let doses_of = |key: &str| -> Vec<u32> {
            self.keys
                .iter()
                .zip(&self.minutes)
                .filter(|(k, _)| k.as_str() == key)
                .flat_map(|(_, times)| times.iter().copied())
                .collect()
        };

        let first_doses = doses_of(first);
        doses_of(second)
            .into_iter()
            .flat_map(|b| {
                first_doses.iter().map(move |&a| {
                    let direct = a.abs_diff(b);
                    direct.min(MINUTES_PER_DAY - direct)
                })
            })
            .min()
    }

    fn satisfies(&self, constraint: &Constraint) -> bool {
        self.gap(&constraint.first, &constraint.second)
            .map_or(true, |gap| gap >= constraint.required_minutes)
    }

    /// Move every dose of `key` later by `delta`; `None` if any dose would reach `end`.
    fn shifted(&self, key: &str, delta: u32, end: u32) -> Option<Draft> {
        let mut next = self.clone();
        for (k, times) in next.keys.iter().zip(next.minutes.iter_mut()) {
            if k.as_str() != key {
                continue;
            }
            for time in times.iter_mut() {
                *time += delta;
                if *time >= end {
                    return None;
                }
            }
        }
        Some(next)
    }
}

/// Generates per-medication dose times inside the dosing window.
#[derive(Debug, Clone)]
pub struct ScheduleSynthesizer {
    window: DosingWindow,
}

impl Default for ScheduleSynthesizer {
    fn default() -> Self {
        Self {
            window: DosingWindow::default(),
        }
    }
}

impl ScheduleSynthesizer {
    /// Create a synthesizer for a validated window.
    pub fn new(window: DosingWindow) -> ConfigResult<Self> {
        window.validate()?;
        Ok(Self { window })
    }

    pub fn window(&self) -> &DosingWindow {
        &self.window
    }

    /// Evenly spaced base times for a daily frequency.
    ///
    /// Dose `i` of `f` sits at `start + round(i * width / f)`, rounded to the
    /// granularity, so `f = 1` is always the window start.
    pub fn base_times(&self, frequency: u32) -> Vec<DoseTime> {
        self.base_minutes(frequency)
            .into_iter()
            .map(DoseTime::clamped)
            .collect()
    }

    fn base_minutes(&self, frequency: u32) -> Vec<u32> {
        let start = self.window.start.minutes();
        let width = self.window.width_minutes();
        let granularity = self.window.granularity_minutes;
        let frequency = frequency.max(1);

        (0..frequency)
            .map(|i| {
                // round(i * width / (f * g)) * g in integer arithmetic
                let units = (2 * i * width + frequency * granularity) / (2 * frequency * granularity);
                start + units * granularity
            })
            .collect()
    }

    /// Build the schedule for a validated plan and its detected interactions.
    pub fn synthesize(
        &self,
        medications: &[Medication],
        interactions: &[Interaction],
    ) -> Vec<ScheduleSlot> {
        let mut draft = Draft {
            keys: medications.iter().map(Medication::normalized_name).collect(),
            minutes: medications
                .iter()
                .map(|m| self.base_minutes(m.frequency_per_day))
                .collect(),
        };

        let constraints: Vec<(&Interaction, Constraint)> = interactions
            .iter()
            .filter_map(|interaction| {
                let required_minutes = interaction.required_gap_minutes()?;
                Some((
                    interaction,
                    Constraint {
                        first: normalize_name(&interaction.medications[0]),
                        second: normalize_name(&interaction.medications[1]),
                        required_minutes,
                    },
                ))
            })
            .collect();

        let mut satisfied: Vec<&Constraint> = Vec::new();
        for (interaction, constraint) in &constraints {
            if draft.satisfies(constraint) {
                satisfied.push(constraint);
                continue;
            }

            match self.repair(&draft, constraint, &satisfied) {
                Some((repaired, delta)) => {
                    debug!(
                        "Shifted {} by {} minutes to separate it from {}",
                        interaction.medications[1], delta, interaction.medications[0]
                    );
                    draft = repaired;
                    satisfied.push(constraint);
                }
                None => {
                    warn!(
                        "Cannot keep {} at least {} minutes apart within the dosing window",
                        interaction.pair_label(),
                        constraint.required_minutes
                    );
                }
            }
        }

        medications
            .iter()
            .zip(draft.minutes)
            .map(|(medication, minutes)| ScheduleSlot {
                medication: medication.name.clone(),
                times: minutes.into_iter().map(DoseTime::clamped).collect(),
                note: Some(dose_note(medication, &constraints, &satisfied)),
            })
            .collect()
    }

    /// Find the smallest forward shift of the constraint's second medication that
    /// satisfies it without breaking an already satisfied constraint.
    fn repair(
        &self,
        draft: &Draft,
        constraint: &Constraint,
        satisfied: &[&Constraint],
    ) -> Option<(Draft, u32)> {
        let step = self.window.shift_step_minutes;
        let end = self.window.end.minutes();
        let mut delta = step;

        while let Some(candidate) = draft.shifted(&constraint.second, delta, end) {
            if candidate.satisfies(constraint) && satisfied.iter().all(|c| candidate.satisfies(c)) {
                return Some((candidate, delta));
            }
            delta += step;
        }

        None
    }
}

/// Patient-facing note: the dose plus every separation the schedule honors.
fn dose_note(
    medication: &Medication,
    constraints: &[(&Interaction, Constraint)],
    satisfied: &[&Constraint],
) -> String {
    let key = medication.normalized_name();
    let mut note = format!("Take {}.", medication.dose.trim());

    for (interaction, constraint) in constraints {
        if !satisfied.iter().any(|c| std::ptr::eq(*c, constraint)) {
            continue;
        }
        let other = if constraint.first == key {
            &interaction.medications[1]
        } else if constraint.second == key {
            &interaction.medications[0]
        } else {
            continue;
        };
        if let Some(hours) = interaction.min_hours_apart {
            note.push_str(&format!(" Keep at least {} hours apart from {}.", hours, other.trim()));
        }
    }

    note
}
