//! Dosing schedule models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::medication::normalize_name;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day at minute resolution, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DoseTime(u32);

impl DoseTime {
    /// Create from minutes since midnight. Returns `None` past 23:59.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Create from minutes since midnight, clamping to 23:59.
    pub const fn clamped(minutes: u32) -> Self {
        if minutes < MINUTES_PER_DAY {
            Self(minutes)
        } else {
            Self(MINUTES_PER_DAY - 1)
        }
    }

    /// Create from hour and minute.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.0 / 60, self.0 % 60, 0)
    }

    /// Shortest distance between two times of day, wrapping at midnight.
    pub fn gap_to(&self, other: &DoseTime) -> u32 {
        let direct = self.0.abs_diff(other.0);
        direct.min(MINUTES_PER_DAY - direct)
    }
}

impl fmt::Display for DoseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.to_naive_time().ok_or(fmt::Error)?;
        write!(f, "{}", time.format("%H:%M"))
    }
}

/// Error parsing an `HH:MM` string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid time of day (expected HH:MM): {0}")]
pub struct ParseDoseTimeError(pub String);

impl FromStr for DoseTime {
    type Err = ParseDoseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map_err(|_| ParseDoseTimeError(s.to_string()))?;
        Self::from_hm(time.hour(), time.minute()).ok_or_else(|| ParseDoseTimeError(s.to_string()))
    }
}

impl Serialize for DoseTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DoseTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Daily dose times for one medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleSlot {
    /// Display name of the medication
    pub medication: String,
    /// Strictly ascending dose times
    pub times: Vec<DoseTime>,
    /// Patient-facing instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ScheduleSlot {
    /// Check that times are strictly ascending.
    pub fn is_strictly_ascending(&self) -> bool {
        self.times.windows(2).all(|pair| pair[0] < pair[1])
    }

    /// Check whether this slot belongs to the given medication name.
    pub fn is_for(&self, normalized_name: &str) -> bool {
        normalize_name(&self.medication) == normalized_name
    }
}

/// Smallest time-of-day gap between any dose of `first` and any dose of `second`.
///
/// Names are matched after normalization; every slot carrying a name counts.
/// Returns `None` when either medication has no doses in the schedule.
pub fn min_gap_minutes(schedule: &[ScheduleSlot], first: &str, second: &str) -> Option<u32> {
    let first = normalize_name(first);
    let second = normalize_name(second);

    let first_times: Vec<DoseTime> = schedule
        .iter()
        .filter(|slot| slot.is_for(&first))
        .flat_map(|slot| slot.times.iter().copied())
        .collect();

    schedule
        .iter()
        .filter(|slot| slot.is_for(&second))
        .flat_map(|slot| slot.times.iter())
        .flat_map(|b| first_times.iter().map(move |a| a.gap_to(b)))
        .min()
}
