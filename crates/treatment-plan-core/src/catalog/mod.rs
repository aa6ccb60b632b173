//! Curated interaction knowledge base.
//!
//! The catalog is built once (from the compiled-in table or a curated JSON file)
//! and is read-only afterwards, so a single instance can be shared by reference
//! across concurrent analyses.

mod builtin;

pub use builtin::builtin_rules;

use std::collections::{BTreeSet, HashMap};

use strsim::jaro_winkler;
use thiserror::Error;

use crate::models::{normalize_name, InteractionRule};

/// Minimum Jaro-Winkler similarity for a coverage-gap suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Catalog construction errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid rule {pair}: {reason}")]
    InvalidRule { pair: String, reason: String },

    #[error("Duplicate rule for pair: {0}")]
    DuplicateRule(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Unordered pair key; names are normalized and sorted.
type PairKey = (String, String);

fn pair_key(a: &str, b: &str) -> PairKey {
    let a = normalize_name(a);
    let b = normalize_name(b);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Immutable table of pairwise interaction rules.
#[derive(Debug, Clone)]
pub struct InteractionCatalog {
    /// Rules in curation order, names normalized
    rules: Vec<InteractionRule>,
    /// Pair → index into `rules`
    index: HashMap<PairKey, usize>,
    /// Every normalized name mentioned by any rule
    known: BTreeSet<String>,
}

impl InteractionCatalog {
    /// Build a catalog, validating every rule.
    pub fn new(rules: Vec<InteractionRule>) -> CatalogResult<Self> {
        let mut stored = Vec::with_capacity(rules.len());
        let mut index = HashMap::with_capacity(rules.len());
        let mut known = BTreeSet::new();

        for mut rule in rules {
            let [first, second] = &rule.medications;
            let label = format!("{} + {}", first, second);
            let key = pair_key(first, second);
            let normalized = [normalize_name(first), normalize_name(second)];

            if key.0.is_empty() || key.1.is_empty() {
                return Err(CatalogError::InvalidRule {
                    pair: label,
                    reason: "medication name is empty".into(),
                });
            }
            if key.0 == key.1 {
                return Err(CatalogError::InvalidRule {
                    pair: label,
                    reason: "a medication cannot interact with itself".into(),
                });
            }
            if let Some(hours) = rule.min_hours_apart {
                if !hours.is_finite() || hours <= 0.0 {
                    return Err(CatalogError::InvalidRule {
                        pair: label,
                        reason: format!("minHoursApart must be positive, got {}", hours),
                    });
                }
            }
            if index.contains_key(&key) {
                return Err(CatalogError::DuplicateRule(label));
            }

            rule.medications = normalized;
            known.insert(key.0.clone());
            known.insert(key.1.clone());
            index.insert(key, stored.len());
            stored.push(rule);
        }

        Ok(Self {
            rules: stored,
            index,
            known,
        })
    }

    /// Catalog with the curated rules compiled into the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::new(builtin_rules())
    }

    /// Load a curated rule file (JSON array of rules).
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let rules: Vec<InteractionRule> = serde_json::from_str(json)?;
        Self::new(rules)
    }

    /// Export rules as pretty JSON in curation order.
    pub fn to_json(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string_pretty(&self.rules)?)
    }

    /// Find the rule for a pair of medication names, in either order.
    pub fn lookup(&self, first: &str, second: &str) -> Option<&InteractionRule> {
        let key = pair_key(first, second);
        if key.0 == key.1 {
            return None;
        }
        self.index.get(&key).map(|&i| &self.rules[i])
    }

    /// Whether any rule mentions this medication.
    pub fn knows(&self, name: &str) -> bool {
        self.known.contains(&normalize_name(name))
    }

    /// Closest catalog name for an unrecognized medication, for maintenance logs.
    pub fn closest_known(&self, name: &str) -> Option<&str> {
        let query = normalize_name(name);
        if query.is_empty() || self.known.contains(&query) {
            return None;
        }

        let mut best: Option<(&str, f64)> = None;
        for candidate in &self.known {
            let score = jaro_winkler(&query, candidate);
            if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate.as_str(), score));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    pub fn rules(&self) -> impl Iterator<Item = &InteractionRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
