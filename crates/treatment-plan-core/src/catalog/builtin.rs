//! Curated interaction rules compiled into the crate.

use crate::models::{InteractionRule, Severity};

/// Default interaction rules.
pub fn builtin_rules() -> Vec<InteractionRule> {
    let mut rules = Vec::new();

    // Anticoagulants / antiplatelets
    rules.push(
        InteractionRule::new(
            "warfarin",
            "aspirin",
            Severity::Major,
            "Aspirin adds antiplatelet effect to warfarin anticoagulation and raises bleeding risk.",
        )
        .separable(8.0),
    );
    rules.push(InteractionRule::new(
        "warfarin",
        "ibuprofen",
        Severity::Major,
        "NSAIDs increase bleeding risk and gastric injury with warfarin.",
    ));
    rules.push(InteractionRule::new(
        "warfarin",
        "fluconazole",
        Severity::Major,
        "Fluconazole inhibits warfarin metabolism, raising INR.",
    ));
    rules.push(InteractionRule::new(
        "clopidogrel",
        "omeprazole",
        Severity::Moderate,
        "Omeprazole reduces activation of clopidogrel.",
    ));

    // Absorption (chelation / binding)
    rules.push(
        InteractionRule::new(
            "levothyroxine",
            "calcium carbonate",
            Severity::Moderate,
            "Calcium binds levothyroxine in the gut and reduces absorption.",
        )
        .separable(4.0),
    );
    rules.push(
        InteractionRule::new(
            "levothyroxine",
            "ferrous sulfate",
            Severity::Moderate,
            "Iron binds levothyroxine in the gut and reduces absorption.",
        )
        .separable(4.0),
    );
    rules.push(
        InteractionRule::new(
            "ciprofloxacin",
            "calcium carbonate",
            Severity::Moderate,
            "Calcium chelates ciprofloxacin and lowers antibiotic levels.",
        )
        .separable(6.0),
    );
    rules.push(
        InteractionRule::new(
            "doxycycline",
            "ferrous sulfate",
            Severity::Moderate,
            "Iron chelates doxycycline and lowers antibiotic levels.",
        )
        .separable(3.0),
    );
    rules.push(
        InteractionRule::new(
            "alendronate",
            "calcium carbonate",
            Severity::Minor,
            "Calcium reduces alendronate absorption when taken together.",
        )
        .separable(2.0),
    );

    // Electrolytes
    rules.push(InteractionRule::new(
        "lisinopril",
        "spironolactone",
        Severity::Major,
        "Combined potassium retention can cause hyperkalemia.",
    ));

    // Contraindicated combinations
    rules.push(InteractionRule::new(
        "simvastatin",
        "clarithromycin",
        Severity::Contraindicated,
        "Clarithromycin blocks simvastatin metabolism, risking rhabdomyolysis.",
    ));
    rules.push(InteractionRule::new(
        "sildenafil",
        "nitroglycerin",
        Severity::Contraindicated,
        "Combined vasodilation can cause severe hypotension.",
    ));
    rules.push(InteractionRule::new(
        "tramadol",
        "sertraline",
        Severity::Major,
        "Both raise serotonin levels; risk of serotonin syndrome and seizures.",
    ));

    // Minor
    rules.push(InteractionRule::new(
        "metformin",
        "furosemide",
        Severity::Minor,
        "Furosemide may modestly raise metformin levels.",
    ));
    rules.push(InteractionRule::new(
        "acetaminophen",
        "caffeine",
        Severity::Minor,
        "Caffeine slightly speeds acetaminophen absorption.",
    ));

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separable_rules_have_gaps() {
        for rule in builtin_rules() {
            if rule.can_separate_by_schedule {
                assert!(rule.min_hours_apart.is_some(), "{:?}", rule.medications);
            }
        }
    }

    #[test]
    fn test_every_severity_represented() {
        let rules = builtin_rules();
        for severity in [
            Severity::Minor,
            Severity::Moderate,
            Severity::Major,
            Severity::Contraindicated,
        ] {
            assert!(rules.iter().any(|r| r.severity == severity), "{}", severity);
        }
    }
}
