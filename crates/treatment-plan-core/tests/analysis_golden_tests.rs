//! Golden tests for the analysis engine.
//!
//! These tests run complete condition assignments through the built-in catalog
//! and check the resulting plans against known cases.

use std::io::Write;

use treatment_plan_core::engine::EngineError;
use treatment_plan_core::models::{Medication, RecommendationKind, Severity};
use treatment_plan_core::{AnalysisAssembler, EngineConfig, InteractionCatalog};

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    medications: Vec<(&'static str, &'static str, u32)>,
    expected_pairs: Vec<(&'static str, &'static str, Severity)>,
    expected_recommendations: Vec<RecommendationKind>,
    expected_safe: bool,
    expected_times: Vec<Vec<&'static str>>,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "warfarin-aspirin-separated",
            medications: vec![("Warfarin", "5mg", 1), ("Aspirin", "81mg", 1)],
            expected_pairs: vec![("Warfarin", "Aspirin", Severity::Major)],
            expected_recommendations: vec![RecommendationKind::KeepAndSeparate],
            expected_safe: true,
            expected_times: vec![vec!["08:00"], vec!["16:00"]],
        },
        GoldenCase {
            id: "no-known-interactions",
            medications: vec![("Amlodipine", "10mg", 2), ("Atorvastatin", "10mg", 2)],
            expected_pairs: vec![],
            expected_recommendations: vec![],
            expected_safe: true,
            expected_times: vec![vec!["08:00", "15:00"], vec!["08:00", "15:00"]],
        },
        GoldenCase {
            id: "contraindicated-statin-macrolide",
            medications: vec![("Simvastatin", "40mg", 1), ("Clarithromycin", "500mg", 2)],
            expected_pairs: vec![("Simvastatin", "Clarithromycin", Severity::Contraindicated)],
            expected_recommendations: vec![RecommendationKind::AvoidCombination],
            expected_safe: false,
            expected_times: vec![vec!["08:00"], vec!["08:00", "15:00"]],
        },
        GoldenCase {
            id: "thyroid-calcium-twice-daily",
            medications: vec![("Levothyroxine", "50mcg", 1), ("Calcium Carbonate", "500mg", 2)],
            expected_pairs: vec![("Levothyroxine", "Calcium Carbonate", Severity::Moderate)],
            expected_recommendations: vec![RecommendationKind::KeepAndSeparate],
            expected_safe: true,
            expected_times: vec![vec!["08:00"], vec!["12:00", "19:00"]],
        },
        GoldenCase {
            id: "major-not-separable",
            medications: vec![("Warfarin", "5mg", 1), ("Ibuprofen", "400mg", 3)],
            expected_pairs: vec![("Warfarin", "Ibuprofen", Severity::Major)],
            expected_recommendations: vec![RecommendationKind::ReplaceMedication],
            expected_safe: false,
            expected_times: vec![vec!["08:00"], vec!["08:00", "12:40", "17:20"]],
        },
        GoldenCase {
            id: "minor-only-informational",
            medications: vec![("Metformin", "500mg", 2), ("Furosemide", "20mg", 1)],
            expected_pairs: vec![("Metformin", "Furosemide", Severity::Minor)],
            expected_recommendations: vec![],
            expected_safe: true,
            expected_times: vec![vec!["08:00", "15:00"], vec!["08:00"]],
        },
        GoldenCase {
            id: "moderate-unresolvable-four-times-daily",
            medications: vec![("Ciprofloxacin", "250mg", 4), ("Calcium Carbonate", "500mg", 4)],
            expected_pairs: vec![("Ciprofloxacin", "Calcium Carbonate", Severity::Moderate)],
            expected_recommendations: vec![RecommendationKind::AvoidCombination],
            expected_safe: true,
            expected_times: vec![
                vec!["08:00", "11:30", "15:00", "18:30"],
                vec!["08:00", "11:30", "15:00", "18:30"],
            ],
        },
        GoldenCase {
            id: "three-drugs-two-rules",
            medications: vec![
                ("Warfarin", "5mg", 1),
                ("Metformin", "500mg", 2),
                ("Aspirin", "81mg", 1),
                ("Ibuprofen", "200mg", 1),
            ],
            expected_pairs: vec![
                ("Warfarin", "Aspirin", Severity::Major),
                ("Warfarin", "Ibuprofen", Severity::Major),
            ],
            expected_recommendations: vec![
                RecommendationKind::KeepAndSeparate,
                RecommendationKind::ReplaceMedication,
            ],
            expected_safe: false,
            expected_times: vec![
                vec!["08:00"],
                vec!["08:00", "15:00"],
                vec!["16:00"],
                vec!["08:00"],
            ],
        },
    ]
}

fn to_medications(list: &[(&str, &str, u32)]) -> Vec<Medication> {
    list.iter()
        .map(|(name, dose, freq)| Medication::new(*name, *dose, *freq))
        .collect()
}

#[test]
fn test_golden_cases() {
    let catalog = InteractionCatalog::builtin().unwrap();
    let assembler = AnalysisAssembler::new(&catalog);

    for case in get_golden_cases() {
        let analysis = assembler
            .build("Test condition", &to_medications(&case.medications))
            .unwrap_or_else(|e| panic!("[{}] build failed: {}", case.id, e));

        let pairs: Vec<(String, String, Severity)> = analysis
            .interactions()
            .iter()
            .map(|i| (i.medications[0].clone(), i.medications[1].clone(), i.severity))
            .collect();
        let expected_pairs: Vec<(String, String, Severity)> = case
            .expected_pairs
            .iter()
            .map(|(a, b, s)| (a.to_string(), b.to_string(), *s))
            .collect();
        assert_eq!(pairs, expected_pairs, "[{}] interactions mismatch", case.id);

        let kinds: Vec<RecommendationKind> =
            analysis.recommendations().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, case.expected_recommendations, "[{}] recommendations mismatch", case.id);

        assert_eq!(analysis.is_safe(), case.expected_safe, "[{}] isSafe mismatch", case.id);

        let times: Vec<Vec<String>> = analysis
            .schedule()
            .iter()
            .map(|slot| slot.times.iter().map(|t| t.to_string()).collect())
            .collect();
        assert_eq!(times, case.expected_times, "[{}] schedule mismatch", case.id);
    }
}

#[test]
fn test_scenario_a_json_document() {
    let catalog = InteractionCatalog::builtin().unwrap();
    let assembler = AnalysisAssembler::new(&catalog);

    let analysis = assembler
        .build(
            "Atrial fibrillation",
            &[Medication::new("Warfarin", "5mg", 1), Medication::new("Aspirin", "81mg", 1)],
        )
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&analysis.to_canonical_json().unwrap()).unwrap();

    assert_eq!(json["isSafe"], true);
    assert_eq!(json["interactions"][0]["medications"][0], "Warfarin");
    assert_eq!(json["interactions"][0]["medications"][1], "Aspirin");
    assert_eq!(json["interactions"][0]["severity"], "major");
    assert_eq!(json["interactions"][0]["canSeparateBySchedule"], true);
    assert_eq!(json["interactions"][0]["minHoursApart"], 8.0);
    assert_eq!(json["recommendations"][0]["type"], "keep_and_separate");
    assert_eq!(json["schedule"][0]["medication"], "Warfarin");
    assert_eq!(json["schedule"][1]["times"][0], "16:00");
    assert_eq!(
        json["schedule"][1]["note"],
        "Take 81mg. Keep at least 8 hours apart from Warfarin."
    );
}

#[test]
fn test_validation_rejects_bad_plans() {
    let catalog = InteractionCatalog::builtin().unwrap();
    let assembler = AnalysisAssembler::new(&catalog);

    let one = vec![Medication::new("Aspirin", "81mg", 1)];
    let five: Vec<Medication> = (0..5)
        .map(|i| Medication::new(format!("Drug{}", i), "1mg", 1))
        .collect();
    let zero_freq = vec![Medication::new("A", "1mg", 0), Medication::new("B", "1mg", 1)];
    let five_freq = vec![Medication::new("A", "1mg", 1), Medication::new("B", "1mg", 5)];
    let empty_dose = vec![Medication::new("A", "", 1), Medication::new("B", "1mg", 1)];

    for meds in [one, five, zero_freq, five_freq, empty_dose] {
        let result = assembler.build("Pain", &meds);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))), "{:?}", meds);
    }
}

#[test]
fn test_patient_views() {
    let catalog = InteractionCatalog::builtin().unwrap();
    let assembler = AnalysisAssembler::new(&catalog);

    let analysis = assembler
        .build(
            "Hypothyroidism",
            &[
                Medication::new("Levothyroxine", "50mcg", 1),
                Medication::new("Calcium Carbonate", "500mg", 2),
            ],
        )
        .unwrap();

    let timeline: Vec<String> = analysis
        .daily_timeline()
        .iter()
        .map(|e| format!("{} {}", e.time, e.medication))
        .collect();
    assert_eq!(
        timeline,
        vec![
            "08:00 Levothyroxine",
            "12:00 Calcium Carbonate",
            "19:00 Calcium Carbonate"
        ]
    );
    assert_eq!(
        analysis.guidance().message(),
        "Your medications require careful timing. Follow the schedule strictly."
    );
}

#[test]
fn test_config_file_changes_window() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[window]\nstart = \"07:00\"\nend = \"21:00\"").unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    let catalog = InteractionCatalog::builtin().unwrap();
    let assembler = AnalysisAssembler::with_config(&catalog, &config).unwrap();

    let analysis = assembler
        .build(
            "Hypertension",
            &[Medication::new("Amlodipine", "5mg", 2), Medication::new("Losartan", "50mg", 1)],
        )
        .unwrap();
    let times: Vec<String> = analysis.schedule()[0]
        .times
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(times, vec!["07:00", "14:00"]);
}
