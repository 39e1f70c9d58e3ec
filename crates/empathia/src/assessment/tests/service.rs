use super::common::*;

use crate::assessment::matcher::MatchLevel;
use crate::assessment::service::{AssessmentService, AssessmentServiceError, CaseSource};
use crate::assessment::store::CaseStore;
use crate::assessment::synthetic::SyntheticProfile;

#[test]
fn assess_before_install_reports_loading() {
    let service = AssessmentService::new(registry());
    assert!(matches!(service.source(), CaseSource::Loading));

    let err = service
        .assess(&query("26-35", "Female", "Syria", "Secondary", "Yes"))
        .expect_err("store not yet loaded");
    assert!(matches!(err, AssessmentServiceError::StoreNotLoaded));
}

#[test]
fn failed_load_degrades_to_not_loaded() {
    let service = AssessmentService::new(registry());
    service.mark_unavailable("sample_cases.json: No such file or directory");

    assert_eq!(service.source().label(), "unavailable");
    assert!(matches!(
        service.attribute_options(),
        Err(AssessmentServiceError::StoreNotLoaded)
    ));
}

#[test]
fn empty_store_yields_no_match() {
    let service =
        AssessmentService::with_store(registry(), CaseStore::new(Vec::new()).expect("empty ok"));
    let err = service
        .assess(&query("26-35", "Female", "Syria", "Secondary", "Yes"))
        .expect_err("nothing to match");
    assert!(matches!(err, AssessmentServiceError::NoMatch));
}

#[test]
fn assessment_payload_carries_rankings_and_averages() {
    let service = ready_service();
    let assessment = service
        .assess(&query("26-35", "Female", "Syria", "Secondary", "Yes"))
        .expect("assessment builds");

    assert_eq!(assessment.case_id, "syria-exact");
    assert_eq!(assessment.case_id_short, "syria-ex");
    assert!(assessment.exact_match);
    assert_eq!(assessment.recommended_country, "Canada");
    assert_eq!(assessment.recommended_score, 7.7);
    assert_eq!(assessment.top_weighted, 7.7);
    assert_eq!(assessment.rankings.len(), 2);
    assert_eq!(assessment.rankings[0].name, "Canada");
    assert!((assessment.average_scores.emotional - 6.5).abs() < 1e-9);
    assert!((assessment.average_scores.cultural - 7.5).abs() < 1e-9);
    assert!(assessment.rationale().starts_with("Canada is recommended"));
}

#[test]
fn fallback_match_is_flagged_inexact() {
    let service = ready_service();
    let assessment = service
        .assess(&query("18-25", "Male", "Eritrea", "University", "Yes"))
        .expect("fallback still assesses");

    assert_eq!(assessment.match_level, MatchLevel::Fallback);
    assert!(!assessment.exact_match);
    assert_eq!(assessment.case_id, "somalia-any");
}

#[test]
fn synthetic_path_ignores_store_state() {
    let service = AssessmentService::new(registry());
    let assessment = service.synthetic(&SyntheticProfile {
        age: "30".to_string(),
        gender: "Male".to_string(),
        origin: "Unknown".to_string(),
        education: "None".to_string(),
        english: "No".to_string(),
    });
    assert_eq!(assessment.recommended_country, "Canada");
}

#[test]
fn profile_lookups_go_through_registry() {
    let service = ready_service();
    assert_eq!(service.profiles().len(), 8);
    assert_eq!(
        service
            .profile("REF-0005")
            .expect("profile present")
            .recommended_country,
        "United States"
    );
    assert!(matches!(
        service.profile_assessment("REF-0000"),
        Err(AssessmentServiceError::Profile(_))
    ));
}
