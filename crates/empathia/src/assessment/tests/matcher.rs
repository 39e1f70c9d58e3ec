use super::common::*;

use crate::assessment::matcher::{find_match, MatchLevel};

#[test]
fn exact_match_wins_over_earlier_relaxed_candidates() {
    let cases = cascade_cases();
    let matched = find_match(&query("26-35", "Female", "Syria", "Secondary", "Yes"), &cases)
        .expect("store is not empty");

    assert_eq!(matched.case.id, "syria-exact");
    assert_eq!(matched.level, MatchLevel::Exact);
    assert!(matched.is_exact());
}

#[test]
fn exact_duplicates_resolve_to_first_in_store_order() {
    let mut cases = cascade_cases();
    let mut duplicate = case("syria-exact-2", "26-35", "Female", "Syria", "Secondary", "Yes");
    duplicate.recommended_country = "Germany".to_string();
    duplicate.scores["Germany"].weighted = 9.0;
    cases.insert(1, duplicate);

    let matched = find_match(&query("26-35", "Female", "Syria", "Secondary", "Yes"), &cases)
        .expect("store is not empty");
    assert_eq!(matched.case.id, "syria-exact-2");
}

#[test]
fn relaxes_age_and_english_before_gender() {
    let cases = cascade_cases();
    let matched = find_match(&query("18-25", "Female", "Syria", "Secondary", "No"), &cases)
        .expect("store is not empty");

    assert_eq!(matched.case.id, "syria-gender");
    assert_eq!(matched.level, MatchLevel::OriginGenderEducation);
    assert!(!matched.is_exact());
}

#[test]
fn relaxes_gender_before_education() {
    let cases = cascade_cases();
    let matched = find_match(&query("18-25", "Nonbinary", "Syria", "Secondary", "Yes"), &cases)
        .expect("store is not empty");

    assert_eq!(matched.case.id, "syria-education");
    assert_eq!(matched.level, MatchLevel::OriginEducation);
}

#[test]
fn origin_and_education_beats_origin_only_regardless_of_order() {
    let cases = vec![
        case("origin-only", "46+", "Male", "Syria", "Primary", "No"),
        case("origin-education", "46+", "Male", "Syria", "University", "No"),
    ];
    let matched = find_match(&query("18-25", "Female", "Syria", "University", "Yes"), &cases)
        .expect("store is not empty");

    assert_eq!(matched.case.id, "origin-education");
    assert_eq!(matched.level, MatchLevel::OriginEducation);
}

#[test]
fn origin_only_match_is_last_relaxation() {
    let cases = cascade_cases();
    let matched = find_match(&query("18-25", "Female", "Syria", "University", "Yes"), &cases)
        .expect("store is not empty");

    assert_eq!(matched.case.id, "syria-origin");
    assert_eq!(matched.level, MatchLevel::Origin);
}

#[test]
fn unknown_origin_falls_back_to_first_case() {
    let cases = cascade_cases();
    let matched = find_match(&query("18-25", "Female", "Eritrea", "University", "Yes"), &cases)
        .expect("store is not empty");

    assert_eq!(matched.case.id, "somalia-any");
    assert_eq!(matched.level, MatchLevel::Fallback);
}

#[test]
fn empty_store_yields_no_match() {
    let matched = find_match(&query("18-25", "Female", "Syria", "University", "Yes"), &[]);
    assert!(matched.is_none());
}
