//! End-to-end scenarios over the public assessment facade: bundled data, matching,
//! aggregation and the cancellable runner.

use std::sync::Arc;
use std::time::Duration;

use empathia::assessment::{
    find_match, AssessmentRunner, AssessmentService, CaseQuery, CaseStore, MatchLevel,
    ProfileRegistry, Selection, Superseded,
};

fn query(age_group: &str, gender: &str, origin: &str, education: &str, english: &str) -> CaseQuery {
    CaseQuery {
        age_group: age_group.to_string(),
        gender: gender.to_string(),
        origin: origin.to_string(),
        education: education.to_string(),
        english: english.to_string(),
    }
}

fn service() -> AssessmentService {
    AssessmentService::with_store(
        ProfileRegistry::embedded().expect("profiles parse"),
        CaseStore::embedded().expect("sample cases parse"),
    )
}

#[test]
fn every_bundled_case_matches_itself_exactly() {
    let store = CaseStore::embedded().expect("sample cases parse");
    for case in store.cases() {
        let matched = find_match(
            &query(
                &case.age_group,
                &case.gender,
                &case.origin,
                &case.education,
                &case.english,
            ),
            store.cases(),
        )
        .expect("store not empty");
        assert_eq!(matched.level, MatchLevel::Exact);
        assert_eq!(matched.case.id, case.id);
    }
}

#[test]
fn bundled_assessment_recommends_the_top_ranked_country() {
    let service = service();
    let assessment = service
        .assess(&query("36-45", "Male", "Syria", "University", "Yes"))
        .expect("assessment builds");

    assert!(assessment.exact_match);
    assert_eq!(assessment.rankings.len(), 5);
    assert_eq!(assessment.recommended_score, assessment.top_weighted);
    assert!(assessment
        .rankings
        .windows(2)
        .all(|pair| pair[0].weighted >= pair[1].weighted));
}

#[test]
fn unrelated_origin_is_surfaced_as_fallback() {
    let service = service();
    let store = service.store().expect("store ready");
    let assessment = service
        .assess(&query("18-25", "Female", "Eritrea", "None", "No"))
        .expect("fallback assessment");

    assert_eq!(assessment.match_level, MatchLevel::Fallback);
    assert_eq!(assessment.case_id, store.cases()[0].id);
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_selection_renders() {
    let service = Arc::new(service());
    let runner = AssessmentRunner::new(Duration::from_millis(1500));
    let mut selection = Selection::default();

    selection.select("REF-0001");
    let first = {
        let service = Arc::clone(&service);
        let code = selection.current().map(str::to_string).expect("selected");
        let ticket = runner.begin();
        tokio::spawn(
            ticket.run(move || service.profile_assessment(&code).map(|a| a.refugee_code)),
        )
    };

    selection.select("REF-0003");
    let code = selection.current().map(str::to_string).expect("selected");
    let latest = runner
        .run(|| service.profile_assessment(&code).map(|a| a.refugee_code))
        .await
        .expect("latest run completes")
        .expect("profile present");

    assert_eq!(latest, "REF-0003");
    let first = first.await.expect("task joins");
    assert!(matches!(first, Err(Superseded { generation: 1, .. })));
}
