use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{Case, CaseQuery, CountryScores, ScoreBundle};
use crate::assessment::profiles::ProfileRegistry;
use crate::assessment::service::AssessmentService;
use crate::assessment::store::CaseStore;

pub(super) fn bundle(emotional: f64, cultural: f64, ethical: f64, weighted: f64) -> ScoreBundle {
    ScoreBundle {
        emotional,
        cultural,
        ethical,
        weighted,
    }
}

pub(super) fn scores(entries: &[(&str, ScoreBundle)]) -> CountryScores {
    entries
        .iter()
        .map(|(country, bundle)| (country.to_string(), *bundle))
        .collect()
}

pub(super) fn case(
    id: &str,
    age_group: &str,
    gender: &str,
    origin: &str,
    education: &str,
    english: &str,
) -> Case {
    Case {
        id: id.to_string(),
        age_group: age_group.to_string(),
        gender: gender.to_string(),
        origin: origin.to_string(),
        education: education.to_string(),
        english: english.to_string(),
        scores: scores(&[
            ("Canada", bundle(7.0, 8.0, 8.0, 7.7)),
            ("Germany", bundle(6.0, 7.0, 7.0, 6.7)),
        ]),
        recommended_country: "Canada".to_string(),
    }
}

pub(super) fn query(
    age_group: &str,
    gender: &str,
    origin: &str,
    education: &str,
    english: &str,
) -> CaseQuery {
    CaseQuery {
        age_group: age_group.to_string(),
        gender: gender.to_string(),
        origin: origin.to_string(),
        education: education.to_string(),
        english: english.to_string(),
    }
}

/// Five cases covering each cascade level for a Syria / Secondary query.
pub(super) fn cascade_cases() -> Vec<Case> {
    vec![
        case("somalia-any", "26-35", "Male", "Somalia", "None", "No"),
        case("syria-origin", "46+", "Male", "Syria", "Primary", "No"),
        case("syria-education", "46+", "Male", "Syria", "Secondary", "No"),
        case("syria-gender", "46+", "Female", "Syria", "Secondary", "No"),
        case("syria-exact", "26-35", "Female", "Syria", "Secondary", "Yes"),
    ]
}

pub(super) fn store() -> CaseStore {
    CaseStore::new(cascade_cases()).expect("fixture cases are valid")
}

pub(super) fn registry() -> ProfileRegistry {
    ProfileRegistry::embedded().expect("embedded profiles parse")
}

pub(super) fn ready_service() -> AssessmentService {
    AssessmentService::with_store(registry(), store())
}

pub(super) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("body is json");
    (status, value)
}
