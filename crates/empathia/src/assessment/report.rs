use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregate::{average_scores, rank_countries, CountryRanking};
use super::domain::DimensionScores;
use super::matcher::{CaseMatch, MatchLevel};

/// Display payload for a dataset-driven assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseAssessment {
    pub case_id: String,
    pub case_id_short: String,
    pub profile_summary: String,
    pub match_level: MatchLevel,
    pub match_label: &'static str,
    pub exact_match: bool,
    pub average_scores: DimensionScores,
    pub rankings: Vec<CountryRanking>,
    pub top_weighted: f64,
    pub recommended_country: String,
    pub recommended_score: f64,
    pub assessed_at: DateTime<Utc>,
}

impl CaseAssessment {
    pub fn from_match(matched: CaseMatch<'_>, assessed_at: DateTime<Utc>) -> Self {
        let case = matched.case;
        let rankings = rank_countries(&case.scores);
        let top_weighted = rankings.first().map(|row| row.weighted).unwrap_or(0.0);
        // Stores are validated on load, so the recommended country always has scores.
        let recommended_score = case
            .recommended_scores()
            .map(|bundle| bundle.weighted)
            .unwrap_or(top_weighted);

        Self {
            case_id: case.id.clone(),
            case_id_short: case.short_id().to_string(),
            profile_summary: case.profile_summary(),
            match_level: matched.level,
            match_label: matched.level.label(),
            exact_match: matched.is_exact(),
            average_scores: average_scores(&case.scores),
            rankings,
            top_weighted,
            recommended_country: case.recommended_country.clone(),
            recommended_score,
            assessed_at,
        }
    }

    pub fn rationale(&self) -> String {
        format!(
            "{} is recommended for this profile. Emotional readiness ({:.1}/10), \
             cultural compatibility ({:.1}/10) and ethical considerations ({:.1}/10) \
             averaged across {} destination countries.",
            self.recommended_country,
            self.average_scores.emotional,
            self.average_scores.cultural,
            self.average_scores.ethical,
            self.rankings.len()
        )
    }
}
