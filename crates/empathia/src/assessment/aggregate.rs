use serde::{Deserialize, Serialize};

use super::domain::{CountryScores, Dimension, DimensionScores};

/// One row of the dataset-driven country ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRanking {
    pub name: String,
    pub weighted: f64,
    pub emotional: f64,
    pub cultural: f64,
    pub ethical: f64,
}

/// Unweighted mean of each dimension across every country in the bundle.
pub fn average_scores(scores: &CountryScores) -> DimensionScores {
    if scores.is_empty() {
        return DimensionScores::default();
    }

    let count = scores.len() as f64;
    let mean = |dimension: Dimension| {
        scores
            .values()
            .map(|bundle| bundle.dimension(dimension))
            .sum::<f64>()
            / count
    };

    DimensionScores {
        emotional: mean(Dimension::Emotional),
        cultural: mean(Dimension::Cultural),
        ethical: mean(Dimension::Ethical),
    }
}

/// Countries by precomputed weighted score, highest first; ties keep map order.
pub fn rank_countries(scores: &CountryScores) -> Vec<CountryRanking> {
    let mut rankings: Vec<CountryRanking> = scores
        .iter()
        .map(|(name, bundle)| CountryRanking {
            name: name.clone(),
            weighted: bundle.weighted,
            emotional: bundle.emotional,
            cultural: bundle.cultural,
            ethical: bundle.ethical,
        })
        .collect();

    // `sort_by` is stable.
    rankings.sort_by(|a, b| b.weighted.total_cmp(&a.weighted));
    rankings
}
