//! Arithmetic scorer used when no case data is available.
//!
//! The numbers here are unrelated to the dataset-driven averages in
//! [`super::aggregate`]; the two strategies are alternatives and are never mixed.

use serde::{Deserialize, Serialize};

use super::domain::{Dimension, DimensionScores};

const BASE: DimensionScores = DimensionScores {
    emotional: 7.0,
    cultural: 6.5,
    ethical: 7.5,
};

const SCORE_FLOOR: f64 = 1.0;
const SCORE_CEILING: f64 = 10.0;

/// Display multipliers applied to the single weighted value, in ranking order.
const COUNTRY_MULTIPLIERS: [(&str, f64); 5] = [
    ("Canada", 1.05),
    ("Germany", 0.98),
    ("Sweden", 0.96),
    ("USA", 0.94),
    ("Australia", 0.97),
];

/// Free-form profile the synthetic scorer accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticProfile {
    /// Raw age text; only its leading digits are read.
    pub age: String,
    pub gender: String,
    pub origin: String,
    pub education: String,
    pub english: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticCountryScore {
    pub country: &'static str,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticAssessment {
    pub scores: DimensionScores,
    pub weighted: f64,
    pub recommended_country: &'static str,
    pub recommended_score: f64,
    pub rankings: Vec<SyntheticCountryScore>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Adjustment {
    emotional: f64,
    cultural: f64,
    ethical: f64,
}

impl Adjustment {
    const fn new(emotional: f64, cultural: f64, ethical: f64) -> Self {
        Self {
            emotional,
            cultural,
            ethical,
        }
    }

    fn apply(self, scores: &mut DimensionScores) {
        scores.emotional += self.emotional;
        scores.cultural += self.cultural;
        scores.ethical += self.ethical;
    }
}

fn education_adjustment(education: &str) -> Adjustment {
    match education {
        "University" => Adjustment::new(0.3, 1.0, 0.5),
        "Secondary" => Adjustment::new(0.2, 0.5, 0.0),
        "None" => Adjustment::new(-0.3, -0.5, 0.0),
        _ => Adjustment::default(),
    }
}

fn english_adjustment(english: &str) -> Adjustment {
    if english == "Yes" {
        Adjustment::new(0.5, 1.5, 0.3)
    } else {
        Adjustment::new(-0.3, -1.0, 0.0)
    }
}

fn age_adjustment(age: Option<i64>) -> Adjustment {
    match age {
        Some(years) if years < 25 => Adjustment::new(0.5, 0.3, 0.0),
        Some(years) if years > 45 => Adjustment::new(-0.3, -0.2, 0.0),
        _ => Adjustment::default(),
    }
}

fn gender_adjustment(gender: &str) -> Adjustment {
    if gender == "Female" {
        Adjustment::new(0.0, 0.0, 0.2)
    } else {
        Adjustment::default()
    }
}

fn origin_adjustment(origin: &str) -> Adjustment {
    match origin {
        "Somalia" => Adjustment::new(0.0, -0.5, 0.3),
        "South Sudan" => Adjustment::new(-0.2, -0.3, 0.4),
        "Syria" => Adjustment::new(-0.3, 0.5, 0.2),
        "Afghanistan" => Adjustment::new(-0.5, 0.0, 0.5),
        "DR Congo" => Adjustment::new(0.2, -0.2, 0.3),
        _ => Adjustment::default(),
    }
}

/// Optionally signed leading decimal digits of `raw` after trimming, e.g. `"30 years"` -> 30.
pub fn parse_age(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits_end = trimmed[sign_len..]
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| sign_len + idx)
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().ok()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Stateless legacy scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticScorer;

impl SyntheticScorer {
    /// Dimension scores after every adjustment, clamped to [1, 10] and rounded to a tenth.
    pub fn score(&self, profile: &SyntheticProfile) -> DimensionScores {
        let mut scores = BASE;
        [
            education_adjustment(&profile.education),
            english_adjustment(&profile.english),
            age_adjustment(parse_age(&profile.age)),
            gender_adjustment(&profile.gender),
            origin_adjustment(&profile.origin),
        ]
        .into_iter()
        .for_each(|adjustment| adjustment.apply(&mut scores));

        DimensionScores {
            emotional: round_tenth(clamp_score(scores.emotional)),
            cultural: round_tenth(clamp_score(scores.cultural)),
            ethical: round_tenth(clamp_score(scores.ethical)),
        }
    }

    /// `0.3 * emotional + 0.4 * cultural + 0.3 * ethical`, rounded to a tenth.
    pub fn weighted(&self, scores: &DimensionScores) -> f64 {
        let total: f64 = Dimension::ordered()
            .into_iter()
            .map(|dimension| scores.get(dimension) * dimension.weight())
            .sum();
        round_tenth(total)
    }

    pub fn assess(&self, profile: &SyntheticProfile) -> SyntheticAssessment {
        let scores = self.score(profile);
        let weighted = self.weighted(&scores);

        let country_scores: Vec<SyntheticCountryScore> = COUNTRY_MULTIPLIERS
            .iter()
            .map(|&(country, multiplier)| SyntheticCountryScore {
                country,
                score: round_tenth(weighted * multiplier),
            })
            .collect();

        let mut recommended_country = COUNTRY_MULTIPLIERS[0].0;
        let mut recommended_score = 0.0;
        for entry in &country_scores {
            if entry.score > recommended_score {
                recommended_score = entry.score;
                recommended_country = entry.country;
            }
        }

        let mut rankings = country_scores;
        rankings.sort_by(|a, b| b.score.total_cmp(&a.score));

        SyntheticAssessment {
            scores,
            weighted,
            recommended_country,
            recommended_score,
            rankings,
        }
    }
}
