use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assessment perspectives contributed by the three agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Emotional,
    Cultural,
    Ethical,
}

impl Dimension {
    pub const fn ordered() -> [Self; 3] {
        [Self::Emotional, Self::Cultural, Self::Ethical]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Emotional => "Emotional readiness",
            Self::Cultural => "Cultural compatibility",
            Self::Ethical => "Ethical considerations",
        }
    }

    /// Share of the weighted score on the synthetic path.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Emotional => 0.3,
            Self::Cultural => 0.4,
            Self::Ethical => 0.3,
        }
    }
}

/// Per-country result for one case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBundle {
    pub emotional: f64,
    pub cultural: f64,
    pub ethical: f64,
    /// Precomputed upstream; authoritative and never recomputed here.
    pub weighted: f64,
}

impl ScoreBundle {
    pub fn dimension(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Emotional => self.emotional,
            Dimension::Cultural => self.cultural,
            Dimension::Ethical => self.ethical,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.emotional.is_finite()
            && self.cultural.is_finite()
            && self.ethical.is_finite()
            && self.weighted.is_finite()
    }
}

/// Destination country name to score bundle, in document order.
pub type CountryScores = IndexMap<String, ScoreBundle>;

/// One synthetic profile with its precomputed per-country assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub age_group: String,
    pub gender: String,
    pub origin: String,
    pub education: String,
    pub english: String,
    pub scores: CountryScores,
    pub recommended_country: String,
}

impl Case {
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn profile_summary(&self) -> String {
        format!(
            "{} {} from {}, {} education, English: {}",
            self.age_group, self.gender, self.origin, self.education, self.english
        )
    }

    pub fn recommended_scores(&self) -> Option<&ScoreBundle> {
        self.scores.get(&self.recommended_country)
    }
}

/// Categorical attributes a caller selects to look up a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseQuery {
    pub age_group: String,
    pub gender: String,
    pub origin: String,
    pub education: String,
    pub english: String,
}

impl fmt::Display for CaseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {} / english {}",
            self.age_group, self.gender, self.origin, self.education, self.english
        )
    }
}

/// Serialized form of a case data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDocument {
    pub total_cases: usize,
    pub cases: Vec<Case>,
}

/// One value per assessment dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionScores {
    pub emotional: f64,
    pub cultural: f64,
    pub ethical: f64,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Emotional => self.emotional,
            Dimension::Cultural => self.cultural,
            Dimension::Ethical => self.ethical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_to_eight_characters() {
        let case = Case {
            id: "fb649d4d-3628-487e-846b-c1291e624807".to_string(),
            age_group: "18-25".to_string(),
            gender: "Male".to_string(),
            origin: "South Sudan".to_string(),
            education: "Secondary".to_string(),
            english: "Yes".to_string(),
            scores: CountryScores::new(),
            recommended_country: "Canada".to_string(),
        };
        assert_eq!(case.short_id(), "fb649d4d");

        let short = Case {
            id: "c-1".to_string(),
            ..case
        };
        assert_eq!(short.short_id(), "c-1");
    }

    #[test]
    fn synthetic_weights_sum_to_one() {
        let total: f64 = Dimension::ordered().iter().map(|d| d.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
