use serde::{Deserialize, Serialize};

use super::domain::Dimension;

const EMBEDDED_PROFILES: &str = include_str!("../../data/profiles.json");

/// Coded refugee profile with the reasoning each agent produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefugeeProfile {
    pub refugee_code: String,
    pub age: String,
    pub gender: String,
    pub origin_country: String,
    pub household_size: String,
    pub english: String,
    pub work_status: String,
    pub work_permit: String,
    pub disability: String,
    pub recommended_country: String,
    pub overall_score: f64,
    pub emotional_score: f64,
    pub cultural_score: f64,
    pub ethical_score: f64,
    pub emotional_reasoning: String,
    pub cultural_reasoning: String,
    pub ethical_reasoning: String,
    pub validator_consensus: String,
}

impl RefugeeProfile {
    pub fn label(&self) -> String {
        format!(
            "{} - {}y {}, {}",
            self.refugee_code, self.age, self.gender, self.origin_country
        )
    }

    pub fn score(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Emotional => self.emotional_score,
            Dimension::Cultural => self.cultural_score,
            Dimension::Ethical => self.ethical_score,
        }
    }

    pub fn reasoning(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Emotional => &self.emotional_reasoning,
            Dimension::Cultural => &self.cultural_reasoning,
            Dimension::Ethical => &self.ethical_reasoning,
        }
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            refugee_code: self.refugee_code.clone(),
            label: self.label(),
        }
    }

    pub fn assessment(&self) -> ProfileAssessment {
        // Cultural agent is presented first.
        let agents = [Dimension::Cultural, Dimension::Emotional, Dimension::Ethical]
            .into_iter()
            .map(|dimension| AgentAssessment {
                dimension,
                agent: agent_name(dimension),
                score: self.score(dimension),
                reasoning: self.reasoning(dimension).to_string(),
            })
            .collect();

        ProfileAssessment {
            refugee_code: self.refugee_code.clone(),
            recommended_country: self.recommended_country.clone(),
            overall_score: self.overall_score,
            agents,
            validator_consensus: self.validator_consensus.clone(),
        }
    }
}

fn agent_name(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Emotional => "Emotional Agent",
        Dimension::Cultural => "Cultural Agent",
        Dimension::Ethical => "Ethical Agent",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub refugee_code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentAssessment {
    pub dimension: Dimension,
    pub agent: &'static str,
    pub score: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAssessment {
    pub refugee_code: String,
    pub recommended_country: String,
    pub overall_score: f64,
    pub agents: Vec<AgentAssessment>,
    pub validator_consensus: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileRegistryError {
    #[error("malformed profile table: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown refugee code '{0}'")]
    NotFound(String),
}

#[derive(Debug, Deserialize)]
struct ProfileTable {
    profiles: Vec<RefugeeProfile>,
}

/// Embedded, read-only table of coded profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: Vec<RefugeeProfile>,
}

impl ProfileRegistry {
    pub fn new(profiles: Vec<RefugeeProfile>) -> Self {
        Self { profiles }
    }

    pub fn embedded() -> Result<Self, ProfileRegistryError> {
        let table: ProfileTable = serde_json::from_str(EMBEDDED_PROFILES)?;
        Ok(Self::new(table.profiles))
    }

    pub fn list(&self) -> Vec<ProfileSummary> {
        self.profiles.iter().map(RefugeeProfile::summary).collect()
    }

    pub fn get(&self, code: &str) -> Result<&RefugeeProfile, ProfileRegistryError> {
        let code = code.trim();
        self.profiles
            .iter()
            .find(|profile| profile.refugee_code.eq_ignore_ascii_case(code))
            .ok_or_else(|| ProfileRegistryError::NotFound(code.to_string()))
    }

    pub fn assessment(&self, code: &str) -> Result<ProfileAssessment, ProfileRegistryError> {
        self.get(code).map(RefugeeProfile::assessment)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_lists_every_code_in_order() {
        let registry = ProfileRegistry::embedded().expect("embedded profiles parse");
        let codes: Vec<String> = registry
            .list()
            .into_iter()
            .map(|summary| summary.refugee_code)
            .collect();
        assert_eq!(codes.len(), 8);
        assert_eq!(codes.first().map(String::as_str), Some("REF-0001"));
        assert_eq!(codes.last().map(String::as_str), Some("REF-0008"));
    }

    #[test]
    fn label_matches_selector_text() {
        let registry = ProfileRegistry::embedded().expect("embedded profiles parse");
        let profile = registry.get("REF-0001").expect("profile present");
        assert_eq!(profile.label(), "REF-0001 - 24y Man, South Sudan");
    }

    #[test]
    fn assessment_orders_agents_cultural_first() {
        let registry = ProfileRegistry::embedded().expect("embedded profiles parse");
        let assessment = registry.assessment("ref-0003").expect("lookup ignores case");
        let order: Vec<Dimension> = assessment.agents.iter().map(|a| a.dimension).collect();
        assert_eq!(
            order,
            vec![Dimension::Cultural, Dimension::Emotional, Dimension::Ethical]
        );
        assert_eq!(assessment.recommended_country, "Germany");
        assert_eq!(assessment.overall_score, 8.0);
        assert!(assessment.agents.iter().all(|a| !a.reasoning.is_empty()));
    }

    #[test]
    fn unknown_code_is_not_found() {
        let registry = ProfileRegistry::embedded().expect("embedded profiles parse");
        let err = registry.get("REF-9999").expect_err("unknown code");
        assert!(matches!(err, ProfileRegistryError::NotFound(code) if code == "REF-9999"));
    }
}
