//! Case matching, score aggregation and simulated multi-perspective assessments.
//!
//! Two scoring strategies live side by side: [`aggregate`] reads the precomputed
//! per-country scores of a matched case, while [`synthetic`] derives scores from
//! fixed arithmetic adjustments when no case data is on hand.

pub mod aggregate;
mod csv_import;
pub mod domain;
pub mod matcher;
pub mod profiles;
pub mod report;
pub mod router;
pub mod service;
pub mod session;
pub mod store;
pub mod synthetic;

#[cfg(test)]
mod tests;

pub use aggregate::{average_scores, rank_countries, CountryRanking};
pub use domain::{
    Case, CaseDocument, CaseQuery, CountryScores, Dimension, DimensionScores, ScoreBundle,
};
pub use matcher::{find_match, CaseMatch, MatchLevel};
pub use profiles::{
    AgentAssessment, ProfileAssessment, ProfileRegistry, ProfileRegistryError, ProfileSummary,
    RefugeeProfile,
};
pub use report::CaseAssessment;
pub use router::assessment_router;
pub use service::{AssessmentService, AssessmentServiceError, CaseSource};
pub use session::{AssessmentRunner, Selection, Superseded, Ticket};
pub use store::{AttributeOptions, CaseStore, CaseStoreError, ScoreStatistics, StoreSummary};
pub use synthetic::{
    parse_age, SyntheticAssessment, SyntheticCountryScore, SyntheticProfile, SyntheticScorer,
};
