use serde::{Deserialize, Serialize};

use super::domain::{Case, CaseQuery};

/// Which step of the relaxation cascade produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLevel {
    Exact,
    OriginGenderEducation,
    OriginEducation,
    Origin,
    /// Nothing matched; the first case in the store was returned.
    Fallback,
}

impl MatchLevel {
    /// Cascade order. Changing it changes which case wins.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Exact,
            Self::OriginGenderEducation,
            Self::OriginEducation,
            Self::Origin,
            Self::Fallback,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "Exact match",
            Self::OriginGenderEducation => "Closest match (origin, gender, education)",
            Self::OriginEducation => "Closest match (origin, education)",
            Self::Origin => "Closest match (origin)",
            Self::Fallback => "No related profile; showing first case",
        }
    }

    fn accepts(self, query: &CaseQuery, case: &Case) -> bool {
        match self {
            Self::Exact => {
                case.age_group == query.age_group
                    && case.gender == query.gender
                    && case.origin == query.origin
                    && case.education == query.education
                    && case.english == query.english
            }
            Self::OriginGenderEducation => {
                case.origin == query.origin
                    && case.gender == query.gender
                    && case.education == query.education
            }
            Self::OriginEducation => {
                case.origin == query.origin && case.education == query.education
            }
            Self::Origin => case.origin == query.origin,
            Self::Fallback => true,
        }
    }
}

/// A selected case together with how closely it fits the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseMatch<'a> {
    pub case: &'a Case,
    pub level: MatchLevel,
}

impl CaseMatch<'_> {
    pub fn is_exact(&self) -> bool {
        self.level == MatchLevel::Exact
    }
}

/// Walks the cascade; each step takes the first case in store order.
/// Returns `None` only for an empty store.
pub fn find_match<'a>(query: &CaseQuery, cases: &'a [Case]) -> Option<CaseMatch<'a>> {
    MatchLevel::ordered().into_iter().find_map(|level| {
        cases
            .iter()
            .find(|case| level.accepts(query, case))
            .map(|case| CaseMatch { case, level })
    })
}
