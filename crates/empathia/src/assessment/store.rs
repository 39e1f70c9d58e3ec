use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use super::csv_import;
use super::domain::{Case, CaseDocument};

const EMBEDDED_CASES: &str = include_str!("../../data/sample_cases.json");

/// Tolerance when checking the recommended country against the best weighted score.
const WEIGHTED_TOLERANCE: f64 = 1e-9;

/// Failure to read or validate a case data source.
#[derive(Debug, thiserror::Error)]
pub enum CaseStoreError {
    #[error("failed to read case data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed case data source: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("malformed case CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed case CSV: missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("malformed case CSV: row {row} column '{column}' is not a number ('{value}')")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("invalid case '{case_id}': {reason}")]
    Invalid { case_id: String, reason: String },
}

/// Read-only ordered collection of validated cases.
#[derive(Debug, Clone, Default)]
pub struct CaseStore {
    cases: Vec<Case>,
}

impl CaseStore {
    /// Validates every case before accepting the collection.
    pub fn new(cases: Vec<Case>) -> Result<Self, CaseStoreError> {
        let mut seen = HashSet::new();
        for case in &cases {
            validate_case(case)?;
            if !seen.insert(case.id.as_str()) {
                return Err(invalid(case, "duplicate case id"));
            }
        }
        Ok(Self { cases })
    }

    /// The sample cases bundled with the crate.
    pub fn embedded() -> Result<Self, CaseStoreError> {
        Self::from_json_reader(EMBEDDED_CASES.as_bytes())
    }

    /// Loads a `.csv` results table or a JSON case document, chosen by extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CaseStoreError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        debug!(path = %path.display(), csv = is_csv, "loading case data");
        if is_csv {
            Self::from_csv_reader(file)
        } else {
            Self::from_json_reader(std::io::BufReader::new(file))
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CaseStoreError> {
        let document: CaseDocument = serde_json::from_reader(reader)?;
        if document.total_cases != document.cases.len() {
            warn!(
                declared = document.total_cases,
                actual = document.cases.len(),
                "case document total_cases disagrees with the case list"
            );
        }
        Self::new(document.cases)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CaseStoreError> {
        let cases = csv_import::parse_cases(reader)?;
        Self::new(cases)
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Case> {
        self.cases.iter().find(|case| case.id == id)
    }

    /// Sorted distinct attribute values for populating selectors.
    pub fn attribute_options(&self) -> AttributeOptions {
        fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
            values
                .cloned()
                .collect::<BTreeSet<String>>()
                .into_iter()
                .collect()
        }

        AttributeOptions {
            age_groups: distinct(self.cases.iter().map(|case| &case.age_group)),
            genders: distinct(self.cases.iter().map(|case| &case.gender)),
            origins: distinct(self.cases.iter().map(|case| &case.origin)),
            educations: distinct(self.cases.iter().map(|case| &case.education)),
            english: distinct(self.cases.iter().map(|case| &case.english)),
        }
    }

    pub fn summary(&self) -> StoreSummary {
        let mut host_countries: Vec<String> = Vec::new();
        let mut recommendations: BTreeMap<String, usize> = BTreeMap::new();
        let mut recommendation_scores = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            for country in case.scores.keys() {
                if !host_countries.contains(country) {
                    host_countries.push(country.clone());
                }
            }
            *recommendations
                .entry(case.recommended_country.clone())
                .or_default() += 1;
            if let Some(bundle) = case.recommended_scores() {
                recommendation_scores.push(bundle.weighted);
            }
        }

        let recommendation_score = if recommendation_scores.is_empty() {
            None
        } else {
            let count = recommendation_scores.len() as f64;
            let mean = recommendation_scores.iter().sum::<f64>() / count;
            let min = recommendation_scores
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            let max = recommendation_scores
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let std = (recommendation_scores.len() > 1).then(|| {
                let squares: f64 = recommendation_scores
                    .iter()
                    .map(|score| (score - mean).powi(2))
                    .sum();
                (squares / (count - 1.0)).sqrt()
            });
            Some(ScoreStatistics {
                mean,
                std,
                min,
                max,
            })
        };

        StoreSummary {
            total_cases: self.cases.len(),
            host_countries,
            recommendations,
            recommendation_score,
        }
    }
}

/// Distinct values present in the store, per attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeOptions {
    pub age_groups: Vec<String>,
    pub genders: Vec<String>,
    pub origins: Vec<String>,
    pub educations: Vec<String>,
    pub english: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreStatistics {
    pub mean: f64,
    /// Sample standard deviation; absent for a single score.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Dataset overview: recommendation counts and the spread of recommendation scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub total_cases: usize,
    pub host_countries: Vec<String>,
    pub recommendations: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_score: Option<ScoreStatistics>,
}

fn invalid(case: &Case, reason: impl Into<String>) -> CaseStoreError {
    CaseStoreError::Invalid {
        case_id: case.id.clone(),
        reason: reason.into(),
    }
}

fn validate_case(case: &Case) -> Result<(), CaseStoreError> {
    if case.id.trim().is_empty() {
        return Err(invalid(case, "case id is empty"));
    }
    if case.scores.is_empty() {
        return Err(invalid(case, "no country scores"));
    }
    if let Some((country, _)) = case.scores.iter().find(|(_, bundle)| !bundle.is_finite()) {
        return Err(invalid(case, format!("non-finite score for {country}")));
    }

    let recommended = case.recommended_scores().ok_or_else(|| {
        invalid(
            case,
            format!(
                "recommended country '{}' has no scores",
                case.recommended_country
            ),
        )
    })?;

    let best = case
        .scores
        .values()
        .map(|bundle| bundle.weighted)
        .fold(f64::NEG_INFINITY, f64::max);
    if recommended.weighted + WEIGHTED_TOLERANCE < best {
        return Err(invalid(
            case,
            format!(
                "recommended country '{}' scores {:.2} but the best weighted score is {:.2}",
                case.recommended_country, recommended.weighted, best
            ),
        ));
    }

    Ok(())
}
