use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{error, info, warn};

use super::domain::CaseQuery;
use super::matcher::find_match;
use super::profiles::{
    ProfileAssessment, ProfileRegistry, ProfileRegistryError, ProfileSummary, RefugeeProfile,
};
use super::report::CaseAssessment;
use super::store::{AttributeOptions, CaseStore, StoreSummary};
use super::synthetic::{SyntheticAssessment, SyntheticProfile, SyntheticScorer};

/// Load state of the case data source.
#[derive(Debug, Clone)]
pub enum CaseSource {
    Loading,
    Ready(Arc<CaseStore>),
    Unavailable(String),
}

impl CaseSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// Facade over the case store, the profile registry and the synthetic scorer.
pub struct AssessmentService {
    source: RwLock<CaseSource>,
    profiles: ProfileRegistry,
    scorer: SyntheticScorer,
}

impl AssessmentService {
    /// Starts in the `Loading` state; call [`install`](Self::install) once data is read.
    pub fn new(profiles: ProfileRegistry) -> Self {
        Self {
            source: RwLock::new(CaseSource::Loading),
            profiles,
            scorer: SyntheticScorer,
        }
    }

    pub fn with_store(profiles: ProfileRegistry, store: CaseStore) -> Self {
        let service = Self::new(profiles);
        service.install(store);
        service
    }

    pub fn install(&self, store: CaseStore) {
        info!(cases = store.len(), "case store ready");
        *self.write_source() = CaseSource::Ready(Arc::new(store));
    }

    pub fn mark_unavailable(&self, reason: impl Into<String>) {
        let reason = reason.into();
        error!(%reason, "case store unavailable");
        *self.write_source() = CaseSource::Unavailable(reason);
    }

    pub fn source(&self) -> CaseSource {
        self.read_source().clone()
    }

    pub fn store(&self) -> Result<Arc<CaseStore>, AssessmentServiceError> {
        match &*self.read_source() {
            CaseSource::Ready(store) => Ok(Arc::clone(store)),
            CaseSource::Loading | CaseSource::Unavailable(_) => {
                Err(AssessmentServiceError::StoreNotLoaded)
            }
        }
    }

    /// Matches the query against the store and builds the display payload.
    pub fn assess(&self, query: &CaseQuery) -> Result<CaseAssessment, AssessmentServiceError> {
        let store = self.store()?;
        let matched = find_match(query, store.cases()).ok_or(AssessmentServiceError::NoMatch)?;

        if !matched.is_exact() {
            warn!(
                query = %query,
                level = ?matched.level,
                case_id = %matched.case.id,
                "no exact case match; using closest profile"
            );
        }

        Ok(CaseAssessment::from_match(matched, Utc::now()))
    }

    pub fn attribute_options(&self) -> Result<AttributeOptions, AssessmentServiceError> {
        Ok(self.store()?.attribute_options())
    }

    pub fn summary(&self) -> Result<StoreSummary, AssessmentServiceError> {
        Ok(self.store()?.summary())
    }

    /// Legacy arithmetic path; independent of the store state.
    pub fn synthetic(&self, profile: &SyntheticProfile) -> SyntheticAssessment {
        self.scorer.assess(profile)
    }

    pub fn profiles(&self) -> Vec<ProfileSummary> {
        self.profiles.list()
    }

    pub fn profile(&self, code: &str) -> Result<&RefugeeProfile, AssessmentServiceError> {
        Ok(self.profiles.get(code)?)
    }

    pub fn profile_assessment(
        &self,
        code: &str,
    ) -> Result<ProfileAssessment, AssessmentServiceError> {
        Ok(self.profiles.assessment(code)?)
    }

    fn read_source(&self) -> std::sync::RwLockReadGuard<'_, CaseSource> {
        self.source
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_source(&self) -> std::sync::RwLockWriteGuard<'_, CaseSource> {
        self.source
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("case data is still loading; try again shortly")]
    StoreNotLoaded,
    #[error("no matching profile found in dataset")]
    NoMatch,
    #[error(transparent)]
    Profile(#[from] ProfileRegistryError),
}
