use empathia::assessment::{AssessmentService, CaseStore, CaseStoreError, ProfileRegistry};
use empathia::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) service: Arc<AssessmentService>,
}

/// Reads the configured case file, or the bundled sample cases when none is set.
pub(crate) fn load_case_store(path: Option<&Path>) -> Result<CaseStore, CaseStoreError> {
    match path {
        Some(path) => CaseStore::from_path(path),
        None => CaseStore::embedded(),
    }
}

/// Service with the store already installed, for one-shot CLI commands.
pub(crate) fn loaded_service(path: Option<&Path>) -> Result<AssessmentService, AppError> {
    let profiles = ProfileRegistry::embedded()?;
    let store = load_case_store(path)?;
    Ok(AssessmentService::with_store(profiles, store))
}

/// One-shot background load; readiness flips once it resolves either way.
pub(crate) fn spawn_case_store_load(
    service: Arc<AssessmentService>,
    path: Option<PathBuf>,
    readiness: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let source = path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "embedded sample cases".to_string());

        let loaded = tokio::task::spawn_blocking(move || load_case_store(path.as_deref())).await;

        match loaded {
            Ok(Ok(store)) => {
                info!(%source, cases = store.len(), "loaded case data");
                service.install(store);
            }
            Ok(Err(err)) => {
                error!(%source, error = %err, "error loading case data");
                service.mark_unavailable(err.to_string());
            }
            Err(join_err) => {
                error!(%source, error = %join_err, "case data loader panicked");
                service.mark_unavailable(join_err.to_string());
            }
        }

        readiness.store(true, Ordering::Release);
    })
}

pub(crate) fn parse_delay_ms(raw: &str) -> Result<Duration, String> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|err| format!("failed to parse '{raw}' as milliseconds ({err})"))
}
