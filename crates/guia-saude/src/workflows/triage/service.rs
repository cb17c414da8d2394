use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use tokio::sync::RwLock;

use super::catalog::{CatalogError, CatalogSnapshot, CatalogSource};
use super::domain::{GuidanceSet, Symptom, SymptomId, UnknownUnitType};
use super::search::{filter_symptoms, parse_type_filter, UnitFilter, UnitListing};
use super::session::{TriageReport, TriageSession, TriageSettings};

/// How long a degraded snapshot is served before the live catalog is tried again.
pub const DEFAULT_DEGRADED_RETRY: Duration = Duration::from_secs(30);

/// Shared entry point for request handlers and the CLI.
///
/// Holds one catalog snapshot for every caller. A failed load (fail-closed policy) is not
/// cached, so the next call retries the source. A degraded snapshot (bundled data served
/// in place of the live catalog) is replaced once `degraded_retry` has elapsed.
pub struct TriageService<S> {
    source: Arc<S>,
    settings: TriageSettings,
    degraded_retry: Duration,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl<S> TriageService<S>
where
    S: CatalogSource + 'static,
{
    pub fn new(source: Arc<S>, settings: TriageSettings) -> Self {
        Self {
            source,
            settings,
            degraded_retry: DEFAULT_DEGRADED_RETRY,
            snapshot: RwLock::new(None),
        }
    }

    pub fn with_degraded_retry(mut self, degraded_retry: Duration) -> Self {
        self.degraded_retry = degraded_retry;
        self
    }

    pub fn settings(&self) -> &TriageSettings {
        &self.settings
    }

    /// Current snapshot, loading it on first use and reloading a stale degraded one.
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, TriageServiceError> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            if self.is_current(snapshot) {
                return Ok(snapshot.clone());
            }
        }

        let mut guard = self.snapshot.write().await;
        if let Some(snapshot) = guard.as_ref() {
            if self.is_current(snapshot) {
                return Ok(snapshot.clone());
            }
        }

        let snapshot = Arc::new(CatalogSnapshot::load(self.source.as_ref()).await?);
        if snapshot.degraded {
            tracing::warn!(
                retry_after_secs = self.degraded_retry.as_secs(),
                "live catalog unavailable, serving bundled snapshot"
            );
        }
        *guard = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn is_current(&self, snapshot: &CatalogSnapshot) -> bool {
        if !snapshot.degraded {
            return true;
        }
        // A clock that moved backwards yields an error here; keep the snapshot.
        (Utc::now() - snapshot.loaded_at)
            .to_std()
            .map_or(true, |age| age < self.degraded_retry)
    }

    /// Drop the cached snapshot and load a fresh one.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, TriageServiceError> {
        self.snapshot.write().await.take();
        self.snapshot().await
    }

    pub async fn symptoms(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<Symptom>, TriageServiceError> {
        let snapshot = self.snapshot().await?;
        Ok(filter_symptoms(&snapshot.symptoms, query)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn guidance(&self) -> Result<GuidanceSet, TriageServiceError> {
        Ok(self.snapshot().await?.guidance.clone())
    }

    /// Unit directory for a raw type selector (`todas`, `hospital`, ...) and search text.
    pub async fn units(
        &self,
        type_selector: &str,
        query: &str,
    ) -> Result<UnitListing, TriageServiceError> {
        let filter = UnitFilter::new(parse_type_filter(type_selector)?, query);
        let units = self.source.fetch_units(filter.unit_type).await?;
        let matched = filter.apply(&units).into_iter().cloned().collect();
        Ok(UnitListing::from_filtered(matched))
    }

    /// Run a triage for the given selection against the shared snapshot.
    pub async fn triage<I>(&self, selected: I) -> Result<TriageReport, TriageServiceError>
    where
        I: IntoIterator<Item = SymptomId>,
    {
        let snapshot = self.snapshot().await?;
        let mut session =
            TriageSession::with_snapshot(self.source.clone(), snapshot, self.settings);
        for id in selected {
            session.select(id);
        }
        Ok(session.recommend().await?)
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    InvalidFilter(#[from] UnknownUnitType),
}

impl TriageServiceError {
    /// HTTP status reported for this failure by every handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TriageServiceError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            TriageServiceError::Catalog(CatalogError::Unavailable { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            TriageServiceError::Catalog(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
