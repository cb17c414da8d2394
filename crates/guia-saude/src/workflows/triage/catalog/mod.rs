//! Catalog retrieval: the live HTTP source, the bundled fallback dataset, and the
//! failure policy deciding between them.

mod fallback;
mod http;
mod payload;
mod policy;

pub use fallback::FallbackCatalog;
pub use http::HttpCatalogSource;
pub use payload::{parse_guidance, parse_symptoms, parse_units};
pub use policy::{FailurePolicy, PolicyCatalogSource, UnknownFailurePolicy};

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{GuidanceSet, HealthUnit, Symptom, UnitType};

/// Catalog resource addressed by a retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogResource {
    Symptoms,
    Guidance,
    Units(Option<UnitType>),
}

impl fmt::Display for CatalogResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogResource::Symptoms => f.write_str("symptoms"),
            CatalogResource::Guidance => f.write_str("guidance"),
            CatalogResource::Units(None) => f.write_str("units"),
            CatalogResource::Units(Some(unit_type)) => write!(f, "units?type={unit_type}"),
        }
    }
}

/// Failure raised while retrieving catalog data.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("{resource} retrieval could not complete: {message}")]
    Transport {
        resource: CatalogResource,
        message: String,
    },
    #[error("{resource} request returned HTTP {status}: {body}")]
    UnsuccessfulResponse {
        resource: CatalogResource,
        status: u16,
        body: String,
    },
    #[error("{resource} payload has an unexpected shape: {detail}")]
    ShapeMismatch {
        resource: CatalogResource,
        detail: String,
    },
    #[error("catalog unavailable while loading {resource}: {cause}")]
    Unavailable {
        resource: CatalogResource,
        #[source]
        cause: Box<CatalogError>,
    },
}

impl CatalogError {
    pub fn resource(&self) -> CatalogResource {
        match self {
            CatalogError::Transport { resource, .. }
            | CatalogError::UnsuccessfulResponse { resource, .. }
            | CatalogError::ShapeMismatch { resource, .. }
            | CatalogError::Unavailable { resource, .. } => *resource,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, CatalogError::Unavailable { .. })
    }
}

/// Data returned by [`CatalogSource::fetch_catalog`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogPayload {
    Symptoms(Vec<Symptom>),
    Guidance(GuidanceSet),
    Units(Vec<HealthUnit>),
}

/// Supplier of symptoms, guidance and health units. Every call is a single attempt.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_symptoms(&self) -> Result<Vec<Symptom>, CatalogError>;

    async fn fetch_guidance(&self) -> Result<GuidanceSet, CatalogError>;

    /// Units of the given type, or every unit when `unit_type` is `None`.
    async fn fetch_units(&self, unit_type: Option<UnitType>)
        -> Result<Vec<HealthUnit>, CatalogError>;

    /// Symptoms and guidance fetched together. Sources that can substitute bundled data
    /// override this to mark the snapshot as degraded.
    async fn load_snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        let (symptoms, guidance) = tokio::join!(self.fetch_symptoms(), self.fetch_guidance());
        Ok(CatalogSnapshot::new(symptoms?, guidance?))
    }

    async fn fetch_catalog(&self, kind: CatalogResource) -> Result<CatalogPayload, CatalogError> {
        match kind {
            CatalogResource::Symptoms => self.fetch_symptoms().await.map(CatalogPayload::Symptoms),
            CatalogResource::Guidance => self.fetch_guidance().await.map(CatalogPayload::Guidance),
            CatalogResource::Units(unit_type) => {
                self.fetch_units(unit_type).await.map(CatalogPayload::Units)
            }
        }
    }
}

/// Symptoms and guidance loaded once for a session and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub symptoms: Vec<Symptom>,
    pub guidance: GuidanceSet,
    pub loaded_at: DateTime<Utc>,
    /// Part of the snapshot came from the bundled dataset instead of the live catalog.
    pub degraded: bool,
}

impl CatalogSnapshot {
    pub fn new(symptoms: Vec<Symptom>, guidance: GuidanceSet) -> Self {
        Self {
            symptoms,
            guidance,
            loaded_at: Utc::now(),
            degraded: false,
        }
    }

    pub fn degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }

    pub async fn load<S>(source: &S) -> Result<Self, CatalogError>
    where
        S: CatalogSource + ?Sized,
    {
        let snapshot = source.load_snapshot().await?;
        tracing::debug!(
            symptoms = snapshot.symptoms.len(),
            alert_signals = snapshot.guidance.alert_signal_ids.len(),
            degraded = snapshot.degraded,
            "catalog snapshot loaded"
        );
        Ok(snapshot)
    }
}
