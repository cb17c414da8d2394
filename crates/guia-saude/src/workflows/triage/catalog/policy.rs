use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::super::domain::{GuidanceSet, HealthUnit, Symptom, UnitType};
use super::fallback::FallbackCatalog;
use super::{CatalogError, CatalogSnapshot, CatalogSource};

/// How retrieval failures from the live catalog are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Substitute the bundled dataset and keep going.
    #[default]
    DegradeToFallback,
    /// Surface [`CatalogError::Unavailable`] to the caller.
    FailClosed,
}

impl FailurePolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::DegradeToFallback => "fallback",
            FailurePolicy::FailClosed => "fail_closed",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog failure policy '{0}' (expected fallback or fail_closed)")]
pub struct UnknownFailurePolicy(pub String);

impl FromStr for FailurePolicy {
    type Err = UnknownFailurePolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fallback" | "degrade" | "degrade_to_fallback" => Ok(FailurePolicy::DegradeToFallback),
            "fail_closed" | "closed" => Ok(FailurePolicy::FailClosed),
            _ => Err(UnknownFailurePolicy(value.to_string())),
        }
    }
}

/// Wraps a primary source and applies the configured [`FailurePolicy`] to its failures.
#[derive(Debug, Clone)]
pub struct PolicyCatalogSource<S> {
    primary: S,
    fallback: FallbackCatalog,
    policy: FailurePolicy,
}

impl<S> PolicyCatalogSource<S> {
    pub fn new(primary: S, policy: FailurePolicy) -> Self {
        Self {
            primary,
            fallback: FallbackCatalog,
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn primary(&self) -> &S {
        &self.primary
    }

    fn recover<T>(
        &self,
        error: CatalogError,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, CatalogError> {
        let resource = error.resource();
        match self.policy {
            FailurePolicy::DegradeToFallback => {
                tracing::warn!(
                    %resource,
                    error = %error,
                    "live catalog failed, serving bundled data"
                );
                Ok(fallback())
            }
            FailurePolicy::FailClosed => {
                tracing::error!(%resource, error = %error, "live catalog failed");
                Err(CatalogError::Unavailable {
                    resource,
                    cause: Box::new(error),
                })
            }
        }
    }
}

#[async_trait]
impl<S> CatalogSource for PolicyCatalogSource<S>
where
    S: CatalogSource,
{
    async fn fetch_symptoms(&self) -> Result<Vec<Symptom>, CatalogError> {
        match self.primary.fetch_symptoms().await {
            Ok(symptoms) => Ok(symptoms),
            Err(error) => self.recover(error, || self.fallback.symptoms()),
        }
    }

    async fn fetch_guidance(&self) -> Result<GuidanceSet, CatalogError> {
        match self.primary.fetch_guidance().await {
            Ok(guidance) => Ok(guidance),
            Err(error) => self.recover(error, || self.fallback.guidance()),
        }
    }

    async fn load_snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        let (symptoms, guidance) = tokio::join!(
            self.primary.fetch_symptoms(),
            self.primary.fetch_guidance()
        );
        let degraded = symptoms.is_err() || guidance.is_err();

        let symptoms = match symptoms {
            Ok(symptoms) => symptoms,
            Err(error) => self.recover(error, || self.fallback.symptoms())?,
        };
        let guidance = match guidance {
            Ok(guidance) => guidance,
            Err(error) => self.recover(error, || self.fallback.guidance())?,
        };

        Ok(CatalogSnapshot::new(symptoms, guidance).degraded(degraded))
    }

    async fn fetch_units(
        &self,
        unit_type: Option<UnitType>,
    ) -> Result<Vec<HealthUnit>, CatalogError> {
        match self.primary.fetch_units(unit_type).await {
            Ok(units) => Ok(units),
            Err(error) => self.recover(error, || self.fallback.units(unit_type)),
        }
    }
}

