//! Symptom triage: catalog retrieval, scoring, recommendation and unit matching.

pub mod catalog;
pub mod domain;
pub mod evaluation;
pub mod matcher;
pub mod normalizer;
pub mod router;
pub mod search;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogError, CatalogPayload, CatalogResource, CatalogSnapshot, CatalogSource,
    FailurePolicy, FallbackCatalog, HttpCatalogSource, PolicyCatalogSource,
};
pub use domain::{
    GuidanceSet, HealthUnit, MessageKey, Recommendation, SelectionSet, Symptom, SymptomId,
    UnitType, UrgencyLevel,
};
pub use evaluation::{
    classify, has_alert, score, ScoreComponent, TriageEngine, TriageEvaluation, TriageOutcome,
    UrgencyPolicy,
};
pub use matcher::{aggregate_units, match_units, resolve_unit_types, top_units};
pub use normalizer::normalize;
pub use router::triage_router;
pub use search::{
    filter_symptoms, parse_type_filter, UnitFilter, UnitListing, NO_COORDINATES_NOTICE,
};
pub use service::{TriageService, TriageServiceError};
pub use session::{AssessedReport, SuggestedUnit, TriageReport, TriageSession, TriageSettings};
