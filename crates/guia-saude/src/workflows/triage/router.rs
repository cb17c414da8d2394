use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::CatalogSource;
use super::domain::SymptomId;
use super::service::{TriageService, TriageServiceError};

/// Router builder exposing the symptom catalog, unit directory and triage endpoints.
pub fn triage_router<S>(service: Arc<TriageService<S>>) -> Router
where
    S: CatalogSource + 'static,
{
    Router::new()
        .route("/api/v1/symptoms", get(symptoms_handler::<S>))
        .route("/api/v1/guidance", get(guidance_handler::<S>))
        .route("/api/v1/units", get(units_handler::<S>))
        .route("/api/v1/triage", post(triage_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SymptomQuery {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UnitQuery {
    #[serde(default, rename = "type")]
    unit_type: String,
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TriageRequest {
    #[serde(default)]
    selected: Vec<SymptomId>,
}

pub(crate) async fn symptoms_handler<S>(
    State(service): State<Arc<TriageService<S>>>,
    Query(query): Query<SymptomQuery>,
) -> Response
where
    S: CatalogSource + 'static,
{
    match service.symptoms(query.q.as_deref()).await {
        Ok(symptoms) => (StatusCode::OK, axum::Json(symptoms)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn guidance_handler<S>(State(service): State<Arc<TriageService<S>>>) -> Response
where
    S: CatalogSource + 'static,
{
    match service.guidance().await {
        Ok(guidance) => (StatusCode::OK, axum::Json(guidance)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn units_handler<S>(
    State(service): State<Arc<TriageService<S>>>,
    Query(query): Query<UnitQuery>,
) -> Response
where
    S: CatalogSource + 'static,
{
    match service.units(&query.unit_type, &query.q).await {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn triage_handler<S>(
    State(service): State<Arc<TriageService<S>>>,
    axum::Json(request): axum::Json<TriageRequest>,
) -> Response
where
    S: CatalogSource + 'static,
{
    match service.triage(request.selected).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TriageServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}
