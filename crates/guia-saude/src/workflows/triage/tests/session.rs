use std::sync::Arc;

use super::common::*;
use crate::workflows::triage::catalog::{
    CatalogError, CatalogSnapshot, FailurePolicy, PolicyCatalogSource,
};
use crate::workflows::triage::domain::{Recommendation, UnitType};
use crate::workflows::triage::evaluation::TriageEvaluation;
use crate::workflows::triage::session::{
    TriageReport, TriageSession, TriageSettings, NO_SELECTION_PROMPT, TRIAGE_DISCLAIMER,
};

async fn open_session(source: StubCatalog) -> TriageSession<StubCatalog> {
    TriageSession::open(Arc::new(source), TriageSettings::default())
        .await
        .expect("session opens")
}

#[tokio::test]
async fn open_loads_catalog_with_empty_selection() {
    let session = open_session(StubCatalog::default()).await;

    assert_eq!(session.symptoms().len(), catalog_symptoms().len());
    assert!(session.guidance().is_alert_signal(&"falta_ar".into()));
    assert!(session.selection().is_empty());
    assert_eq!(session.evaluate(), TriageEvaluation::NoSelection);
}

#[tokio::test]
async fn open_fails_when_catalog_is_closed() {
    let stub = StubCatalog::default();
    stub.set_symptoms_failing(true);
    let source = Arc::new(PolicyCatalogSource::new(stub, FailurePolicy::FailClosed));

    let result = TriageSession::open(source, TriageSettings::default()).await;

    assert!(matches!(result, Err(CatalogError::Unavailable { .. })));
}

#[tokio::test]
async fn toggle_and_reset_manage_the_selection() {
    let mut session = open_session(StubCatalog::default()).await;

    assert!(session.toggle("febre"));
    assert!(session.toggle("tosse"));
    assert!(!session.toggle("tosse"));
    assert_eq!(session.selection().len(), 1);

    assert!(session.select("dor_cabeca"));
    assert!(!session.select("dor_cabeca"));
    assert!(session.deselect("febre"));

    session.reset();
    assert!(session.selection().is_empty());
}

#[tokio::test]
async fn search_filters_loaded_symptoms() {
    let session = open_session(StubCatalog::default()).await;

    let found: Vec<_> = session
        .search("falta")
        .into_iter()
        .map(|symptom| symptom.id.as_str())
        .collect();

    assert_eq!(found, vec!["falta_ar"]);
}

#[tokio::test]
async fn empty_selection_prompts_without_fetching_units() {
    let session = open_session(StubCatalog::default()).await;

    let report = session.recommend().await.expect("report");

    assert_eq!(
        report,
        TriageReport::NoSelection {
            prompt: NO_SELECTION_PROMPT.to_string()
        }
    );
}

#[tokio::test]
async fn alert_recommendation_lists_hospitals_then_urgent_care() {
    let source = StubCatalog::default().with_delay(UnitType::Hospital, 30);
    let mut session = open_session(source).await;
    session.toggle("falta_ar");

    let report = session.recommend().await.expect("report");
    let assessed = report.assessed().expect("assessed");

    assert_eq!(assessed.outcome.recommendation, Recommendation::EMERGENCY);
    let ids: Vec<_> = assessed
        .suggested_units
        .iter()
        .map(|suggested| suggested.unit.id.as_str())
        .collect();
    assert_eq!(ids, vec!["hosp-1", "hosp-2", "upa-1"]);
    assert_eq!(assessed.disclaimer, TRIAGE_DISCLAIMER);
    assert!(assessed.suggested_units[0]
        .maps_url
        .starts_with("https://www.google.com/maps/search/?api=1&query="));
}

#[tokio::test]
async fn suggested_unit_count_follows_settings() {
    let settings = TriageSettings {
        suggested_units: 1,
        ..TriageSettings::default()
    };
    let mut session = TriageSession::open(Arc::new(StubCatalog::default()), settings)
        .await
        .expect("session opens");
    session.toggle("tosse");

    let report = session.recommend().await.expect("report");
    let assessed = report.assessed().expect("assessed");

    assert_eq!(assessed.suggested_units.len(), 1);
    assert_eq!(assessed.suggested_units[0].unit.unit_type, UnitType::Ubs);
}

#[tokio::test]
async fn unit_failure_fails_the_recommendation() {
    let source = Arc::new(StubCatalog::failing_units(&[UnitType::Upa]));
    let snapshot = Arc::new(CatalogSnapshot::new(catalog_symptoms(), guidance()));
    let mut session = TriageSession::with_snapshot(source, snapshot, TriageSettings::default());
    session.toggle("falta_ar");

    let error = session.recommend().await.expect_err("upa branch fails");

    assert!(matches!(error, CatalogError::Transport { .. }));
}

#[tokio::test]
async fn selection_changes_do_not_touch_the_snapshot() {
    let stub = Arc::new(StubCatalog::default());
    let mut session = TriageSession::open(stub.clone(), TriageSettings::default())
        .await
        .expect("session opens");

    session.toggle("febre");
    session.toggle("tosse");
    let _ = session.evaluate();

    assert_eq!(stub.symptom_fetches(), 1);
}
