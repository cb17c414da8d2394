use std::time::Instant;

use super::common::*;
use crate::workflows::triage::catalog::{CatalogError, CatalogResource};
use crate::workflows::triage::domain::UnitType;
use crate::workflows::triage::matcher::{
    aggregate_units, match_units, resolve_unit_types, top_units,
};

fn ids(units: &[crate::workflows::triage::domain::HealthUnit]) -> Vec<&str> {
    units.iter().map(|unit| unit.id.as_str()).collect()
}

#[test]
fn hospital_destination_also_queries_urgent_care() {
    assert_eq!(
        resolve_unit_types(UnitType::Hospital),
        vec![UnitType::Hospital, UnitType::Upa]
    );
    assert_eq!(resolve_unit_types(UnitType::Upa), vec![UnitType::Upa]);
    assert_eq!(resolve_unit_types(UnitType::Ubs), vec![UnitType::Ubs]);
}

#[tokio::test]
async fn aggregation_keeps_type_order_when_first_type_is_slowest() {
    let source = StubCatalog::default().with_delay(UnitType::Hospital, 60);

    let units = aggregate_units(&source, &[UnitType::Hospital, UnitType::Upa])
        .await
        .expect("units");

    assert_eq!(ids(&units), vec!["hosp-1", "hosp-2", "upa-1", "upa-2"]);
}

#[tokio::test]
async fn retrievals_run_concurrently() {
    let source = StubCatalog::default()
        .with_delay(UnitType::Hospital, 150)
        .with_delay(UnitType::Upa, 150);

    let started = Instant::now();
    let units = aggregate_units(&source, &[UnitType::Hospital, UnitType::Upa])
        .await
        .expect("units");

    assert_eq!(units.len(), 4);
    assert!(started.elapsed().as_millis() < 290, "fetches were serialized");
}

#[tokio::test]
async fn any_failed_type_fails_the_whole_match() {
    let source = StubCatalog::failing_units(&[UnitType::Upa]);

    let error = match_units(&source, UnitType::Hospital)
        .await
        .expect_err("upa failure must propagate");

    assert_eq!(error.resource(), CatalogResource::Units(Some(UnitType::Upa)));
    assert!(matches!(error, CatalogError::Transport { .. }));
}

#[tokio::test]
async fn failure_waits_for_sibling_retrievals_to_settle() {
    let source = StubCatalog::failing_units(&[UnitType::Hospital]).with_delay(UnitType::Upa, 50);

    let result = aggregate_units(&source, &[UnitType::Hospital, UnitType::Upa]).await;

    assert!(result.is_err());
    assert_eq!(source.settled_unit_fetches(), 2);
}

#[tokio::test]
async fn first_failure_in_type_order_is_reported() {
    let source = StubCatalog::failing_units(&[UnitType::Hospital, UnitType::Upa])
        .with_delay(UnitType::Hospital, 40);

    let error = aggregate_units(&source, &[UnitType::Hospital, UnitType::Upa])
        .await
        .expect_err("both fail");

    assert_eq!(
        error.resource(),
        CatalogResource::Units(Some(UnitType::Hospital))
    );
}

#[tokio::test]
async fn primary_care_matches_only_ubs() {
    let source = StubCatalog::default();

    let units = match_units(&source, UnitType::Ubs).await.expect("units");

    assert_eq!(ids(&units), vec!["ubs-1", "ubs-2", "ubs-3", "ubs-4"]);
}

#[tokio::test]
async fn empty_type_list_yields_no_units() {
    let source = StubCatalog::default();
    let units = aggregate_units(&source, &[]).await.expect("units");
    assert!(units.is_empty());
}

#[test]
fn top_units_truncates_in_order() {
    let units = vec![
        unit("a", UnitType::Hospital),
        unit("b", UnitType::Hospital),
        unit("c", UnitType::Upa),
        unit("d", UnitType::Upa),
    ];

    assert_eq!(ids(&top_units(units.clone(), 3)), vec!["a", "b", "c"]);
    assert_eq!(ids(&top_units(units[..2].to_vec(), 3)), vec!["a", "b"]);
}
