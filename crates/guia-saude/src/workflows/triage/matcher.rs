use futures_util::future::join_all;

use super::catalog::{CatalogError, CatalogSource};
use super::domain::{HealthUnit, UnitType};

pub const DEFAULT_SUGGESTED_UNITS: usize = 3;

/// Unit types to query for a destination. The hospital tier also surfaces urgent care.
pub fn resolve_unit_types(destination: UnitType) -> Vec<UnitType> {
    match destination {
        UnitType::Hospital => vec![UnitType::Hospital, UnitType::Upa],
        other => vec![other],
    }
}

/// Fetch every type concurrently and concatenate the results in `types` order.
///
/// Waits for all retrievals to settle; if any failed, the first failure in `types`
/// order is returned and no partial list is produced.
pub async fn aggregate_units<S>(
    source: &S,
    types: &[UnitType],
) -> Result<Vec<HealthUnit>, CatalogError>
where
    S: CatalogSource + ?Sized,
{
    let retrievals = types
        .iter()
        .map(|unit_type| source.fetch_units(Some(*unit_type)));
    let settled = join_all(retrievals).await;

    let mut units = Vec::new();
    for result in settled {
        units.extend(result?);
    }

    tracing::debug!(types = ?types, units = units.len(), "aggregated health units");
    Ok(units)
}

/// Resolve the destination's unit types and aggregate them.
pub async fn match_units<S>(
    source: &S,
    destination: UnitType,
) -> Result<Vec<HealthUnit>, CatalogError>
where
    S: CatalogSource + ?Sized,
{
    aggregate_units(source, &resolve_unit_types(destination)).await
}

/// First `limit` units, preserving order.
pub fn top_units(mut units: Vec<HealthUnit>, limit: usize) -> Vec<HealthUnit> {
    units.truncate(limit);
    units
}
