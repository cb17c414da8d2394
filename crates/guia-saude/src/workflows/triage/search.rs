use serde::{Deserialize, Serialize};

use super::domain::{HealthUnit, Symptom, UnitType};
use super::normalizer::{contains_normalized, normalize, normalize_optional};

/// Symptoms whose name contains `query`, in catalog order. An absent query matches all.
pub fn filter_symptoms<'a>(symptoms: &'a [Symptom], query: Option<&str>) -> Vec<&'a Symptom> {
    let needle = normalize_optional(query);
    symptoms
        .iter()
        .filter(|symptom| normalize(&symptom.name).contains(&needle))
        .collect()
}

/// Directory filter combining an optional type restriction with a free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFilter {
    pub unit_type: Option<UnitType>,
    pub query: String,
}

impl UnitFilter {
    pub fn new(unit_type: Option<UnitType>, query: impl Into<String>) -> Self {
        Self {
            unit_type,
            query: query.into(),
        }
    }

    pub fn matches(&self, unit: &HealthUnit) -> bool {
        if let Some(unit_type) = self.unit_type {
            if unit.unit_type != unit_type {
                return false;
            }
        }

        let haystack = format!("{} {} {}", unit.name, unit.neighborhood, unit.address);
        contains_normalized(&haystack, &self.query)
    }

    pub fn apply<'a>(&self, units: &'a [HealthUnit]) -> Vec<&'a HealthUnit> {
        units.iter().filter(|unit| self.matches(unit)).collect()
    }
}

/// Parse a directory type selector; empty, `todas` and `all` mean no restriction.
pub fn parse_type_filter(raw: &str) -> Result<Option<UnitType>, super::domain::UnknownUnitType> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("todas")
        || trimmed.eq_ignore_ascii_case("all")
    {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

pub const NO_COORDINATES_NOTICE: &str = "As unidades não possuem coordenadas (lat/lng), \
    então não dá para calcular a mais próxima.";

/// Result of a directory query, with the notice flag for coordinate-less listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitListing {
    pub units: Vec<HealthUnit>,
    pub has_coordinates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl UnitListing {
    pub fn from_filtered(units: Vec<HealthUnit>) -> Self {
        let has_coordinates = units.iter().any(HealthUnit::has_coordinates);
        let notice = (!units.is_empty() && !has_coordinates)
            .then(|| NO_COORDINATES_NOTICE.to_string());
        Self {
            units,
            has_coordinates,
            notice,
        }
    }
}
