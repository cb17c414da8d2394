use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::super::domain::{
    GuidanceSet, HealthUnit, Symptom, SymptomId, UnitType, DEFAULT_SYMPTOM_CATEGORY,
    DEFAULT_SYMPTOM_WEIGHT,
};
use super::{CatalogError, CatalogResource};

/// Validate a `/symptoms` payload.
pub fn parse_symptoms(value: Value) -> Result<Vec<Symptom>, CatalogError> {
    let resource = CatalogResource::Symptoms;
    let records: Vec<SymptomRecord> = decode_list(resource, value)?;

    let mut seen = HashSet::new();
    let mut symptoms = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id.into_string();
        if !seen.insert(id.clone()) {
            return Err(shape(resource, format!("duplicate symptom id '{id}'")));
        }

        symptoms.push(Symptom {
            id: SymptomId(id),
            name: record.name,
            weight: record.weight.unwrap_or(DEFAULT_SYMPTOM_WEIGHT),
            category: record
                .category
                .filter(|category| !category.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SYMPTOM_CATEGORY.to_string()),
        });
    }

    Ok(symptoms)
}

/// Validate a `/guidance` payload.
pub fn parse_guidance(value: Value) -> Result<GuidanceSet, CatalogError> {
    let resource = CatalogResource::Guidance;
    if !value.is_object() {
        return Err(shape(
            resource,
            format!("expected an object, found {}", kind_of(&value)),
        ));
    }

    let record: GuidanceRecord = decode(resource, value)?;
    Ok(GuidanceSet {
        alert_signal_ids: record
            .alert_signal_ids
            .into_iter()
            .map(|id| SymptomId(id.into_string()))
            .collect(),
        messages: record.messages,
        general_tips: record.general_tips.unwrap_or_default(),
    })
}

/// Validate a `/units` payload fetched for `unit_type`.
///
/// Records of another type are dropped, so an upstream that ignores `?type=` cannot
/// leak units into the wrong slot of an aggregation.
pub fn parse_units(
    unit_type: Option<UnitType>,
    value: Value,
) -> Result<Vec<HealthUnit>, CatalogError> {
    let resource = CatalogResource::Units(unit_type);
    let records: Vec<UnitRecord> = decode_list(resource, value)?;

    let mut units = Vec::with_capacity(records.len());
    for record in records {
        let parsed_type = record
            .unit_type
            .parse::<UnitType>()
            .map_err(|err| shape(resource, err.to_string()))?;

        if unit_type.is_some_and(|wanted| wanted != parsed_type) {
            tracing::warn!(
                %resource,
                unit_id = %record.id,
                unit_type = %parsed_type,
                "dropping unit of another type from filtered response"
            );
            continue;
        }

        units.push(HealthUnit {
            id: record.id.into_string(),
            name: record.name,
            unit_type: parsed_type,
            address: record.address,
            neighborhood: record.neighborhood,
            hours: record.hours,
            phone: non_blank(record.phone),
            email: non_blank(record.email),
            source_url: non_blank(record.source_url),
            lat: record.lat,
            lng: record.lng,
        });
    }

    Ok(units)
}

fn decode_list<T: DeserializeOwned>(
    resource: CatalogResource,
    value: Value,
) -> Result<Vec<T>, CatalogError> {
    if !value.is_array() {
        return Err(shape(
            resource,
            format!("expected a list, found {}", kind_of(&value)),
        ));
    }
    decode(resource, value)
}

fn decode<T: DeserializeOwned>(resource: CatalogResource, value: Value) -> Result<T, CatalogError> {
    serde_json::from_value(value).map_err(|err| shape(resource, err.to_string()))
}

fn shape(resource: CatalogResource, detail: String) -> CatalogError {
    CatalogError::ShapeMismatch { resource, detail }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Identifiers arrive as strings or integers depending on the upstream table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Text(text) => f.write_str(text),
            WireId::Number(number) => write!(f, "{number}"),
        }
    }
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SymptomRecord {
    id: WireId,
    #[serde(alias = "nome")]
    name: String,
    #[serde(default, alias = "peso")]
    weight: Option<u32>,
    #[serde(default, alias = "categoria")]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GuidanceRecord {
    #[serde(
        rename = "alertSignalIds",
        alias = "alert_signal_ids",
        alias = "sinaisAlerta"
    )]
    alert_signal_ids: Vec<WireId>,
    #[serde(alias = "mensagens")]
    messages: BTreeMap<String, String>,
    #[serde(
        default,
        rename = "generalTips",
        alias = "general_tips",
        alias = "dicasGerais"
    )]
    general_tips: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct UnitRecord {
    id: WireId,
    #[serde(alias = "nome")]
    name: String,
    #[serde(rename = "type", alias = "tipo")]
    unit_type: String,
    #[serde(alias = "endereco")]
    address: String,
    #[serde(alias = "bairro")]
    neighborhood: String,
    #[serde(alias = "horario")]
    hours: String,
    #[serde(default, alias = "telefone")]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(
        default,
        rename = "sourceUrl",
        alias = "source_url",
        alias = "fonteUrl"
    )]
    source_url: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn symptoms_accept_portuguese_fields_and_defaults() {
        let symptoms = parse_symptoms(json!([
            { "id": "febre", "nome": "Febre", "peso": 2, "categoria": "Geral" },
            { "id": 7, "name": "Tosse", "weight": null }
        ]))
        .expect("valid payload");

        assert_eq!(symptoms[0].weight, 2);
        assert_eq!(symptoms[1].id, SymptomId::from("7"));
        assert_eq!(symptoms[1].weight, DEFAULT_SYMPTOM_WEIGHT);
        assert_eq!(symptoms[1].category, DEFAULT_SYMPTOM_CATEGORY);
    }

    #[test]
    fn symptoms_must_be_list_shaped() {
        let err = parse_symptoms(json!({ "id": "febre", "nome": "Febre" }))
            .expect_err("object is not a list");
        match err {
            CatalogError::ShapeMismatch { resource, detail } => {
                assert_eq!(resource, CatalogResource::Symptoms);
                assert!(detail.contains("expected a list"));
            }
            other => panic!("expected shape mismatch, got {other:?}"),
        }
    }

    #[test]
    fn negative_weights_are_rejected() {
        let err = parse_symptoms(json!([{ "id": "febre", "nome": "Febre", "peso": -1 }]))
            .expect_err("negative weight");
        assert!(matches!(err, CatalogError::ShapeMismatch { .. }));
    }

    #[test]
    fn duplicate_symptom_ids_are_rejected() {
        let err = parse_symptoms(json!([
            { "id": "febre", "nome": "Febre" },
            { "id": "febre", "nome": "Febre alta" }
        ]))
        .expect_err("duplicate ids");
        assert!(err.to_string().contains("duplicate symptom id"));
    }

    #[test]
    fn guidance_defaults_missing_tips() {
        let guidance = parse_guidance(json!({
            "sinaisAlerta": ["falta_ar"],
            "mensagens": { "ubs": "Procure uma UBS." }
        }))
        .expect("valid guidance");

        assert!(guidance.is_alert_signal(&SymptomId::from("falta_ar")));
        assert!(guidance.general_tips.is_empty());
    }

    #[test]
    fn guidance_without_alert_signals_is_a_shape_mismatch() {
        let err = parse_guidance(json!({ "mensagens": {} })).expect_err("missing field");
        assert!(matches!(err, CatalogError::ShapeMismatch { .. }));
    }

    #[test]
    fn units_reject_unknown_types() {
        let err = parse_units(
            None,
            json!([{
                "id": 1, "nome": "Clínica", "tipo": "clinica",
                "endereco": "Rua A", "bairro": "Centro", "horario": "24 H"
            }]),
        )
        .expect_err("unknown type");
        assert!(err.to_string().contains("unknown unit type"));
    }

    #[test]
    fn units_normalize_ids_and_blank_optionals() {
        let units = parse_units(
            Some(UnitType::Upa),
            json!([{
                "id": 97, "nome": "UPA 24H", "tipo": "UPA",
                "endereco": "Rua dos Voluntarios", "bairro": "Planalto", "horario": "SEMPRE ABERTO",
                "telefone": null, "email": "", "fonteUrl": "https://example.org/97"
            }]),
        )
        .expect("valid units");

        assert_eq!(units[0].id, "97");
        assert_eq!(units[0].unit_type, UnitType::Upa);
        assert!(units[0].phone.is_none());
        assert!(units[0].email.is_none());
        assert_eq!(units[0].source_url.as_deref(), Some("https://example.org/97"));
    }

    #[test]
    fn units_of_another_type_are_dropped_from_filtered_responses() {
        let units = parse_units(
            Some(UnitType::Hospital),
            json!([
                { "id": 97, "nome": "UPA 24H", "tipo": "upa",
                  "endereco": "Rua B", "bairro": "Planalto", "horario": "SEMPRE ABERTO" },
                { "id": 13, "nome": "Hospital Municipal", "tipo": "hospital",
                  "endereco": "Rua A", "bairro": "Centro", "horario": "24 H" }
            ]),
        )
        .expect("valid units");

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, "13");
        assert_eq!(units[0].unit_type, UnitType::Hospital);
    }

    #[test]
    fn unfiltered_responses_keep_every_type() {
        let units = parse_units(
            None,
            json!([
                { "id": 97, "nome": "UPA 24H", "tipo": "upa",
                  "endereco": "Rua B", "bairro": "Planalto", "horario": "SEMPRE ABERTO" },
                { "id": 13, "nome": "Hospital Municipal", "tipo": "hospital",
                  "endereco": "Rua A", "bairro": "Centro", "horario": "24 H" }
            ]),
        )
        .expect("valid units");

        assert_eq!(units.len(), 2);
    }
}
