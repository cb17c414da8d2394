use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::triage::catalog::{CatalogError, CatalogResource, CatalogSource};
use crate::workflows::triage::domain::{
    GuidanceSet, HealthUnit, SelectionSet, Symptom, SymptomId, UnitType,
};

pub(super) fn symptom(id: &str, weight: u32) -> Symptom {
    Symptom {
        id: SymptomId::from(id),
        name: id.replace('_', " "),
        weight,
        category: "Geral".to_string(),
    }
}

pub(super) fn named_symptom(id: &str, name: &str, weight: u32) -> Symptom {
    Symptom {
        name: name.to_string(),
        ..symptom(id, weight)
    }
}

pub(super) fn unit(id: &str, unit_type: UnitType) -> HealthUnit {
    HealthUnit {
        id: id.to_string(),
        name: format!("Unidade {id}"),
        unit_type,
        address: format!("Rua {id}, 100 - Centro - Quixadá"),
        neighborhood: "Centro".to_string(),
        hours: "24 H".to_string(),
        phone: None,
        email: None,
        source_url: None,
        lat: None,
        lng: None,
    }
}

pub(super) fn selection(ids: &[&str]) -> SelectionSet {
    ids.iter().copied().collect()
}

/// Weights mirror the municipal catalog: one alert signal, the rest ordinary.
pub(super) fn catalog_symptoms() -> Vec<Symptom> {
    vec![
        named_symptom("falta_ar", "Falta de ar", 5),
        named_symptom("febre", "Febre", 2),
        named_symptom("tosse", "Tosse", 1),
        named_symptom("dor_cabeca", "Dor de cabeça", 1),
        named_symptom("dor_abdominal_intensa", "Dor abdominal intensa", 3),
        named_symptom("diarreia", "Diarreia", 1),
        named_symptom("vomitos", "Vômitos persistentes", 2),
        named_symptom("tontura", "Tontura", 0),
    ]
}

pub(super) fn guidance() -> GuidanceSet {
    let mut messages = BTreeMap::new();
    messages.insert("emergencia".to_string(), "Procure atendimento imediato.".to_string());
    messages.insert("upa".to_string(), "Procure uma UPA.".to_string());
    messages.insert("ubs".to_string(), "Procure uma UBS.".to_string());

    GuidanceSet {
        alert_signal_ids: [SymptomId::from("falta_ar")].into_iter().collect(),
        messages,
        general_tips: vec![
            "Mantenha hidratação.".to_string(),
            "Se piorar, procure atendimento.".to_string(),
        ],
    }
}

pub(super) fn catalog_units() -> Vec<HealthUnit> {
    vec![
        unit("upa-1", UnitType::Upa),
        unit("hosp-1", UnitType::Hospital),
        unit("ubs-1", UnitType::Ubs),
        unit("upa-2", UnitType::Upa),
        unit("hosp-2", UnitType::Hospital),
        unit("ubs-2", UnitType::Ubs),
        unit("ubs-3", UnitType::Ubs),
        unit("ubs-4", UnitType::Ubs),
    ]
}

/// In-memory catalog with switchable failures and per-type latency.
pub(super) struct StubCatalog {
    pub(super) symptoms: Vec<Symptom>,
    pub(super) guidance: GuidanceSet,
    pub(super) units: Vec<HealthUnit>,
    pub(super) fail_symptoms: AtomicBool,
    pub(super) failing_units: HashSet<UnitType>,
    pub(super) delays: HashMap<UnitType, Duration>,
    pub(super) symptom_fetches: AtomicUsize,
    pub(super) settled_unit_fetches: AtomicUsize,
}

impl Default for StubCatalog {
    fn default() -> Self {
        Self {
            symptoms: catalog_symptoms(),
            guidance: guidance(),
            units: catalog_units(),
            fail_symptoms: AtomicBool::new(false),
            failing_units: HashSet::new(),
            delays: HashMap::new(),
            symptom_fetches: AtomicUsize::new(0),
            settled_unit_fetches: AtomicUsize::new(0),
        }
    }
}

impl StubCatalog {
    pub(super) fn failing_units(types: &[UnitType]) -> Self {
        Self {
            failing_units: types.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub(super) fn with_delay(mut self, unit_type: UnitType, millis: u64) -> Self {
        self.delays.insert(unit_type, Duration::from_millis(millis));
        self
    }

    pub(super) fn set_symptoms_failing(&self, failing: bool) {
        self.fail_symptoms.store(failing, Ordering::SeqCst);
    }

    pub(super) fn symptom_fetches(&self) -> usize {
        self.symptom_fetches.load(Ordering::SeqCst)
    }

    pub(super) fn settled_unit_fetches(&self) -> usize {
        self.settled_unit_fetches.load(Ordering::SeqCst)
    }
}

pub(super) fn transport_failure(resource: CatalogResource) -> CatalogError {
    CatalogError::Transport {
        resource,
        message: "connection refused".to_string(),
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    async fn fetch_symptoms(&self) -> Result<Vec<Symptom>, CatalogError> {
        self.symptom_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_symptoms.load(Ordering::SeqCst) {
            return Err(transport_failure(CatalogResource::Symptoms));
        }
        Ok(self.symptoms.clone())
    }

    async fn fetch_guidance(&self) -> Result<GuidanceSet, CatalogError> {
        Ok(self.guidance.clone())
    }

    async fn fetch_units(
        &self,
        unit_type: Option<UnitType>,
    ) -> Result<Vec<HealthUnit>, CatalogError> {
        if let Some(delay) = unit_type.and_then(|wanted| self.delays.get(&wanted)) {
            tokio::time::sleep(*delay).await;
        }
        self.settled_unit_fetches.fetch_add(1, Ordering::SeqCst);

        if unit_type.is_some_and(|wanted| self.failing_units.contains(&wanted)) {
            return Err(transport_failure(CatalogResource::Units(unit_type)));
        }

        Ok(self
            .units
            .iter()
            .filter(|unit| unit_type.map_or(true, |wanted| unit.unit_type == wanted))
            .cloned()
            .collect())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
