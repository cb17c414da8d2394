use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogError, CatalogSnapshot, CatalogSource};
use super::domain::{GuidanceSet, HealthUnit, SelectionSet, Symptom, SymptomId};
use super::evaluation::{TriageEngine, TriageEvaluation, TriageOutcome, UrgencyPolicy};
use super::matcher::{match_units, top_units, DEFAULT_SUGGESTED_UNITS};
use super::search::filter_symptoms;

pub const NO_SELECTION_PROMPT: &str =
    "Selecione ao menos 1 sintoma para gerar uma orientação.";
pub const TRIAGE_DISCLAIMER: &str =
    "Aviso: isto não é diagnóstico. Se houver piora, procure atendimento.";
pub const UNITS_NOTE: &str =
    "Esta lista é informativa e pode não refletir lotação/atendimento no momento.";

/// Tunables for a triage session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageSettings {
    pub urgency: UrgencyPolicy,
    /// How many matched units accompany a recommendation.
    pub suggested_units: usize,
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            urgency: UrgencyPolicy::default(),
            suggested_units: DEFAULT_SUGGESTED_UNITS,
        }
    }
}

/// One user's interaction: a catalog snapshot plus the selection they are building.
pub struct TriageSession<S: ?Sized> {
    source: Arc<S>,
    snapshot: Arc<CatalogSnapshot>,
    engine: TriageEngine,
    suggested_units: usize,
    selection: SelectionSet,
}

impl<S> TriageSession<S>
where
    S: CatalogSource + ?Sized,
{
    /// Load symptoms and guidance from `source` and start with an empty selection.
    pub async fn open(source: Arc<S>, settings: TriageSettings) -> Result<Self, CatalogError> {
        let snapshot = CatalogSnapshot::load(source.as_ref()).await?;
        Ok(Self::with_snapshot(source, Arc::new(snapshot), settings))
    }

    pub fn with_snapshot(
        source: Arc<S>,
        snapshot: Arc<CatalogSnapshot>,
        settings: TriageSettings,
    ) -> Self {
        Self {
            source,
            snapshot,
            engine: TriageEngine::new(settings.urgency),
            suggested_units: settings.suggested_units,
            selection: SelectionSet::new(),
        }
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.snapshot.symptoms
    }

    pub fn guidance(&self) -> &GuidanceSet {
        &self.snapshot.guidance
    }

    pub fn search(&self, query: &str) -> Vec<&Symptom> {
        filter_symptoms(&self.snapshot.symptoms, Some(query))
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn toggle(&mut self, id: impl Into<SymptomId>) -> bool {
        self.selection.toggle(id.into())
    }

    pub fn select(&mut self, id: impl Into<SymptomId>) -> bool {
        self.selection.select(id.into())
    }

    pub fn deselect(&mut self, id: impl Into<SymptomId>) -> bool {
        self.selection.deselect(&id.into())
    }

    pub fn reset(&mut self) {
        self.selection.clear();
    }

    pub fn evaluate(&self) -> TriageEvaluation {
        self.engine.evaluate(
            &self.selection,
            &self.snapshot.symptoms,
            &self.snapshot.guidance,
        )
    }

    /// Evaluate the selection and attach the top matching units for its destination.
    pub async fn recommend(&self) -> Result<TriageReport, CatalogError> {
        let outcome = match self.evaluate() {
            TriageEvaluation::NoSelection => {
                return Ok(TriageReport::NoSelection {
                    prompt: NO_SELECTION_PROMPT.to_string(),
                })
            }
            TriageEvaluation::Assessed(outcome) => outcome,
        };

        let units = match_units(
            self.source.as_ref(),
            outcome.recommendation.destination_type,
        )
        .await?;
        let suggested_units = top_units(units, self.suggested_units)
            .into_iter()
            .map(SuggestedUnit::from)
            .collect();

        Ok(TriageReport::Assessed(AssessedReport {
            outcome,
            suggested_units,
            units_note: UNITS_NOTE.to_string(),
            disclaimer: TRIAGE_DISCLAIMER.to_string(),
        }))
    }
}

/// Unit surfaced with a recommendation, with its map link resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedUnit {
    #[serde(flatten)]
    pub unit: HealthUnit,
    pub maps_url: String,
}

impl From<HealthUnit> for SuggestedUnit {
    fn from(unit: HealthUnit) -> Self {
        let maps_url = unit.maps_url();
        Self { unit, maps_url }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessedReport {
    pub outcome: TriageOutcome,
    pub suggested_units: Vec<SuggestedUnit>,
    pub units_note: String,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TriageReport {
    NoSelection { prompt: String },
    Assessed(AssessedReport),
}

impl TriageReport {
    pub fn assessed(&self) -> Option<&AssessedReport> {
        match self {
            TriageReport::NoSelection { .. } => None,
            TriageReport::Assessed(report) => Some(report),
        }
    }
}
