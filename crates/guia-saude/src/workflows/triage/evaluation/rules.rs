use std::collections::HashMap;

use super::super::domain::{
    GuidanceSet, SelectionSet, Symptom, SymptomId, DEFAULT_SYMPTOM_WEIGHT,
};
use super::ScoreComponent;

/// Sum of the selected symptoms' weights.
///
/// An id missing from the catalog (for example a selection kept across a catalog
/// refresh) contributes [`DEFAULT_SYMPTOM_WEIGHT`] instead of failing.
pub fn score(selection: &SelectionSet, symptoms: &[Symptom]) -> u32 {
    score_components(selection, symptoms)
        .iter()
        .fold(0u32, |total, component| total.saturating_add(component.weight))
}

/// True when any selected id is one of the guidance alert signals.
pub fn has_alert(selection: &SelectionSet, guidance: &GuidanceSet) -> bool {
    selection.iter().any(|id| guidance.is_alert_signal(id))
}

pub(crate) fn score_components(
    selection: &SelectionSet,
    symptoms: &[Symptom],
) -> Vec<ScoreComponent> {
    let by_id: HashMap<&SymptomId, &Symptom> =
        symptoms.iter().map(|symptom| (&symptom.id, symptom)).collect();

    selection
        .iter()
        .map(|id| match by_id.get(id) {
            Some(symptom) => ScoreComponent {
                symptom_id: id.clone(),
                weight: symptom.weight,
                matched: true,
            },
            None => {
                tracing::warn!(
                    symptom_id = %id,
                    "selected symptom missing from catalog, scoring default weight"
                );
                ScoreComponent {
                    symptom_id: id.clone(),
                    weight: DEFAULT_SYMPTOM_WEIGHT,
                    matched: false,
                }
            }
        })
        .collect()
}
