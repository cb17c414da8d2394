mod config;
mod policy;
mod rules;

pub use config::{UrgencyPolicy, DEFAULT_MODERATE_THRESHOLD};
pub use policy::classify;
pub use rules::{has_alert, score};

use super::domain::{GuidanceSet, Recommendation, SelectionSet, Symptom, SymptomId};
use serde::{Deserialize, Serialize};

/// Stateless evaluator applying the urgency policy to a selection.
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
    policy: UrgencyPolicy,
}

impl TriageEngine {
    pub fn new(policy: UrgencyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &UrgencyPolicy {
        &self.policy
    }

    /// Evaluate a selection. An empty selection returns [`TriageEvaluation::NoSelection`]
    /// without scoring anything.
    pub fn evaluate(
        &self,
        selection: &SelectionSet,
        symptoms: &[Symptom],
        guidance: &GuidanceSet,
    ) -> TriageEvaluation {
        if selection.is_empty() {
            return TriageEvaluation::NoSelection;
        }

        let components = rules::score_components(selection, symptoms);
        let score = components
            .iter()
            .fold(0u32, |total, component| total.saturating_add(component.weight));
        let has_alert = rules::has_alert(selection, guidance);
        let recommendation = self.policy.classify(score, has_alert);

        TriageEvaluation::Assessed(TriageOutcome {
            score,
            has_alert,
            urgency_label: recommendation.urgency_level.label().to_string(),
            destination_label: recommendation.destination_type.destination_label().to_string(),
            message: guidance.message(recommendation.message_key).to_string(),
            general_tips: guidance.general_tips.clone(),
            recommendation,
            components,
        })
    }
}

/// Per-symptom contribution, kept so unmatched ids stay visible in the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub symptom_id: SymptomId,
    pub weight: u32,
    pub matched: bool,
}

/// Scored selection with the guidance text resolved for its recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub score: u32,
    pub has_alert: bool,
    pub recommendation: Recommendation,
    pub urgency_label: String,
    pub destination_label: String,
    pub message: String,
    pub general_tips: Vec<String>,
    pub components: Vec<ScoreComponent>,
}

impl TriageOutcome {
    pub fn unmatched_symptoms(&self) -> impl Iterator<Item = &SymptomId> {
        self.components
            .iter()
            .filter(|component| !component.matched)
            .map(|component| &component.symptom_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TriageEvaluation {
    /// Nothing selected yet; the caller should prompt for at least one symptom.
    NoSelection,
    Assessed(TriageOutcome),
}

impl TriageEvaluation {
    pub fn outcome(&self) -> Option<&TriageOutcome> {
        match self {
            TriageEvaluation::NoSelection => None,
            TriageEvaluation::Assessed(outcome) => Some(outcome),
        }
    }
}
