use super::super::domain::Recommendation;
use super::config::UrgencyPolicy;

impl UrgencyPolicy {
    /// Resolve a recommendation. Precedence: alert signal, then score threshold, then primary care.
    pub fn classify(&self, score: u32, has_alert: bool) -> Recommendation {
        if has_alert && self.alert_escalates {
            return Recommendation::EMERGENCY;
        }

        if score >= self.moderate_threshold {
            return Recommendation::URGENT_CARE;
        }

        Recommendation::PRIMARY_CARE
    }
}

/// [`UrgencyPolicy::classify`] under the default policy.
pub fn classify(score: u32, has_alert: bool) -> Recommendation {
    UrgencyPolicy::default().classify(score, has_alert)
}
