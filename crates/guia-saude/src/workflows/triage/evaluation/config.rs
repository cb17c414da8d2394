use serde::{Deserialize, Serialize};

pub const DEFAULT_MODERATE_THRESHOLD: u32 = 6;

/// Policy constants used when turning a score into a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyPolicy {
    /// Scores at or above this value are routed to urgent care.
    pub moderate_threshold: u32,
    /// When set, any alert signal forces the hospital tier regardless of score.
    pub alert_escalates: bool,
}

impl Default for UrgencyPolicy {
    fn default() -> Self {
        Self {
            moderate_threshold: DEFAULT_MODERATE_THRESHOLD,
            alert_escalates: true,
        }
    }
}
