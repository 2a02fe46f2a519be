//! Guide content — what the Guide screen shows for a symptom.
//!
//! Exactly one of two content sets is active at a time: guidance fetched
//! from the backend, or the fixed generic procedure. The choice is made
//! once when guidance settles and never revisited; the two sets are never
//! merged.

use crate::models::EmergencyGuidance;

/// The fixed quick-pick symptom phrases offered on the intake screen.
pub const QUICK_SYMPTOMS: [&str; 6] = [
    "Chest pain",
    "Difficulty breathing",
    "Severe bleeding",
    "Loss of consciousness",
    "Suspected fracture",
    "Burn injury",
];

/// Generic emergency procedure shown when no guidance is available.
pub const DEFAULT_PROCEDURE: [&str; 5] = [
    "Move the patient to a safe place",
    "Check the patient's level of consciousness",
    "Lay or sit the patient in a comfortable position",
    "Keep the patient warm",
    "Keep monitoring the patient's condition",
];

/// Shown in place of immediate actions when fetched guidance has none.
pub const CALL_EMERGENCY_LINE: &str =
    "If the situation is serious, call emergency services immediately";

/// Content selected for the Guide screen.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidanceContent {
    /// Backend guidance — render its summary/actions/warnings.
    Fetched(EmergencyGuidance),
    /// No usable guidance — render the fixed generic procedure.
    Default,
}

impl GuidanceContent {
    /// Select content from a fetch outcome. A missing or completely empty
    /// guidance object degrades to the generic procedure.
    pub fn from_fetch(guidance: Option<EmergencyGuidance>) -> Self {
        match guidance {
            Some(g) if !g.is_empty() => Self::Fetched(g),
            _ => Self::Default,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    pub fn fetched(&self) -> Option<&EmergencyGuidance> {
        match self {
            Self::Fetched(g) => Some(g),
            Self::Default => None,
        }
    }
}
