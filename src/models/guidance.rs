use serde::{Deserialize, Serialize};

/// Emergency guidance for a symptom, as returned by the triage backend.
///
/// Every field is optional: the backend may know only part of the answer,
/// and a completely empty object means "no guidance for this symptom" —
/// callers fall back to the generic procedure in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyGuidance {
    /// Short description of what the backend thinks is happening.
    pub situation_summary: Option<String>,
    /// Steps to take right now, in order.
    pub immediate_actions: Option<Vec<String>>,
    /// Things that would make the situation worse, in order.
    pub do_not_do: Option<Vec<String>>,
}

impl EmergencyGuidance {
    /// True when the backend returned nothing usable.
    ///
    /// Empty vectors count as absent: an `immediate_actions: []` payload
    /// carries no more information than a missing field.
    pub fn is_empty(&self) -> bool {
        self.situation_summary.as_deref().map_or(true, str::is_empty)
            && self.immediate_actions.as_deref().map_or(true, <[_]>::is_empty)
            && self.do_not_do.as_deref().map_or(true, <[_]>::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(EmergencyGuidance::default().is_empty());
    }

    #[test]
    fn empty_object_deserializes_as_empty() {
        let g: EmergencyGuidance = serde_json::from_str("{}").unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn empty_vectors_count_as_empty() {
        let g: EmergencyGuidance = serde_json::from_str(
            r#"{"immediate_actions": [], "do_not_do": []}"#,
        )
        .unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn any_populated_field_is_not_empty() {
        let g = EmergencyGuidance {
            immediate_actions: Some(vec!["Call emergency services".into()]),
            ..Default::default()
        };
        assert!(!g.is_empty());

        let g = EmergencyGuidance {
            situation_summary: Some("Possible cardiac event".into()),
            ..Default::default()
        };
        assert!(!g.is_empty());
    }

    #[test]
    fn partial_payload_deserializes() {
        let g: EmergencyGuidance = serde_json::from_str(
            r#"{"situation_summary": "Suspected fracture"}"#,
        )
        .unwrap();
        assert_eq!(g.situation_summary.as_deref(), Some("Suspected fracture"));
        assert!(g.immediate_actions.is_none());
        assert!(g.do_not_do.is_none());
    }
}
