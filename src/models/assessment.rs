//! Assessment output model
//!
//! Data structures only, no decision logic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// DECISION TYPES
// ============================================================================

/// Final access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessDecision {
    Allowed,
    Denied,
}

impl AccessDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Allowed => "ALLOWED",
            AccessDecision::Denied => "DENIED",
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied)
    }
}

impl std::fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ASSESSMENT
// ============================================================================

/// Complete assessment returned to the caller.
///
/// A denied request carries the same full body as an allowed one: the
/// blocked party gets the explanation, not an opaque failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub decision: AccessDecision,
    pub predicted_grade: String,
    pub confidence: f32,
    /// Probability per outcome class, keyed by class label.
    pub breakdown: BTreeMap<String, f32>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&AccessDecision::Allowed).unwrap(),
            "\"ALLOWED\""
        );
        assert_eq!(
            serde_json::to_string(&AccessDecision::Denied).unwrap(),
            "\"DENIED\""
        );
    }

    #[test]
    fn denied_predicate() {
        assert!(AccessDecision::Denied.is_denied());
        assert!(!AccessDecision::Allowed.is_denied());
    }
}
