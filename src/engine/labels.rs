//! Outcome classes
//!
//! The class index order is fixed at training time and shared by the
//! classifier's output tensor and the label decoder.

use serde::{Deserialize, Serialize};

/// Number of outcome classes the model scores.
pub const CLASS_COUNT: usize = 3;

/// Triage outcome for an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeClass {
    /// Harmless activity.
    Benign,
    /// Alert fired, but the activity is not a real attack.
    FalsePositive,
    /// Confirmed malicious activity.
    TruePositive,
}

impl OutcomeClass {
    /// Classes in training order. The classifier's output indices follow
    /// this table.
    pub const ALL: [OutcomeClass; CLASS_COUNT] = [
        OutcomeClass::Benign,
        OutcomeClass::FalsePositive,
        OutcomeClass::TruePositive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeClass::Benign => "Benign",
            OutcomeClass::FalsePositive => "FalsePositive",
            OutcomeClass::TruePositive => "TruePositive",
        }
    }

    /// Decode a class index back to its label.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            OutcomeClass::Benign => 0,
            OutcomeClass::FalsePositive => 1,
            OutcomeClass::TruePositive => 2,
        }
    }
}

impl std::fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
