//! Access policy
//!
//! Reconciles the classifier's verdict with the hard suspicion rule. The
//! hard rule is a non-bypassable safety net: an explicitly asserted "High"
//! suspicion always denies, even when the model votes safe. The model can
//! make the outcome stricter, never turn a hard deny into an allow.

use super::labels::OutcomeClass;
use crate::models::assessment::AccessDecision;

/// Suspicion value that triggers the hard deny. Matched against the raw
/// input string, case-sensitive; the encoder's own view of SuspicionLevel
/// plays no part here.
pub const HIGH_SUSPICION: &str = "High";

/// Decision plus the reason shown to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyVerdict {
    pub decision: AccessDecision,
    pub reason: String,
}

/// Main policy decision function.
///
/// When both signals fire, the AI reason wins the message.
pub fn decide(predicted: OutcomeClass, suspicion_level: &str) -> PolicyVerdict {
    let ai_flagged = predicted == OutcomeClass::TruePositive;
    let hard_flagged = suspicion_level == HIGH_SUSPICION;

    if ai_flagged || hard_flagged {
        let reason = if hard_flagged && !ai_flagged {
            format!("Policy Block: High Suspicion Input (AI predicted {})", predicted)
        } else {
            format!("AI Block: Predicted {}", predicted)
        };

        PolicyVerdict {
            decision: AccessDecision::Denied,
            reason,
        }
    } else {
        PolicyVerdict {
            decision: AccessDecision::Allowed,
            reason: format!("Access Granted: Verified Safe ({})", predicted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_suspicion_overrides_permissive_verdict() {
        let verdict = decide(OutcomeClass::Benign, "High");
        assert_eq!(verdict.decision, AccessDecision::Denied);
        assert_eq!(
            verdict.reason,
            "Policy Block: High Suspicion Input (AI predicted Benign)"
        );
    }

    #[test]
    fn true_positive_denies_regardless_of_suspicion() {
        let verdict = decide(OutcomeClass::TruePositive, "Low");
        assert_eq!(verdict.decision, AccessDecision::Denied);
        assert_eq!(verdict.reason, "AI Block: Predicted TruePositive");
    }

    #[test]
    fn both_signals_use_the_ai_reason() {
        let verdict = decide(OutcomeClass::TruePositive, "High");
        assert_eq!(verdict.decision, AccessDecision::Denied);
        assert_eq!(verdict.reason, "AI Block: Predicted TruePositive");
    }

    #[test]
    fn safe_verdicts_allow() {
        let verdict = decide(OutcomeClass::Benign, "Low");
        assert_eq!(verdict.decision, AccessDecision::Allowed);
        assert_eq!(verdict.reason, "Access Granted: Verified Safe (Benign)");

        let verdict = decide(OutcomeClass::FalsePositive, "Medium");
        assert_eq!(verdict.decision, AccessDecision::Allowed);
        assert_eq!(
            verdict.reason,
            "Access Granted: Verified Safe (FalsePositive)"
        );
    }

    #[test]
    fn hard_rule_is_case_sensitive() {
        // "high" does not match the literal "High" and bypasses the hard
        // rule; preserved behavior, see DESIGN.md.
        let verdict = decide(OutcomeClass::Benign, "high");
        assert_eq!(verdict.decision, AccessDecision::Allowed);
    }
}
