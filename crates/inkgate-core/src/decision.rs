//! Decision output types

use crate::warning::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason code used when no rule matched and the engine defaulted to ALLOW
pub const NO_RULE_MATCHED: &str = "NO_RULE_MATCHED";

/// The engine's sole output category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Booking may proceed
    Allow,
    /// Booking may proceed, client sees an attached warning
    AllowWithWarning,
    /// Booking is held for manual review
    Review,
    /// Booking is refused
    Block,
}

impl Decision {
    /// Wire/display name of the decision
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::AllowWithWarning => "ALLOW_WITH_WARNING",
            Decision::Review => "REVIEW",
            Decision::Block => "BLOCK",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warning attached to a decision, rendered from a warning template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningNotice {
    /// Short title shown to the client
    pub title: String,
    /// Full client-facing message
    pub client_message: String,
    /// Severity of the warning
    pub severity: Severity,
}

/// Result of resolving a decision context against the active rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    /// The effective decision
    pub decision: Decision,

    /// Machine-readable reason code from the winning rule
    pub reason_code: String,

    /// Id of the winning rule; `None` means no rule matched and the
    /// engine defaulted to ALLOW
    pub matched_rule_id: Option<u64>,

    /// Client-facing explanation, copied verbatim from the winning rule
    #[serde(default)]
    pub explain_public: String,

    /// Staff-facing explanation, copied verbatim from the winning rule
    #[serde(default)]
    pub explain_internal: String,

    /// Warnings attached to the decision
    #[serde(default)]
    pub warnings: Vec<WarningNotice>,

    /// Follow-up action tags from the winning rule
    /// (e.g. ["REQUEST_REFERENCE_PHOTOS", "NOTIFY_ARTIST"])
    #[serde(default)]
    pub next_actions: Vec<String>,

    /// When this result was produced
    pub evaluated_at: DateTime<Utc>,
}

impl DecisionResult {
    /// The default result when no enabled rule matched the context
    pub fn no_rule_matched() -> Self {
        Self {
            decision: Decision::Allow,
            reason_code: NO_RULE_MATCHED.to_string(),
            matched_rule_id: None,
            explain_public: String::new(),
            explain_internal: String::new(),
            warnings: Vec::new(),
            next_actions: Vec::new(),
            evaluated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_wire_names() {
        assert_eq!(Decision::Allow.as_str(), "ALLOW");
        assert_eq!(Decision::AllowWithWarning.as_str(), "ALLOW_WITH_WARNING");
        assert_eq!(Decision::Review.as_str(), "REVIEW");
        assert_eq!(Decision::Block.as_str(), "BLOCK");
    }

    #[test]
    fn test_decision_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&Decision::AllowWithWarning).unwrap();
        assert_eq!(json, r#""ALLOW_WITH_WARNING""#);

        let back: Decision = serde_json::from_str(r#""BLOCK""#).unwrap();
        assert_eq!(back, Decision::Block);
    }

    #[test]
    fn test_no_rule_matched_default() {
        let result = DecisionResult::no_rule_matched();
        assert_eq!(result.decision, Decision::Allow);
        assert_eq!(result.reason_code, NO_RULE_MATCHED);
        assert!(result.matched_rule_id.is_none());
        assert!(result.warnings.is_empty());
        assert!(result.next_actions.is_empty());
    }
}
