//! Explanation builder
//!
//! Renders the winning rule's public/internal explanation text and
//! attaches the warning template referenced by ALLOW_WITH_WARNING rules.
//! A missing or disabled template degrades to a generic warning and is
//! flagged for audit rather than failing the decision.

use inkgate_core::{Decision, PolicyRule, Severity, WarningNotice, WarningTemplate};

/// Rendered explanation for a winning rule
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// Client-facing text, copied verbatim from the rule
    pub explain_public: String,
    /// Staff-facing text, copied verbatim from the rule
    pub explain_internal: String,
    /// Warnings to attach to the decision
    pub warnings: Vec<WarningNotice>,
    /// Set when the rule references a missing or disabled warning
    /// template; the caller reports it as a configuration warning
    pub dangling_warning_key: Option<String>,
}

/// Generic warning used when a referenced template cannot be resolved
fn generic_warning() -> WarningNotice {
    WarningNotice {
        title: "Please review before booking".to_string(),
        client_message: "There is something about this request your studio wants you to \
                         double-check before confirming."
            .to_string(),
        severity: Severity::Caution,
    }
}

/// Build the explanation for a winning rule
pub fn build_explanation(winner: &PolicyRule, template: Option<&WarningTemplate>) -> Explanation {
    let mut explanation = Explanation {
        explain_public: winner.explain_public.clone(),
        explain_internal: winner.explain_internal.clone(),
        warnings: Vec::new(),
        dangling_warning_key: None,
    };

    if winner.action.decision != Decision::AllowWithWarning {
        return explanation;
    }

    match (&winner.warning_key, template) {
        (Some(_), Some(template)) if template.enabled => {
            explanation.warnings.push(template.notice());
        }
        (Some(key), Some(_)) => {
            tracing::warn!(
                rule_key = winner.rule_key.as_str(),
                warning_key = key.as_str(),
                "warning template is disabled, degrading to generic warning"
            );
            explanation.warnings.push(generic_warning());
            explanation.dangling_warning_key = Some(key.clone());
        }
        (Some(key), None) => {
            tracing::warn!(
                rule_key = winner.rule_key.as_str(),
                warning_key = key.as_str(),
                "warning template not found, degrading to generic warning"
            );
            explanation.warnings.push(generic_warning());
            explanation.dangling_warning_key = Some(key.clone());
        }
        (None, _) => {
            // Rule validation requires a warning_key for this decision;
            // degrade anyway if a legacy record slipped through.
            explanation.warnings.push(generic_warning());
            explanation.dangling_warning_key = Some(String::new());
        }
    }

    explanation
}
