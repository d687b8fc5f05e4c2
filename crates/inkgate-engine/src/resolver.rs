//! Decision resolver
//!
//! Orders candidate rules and applies first-match-wins conflict
//! resolution. Ordering is a total, deterministic key: scope specificity
//! (artist > workspace > global), then priority descending, then id
//! ascending. Aggregating conflicting matches has no sound total order,
//! so authors encode precedence explicitly via priority and the first
//! matching rule decides.

use crate::eval::evaluate;
use chrono::Utc;
use inkgate_core::{DecisionContext, DecisionResult, PolicyRule, ScopeSelector};

/// A configuration problem encountered while scanning rules
///
/// Reported to the audit recorder by the caller; never fatal to the
/// in-flight decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    /// Rule that carries the problem
    pub rule_id: u64,
    /// Its key, for human review
    pub rule_key: String,
    /// What was wrong
    pub detail: String,
}

/// Outcome of a resolution scan
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The decision, pre-explanation (explain fields are filled by the
    /// explanation builder from the winning rule)
    pub result: DecisionResult,
    /// Configuration warnings gathered during the scan
    pub config_warnings: Vec<ConfigWarning>,
}

/// Resolve a decision context against candidate rules
///
/// Always terminates with a decision: malformed rules are skipped, and a
/// scan with no match defaults to ALLOW with `NO_RULE_MATCHED`.
pub fn resolve(
    selector: &ScopeSelector,
    rules: &[PolicyRule],
    ctx: &DecisionContext,
) -> Resolution {
    let mut candidates: Vec<&PolicyRule> = rules
        .iter()
        .filter(|rule| rule.enabled && rule.scope.applies_to(selector))
        .collect();

    // Total order, independent of input ordering: most specific scope
    // first, then priority descending, then earliest created.
    candidates.sort_by(|a, b| {
        b.scope
            .specificity()
            .cmp(&a.scope.specificity())
            .then(b.priority.cmp(&a.priority))
            .then(a.id.cmp(&b.id))
    });

    let mut config_warnings = Vec::new();

    for rule in candidates {
        match evaluate(&rule.condition, ctx) {
            Ok(true) => {
                tracing::debug!(
                    rule_id = rule.id,
                    rule_key = rule.rule_key.as_str(),
                    decision = %rule.action.decision,
                    "rule matched, stopping scan"
                );
                let result = DecisionResult {
                    decision: rule.action.decision,
                    reason_code: rule.action.reason_code.clone(),
                    matched_rule_id: Some(rule.id),
                    explain_public: String::new(),
                    explain_internal: String::new(),
                    warnings: Vec::new(),
                    next_actions: rule.action.next_actions.clone(),
                    evaluated_at: Utc::now(),
                };
                return Resolution {
                    result,
                    config_warnings,
                };
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(
                    rule_id = rule.id,
                    rule_key = rule.rule_key.as_str(),
                    error = %err,
                    "skipping rule with malformed condition"
                );
                config_warnings.push(ConfigWarning {
                    rule_id: rule.id,
                    rule_key: rule.rule_key.clone(),
                    detail: format!("malformed condition: {}", err),
                });
            }
        }
    }

    Resolution {
        result: DecisionResult::no_rule_matched(),
        config_warnings,
    }
}
