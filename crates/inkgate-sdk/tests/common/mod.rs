//! Common test utilities for SDK integration tests

use inkgate_core::{
    Condition, Decision, DecisionContext, NaryOp, RuleAction, Scope, Severity, WarningTemplate,
};
use inkgate_sdk::{PolicyEngine, PolicyEngineBuilder};
use inkgate_store::{Actor, RuleDraft};

/// Build an engine over a fresh in-memory store
pub async fn test_engine() -> PolicyEngine {
    PolicyEngineBuilder::new().build().await.unwrap()
}

/// The admin actor used throughout the tests
pub fn admin() -> Actor {
    Actor::new("ana", "owner")
}

/// Decision context from inline JSON
pub fn context(raw: serde_json::Value) -> DecisionContext {
    serde_json::from_value(raw).unwrap()
}

/// Draft for a rule matching `path == true`
pub fn bool_rule(
    rule_key: &str,
    path: &str,
    priority: i32,
    decision: Decision,
    warning_key: Option<&str>,
) -> RuleDraft {
    RuleDraft {
        rule_key: rule_key.to_string(),
        name: rule_key.replace('_', " "),
        description: String::new(),
        scope: Scope::Global,
        priority,
        enabled: true,
        condition: Condition::compare(
            Condition::path(path),
            NaryOp::Eq,
            Condition::literal(true),
        ),
        action: RuleAction {
            decision,
            reason_code: rule_key.to_uppercase(),
            next_actions: vec![],
        },
        warning_key: warning_key.map(str::to_string),
        explain_public: format!("public explanation for {}", rule_key),
        explain_internal: format!("internal explanation for {}", rule_key),
    }
}

/// The warning template the warn_first_tattoo scenario resolves
pub fn first_tattoo_template() -> WarningTemplate {
    WarningTemplate {
        key: "first_tattoo_aftercare".to_string(),
        title: "First tattoo".to_string(),
        client_message: "Plan extra time for the aftercare walkthrough.".to_string(),
        severity: Severity::Info,
        enabled: true,
    }
}
