//! Serialization round-trip tests
//!
//! A stored rule must survive serialize/deserialize with an
//! evaluator-equivalent condition tree: the same truth table over a fixed
//! battery of contexts.

mod common;

use common::{admin, test_engine};
use inkgate_core::{
    Condition, Decision, DecisionContext, NaryOp, PolicyRule, RuleAction, Scope,
};
use inkgate_engine::evaluate;
use inkgate_store::RuleDraft;

fn battery() -> Vec<DecisionContext> {
    [
        serde_json::json!({}),
        serde_json::json!({ "declared": { "wantsColor": true } }),
        serde_json::json!({ "declared": { "wantsColor": false, "firstTattoo": true } }),
        serde_json::json!({ "declared": { "sizeCm": 5, "placement": "forearm" } }),
        serde_json::json!({ "declared": { "sizeCm": 25, "placement": "neck" } }),
        serde_json::json!({ "declared": { "sizeCm": 25, "placement": "hand" },
                             "inferred": { "riskScore": 90 } }),
        serde_json::json!({ "inferred": { "riskScore": 10,
                                           "styleTags": ["fine-line"] } }),
        serde_json::json!({ "declared": { "wantsColor": "yes" } }),
    ]
    .into_iter()
    .map(|raw| serde_json::from_value(raw).unwrap())
    .collect()
}

fn assert_evaluator_equivalent(original: &Condition, reconstructed: &Condition) {
    for (index, ctx) in battery().iter().enumerate() {
        assert_eq!(
            evaluate(original, ctx).ok(),
            evaluate(reconstructed, ctx).ok(),
            "truth tables diverge on battery context {}",
            index
        );
    }
}

fn intricate_condition() -> Condition {
    // wantsColor == true  or  (sizeCm > 20 and placement in [neck, hand] and not riskScore < 50)
    Condition::any(vec![
        Condition::compare(
            Condition::path("declared.wantsColor"),
            NaryOp::Eq,
            Condition::literal(true),
        ),
        Condition::all(vec![
            Condition::compare(
                Condition::path("declared.sizeCm"),
                NaryOp::Gt,
                Condition::literal(20.0),
            ),
            Condition::compare(
                Condition::path("declared.placement"),
                NaryOp::In,
                Condition::literal(vec!["neck", "hand"]),
            ),
            Condition::not(Condition::compare(
                Condition::path("inferred.riskScore"),
                NaryOp::Lt,
                Condition::literal(50.0),
            )),
        ]),
    ])
}

#[test]
fn test_condition_json_round_trip_is_evaluator_equivalent() {
    let original = intricate_condition();
    let json = serde_json::to_string(&original).unwrap();
    let reconstructed: Condition = serde_json::from_str(&json).unwrap();

    assert_eq!(original, reconstructed);
    assert_evaluator_equivalent(&original, &reconstructed);
}

#[test]
fn test_full_rule_round_trip() {
    let rule = PolicyRule {
        id: 11,
        rule_key: "review_risky_placement".to_string(),
        name: "Review risky placements".to_string(),
        description: "Large pieces on exposed placements need a second look.".to_string(),
        scope: Scope::Workspace("ws_main".to_string()),
        priority: 75,
        enabled: true,
        condition: intricate_condition(),
        action: RuleAction {
            decision: Decision::Review,
            reason_code: "RISKY_PLACEMENT".to_string(),
            next_actions: vec!["REQUEST_REFERENCE_PHOTOS".to_string()],
        },
        warning_key: None,
        explain_public: "We'd like an artist to look at this one first.".to_string(),
        explain_internal: "Size/placement combination above threshold.".to_string(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    let json = serde_json::to_string(&rule).unwrap();
    let reconstructed: PolicyRule = serde_json::from_str(&json).unwrap();

    assert_eq!(rule, reconstructed);
    assert_evaluator_equivalent(&rule.condition, &reconstructed.condition);
}

#[tokio::test]
async fn test_round_trip_through_the_store() {
    let engine = test_engine().await;

    let draft = RuleDraft {
        rule_key: "review_risky_placement".to_string(),
        name: "Review risky placements".to_string(),
        description: String::new(),
        scope: Scope::Global,
        priority: 75,
        enabled: true,
        condition: intricate_condition(),
        action: RuleAction {
            decision: Decision::Review,
            reason_code: "RISKY_PLACEMENT".to_string(),
            next_actions: vec![],
        },
        warning_key: None,
        explain_public: String::new(),
        explain_internal: String::new(),
    };

    let created = engine.create_rule(draft, &admin()).await.unwrap();
    let loaded = engine.get_rule(created.id).await.unwrap();

    assert_eq!(created.condition, loaded.condition);
    assert_evaluator_equivalent(&intricate_condition(), &loaded.condition);
}
