//! Integration tests for the audit trail

mod common;

use common::{admin, bool_rule, context, test_engine};
use inkgate_core::{Decision, ScopeSelector};
use inkgate_sdk::DecisionRequest;
use inkgate_store::audit::entity;
use inkgate_store::{AuditAction, AuditFilter, ChangeSet, RulePatch};

#[tokio::test]
async fn test_every_rule_mutation_produces_exactly_one_entry() {
    let engine = test_engine().await;

    let rule = engine
        .create_rule(
            bool_rule("block_color", "declared.wantsColor", 100, Decision::Block, None),
            &admin(),
        )
        .await
        .unwrap();
    engine
        .update_rule(
            rule.id,
            RulePatch {
                priority: Some(120),
                ..Default::default()
            },
            &admin(),
        )
        .await
        .unwrap();
    engine
        .set_rule_enabled(rule.id, false, &admin())
        .await
        .unwrap();
    engine
        .delete_rule(rule.id, &admin(), Some("policy retired".to_string()))
        .await
        .unwrap();

    let page = engine
        .query_audit(AuditFilter {
            entity_type: Some(entity::RULE.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 4);

    let actions: Vec<AuditAction> = page.entries.iter().map(|e| e.action).collect();
    // Newest first
    assert_eq!(
        actions,
        vec![
            AuditAction::Deleted,
            AuditAction::Updated,
            AuditAction::Updated,
            AuditAction::Created,
        ]
    );
}

#[tokio::test]
async fn test_update_diff_records_only_changed_fields() {
    let engine = test_engine().await;
    let rule = engine
        .create_rule(
            bool_rule("block_color", "declared.wantsColor", 100, Decision::Block, None),
            &admin(),
        )
        .await
        .unwrap();

    engine
        .update_rule(
            rule.id,
            RulePatch {
                priority: Some(150),
                explain_public: Some("Color work is not offered here.".to_string()),
                ..Default::default()
            },
            &admin(),
        )
        .await
        .unwrap();

    let page = engine
        .query_audit(AuditFilter {
            action: Some(AuditAction::Updated),
            ..Default::default()
        })
        .await
        .unwrap();

    match &page.entries[0].changes {
        Some(ChangeSet::Diff(diff)) => {
            let mut keys: Vec<&str> = diff.keys().map(String::as_str).collect();
            keys.sort_unstable();
            assert_eq!(keys, vec!["explain_public", "priority"]);
        }
        other => panic!("Expected diff, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_entry_snapshots_key_fields() {
    let engine = test_engine().await;
    engine
        .create_rule(
            bool_rule("block_color", "declared.wantsColor", 100, Decision::Block, None),
            &admin(),
        )
        .await
        .unwrap();

    let page = engine
        .query_audit(AuditFilter {
            action: Some(AuditAction::Created),
            ..Default::default()
        })
        .await
        .unwrap();

    match &page.entries[0].changes {
        Some(ChangeSet::Snapshot(snapshot)) => {
            assert_eq!(snapshot.get("rule_key"), Some(&serde_json::json!("block_color")));
            assert_eq!(snapshot.get("decision"), Some(&serde_json::json!("BLOCK")));
            // Bounded: the full condition tree is not snapshotted
            assert!(!snapshot.contains_key("condition"));
        }
        other => panic!("Expected snapshot, got {:?}", other),
    }
}

#[tokio::test]
async fn test_decisions_are_recorded() {
    let engine = test_engine().await;
    engine
        .create_rule(
            bool_rule("block_color", "declared.wantsColor", 100, Decision::Block, None),
            &admin(),
        )
        .await
        .unwrap();

    engine
        .decide(DecisionRequest::new(
            ScopeSelector::workspace("ws_main"),
            context(serde_json::json!({ "declared": { "wantsColor": true } })),
        ))
        .await
        .unwrap();

    let page = engine
        .query_audit(AuditFilter {
            entity_type: Some(entity::DECISION.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let entry = &page.entries[0];
    assert_eq!(entry.action, AuditAction::Created);
    assert_eq!(entry.changed_by, "intake");
    assert_eq!(entry.metadata["decision"], "BLOCK");
    assert_eq!(entry.metadata["workspace_id"], "ws_main");
}

#[tokio::test]
async fn test_free_text_search_matches_reason() {
    let engine = test_engine().await;
    let rule = engine
        .create_rule(
            bool_rule("block_color", "declared.wantsColor", 100, Decision::Block, None),
            &admin(),
        )
        .await
        .unwrap();
    engine
        .delete_rule(rule.id, &admin(), Some("studio now offers color".to_string()))
        .await
        .unwrap();

    let page = engine
        .query_audit(AuditFilter {
            search: Some("offers color".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.entries[0].action, AuditAction::Deleted);

    let none = engine
        .query_audit(AuditFilter {
            search: Some("piercing".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(none.total, 0);
}
