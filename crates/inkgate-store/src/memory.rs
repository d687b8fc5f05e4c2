//! In-memory policy store
//!
//! Keeps all records behind a single `tokio::sync::RwLock`, which makes
//! every mutation and its audit entry one critical section: they commit
//! together or not at all, and concurrent version saves for the same
//! scope serialize. Suitable for tests, development and single-node
//! deployments; data is lost when the process restarts.

use async_trait::async_trait;
use chrono::Utc;
use inkgate_core::{PolicyRule, PolicySettings, Scope, ScopeSelector, WarningTemplate};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::audit::{
    self, Actor, AuditAction, AuditEntry, AuditFilter, AuditPage, ChangeSet, NewAuditEntry,
};
use crate::error::{StoreError, StoreResult};
use crate::models::{PolicySettingsDraft, RuleDraft, RulePatch};
use crate::traits::{AuditLog, PolicyVersionStore, RuleStore, WarningCatalog};

#[derive(Default)]
struct Inner {
    rules: BTreeMap<u64, PolicyRule>,
    next_rule_id: u64,
    versions: HashMap<String, Vec<PolicySettings>>,
    next_version_id: u64,
    warnings: HashMap<String, WarningTemplate>,
    audit: Vec<AuditEntry>,
    next_audit_id: u64,
}

impl Inner {
    fn append_audit(&mut self, entry: NewAuditEntry) -> AuditEntry {
        self.next_audit_id += 1;
        let entry = AuditEntry {
            id: self.next_audit_id,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            action: entry.action,
            changed_by: entry.changed_by,
            changed_by_role: entry.changed_by_role,
            changes: entry.changes,
            reason: entry.reason,
            metadata: entry.metadata,
            occurred_at: Utc::now(),
        };
        self.audit.push(entry.clone());
        entry
    }

    fn rule_key_taken(&self, scope: &Scope, rule_key: &str, except_id: Option<u64>) -> bool {
        self.rules.values().any(|rule| {
            Some(rule.id) != except_id && &rule.scope == scope && rule.rule_key == rule_key
        })
    }
}

/// In-memory implementation of the full policy store surface
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn create_rule(&self, draft: RuleDraft, actor: &Actor) -> StoreResult<PolicyRule> {
        draft.validate()?;
        let mut inner = self.inner.write().await;

        if inner.rule_key_taken(&draft.scope, &draft.rule_key, None) {
            return Err(StoreError::DuplicateRuleKey {
                scope: draft.scope.key(),
                rule_key: draft.rule_key,
            });
        }

        inner.next_rule_id += 1;
        let rule = draft.into_rule(inner.next_rule_id, Utc::now());
        inner.rules.insert(rule.id, rule.clone());

        inner.append_audit(
            NewAuditEntry::new(
                audit::entity::RULE,
                rule.id.to_string(),
                AuditAction::Created,
                actor,
            )
            .with_changes(ChangeSet::Snapshot(audit::rule_snapshot(&rule))),
        );

        tracing::info!(rule_id = rule.id, rule_key = rule.rule_key.as_str(), "rule created");
        Ok(rule)
    }

    async fn update_rule(
        &self,
        id: u64,
        patch: RulePatch,
        actor: &Actor,
    ) -> StoreResult<PolicyRule> {
        let mut inner = self.inner.write().await;

        let mut updated = inner
            .rules
            .get(&id)
            .cloned()
            .ok_or(StoreError::RuleNotFound(id))?;
        let old_view = audit::rule_diff_view(&updated);

        patch.apply(&mut updated, Utc::now());
        updated.validate()?;

        let diff = audit::diff_fields(&old_view, &audit::rule_diff_view(&updated));
        inner.rules.insert(id, updated.clone());

        inner.append_audit(
            NewAuditEntry::new(
                audit::entity::RULE,
                id.to_string(),
                AuditAction::Updated,
                actor,
            )
            .with_changes(ChangeSet::Diff(diff)),
        );

        Ok(updated)
    }

    async fn set_rule_enabled(
        &self,
        id: u64,
        enabled: bool,
        actor: &Actor,
    ) -> StoreResult<PolicyRule> {
        let mut inner = self.inner.write().await;

        let mut updated = inner
            .rules
            .get(&id)
            .cloned()
            .ok_or(StoreError::RuleNotFound(id))?;
        let old_view = audit::rule_diff_view(&updated);

        updated.enabled = enabled;
        updated.updated_at = Utc::now();

        let diff = audit::diff_fields(&old_view, &audit::rule_diff_view(&updated));
        inner.rules.insert(id, updated.clone());

        inner.append_audit(
            NewAuditEntry::new(
                audit::entity::RULE,
                id.to_string(),
                AuditAction::Updated,
                actor,
            )
            .with_changes(ChangeSet::Diff(diff)),
        );

        Ok(updated)
    }

    async fn delete_rule(
        &self,
        id: u64,
        actor: &Actor,
        reason: Option<String>,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().await;

        let removed = inner.rules.remove(&id).ok_or(StoreError::RuleNotFound(id))?;

        let mut entry = NewAuditEntry::new(
            audit::entity::RULE,
            id.to_string(),
            AuditAction::Deleted,
            actor,
        )
        .with_changes(ChangeSet::Snapshot(audit::rule_snapshot(&removed)));
        if let Some(reason) = reason {
            entry = entry.with_reason(reason);
        }
        inner.append_audit(entry);

        tracing::info!(rule_id = id, rule_key = removed.rule_key.as_str(), "rule deleted");
        Ok(())
    }

    async fn get_rule(&self, id: u64) -> StoreResult<PolicyRule> {
        let inner = self.inner.read().await;
        inner
            .rules
            .get(&id)
            .cloned()
            .ok_or(StoreError::RuleNotFound(id))
    }

    async fn list_rules(&self) -> StoreResult<Vec<PolicyRule>> {
        let inner = self.inner.read().await;
        Ok(inner.rules.values().cloned().collect())
    }

    async fn rules_for(&self, selector: &ScopeSelector) -> StoreResult<Vec<PolicyRule>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rules
            .values()
            .filter(|rule| rule.enabled && rule.scope.applies_to(selector))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PolicyVersionStore for MemoryStore {
    async fn create_version(
        &self,
        scope: Scope,
        draft: PolicySettingsDraft,
        actor: &Actor,
        expected_head: Option<u32>,
    ) -> StoreResult<PolicySettings> {
        let mut inner = self.inner.write().await;
        let scope_key = scope.key();

        inner.next_version_id += 1;
        let id = inner.next_version_id;

        let versions = inner.versions.entry(scope_key.clone()).or_default();

        let active_count = versions.iter().filter(|v| v.is_active).count();
        if active_count > 1 {
            return Err(StoreError::Integrity(format!(
                "{} active versions for scope {}",
                active_count, scope_key
            )));
        }

        let head = versions.iter().map(|v| v.version).max();
        if let Some(expected) = expected_head {
            if head != Some(expected) {
                return Err(StoreError::VersionConflict {
                    scope: scope_key,
                    expected: Some(expected),
                    found: head,
                });
            }
        }

        for version in versions.iter_mut() {
            version.is_active = false;
        }

        let settings = PolicySettings {
            id,
            scope: scope.clone(),
            version: head.unwrap_or(0) + 1,
            is_active: true,
            settings: draft.settings,
            summary_text: draft.summary_text,
            full_text: draft.full_text,
            created_at: Utc::now(),
        };
        versions.push(settings.clone());

        inner.append_audit(
            NewAuditEntry::new(
                audit::entity::POLICY_VERSION,
                scope_key.clone(),
                AuditAction::Created,
                actor,
            )
            .with_changes(ChangeSet::Snapshot(audit::settings_snapshot(&settings))),
        );

        tracing::info!(
            scope = scope_key.as_str(),
            version = settings.version,
            "policy version created"
        );
        Ok(settings)
    }

    async fn get_active_version(&self, scope: &Scope) -> StoreResult<Option<PolicySettings>> {
        let inner = self.inner.read().await;
        let versions = match inner.versions.get(&scope.key()) {
            Some(versions) => versions,
            None => return Ok(None),
        };

        let active: Vec<&PolicySettings> = versions.iter().filter(|v| v.is_active).collect();
        if active.len() > 1 {
            tracing::error!(
                scope = scope.key().as_str(),
                count = active.len(),
                "multiple active policy versions detected"
            );
            return Err(StoreError::Integrity(format!(
                "{} active versions for scope {}",
                active.len(),
                scope.key()
            )));
        }
        Ok(active.first().map(|v| (*v).clone()))
    }

    async fn list_versions(&self, scope: &Scope) -> StoreResult<Vec<PolicySettings>> {
        let inner = self.inner.read().await;
        let mut versions = inner
            .versions
            .get(&scope.key())
            .cloned()
            .unwrap_or_default();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }
}

#[async_trait]
impl WarningCatalog for MemoryStore {
    async fn get_warning(&self, key: &str) -> StoreResult<Option<WarningTemplate>> {
        let inner = self.inner.read().await;
        Ok(inner.warnings.get(key).cloned())
    }

    async fn put_warning(
        &self,
        template: WarningTemplate,
        actor: &Actor,
    ) -> StoreResult<WarningTemplate> {
        let mut inner = self.inner.write().await;

        let previous = inner
            .warnings
            .insert(template.key.clone(), template.clone());

        let entry = match previous {
            Some(previous) => NewAuditEntry::new(
                audit::entity::WARNING,
                template.key.clone(),
                AuditAction::Updated,
                actor,
            )
            .with_changes(ChangeSet::Diff(audit::diff_fields(
                &audit::warning_diff_view(&previous),
                &audit::warning_diff_view(&template),
            ))),
            None => NewAuditEntry::new(
                audit::entity::WARNING,
                template.key.clone(),
                AuditAction::Created,
                actor,
            )
            .with_changes(ChangeSet::Snapshot(
                [
                    ("title".to_string(), serde_json::json!(template.title)),
                    ("severity".to_string(), serde_json::json!(template.severity)),
                ]
                .into_iter()
                .collect(),
            )),
        };
        inner.append_audit(entry);

        Ok(template)
    }

    async fn list_warnings(&self) -> StoreResult<Vec<WarningTemplate>> {
        let inner = self.inner.read().await;
        let mut warnings: Vec<WarningTemplate> = inner.warnings.values().cloned().collect();
        warnings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(warnings)
    }
}

#[async_trait]
impl AuditLog for MemoryStore {
    async fn record(&self, entry: NewAuditEntry) -> StoreResult<AuditEntry> {
        let mut inner = self.inner.write().await;
        Ok(inner.append_audit(entry))
    }

    async fn query(&self, filter: AuditFilter) -> StoreResult<AuditPage> {
        let inner = self.inner.read().await;

        let mut matching: Vec<&AuditEntry> = inner
            .audit
            .iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        matching.sort_by(|a, b| {
            b.occurred_at
                .cmp(&a.occurred_at)
                .then(b.id.cmp(&a.id))
        });

        let total = matching.len();
        let entries = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .cloned()
            .collect();

        Ok(AuditPage { entries, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entity;
    use inkgate_core::{Condition, Decision, NaryOp, RuleAction};
    use std::sync::Arc;

    fn actor() -> Actor {
        Actor::new("ana", "owner")
    }

    fn draft(rule_key: &str, scope: Scope, priority: i32) -> RuleDraft {
        RuleDraft {
            rule_key: rule_key.to_string(),
            name: rule_key.to_string(),
            description: String::new(),
            scope,
            priority,
            enabled: true,
            condition: Condition::compare(
                Condition::path("declared.wantsColor"),
                NaryOp::Eq,
                Condition::literal(true),
            ),
            action: RuleAction {
                decision: Decision::Block,
                reason_code: "NO_COLOR_WORK".to_string(),
                next_actions: vec![],
            },
            warning_key: None,
            explain_public: String::new(),
            explain_internal: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_rule_assigns_ids_in_creation_order() {
        let store = MemoryStore::new();
        let first = store
            .create_rule(draft("a", Scope::Global, 10), &actor())
            .await
            .unwrap();
        let second = store
            .create_rule(draft("b", Scope::Global, 10), &actor())
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_duplicate_rule_key_per_scope_is_rejected() {
        let store = MemoryStore::new();
        store
            .create_rule(draft("block_color", Scope::Global, 10), &actor())
            .await
            .unwrap();

        let err = store
            .create_rule(draft("block_color", Scope::Global, 20), &actor())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateRuleKey { .. }));

        // Same key in a different scope is fine
        store
            .create_rule(
                draft("block_color", Scope::Workspace("ws_main".to_string()), 10),
                &actor(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_every_mutation_writes_exactly_one_audit_entry() {
        let store = MemoryStore::new();
        let rule = store
            .create_rule(draft("block_color", Scope::Global, 10), &actor())
            .await
            .unwrap();
        store
            .update_rule(
                rule.id,
                RulePatch {
                    priority: Some(50),
                    ..Default::default()
                },
                &actor(),
            )
            .await
            .unwrap();
        store
            .set_rule_enabled(rule.id, false, &actor())
            .await
            .unwrap();
        store
            .delete_rule(rule.id, &actor(), Some("retired".to_string()))
            .await
            .unwrap();

        let page = store.query(AuditFilter::default()).await.unwrap();
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_update_diff_contains_only_changed_keys() {
        let store = MemoryStore::new();
        let rule = store
            .create_rule(draft("block_color", Scope::Global, 10), &actor())
            .await
            .unwrap();

        store
            .update_rule(
                rule.id,
                RulePatch {
                    priority: Some(99),
                    ..Default::default()
                },
                &actor(),
            )
            .await
            .unwrap();

        let page = store
            .query(AuditFilter {
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.entries.len(), 1);

        match &page.entries[0].changes {
            Some(ChangeSet::Diff(diff)) => {
                assert_eq!(diff.len(), 1);
                let change = diff.get("priority").unwrap();
                assert_eq!(change.old, serde_json::json!(10));
                assert_eq!(change.new, serde_json::json!(99));
            }
            other => panic!("Expected diff changes, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rules_for_filters_scope_and_enablement() {
        let store = MemoryStore::new();
        store
            .create_rule(draft("global", Scope::Global, 10), &actor())
            .await
            .unwrap();
        store
            .create_rule(
                draft("ws", Scope::Workspace("ws_main".to_string()), 10),
                &actor(),
            )
            .await
            .unwrap();
        let disabled = store
            .create_rule(
                draft("off", Scope::Workspace("ws_main".to_string()), 10),
                &actor(),
            )
            .await
            .unwrap();
        store
            .set_rule_enabled(disabled.id, false, &actor())
            .await
            .unwrap();
        store
            .create_rule(
                draft("other", Scope::Workspace("ws_other".to_string()), 10),
                &actor(),
            )
            .await
            .unwrap();

        let rules = store
            .rules_for(&ScopeSelector::workspace("ws_main"))
            .await
            .unwrap();
        let keys: Vec<&str> = rules.iter().map(|r| r.rule_key.as_str()).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"global"));
        assert!(keys.contains(&"ws"));
    }

    #[tokio::test]
    async fn test_version_sequence_and_single_active() {
        let store = MemoryStore::new();
        let scope = Scope::Workspace("ws_main".to_string());

        for expected_version in 1..=4u32 {
            let created = store
                .create_version(
                    scope.clone(),
                    PolicySettingsDraft::default(),
                    &actor(),
                    None,
                )
                .await
                .unwrap();
            assert_eq!(created.version, expected_version);
            assert!(created.is_active);
        }

        let versions = store.list_versions(&scope).await.unwrap();
        assert_eq!(versions.len(), 4);
        assert_eq!(
            versions.iter().filter(|v| v.is_active).count(),
            1,
            "exactly one active version"
        );

        let active = store.get_active_version(&scope).await.unwrap().unwrap();
        assert_eq!(active.version, 4);
    }

    #[tokio::test]
    async fn test_expected_head_conflict() {
        let store = MemoryStore::new();
        let scope = Scope::Global;

        store
            .create_version(scope.clone(), PolicySettingsDraft::default(), &actor(), None)
            .await
            .unwrap();

        // Head is now 1; a writer that last saw an empty history loses
        let err = store
            .create_version(
                scope.clone(),
                PolicySettingsDraft::default(),
                &actor(),
                Some(0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));

        // Retrying against the new head succeeds
        let created = store
            .create_version(scope, PolicySettingsDraft::default(), &actor(), Some(1))
            .await
            .unwrap();
        assert_eq!(created.version, 2);
    }

    #[tokio::test]
    async fn test_concurrent_create_version_serializes() {
        let store = Arc::new(MemoryStore::new());
        let scope = Scope::Workspace("ws_main".to_string());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let scope = scope.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_version(scope, PolicySettingsDraft::default(), &Actor::seed(), None)
                    .await
                    .unwrap()
                    .version
            }));
        }

        let mut versions = Vec::new();
        for handle in handles {
            versions.push(handle.await.unwrap());
        }
        versions.sort_unstable();

        // Strictly increasing with no gaps or duplicates
        assert_eq!(versions, (1..=8).collect::<Vec<u32>>());

        let stored = store.list_versions(&scope).await.unwrap();
        assert_eq!(stored.iter().filter(|v| v.is_active).count(), 1);
        assert_eq!(
            store.get_active_version(&scope).await.unwrap().unwrap().version,
            8
        );
    }

    #[tokio::test]
    async fn test_audit_query_pagination_and_filters() {
        let store = MemoryStore::new();
        for index in 0..5 {
            store
                .create_rule(draft(&format!("rule_{}", index), Scope::Global, 10), &actor())
                .await
                .unwrap();
        }
        store
            .create_version(Scope::Global, PolicySettingsDraft::default(), &actor(), None)
            .await
            .unwrap();

        let page = store
            .query(AuditFilter {
                entity_type: Some(entity::RULE.to_string()),
                limit: 2,
                offset: 0,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.entries.len(), 2);

        // Newest first
        assert!(page.entries[0].id > page.entries[1].id);

        let rest = store
            .query(AuditFilter {
                entity_type: Some(entity::RULE.to_string()),
                limit: 10,
                offset: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rest.entries.len(), 3);
    }

    #[tokio::test]
    async fn test_warning_catalog_round_trip() {
        let store = MemoryStore::new();
        let template = WarningTemplate {
            key: "color_fade".to_string(),
            title: "Color fading".to_string(),
            client_message: "Color work fades faster on hands and feet.".to_string(),
            severity: inkgate_core::Severity::Caution,
            enabled: true,
        };

        assert!(store.get_warning("color_fade").await.unwrap().is_none());
        store.put_warning(template.clone(), &actor()).await.unwrap();
        assert_eq!(
            store.get_warning("color_fade").await.unwrap(),
            Some(template)
        );
    }
}
