//! The policy engine - decision flow plus management operations

use crate::error::Result;
use crate::request::DecisionRequest;
use inkgate_core::{
    DecisionResult, PolicyRule, PolicySettings, Scope, ScopeSelector, SettingsPayload,
    WarningTemplate,
};
use inkgate_engine::{build_explanation, resolver};
use inkgate_store::audit::entity;
use inkgate_store::{
    Actor, AuditAction, AuditFilter, AuditPage, NewAuditEntry, PolicySettingsDraft, PolicyStore,
    RuleDraft, RulePatch,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Where effective settings came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSource {
    pub scope: Scope,
    pub version: u32,
}

/// Settings resolved for a request, after scope fallback
///
/// `source` is `None` when no scope in the chain has an active version
/// and the engine defaults apply.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveSettings {
    pub settings: SettingsPayload,
    pub summary_text: String,
    pub full_text: String,
    pub source: Option<SettingsSource>,
}

/// High-level API over the store and the pure evaluation engine
///
/// Decision resolution is a stateless read-only computation; one engine
/// value is shared across request tasks via `Arc` with no further
/// locking.
pub struct PolicyEngine {
    store: Arc<dyn PolicyStore>,
}

impl PolicyEngine {
    /// Create an engine over a store
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    // ========== Decision flow ==========

    /// Resolve a decision for a submitted booking/intake context
    ///
    /// Never raises for rule-level problems: malformed conditions and
    /// dangling warning keys are recorded as `flagged` audit entries and
    /// the flow continues to a decision. The outcome itself is persisted
    /// to the audit log before it is returned.
    pub async fn decide(&self, request: DecisionRequest) -> Result<DecisionResult> {
        let request_id = Uuid::new_v4();
        let actor = request.actor.clone().unwrap_or_else(Actor::intake);

        let rules = self.store.rules_for(&request.scope).await?;
        let resolution = resolver::resolve(&request.scope, &rules, &request.context);
        let mut result = resolution.result;

        for warning in &resolution.config_warnings {
            self.store
                .record(
                    NewAuditEntry::new(
                        entity::RULE,
                        warning.rule_id.to_string(),
                        AuditAction::Flagged,
                        &actor,
                    )
                    .with_reason(format!(
                        "rule '{}': {}",
                        warning.rule_key, warning.detail
                    )),
                )
                .await?;
        }

        if let Some(rule_id) = result.matched_rule_id {
            if let Some(winner) = rules.iter().find(|rule| rule.id == rule_id) {
                let template = match &winner.warning_key {
                    Some(key) => self.store.get_warning(key).await?,
                    None => None,
                };
                let explanation = build_explanation(winner, template.as_ref());

                if let Some(key) = &explanation.dangling_warning_key {
                    self.store
                        .record(
                            NewAuditEntry::new(
                                entity::RULE,
                                winner.id.to_string(),
                                AuditAction::Flagged,
                                &actor,
                            )
                            .with_reason(format!(
                                "rule '{}': unresolved warning_key '{}'",
                                winner.rule_key, key
                            )),
                        )
                        .await?;
                }

                result.explain_public = explanation.explain_public;
                result.explain_internal = explanation.explain_internal;
                result.warnings = explanation.warnings;
            }
        }

        self.store
            .record(
                NewAuditEntry::new(
                    entity::DECISION,
                    request_id.to_string(),
                    AuditAction::Created,
                    &actor,
                )
                .with_metadata(serde_json::json!({
                    "decision": result.decision,
                    "reason_code": result.reason_code,
                    "matched_rule_id": result.matched_rule_id,
                    "workspace_id": request.scope.workspace_id,
                    "artist_id": request.scope.artist_id,
                })),
            )
            .await?;

        tracing::info!(
            request_id = %request_id,
            decision = %result.decision,
            reason_code = result.reason_code.as_str(),
            matched_rule_id = ?result.matched_rule_id,
            "decision resolved"
        );
        Ok(result)
    }

    // ========== Rule management ==========

    pub async fn create_rule(&self, draft: RuleDraft, actor: &Actor) -> Result<PolicyRule> {
        Ok(self.store.create_rule(draft, actor).await?)
    }

    pub async fn update_rule(
        &self,
        id: u64,
        patch: RulePatch,
        actor: &Actor,
    ) -> Result<PolicyRule> {
        Ok(self.store.update_rule(id, patch, actor).await?)
    }

    pub async fn set_rule_enabled(
        &self,
        id: u64,
        enabled: bool,
        actor: &Actor,
    ) -> Result<PolicyRule> {
        Ok(self.store.set_rule_enabled(id, enabled, actor).await?)
    }

    pub async fn delete_rule(
        &self,
        id: u64,
        actor: &Actor,
        reason: Option<String>,
    ) -> Result<()> {
        Ok(self.store.delete_rule(id, actor, reason).await?)
    }

    pub async fn get_rule(&self, id: u64) -> Result<PolicyRule> {
        Ok(self.store.get_rule(id).await?)
    }

    pub async fn list_rules(&self) -> Result<Vec<PolicyRule>> {
        Ok(self.store.list_rules().await?)
    }

    // ========== Policy settings management ==========

    pub async fn create_version(
        &self,
        scope: Scope,
        draft: PolicySettingsDraft,
        actor: &Actor,
        expected_head: Option<u32>,
    ) -> Result<PolicySettings> {
        Ok(self
            .store
            .create_version(scope, draft, actor, expected_head)
            .await?)
    }

    pub async fn get_active_version(&self, scope: &Scope) -> Result<Option<PolicySettings>> {
        Ok(self.store.get_active_version(scope).await?)
    }

    pub async fn list_versions(&self, scope: &Scope) -> Result<Vec<PolicySettings>> {
        Ok(self.store.list_versions(scope).await?)
    }

    /// Settings governing a request, falling back artist → workspace →
    /// global → engine defaults
    pub async fn effective_settings(&self, selector: &ScopeSelector) -> Result<EffectiveSettings> {
        for scope in selector.fallback_chain() {
            if let Some(active) = self.store.get_active_version(&scope).await? {
                return Ok(EffectiveSettings {
                    settings: active.settings,
                    summary_text: active.summary_text,
                    full_text: active.full_text,
                    source: Some(SettingsSource {
                        scope: active.scope,
                        version: active.version,
                    }),
                });
            }
        }

        Ok(EffectiveSettings {
            settings: SettingsPayload::default(),
            summary_text: String::new(),
            full_text: String::new(),
            source: None,
        })
    }

    // ========== Warning catalog ==========

    pub async fn get_warning(&self, key: &str) -> Result<Option<WarningTemplate>> {
        Ok(self.store.get_warning(key).await?)
    }

    pub async fn put_warning(
        &self,
        template: WarningTemplate,
        actor: &Actor,
    ) -> Result<WarningTemplate> {
        Ok(self.store.put_warning(template, actor).await?)
    }

    pub async fn list_warnings(&self) -> Result<Vec<WarningTemplate>> {
        Ok(self.store.list_warnings().await?)
    }

    // ========== Audit ==========

    pub async fn query_audit(&self, filter: AuditFilter) -> Result<AuditPage> {
        Ok(self.store.query(filter).await?)
    }
}
