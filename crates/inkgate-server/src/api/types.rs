//! Wire types and shared state for the REST API

use crate::error::ServerError;
use inkgate_core::{DecisionContext, Scope, ScopeSelector, WarningTemplate};
use inkgate_sdk::PolicyEngine;
use inkgate_store::{
    Actor, AuditAction, AuditFilter, PolicySettingsDraft, RuleDraft, RulePatch,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PolicyEngine>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Decision request payload
#[derive(Debug, Deserialize)]
pub struct DecidePayload {
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub artist_id: Option<String>,
    pub context: DecisionContext,
    #[serde(default)]
    pub actor: Option<Actor>,
}

impl DecidePayload {
    pub fn selector(&self) -> ScopeSelector {
        ScopeSelector {
            workspace_id: self.workspace_id.clone(),
            artist_id: self.artist_id.clone(),
        }
    }
}

/// Rule creation payload
#[derive(Debug, Deserialize)]
pub struct CreateRulePayload {
    pub actor: Actor,
    pub rule: RuleDraft,
}

/// Rule update payload
#[derive(Debug, Deserialize)]
pub struct UpdateRulePayload {
    pub actor: Actor,
    pub patch: RulePatch,
}

/// Rule enable/disable payload
#[derive(Debug, Deserialize)]
pub struct SetEnabledPayload {
    pub actor: Actor,
    pub enabled: bool,
}

/// Rule deletion payload
#[derive(Debug, Deserialize)]
pub struct DeleteRulePayload {
    pub actor: Actor,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Policy version creation payload
#[derive(Debug, Deserialize)]
pub struct CreateVersionPayload {
    pub actor: Actor,
    pub scope: Scope,
    #[serde(flatten)]
    pub draft: PolicySettingsDraft,
    /// Optimistic check against the scope's current head version
    #[serde(default)]
    pub expected_head: Option<u32>,
}

/// Warning template upsert payload
#[derive(Debug, Deserialize)]
pub struct PutWarningPayload {
    pub actor: Actor,
    pub template: WarningTemplate,
}

/// Scope addressed by query parameters
/// (e.g. `?level=workspace&id=ws_main`)
#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    pub level: String,
    #[serde(default)]
    pub id: Option<String>,
}

impl ScopeQuery {
    pub fn to_scope(&self) -> Result<Scope, ServerError> {
        match self.level.as_str() {
            "global" => Ok(Scope::Global),
            "workspace" => self
                .id
                .clone()
                .map(Scope::Workspace)
                .ok_or_else(|| ServerError::InvalidRequest("workspace scope needs an id".into())),
            "artist" => self
                .id
                .clone()
                .map(Scope::Artist)
                .ok_or_else(|| ServerError::InvalidRequest("artist scope needs an id".into())),
            other => Err(ServerError::InvalidRequest(format!(
                "unknown scope level '{}'",
                other
            ))),
        }
    }
}

/// Selector addressed by query parameters
#[derive(Debug, Deserialize)]
pub struct SelectorQuery {
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub artist_id: Option<String>,
}

impl SelectorQuery {
    pub fn selector(&self) -> ScopeSelector {
        ScopeSelector {
            workspace_id: self.workspace_id.clone(),
            artist_id: self.artist_id.clone(),
        }
    }
}

/// Audit query parameters
#[derive(Debug, Deserialize)]
pub struct AuditQueryParams {
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl AuditQueryParams {
    pub fn to_filter(&self) -> Result<AuditFilter, ServerError> {
        let action = match &self.action {
            Some(raw) => Some(AuditAction::parse(raw).ok_or_else(|| {
                ServerError::InvalidRequest(format!("unknown audit action '{}'", raw))
            })?),
            None => None,
        };

        Ok(AuditFilter {
            entity_type: self.entity_type.clone(),
            action,
            search: self.q.clone(),
            limit: self.limit.unwrap_or(50),
            offset: self.offset.unwrap_or(0),
        })
    }
}
