//! API endpoint handlers

use super::types::*;
use crate::error::ServerError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use inkgate_core::{DecisionResult, PolicyRule, PolicySettings, WarningTemplate};
use inkgate_sdk::{DecisionRequest, EffectiveSettings};
use inkgate_store::AuditPage;
use tracing::info;

/// Health check endpoint
pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Decision endpoint
#[axum::debug_handler]
pub(super) async fn decide(
    State(state): State<AppState>,
    Json(payload): Json<DecidePayload>,
) -> Result<Json<DecisionResult>, ServerError> {
    let selector = payload.selector();
    info!(
        workspace_id = ?selector.workspace_id,
        artist_id = ?selector.artist_id,
        "received decision request"
    );

    let mut request = DecisionRequest::new(selector, payload.context);
    if let Some(actor) = payload.actor {
        request = request.with_actor(actor);
    }

    let result = state.engine.decide(request).await?;
    Ok(Json(result))
}

// ========== Rule management ==========

pub(super) async fn create_rule(
    State(state): State<AppState>,
    Json(payload): Json<CreateRulePayload>,
) -> Result<(StatusCode, Json<PolicyRule>), ServerError> {
    let rule = state
        .engine
        .create_rule(payload.rule, &payload.actor)
        .await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

pub(super) async fn list_rules(
    State(state): State<AppState>,
) -> Result<Json<Vec<PolicyRule>>, ServerError> {
    Ok(Json(state.engine.list_rules().await?))
}

pub(super) async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PolicyRule>, ServerError> {
    Ok(Json(state.engine.get_rule(id).await?))
}

pub(super) async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateRulePayload>,
) -> Result<Json<PolicyRule>, ServerError> {
    let rule = state
        .engine
        .update_rule(id, payload.patch, &payload.actor)
        .await?;
    Ok(Json(rule))
}

pub(super) async fn set_rule_enabled(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<SetEnabledPayload>,
) -> Result<Json<PolicyRule>, ServerError> {
    let rule = state
        .engine
        .set_rule_enabled(id, payload.enabled, &payload.actor)
        .await?;
    Ok(Json(rule))
}

pub(super) async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<DeleteRulePayload>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_rule(id, &payload.actor, payload.reason)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Policy settings management ==========

pub(super) async fn create_version(
    State(state): State<AppState>,
    Json(payload): Json<CreateVersionPayload>,
) -> Result<(StatusCode, Json<PolicySettings>), ServerError> {
    let version = state
        .engine
        .create_version(
            payload.scope,
            payload.draft,
            &payload.actor,
            payload.expected_head,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(version)))
}

pub(super) async fn get_active_version(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<PolicySettings>, ServerError> {
    let scope = query.to_scope()?;
    state
        .engine
        .get_active_version(&scope)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("no active policy for scope {}", scope)))
}

pub(super) async fn list_versions(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Vec<PolicySettings>>, ServerError> {
    let scope = query.to_scope()?;
    Ok(Json(state.engine.list_versions(&scope).await?))
}

pub(super) async fn effective_settings(
    State(state): State<AppState>,
    Query(query): Query<SelectorQuery>,
) -> Result<Json<EffectiveSettings>, ServerError> {
    Ok(Json(
        state.engine.effective_settings(&query.selector()).await?,
    ))
}

// ========== Audit ==========

pub(super) async fn query_audit(
    State(state): State<AppState>,
    Query(params): Query<AuditQueryParams>,
) -> Result<Json<AuditPage>, ServerError> {
    let filter = params.to_filter()?;
    Ok(Json(state.engine.query_audit(filter).await?))
}

// ========== Warning catalog ==========

pub(super) async fn get_warning(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<WarningTemplate>, ServerError> {
    state
        .engine
        .get_warning(&key)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("warning template '{}' not found", key)))
}

pub(super) async fn put_warning(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<PutWarningPayload>,
) -> Result<Json<WarningTemplate>, ServerError> {
    if payload.template.key != key {
        return Err(ServerError::InvalidRequest(format!(
            "template key '{}' does not match path '{}'",
            payload.template.key, key
        )));
    }
    Ok(Json(
        state
            .engine
            .put_warning(payload.template, &payload.actor)
            .await?,
    ))
}

pub(super) async fn list_warnings(
    State(state): State<AppState>,
) -> Result<Json<Vec<WarningTemplate>>, ServerError> {
    Ok(Json(state.engine.list_warnings().await?))
}
