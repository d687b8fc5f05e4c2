//! Router creation and configuration

use super::handlers::*;
use super::types::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use inkgate_sdk::PolicyEngine;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the REST API router
pub fn create_router(engine: Arc<PolicyEngine>) -> Router {
    let state = AppState { engine };

    Router::new()
        .route("/health", get(health))
        .route("/v1/decide", post(decide))
        .route("/v1/rules", post(create_rule).get(list_rules))
        .route(
            "/v1/rules/:id",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
        .route("/v1/rules/:id/enabled", post(set_rule_enabled))
        .route(
            "/v1/policy/versions",
            post(create_version).get(list_versions),
        )
        .route("/v1/policy/active", get(get_active_version))
        .route("/v1/policy/effective", get(effective_settings))
        .route("/v1/audit", get(query_audit))
        .route("/v1/warnings", get(list_warnings))
        .route("/v1/warnings/:key", get(get_warning).put(put_warning))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
