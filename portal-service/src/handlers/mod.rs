//! HTTP handlers for portal-service.

pub mod accounts;
pub mod commission;
pub mod dashboard;
pub mod gateways;
pub mod payouts;
pub mod referrals;
pub mod transactions;
pub mod webhooks;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

use crate::services::{get_metrics, Notice};
use crate::startup::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": state.config.service_name,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Ready once the backing store answers.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.portal.store.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Store health check failed");
        AppError::ServiceUnavailable
    })?;
    Ok((StatusCode::OK, Json(json!({ "status": "ready" }))))
}

pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

/// Most recent operator notices, newest first.
pub async fn list_notices(State(state): State<AppState>) -> Json<Vec<Notice>> {
    Json(state.portal.notices.recent())
}
