use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{CreateWebhookRequest, SecretResponse};
use crate::models::{Webhook, WebhookDelivery, WebhookPatch};
use crate::services::webhooks::generate_secret;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_webhooks(State(state): State<AppState>) -> Json<Vec<Webhook>> {
    Json(state.portal.webhooks.list().await)
}

pub async fn create_webhook(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateWebhookRequest>,
) -> Result<(StatusCode, Json<Webhook>), AppError> {
    let webhook = state.portal.webhooks.add(req.into()).await?;
    Ok((StatusCode::CREATED, Json(webhook)))
}

pub async fn update_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WebhookPatch>,
) -> Result<Json<Webhook>, AppError> {
    if patch.url.as_deref().is_some_and(|url| url.trim().is_empty()) {
        return Err(AppError::BadRequest(anyhow::anyhow!("Webhook URL is required")));
    }
    Ok(Json(state.portal.webhooks.update(&id, patch).await?))
}

pub async fn delete_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.portal.webhooks.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Webhook>, AppError> {
    Ok(Json(state.portal.webhooks.toggle_active(&id).await?))
}

pub async fn new_secret() -> Json<SecretResponse> {
    Json(SecretResponse {
        secret: generate_secret(),
    })
}

pub async fn list_deliveries(State(state): State<AppState>) -> Json<Vec<WebhookDelivery>> {
    Json(state.portal.webhooks.deliveries())
}
