use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{CreatePayoutRequest, PayoutQuery, PayoutStatusRequest};
use crate::models::{Payout, PayoutPatch};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_payouts(
    State(state): State<AppState>,
    Query(query): Query<PayoutQuery>,
) -> Json<Vec<Payout>> {
    Json(state.portal.payouts.list(&query.into()).await)
}

pub async fn create_payout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePayoutRequest>,
) -> Result<(StatusCode, Json<Payout>), AppError> {
    let payout = state.portal.payouts.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(payout)))
}

pub async fn update_payout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PayoutPatch>,
) -> Result<Json<Payout>, AppError> {
    Ok(Json(state.portal.payouts.update(&id, patch).await?))
}

pub async fn update_payout_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PayoutStatusRequest>,
) -> Result<Json<Payout>, AppError> {
    Ok(Json(
        state.portal.payouts.update_status(&id, req.status).await?,
    ))
}
