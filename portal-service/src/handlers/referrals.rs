use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{CreateReferralRequest, SearchQuery};
use crate::models::{Referral, ReferralPatch};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_referrals(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Referral>> {
    Json(state.portal.referrals.list(query.search.as_deref()).await)
}

pub async fn create_referral(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateReferralRequest>,
) -> Result<(StatusCode, Json<Referral>), AppError> {
    let referral = state
        .portal
        .referrals
        .add(req.referrer_id, req.referred_email)
        .await?;
    Ok((StatusCode::CREATED, Json(referral)))
}

pub async fn update_referral(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ReferralPatch>,
) -> Result<Json<Referral>, AppError> {
    Ok(Json(state.portal.referrals.update(&id, patch).await?))
}
