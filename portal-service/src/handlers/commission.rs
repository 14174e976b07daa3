use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

use crate::dtos::QuoteQuery;
use crate::models::CommissionSettings;
use crate::services::commission::CommissionQuote;
use crate::startup::AppState;

pub async fn get_commission(State(state): State<AppState>) -> Json<CommissionSettings> {
    Json(state.portal.commission.get().await)
}

pub async fn update_commission(
    State(state): State<AppState>,
    Json(settings): Json<CommissionSettings>,
) -> Result<Json<CommissionSettings>, AppError> {
    Ok(Json(state.portal.commission.update(settings).await?))
}

pub async fn quote_commission(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Json<CommissionQuote> {
    Json(state.portal.commission.quote(&query.gateway, query.amount).await)
}
