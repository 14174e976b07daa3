use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{PaymentRequest, TransactionQuery};
use crate::models::{Transaction, TransactionPatch};
use crate::services::transactions::PaymentOutcome;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Json<Vec<Transaction>> {
    Json(state.portal.transactions.list(&query.into()).await)
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    Ok(Json(state.portal.transactions.get(&id).await?))
}

/// Record a pending transaction without running the simulated processor.
pub async fn create_transaction(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = state.portal.transactions.add(req.into()).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<Transaction>, AppError> {
    Ok(Json(state.portal.transactions.update(&id, patch).await?))
}

pub async fn list_transaction_gateways(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.portal.transactions.gateways().await)
}

/// Run a payment through the simulated processor and wait for it to settle.
pub async fn process_payment(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> Result<Json<PaymentOutcome>, AppError> {
    Ok(Json(state.portal.transactions.process_payment(req.into()).await?))
}
