//! Users, managers and merchants.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{CreateMerchantRequest, CreateUserRequest, SearchQuery};
use crate::models::{KycData, Merchant, MerchantPatch, User, UserPatch};
use crate::services::users::{new_manager, new_merchant, new_user};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<User>> {
    Json(state.portal.users.list(query.search.as_deref()).await)
}

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state
        .portal
        .users
        .add(new_user(req.name, req.email, req.role))
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.portal.users.update(&id, patch).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.portal.users.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_managers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<User>> {
    Json(state.portal.managers.list(query.search.as_deref()).await)
}

pub async fn create_manager(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let manager = state
        .portal
        .managers
        .add(new_manager(req.name, req.email, req.role))
        .await?;
    Ok((StatusCode::CREATED, Json(manager)))
}

pub async fn update_manager(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.portal.managers.update(&id, patch).await?))
}

pub async fn delete_manager(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.portal.managers.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_merchants(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Merchant>> {
    Json(state.portal.merchants.list(query.search.as_deref()).await)
}

pub async fn create_merchant(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateMerchantRequest>,
) -> Result<(StatusCode, Json<Merchant>), AppError> {
    let merchant = state
        .portal
        .merchants
        .add(new_merchant(
            req.name,
            req.email,
            req.company_name,
            req.website,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(merchant)))
}

pub async fn update_merchant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MerchantPatch>,
) -> Result<Json<Merchant>, AppError> {
    Ok(Json(state.portal.merchants.update(&id, patch).await?))
}

pub async fn delete_merchant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.portal.merchants.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_kyc(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(kyc): Json<KycData>,
) -> Result<Json<Merchant>, AppError> {
    if kyc.pan_number.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("PAN number is required")));
    }
    Ok(Json(state.portal.merchants.submit_kyc(&id, kyc).await?))
}
