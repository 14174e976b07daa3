use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use crate::dtos::GatewayView;
use crate::models::GatewayPatch;
use crate::services::gateways::ConnectionTest;
use crate::startup::AppState;

pub async fn list_gateways(State(state): State<AppState>) -> Json<Vec<GatewayView>> {
    let gateways = state.portal.gateways.list().await;
    Json(gateways.into_iter().map(GatewayView::from).collect())
}

pub async fn get_gateway(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GatewayView>, AppError> {
    let gateway = state.portal.gateways.get(&id).await?;
    Ok(Json(gateway.into()))
}

pub async fn update_gateway(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<GatewayPatch>,
) -> Result<Json<GatewayView>, AppError> {
    let gateway = state.portal.gateways.update(&id, patch).await?;
    Ok(Json(gateway.into()))
}

pub async fn toggle_gateway(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GatewayView>, AppError> {
    let gateway = state.portal.gateways.toggle_active(&id).await?;
    Ok(Json(gateway.into()))
}

pub async fn test_gateway(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConnectionTest>, AppError> {
    Ok(Json(state.portal.gateways.test_connection(&id).await?))
}
