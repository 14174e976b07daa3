use axum::{extract::State, Json};

use crate::services::dashboard::DashboardStats;
use crate::startup::AppState;

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.portal.dashboard.stats().await)
}
