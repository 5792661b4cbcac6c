//! # REST API for the Dashboard
//!
//! Totals, per-category spending, budget progress and recent transactions
//! for the signed-in user, recomputed on every request.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{error, info};

use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::dashboard_mapper::DashboardMapper;
use crate::io::rest::session::CurrentUser;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

pub async fn get_dashboard(State(state): State<AppState>, current: CurrentUser) -> impl IntoResponse {
    info!("GET /api/dashboard - user: {}", current.uid());

    match state.dashboard_service.dashboard(current.uid()).await {
        Ok(dashboard) => (StatusCode::OK, Json(DashboardMapper::to_dto(dashboard))).into_response(),
        Err(e) => {
            error!("Failed to build dashboard: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
