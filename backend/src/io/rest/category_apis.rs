//! # REST API for Categories
//!
//! Read-only access to the static category catalog.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::categories;
use crate::io::rest::mappers::budget_mapper::BudgetMapper;
use crate::AppState;
use shared::CategoryListResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

pub async fn list_categories() -> impl IntoResponse {
    info!("GET /api/categories");
    let response = CategoryListResponse {
        categories: categories::all().iter().map(BudgetMapper::category_to_dto).collect(),
    };
    (StatusCode::OK, Json(response))
}
