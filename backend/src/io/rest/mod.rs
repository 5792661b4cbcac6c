//! # REST API Interface Layer
//!
//! Provides the HTTP REST endpoints of the budgeting application.
//! This layer handles:
//! - JSON request/response serialization
//! - Session extraction from the bearer token
//! - Error translation from domain errors to HTTP status codes
//! - Request logging
//!
//! ## Endpoint Groups
//!
//! - **auth**: sign-up, sign-in, sign-out, current user
//! - **categories**: static catalog
//! - **dashboard**: totals, spending chart, budget progress
//! - **transactions** and **income**: income and expense records
//! - **budgets**: list, replace, reset
//! - **savings**: goals, contributions, history
//! - **suggestions**: AI budget and savings tips
//! - **verify-recaptcha**: challenge token check
//! - **events**: server-sent store failure notices
//!
//! Every group except auth, categories, verification and health requires a
//! session. Handlers never contain business rules; they map DTOs to commands,
//! call one service and map the result back.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};

use crate::AppState;

pub mod auth_apis;
pub mod budget_apis;
pub mod category_apis;
pub mod dashboard_apis;
pub mod errors;
pub mod event_apis;
pub mod mappers;
pub mod savings_apis;
pub mod session;
pub mod suggestion_apis;
pub mod transaction_apis;
pub mod verification_apis;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_apis::router())
        .nest("/categories", category_apis::router())
        .nest("/dashboard", dashboard_apis::router())
        .nest("/transactions", transaction_apis::router())
        .nest("/income", transaction_apis::income_router())
        .nest("/budgets", budget_apis::router())
        .nest("/savings", savings_apis::router())
        .nest("/suggestions", suggestion_apis::router())
        .nest("/verify-recaptcha", verification_apis::router())
        .nest("/events", event_apis::router())
}
