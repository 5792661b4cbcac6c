//! # REST API for reCAPTCHA Verification

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::{info, warn};

use crate::AppState;
use shared::{VerifyRecaptchaRequest, VerifyRecaptchaResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(verify_recaptcha))
}

/// Check a challenge token; any failure reads as `valid: false`
pub async fn verify_recaptcha(
    State(state): State<AppState>,
    Json(request): Json<VerifyRecaptchaRequest>,
) -> impl IntoResponse {
    info!("POST /api/verify-recaptcha");

    let valid = state.verifier.verify(&request.token).await;
    if !valid {
        warn!("reCAPTCHA token rejected");
    }
    (StatusCode::OK, Json(VerifyRecaptchaResponse { valid }))
}
