//! # BudgetWise Backend
//!
//! Contains all non-UI logic for the budgeting application.
//!
//! This crate is the orchestration layer that brings together:
//! - **Domain**: Business rules for transactions, budgets, savings goals and suggestions
//! - **Storage**: The per-user document store and its non-blocking write path
//! - **Clients**: Hosted identity, language model and reCAPTCHA providers
//! - **IO**: The REST interface consumed by the browser UI
//!
//! ## Architecture
//!
//! ```text
//! Browser UI
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (business logic, services)
//!     ↓
//! Storage Layer (document store) + Clients (hosted providers)
//! ```

pub mod clients;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
pub mod test_support;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::clients::{
    ChallengeVerifier, FirebaseIdentityClient, GeminiClient, IdentityProvider, LanguageModel, RecaptchaVerifier,
};
use crate::config::{AppConfig, ServerConfig};
use crate::domain::{
    AuthService, BudgetService, DashboardService, SavingsService, SessionStore, SuggestionService, TransactionService,
};
use crate::storage::{spawn_global_listener, DbConnection, DocumentStore, ErrorEmitter, SqliteDocumentStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: TransactionService,
    pub budget_service: BudgetService,
    pub savings_service: SavingsService,
    pub dashboard_service: DashboardService,
    pub auth_service: AuthService,
    pub suggestion_service: SuggestionService,
    pub verifier: Arc<dyn ChallengeVerifier>,
    pub emitter: ErrorEmitter,
}

impl AppState {
    /// Wire every service over one store and one error channel
    pub fn new(
        store: Arc<dyn DocumentStore>,
        emitter: ErrorEmitter,
        identity: Arc<dyn IdentityProvider>,
        verifier: Arc<dyn ChallengeVerifier>,
        model: Arc<dyn LanguageModel>,
        sessions: SessionStore,
    ) -> Self {
        let transaction_service = TransactionService::new(store.clone(), emitter.clone());
        let budget_service = BudgetService::new(store.clone());
        let savings_service = SavingsService::new(store.clone(), emitter.clone());
        let dashboard_service = DashboardService::new(
            transaction_service.clone(),
            budget_service.clone(),
            savings_service.clone(),
        );
        let auth_service = AuthService::new(identity, verifier.clone(), store, emitter.clone(), sessions);
        let suggestion_service = SuggestionService::new(model);

        Self {
            transaction_service,
            budget_service,
            savings_service,
            dashboard_service,
            auth_service,
            suggestion_service,
            verifier,
            emitter,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::new(&config.database.url).await?;
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(db_conn));

    info!("Setting up store error channel");
    let emitter = ErrorEmitter::new();
    spawn_global_listener(&emitter);

    info!("Setting up provider clients");
    let http = clients::http_client(Duration::from_secs(config.llm.timeout_secs))
        .context("Failed to build HTTP client")?;
    if config.identity.api_key.is_empty() {
        warn!("No identity provider api key configured; sign-up and sign-in will fail");
    }
    if config.llm.api_key.is_empty() {
        warn!("No language model api key configured; suggestions will fail");
    }
    let identity = Arc::new(FirebaseIdentityClient::new(
        http.clone(),
        &config.identity.base_url,
        &config.identity.api_key,
    ));
    let model = Arc::new(GeminiClient::new(
        http.clone(),
        &config.llm.base_url,
        &config.llm.model,
        &config.llm.api_key,
    ));
    let verifier = Arc::new(RecaptchaVerifier::new(http, config.recaptcha.clone()));

    info!("Setting up application state");
    let sessions = SessionStore::with_ttl(Duration::from_secs(config.server.session_ttl_secs));
    Ok(AppState::new(store, emitter, identity, verifier, model, sessions))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, server: &ServerConfig) -> Result<Router> {
    let origin = server
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", server.cors_origin))?;

    // CORS setup to allow the browser UI to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let mut router = Router::new().nest("/api", io::rest::api_router());
    if let Some(static_dir) = &server.static_dir {
        info!("Serving UI from {}", static_dir.display());
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    Ok(router.layer(cors).with_state(app_state))
}
