//! # Domain Module
//!
//! Contains all business logic for the budgeting application.
//!
//! This module holds the rules for how transactions, budgets and savings
//! goals are validated, stored and summarised. It works against the
//! [`DocumentStore`](crate::storage::DocumentStore) trait and the provider
//! traits in [`clients`](crate::clients), never against HTTP types.
//!
//! ## Module Organization
//!
//! - **categories**: Static category catalog
//! - **aggregation**: Totals, per-category spend and progress figures
//! - **transaction_service**: Income and expense records
//! - **budget_service**: Budget replacement and full reset
//! - **savings_service**: Savings goals, contributions and cascade delete
//! - **dashboard_service**: Dashboard and savings overview assembly
//! - **auth_service**: Sign-up, sign-in, sessions and starter data
//! - **suggestion_service**: AI budget and savings suggestions
//!
//! ## Business Rules
//!
//! - Amounts are always positive; the transaction type gives the direction
//! - One budget per category; salary is income-only and never budgeted
//! - Progress percentages are capped at 100 for display, spend is not
//! - A goal's `currentAmount` equals the sum of its contributions
//! - Every document lives under the signed-in user's `users/{uid}` tree

pub mod aggregation;
pub mod auth_service;
pub mod budget_service;
pub mod categories;
pub mod commands;
pub mod dashboard_service;
pub mod errors;
pub mod models;
pub mod prompts;
pub mod savings_service;
pub mod seed_data;
pub mod session_store;
pub mod suggestion_service;
pub mod transaction_service;

pub use auth_service::{AuthService, AuthSession};
pub use budget_service::BudgetService;
pub use dashboard_service::DashboardService;
pub use errors::{DomainError, DomainResult, SuggestionError};
pub use savings_service::SavingsService;
pub use session_store::SessionStore;
pub use suggestion_service::SuggestionService;
pub use transaction_service::TransactionService;
