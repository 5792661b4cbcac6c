use crate::clients::{AuthError, LanguageModelError};
use crate::domain::models::budget::BudgetValidationError;
use crate::domain::models::savings::SavingsValidationError;
use crate::domain::models::transaction::TransactionValidationError;
use crate::storage::StoreError;

/// Failures of the AI suggestion flows
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("invalid suggestion input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Provider(#[from] LanguageModelError),
    #[error("model answer is not valid JSON: {0}")]
    InvalidResponse(String),
    #[error("model answer does not match the expected schema: {}", .0.join("; "))]
    SchemaMismatch(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    InvalidTransaction(#[from] TransactionValidationError),
    #[error(transparent)]
    InvalidBudget(#[from] BudgetValidationError),
    #[error(transparent)]
    InvalidSavings(#[from] SavingsValidationError),
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("reCAPTCHA verification failed")]
    VerificationFailed,
    #[error("Not signed in")]
    Unauthenticated,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Suggestion(#[from] SuggestionError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidTransaction(_) | DomainError::InvalidBudget(_) | DomainError::InvalidSavings(_)
        )
    }
}
