use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use shared::TransactionType;

use crate::domain::categories;

pub const MAX_NAME_LENGTH: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainTransaction {
    pub id: String,
    /// RFC 3339 timestamp
    pub date: String,
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    #[serde(default)]
    pub user_id: String,
}

impl DomainTransaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }

    /// Sort newest first; unparseable dates sink to the end
    pub fn sort_newest_first(transactions: &mut [DomainTransaction]) {
        transactions.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransactionValidationError {
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Name cannot exceed 256 characters")]
    NameTooLong,
    #[error("Amount must be a positive number")]
    NonPositiveAmount,
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid date '{0}', expected an RFC 3339 timestamp")]
    InvalidDate(String),
}

/// Trimmed name, or the reason it is unusable
pub fn validate_name(name: &str) -> Result<String, TransactionValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TransactionValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(TransactionValidationError::NameTooLong);
    }
    Ok(trimmed.to_string())
}

pub fn validate_amount(amount: f64) -> Result<f64, TransactionValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(TransactionValidationError::NonPositiveAmount)
    }
}

pub fn validate_category(category: &str) -> Result<String, TransactionValidationError> {
    if categories::is_known(category) {
        Ok(category.to_string())
    } else {
        Err(TransactionValidationError::UnknownCategory(category.to_string()))
    }
}

pub fn validate_date(date: &str) -> Result<String, TransactionValidationError> {
    DateTime::parse_from_rfc3339(date)
        .map(|_| date.to_string())
        .map_err(|_| TransactionValidationError::InvalidDate(date.to_string()))
}
