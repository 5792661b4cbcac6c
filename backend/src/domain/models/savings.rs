use serde::{Deserialize, Serialize};
use shared::SavingsSource;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainSavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    /// Sum of the goal's contributions
    pub current_amount: f64,
    pub source: SavingsSource,
    #[serde(default)]
    pub user_id: String,
}

/// Ledger entry for one contribution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainSavingsTransaction {
    pub id: String,
    pub goal_id: String,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub user_id: String,
}

impl DomainSavingsTransaction {
    pub fn sort_newest_first(entries: &mut [DomainSavingsTransaction]) {
        entries.sort_by(|a, b| {
            let parse = |date: &str| chrono::DateTime::parse_from_rfc3339(date).ok();
            parse(&b.date).cmp(&parse(&a.date))
        });
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SavingsValidationError {
    #[error("Goal name cannot be empty")]
    EmptyName,
    #[error("Goal name cannot exceed 256 characters")]
    NameTooLong,
    #[error("Target amount must be a positive number")]
    NonPositiveTarget,
    #[error("Contribution must be a positive number")]
    NonPositiveContribution,
    #[error("Goal total is too large to store")]
    TotalOutOfRange,
}

pub fn validate_goal_name(name: &str) -> Result<String, SavingsValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SavingsValidationError::EmptyName);
    }
    if trimmed.chars().count() > super::transaction::MAX_NAME_LENGTH {
        return Err(SavingsValidationError::NameTooLong);
    }
    Ok(trimmed.to_string())
}

pub fn validate_target(amount: f64) -> Result<f64, SavingsValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(SavingsValidationError::NonPositiveTarget)
    }
}

pub fn validate_contribution(amount: f64) -> Result<f64, SavingsValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(SavingsValidationError::NonPositiveContribution)
    }
}

/// Goal total after adding `amount`; must stay a finite number
pub fn validate_new_total(current: f64, amount: f64) -> Result<f64, SavingsValidationError> {
    let total = current + amount;
    if total.is_finite() {
        Ok(total)
    } else {
        Err(SavingsValidationError::TotalOutOfRange)
    }
}
