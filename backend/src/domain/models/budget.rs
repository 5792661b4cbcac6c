use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::categories;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainBudget {
    pub id: String,
    pub category: String,
    /// Monthly limit
    pub amount: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BudgetValidationError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Category {0} cannot have a spending budget")]
    NotBudgetable(String),
    #[error("Category {0} appears more than once")]
    DuplicateCategory(String),
    #[error("Budget id {0} appears more than once")]
    DuplicateId(String),
    #[error("Budget for {0} must be a positive number")]
    NonPositiveAmount(String),
}

impl DomainBudget {
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if !categories::is_known(&self.category) {
            return Err(BudgetValidationError::UnknownCategory(self.category.clone()));
        }
        if !categories::budgetable().any(|category| category.id == self.category) {
            return Err(BudgetValidationError::NotBudgetable(self.category.clone()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(BudgetValidationError::NonPositiveAmount(self.category.clone()));
        }
        Ok(())
    }

    /// Validate a full replacement set: every entry valid, one per category,
    /// and no two entries sharing a document id
    pub fn validate_set(budgets: &[DomainBudget]) -> Result<(), BudgetValidationError> {
        let mut seen_categories = HashSet::new();
        let mut seen_ids = HashSet::new();
        for budget in budgets {
            budget.validate()?;
            if !seen_categories.insert(budget.category.as_str()) {
                return Err(BudgetValidationError::DuplicateCategory(budget.category.clone()));
            }
            if !seen_ids.insert(budget.id.as_str()) {
                return Err(BudgetValidationError::DuplicateId(budget.id.clone()));
            }
        }
        Ok(())
    }

    pub fn sort_by_catalog(budgets: &mut [DomainBudget]) {
        budgets.sort_by_key(|budget| categories::order(&budget.category));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(category: &str, amount: f64) -> DomainBudget {
        DomainBudget {
            id: format!("b-{}", category),
            category: category.to_string(),
            amount,
        }
    }

    #[test]
    fn test_validate_set() {
        assert!(DomainBudget::validate_set(&[budget("food", 500.0), budget("other", 100.0)]).is_ok());
        assert_eq!(
            DomainBudget::validate_set(&[budget("food", 500.0), budget("food", 100.0)]),
            Err(BudgetValidationError::DuplicateCategory("food".to_string()))
        );
        assert_eq!(
            DomainBudget::validate_set(&[budget("salary", 500.0)]),
            Err(BudgetValidationError::NotBudgetable("salary".to_string()))
        );
        assert_eq!(
            DomainBudget::validate_set(&[budget("food", 0.0)]),
            Err(BudgetValidationError::NonPositiveAmount("food".to_string()))
        );
        assert!(DomainBudget::validate_set(&[budget("crypto", 5.0)]).is_err());
    }

    #[test]
    fn test_validate_set_rejects_shared_id() {
        let mut transport = budget("transport", 2.0);
        transport.id = "b-food".to_string();
        assert_eq!(
            DomainBudget::validate_set(&[budget("food", 1.0), transport]),
            Err(BudgetValidationError::DuplicateId("b-food".to_string()))
        );
    }

    #[test]
    fn test_sort_by_catalog() {
        let mut budgets = vec![budget("other", 1.0), budget("housing", 1.0), budget("food", 1.0)];
        DomainBudget::sort_by_catalog(&mut budgets);
        let order: Vec<&str> = budgets.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(order, vec!["food", "housing", "other"]);
    }
}
