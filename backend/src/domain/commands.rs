//! Domain-level command and result types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs of the `shared`
//! crate onto them.

pub mod transactions {
    use shared::TransactionType;

    /// Input for creating a new transaction.
    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub name: String,
        pub amount: f64,
        pub transaction_type: TransactionType,
        pub category: String,
        /// RFC 3339; defaults to now
        pub date: Option<String>,
    }
}

pub mod budgets {
    use crate::domain::models::budget::DomainBudget;

    /// One row of a full budget replacement; rows without an id get one.
    #[derive(Debug, Clone)]
    pub struct BudgetEntry {
        pub id: Option<String>,
        pub category: String,
        pub amount: f64,
    }

    #[derive(Debug, Clone)]
    pub struct ReplaceBudgetsCommand {
        pub budgets: Vec<BudgetEntry>,
    }

    #[derive(Debug, Clone)]
    pub struct ReplaceBudgetsResult {
        pub budgets: Vec<DomainBudget>,
        pub removed_count: usize,
    }

    #[derive(Debug, Clone)]
    pub struct ResetResult {
        pub deleted_transactions: usize,
        pub deleted_budgets: usize,
    }
}

pub mod savings {
    use crate::domain::models::savings::{DomainSavingsGoal, DomainSavingsTransaction};
    use shared::SavingsSource;

    #[derive(Debug, Clone)]
    pub struct CreateGoalCommand {
        pub name: String,
        pub target_amount: f64,
        pub source: SavingsSource,
    }

    #[derive(Debug, Clone)]
    pub struct AddContributionCommand {
        pub goal_id: String,
        pub amount: f64,
    }

    /// Optimistic records of a contribution batch
    #[derive(Debug, Clone)]
    pub struct ContributionResult {
        pub contribution: DomainSavingsTransaction,
        pub goal: DomainSavingsGoal,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteGoalResult {
        pub goal_id: String,
        pub deleted_contributions: usize,
    }
}

pub mod auth {
    /// Input for account creation.
    #[derive(Debug, Clone)]
    pub struct SignUpCommand {
        pub email: String,
        pub password: String,
        pub display_name: Option<String>,
        pub recaptcha_token: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct SignInCommand {
        pub email: String,
        pub password: String,
        pub recaptcha_token: Option<String>,
    }
}
