use serde::{Deserialize, Serialize};
use std::fmt;

/// A single income or expense entry owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Timestamp with timezone (RFC 3339)
    pub date: String,
    /// Description of the transaction (max 256 characters)
    pub name: String,
    /// Always positive; the direction comes from `transaction_type`
    pub amount: f64,
    pub transaction_type: TransactionType,
    /// Category catalog id, e.g. "food"
    pub category: String,
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub name: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: String,
    /// Optional date override (RFC 3339) - uses current time if not provided
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListRequest {
    /// Maximum number of transactions to return (newest first)
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}

/// Records the monthly salary as an income transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetIncomeRequest {
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteTransactionResponse {
    pub transaction_id: String,
    pub success_message: String,
}

/// Entry of the static category catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// CSS color used by charts and progress bars
    pub color: String,
    /// Icon identifier understood by the UI icon set
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

/// Monthly spending goal for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: f64,
}

/// Budget row submitted from the "manage budget" dialog; rows added in the
/// dialog have no id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub id: Option<String>,
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceBudgetsRequest {
    pub budgets: Vec<BudgetInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetListResponse {
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceBudgetsResponse {
    pub budgets: Vec<Budget>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetBudgetResponse {
    pub deleted_transactions: usize,
    pub deleted_budgets: usize,
    pub success_message: String,
}

/// Total expense amount for one category, with display metadata for charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub name: String,
    pub color: String,
    pub amount: f64,
}

/// Spend against a budget. `spent` is never clamped; `progress_percent` is
/// capped at 100 for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub budget_id: String,
    pub category: String,
    pub name: String,
    pub spent: f64,
    pub budget_amount: f64,
    pub progress_percent: f64,
    pub remaining: f64,
    pub over_budget: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub category_spending: Vec<CategorySpending>,
    pub budget_progress: Vec<BudgetProgress>,
    pub recent_transactions: Vec<Transaction>,
}

/// Where the money for a savings goal is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SavingsSource {
    Bank,
    DigitalWallet,
    Cash,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub source: SavingsSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSavingsGoalRequest {
    pub name: String,
    pub target_amount: f64,
    pub source: SavingsSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoalProgress {
    pub goal: SavingsGoal,
    pub progress_percent: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsOverview {
    pub goals: Vec<SavingsGoalProgress>,
    pub total_saved: f64,
    pub total_target: f64,
}

/// One contribution towards a savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsTransaction {
    pub id: String,
    pub goal_id: String,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddContributionRequest {
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddContributionResponse {
    pub contribution: SavingsTransaction,
    pub goal: SavingsGoal,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsHistoryResponse {
    pub goal_id: String,
    pub contributions: Vec<SavingsTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSavingsGoalResponse {
    pub goal_id: String,
    pub deleted_contributions: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    /// Falls back to the local part of the email when absent
    pub display_name: Option<String>,
    pub recaptcha_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    pub recaptcha_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub uid: String,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Bearer token for subsequent requests
    pub session_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSuggestion {
    pub category: String,
    pub suggestion: String,
    pub potential_savings: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSuggestionsResponse {
    pub suggestions: Vec<BudgetSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSuggestionsResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyRecaptchaRequest {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyRecaptchaResponse {
    pub valid: bool,
}

/// Store operation that was rejected after the caller had already moved on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionErrorNotice {
    pub path: String,
    pub operation: String,
    pub request_resource_data: Option<serde_json::Value>,
    pub message: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub title: String,
    pub description: String,
    /// Extra inline notice, e.g. when suggestions could not be loaded
    pub notice: Option<String>,
}
