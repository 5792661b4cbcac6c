//! Dashboard and savings figures derived from in-memory snapshots.
//!
//! Nothing here touches storage; every summary is recomputed from the lists
//! it is given.

use std::collections::BTreeMap;

use crate::domain::categories;
use crate::domain::models::budget::DomainBudget;
use crate::domain::models::savings::DomainSavingsGoal;
use crate::domain::models::transaction::DomainTransaction;

/// Number of transactions shown on the dashboard
pub const RECENT_TRANSACTION_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpend {
    pub category: String,
    pub name: String,
    pub color: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub budget: DomainBudget,
    pub spent: f64,
    /// Capped at 100 for display
    pub progress_percent: f64,
    pub remaining: f64,
    pub over_budget: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub category_spending: Vec<CategorySpend>,
    pub budget_progress: Vec<BudgetStatus>,
    pub recent_transactions: Vec<DomainTransaction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub goal: DomainSavingsGoal,
    pub progress_percent: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavingsSummary {
    pub goals: Vec<GoalProgress>,
    pub total_saved: f64,
    pub total_target: f64,
}

pub fn total_income(transactions: &[DomainTransaction]) -> f64 {
    transactions.iter().filter(|t| t.is_income()).map(|t| t.amount).sum()
}

pub fn total_expenses(transactions: &[DomainTransaction]) -> f64 {
    transactions.iter().filter(|t| t.is_expense()).map(|t| t.amount).sum()
}

pub fn balance(transactions: &[DomainTransaction]) -> f64 {
    total_income(transactions) - total_expenses(transactions)
}

/// Expense totals keyed by category id
pub fn spending_by_category(transactions: &[DomainTransaction]) -> BTreeMap<String, f64> {
    let mut spending = BTreeMap::new();
    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        *spending.entry(transaction.category.clone()).or_insert(0.0) += transaction.amount;
    }
    spending
}

/// `part / whole` as a percentage clamped to 0..=100. A zero whole counts as
/// complete as soon as anything is on the part side.
pub fn progress_percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return if part > 0.0 { 100.0 } else { 0.0 };
    }
    (part / whole * 100.0).clamp(0.0, 100.0)
}

pub fn budget_progress(budget: &DomainBudget, spent: f64) -> BudgetStatus {
    BudgetStatus {
        budget: budget.clone(),
        spent,
        progress_percent: progress_percent(spent, budget.amount),
        remaining: (budget.amount - spent).max(0.0),
        over_budget: spent > budget.amount,
    }
}

/// Chart entries for categories with expenses, in catalog order
pub fn spending_chart(spending: &BTreeMap<String, f64>) -> Vec<CategorySpend> {
    let mut entries: Vec<CategorySpend> = spending
        .iter()
        .filter(|(_, amount)| **amount > 0.0)
        .map(|(category, amount)| {
            let info = categories::find(category);
            CategorySpend {
                category: category.clone(),
                name: categories::display_name(category),
                color: info.map(|c| c.color.to_string()).unwrap_or_default(),
                amount: *amount,
            }
        })
        .collect();
    entries.sort_by_key(|entry| categories::order(&entry.category));
    entries
}

pub fn dashboard(transactions: &[DomainTransaction], budgets: &[DomainBudget]) -> Dashboard {
    let spending = spending_by_category(transactions);

    let mut ordered_budgets = budgets.to_vec();
    DomainBudget::sort_by_catalog(&mut ordered_budgets);
    let budget_progress = ordered_budgets
        .iter()
        .map(|budget| budget_progress(budget, spending.get(&budget.category).copied().unwrap_or(0.0)))
        .collect();

    let mut recent = transactions.to_vec();
    DomainTransaction::sort_newest_first(&mut recent);
    recent.truncate(RECENT_TRANSACTION_COUNT);

    let total_income = total_income(transactions);
    let total_expenses = total_expenses(transactions);
    Dashboard {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        category_spending: spending_chart(&spending),
        budget_progress,
        recent_transactions: recent,
    }
}

pub fn goal_progress(goal: &DomainSavingsGoal) -> GoalProgress {
    GoalProgress {
        goal: goal.clone(),
        progress_percent: progress_percent(goal.current_amount, goal.target_amount),
        remaining: (goal.target_amount - goal.current_amount).max(0.0),
    }
}

pub fn total_saved(goals: &[DomainSavingsGoal]) -> f64 {
    goals.iter().map(|goal| goal.current_amount).sum()
}

pub fn savings_summary(goals: &[DomainSavingsGoal]) -> SavingsSummary {
    SavingsSummary {
        goals: goals.iter().map(goal_progress).collect(),
        total_saved: total_saved(goals),
        total_target: goals.iter().map(|goal| goal.target_amount).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{SavingsSource, TransactionType};

    fn tx(amount: f64, transaction_type: TransactionType, category: &str, day: u32) -> DomainTransaction {
        DomainTransaction {
            id: format!("{}-{}", category, day),
            date: format!("2025-06-{:02}T10:00:00Z", day),
            name: category.to_string(),
            amount,
            transaction_type,
            category: category.to_string(),
            user_id: "u1".to_string(),
        }
    }

    fn budget(category: &str, amount: f64) -> DomainBudget {
        DomainBudget {
            id: category.to_string(),
            category: category.to_string(),
            amount,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_example_totals() {
        let transactions = vec![
            tx(5000.0, TransactionType::Income, "salary", 1),
            tx(150.75, TransactionType::Expense, "food", 2),
            tx(45.50, TransactionType::Expense, "transport", 3),
            tx(1200.0, TransactionType::Expense, "housing", 5),
        ];
        assert!(close(total_income(&transactions), 5000.0));
        assert!(close(total_expenses(&transactions), 1396.25));
        assert!(close(balance(&transactions), 3603.75));
    }

    #[test]
    fn test_balance_identity_holds() {
        let transactions = vec![
            tx(10.0, TransactionType::Income, "salary", 1),
            tx(3.5, TransactionType::Expense, "food", 2),
            tx(20.0, TransactionType::Expense, "other", 3),
        ];
        assert!(close(
            balance(&transactions),
            total_income(&transactions) - total_expenses(&transactions)
        ));
        assert!(balance(&transactions) < 0.0);
    }

    #[test]
    fn test_spending_is_isolated_per_category() {
        let transactions = vec![
            tx(100.0, TransactionType::Expense, "food", 1),
            tx(50.0, TransactionType::Expense, "food", 2),
            tx(30.0, TransactionType::Expense, "transport", 3),
            tx(999.0, TransactionType::Income, "food", 4),
        ];
        let spending = spending_by_category(&transactions);
        assert!(close(spending["food"], 150.0));
        assert!(close(spending["transport"], 30.0));
        assert!(!spending.contains_key("salary"));
    }

    #[test]
    fn test_progress_clamps_for_display_only() {
        let status = budget_progress(&budget("food", 100.0), 250.0);
        assert!(close(status.progress_percent, 100.0));
        assert!(close(status.spent, 250.0));
        assert!(status.over_budget);
        assert!(close(status.remaining, 0.0));

        let status = budget_progress(&budget("food", 200.0), 50.0);
        assert!(close(status.progress_percent, 25.0));
        assert!(!status.over_budget);
        assert!(close(status.remaining, 150.0));
    }

    #[test]
    fn test_zero_whole() {
        assert!(close(progress_percent(0.0, 0.0), 0.0));
        assert!(close(progress_percent(5.0, 0.0), 100.0));
    }

    #[test]
    fn test_dashboard_orders_and_limits() {
        let mut transactions: Vec<DomainTransaction> = (1..=12)
            .map(|day| tx(1.0, TransactionType::Expense, "other", day))
            .collect();
        transactions.push(tx(10.0, TransactionType::Expense, "food", 13));
        let budgets = vec![budget("other", 5.0), budget("food", 20.0)];

        let summary = dashboard(&transactions, &budgets);

        assert_eq!(summary.recent_transactions.len(), RECENT_TRANSACTION_COUNT);
        assert_eq!(summary.recent_transactions[0].id, "food-13");
        let chart: Vec<&str> = summary.category_spending.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(chart, vec!["food", "other"]);
        assert_eq!(summary.category_spending[0].name, "Food");
        assert_eq!(summary.budget_progress[0].budget.category, "food");
        assert!(summary.budget_progress[1].over_budget);
    }

    #[test]
    fn test_savings_summary() {
        let goal = |current: f64, target: f64| DomainSavingsGoal {
            id: format!("g{}", target),
            name: "Goal".to_string(),
            target_amount: target,
            current_amount: current,
            source: SavingsSource::Bank,
            user_id: "u1".to_string(),
        };
        let summary = savings_summary(&[goal(700.0, 1000.0), goal(600.0, 500.0)]);
        assert!(close(summary.total_saved, 1300.0));
        assert!(close(summary.total_target, 1500.0));
        assert!(close(summary.goals[0].progress_percent, 70.0));
        assert!(close(summary.goals[1].progress_percent, 100.0));
        assert!(close(summary.goals[1].remaining, 0.0));
    }
}
