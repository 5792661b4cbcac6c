use shared::{BudgetProgress, CategorySpending, DashboardSummary};

use crate::domain::aggregation::{BudgetStatus, CategorySpend, Dashboard};
use crate::domain::categories;
use crate::io::rest::mappers::transaction_mapper::TransactionMapper;

pub struct DashboardMapper;

impl DashboardMapper {
    pub fn spend_to_dto(spend: CategorySpend) -> CategorySpending {
        CategorySpending {
            category: spend.category,
            name: spend.name,
            color: spend.color,
            amount: spend.amount,
        }
    }

    pub fn budget_status_to_dto(status: BudgetStatus) -> BudgetProgress {
        BudgetProgress {
            name: categories::display_name(&status.budget.category),
            budget_id: status.budget.id,
            category: status.budget.category,
            spent: status.spent,
            budget_amount: status.budget.amount,
            progress_percent: status.progress_percent,
            remaining: status.remaining,
            over_budget: status.over_budget,
        }
    }

    pub fn to_dto(dashboard: Dashboard) -> DashboardSummary {
        DashboardSummary {
            total_income: dashboard.total_income,
            total_expenses: dashboard.total_expenses,
            balance: dashboard.balance,
            category_spending: dashboard.category_spending.into_iter().map(Self::spend_to_dto).collect(),
            budget_progress: dashboard
                .budget_progress
                .into_iter()
                .map(Self::budget_status_to_dto)
                .collect(),
            recent_transactions: TransactionMapper::to_dto_list(dashboard.recent_transactions),
        }
    }
}
