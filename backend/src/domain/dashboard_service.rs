use tracing::info;

use crate::domain::aggregation::{self, Dashboard, SavingsSummary};
use crate::domain::budget_service::BudgetService;
use crate::domain::errors::DomainResult;
use crate::domain::savings_service::SavingsService;
use crate::domain::transaction_service::TransactionService;

/// Reads the user's snapshots and hands them to the aggregation functions
#[derive(Clone)]
pub struct DashboardService {
    transaction_service: TransactionService,
    budget_service: BudgetService,
    savings_service: SavingsService,
}

impl DashboardService {
    pub fn new(
        transaction_service: TransactionService,
        budget_service: BudgetService,
        savings_service: SavingsService,
    ) -> Self {
        Self {
            transaction_service,
            budget_service,
            savings_service,
        }
    }

    pub async fn dashboard(&self, uid: &str) -> DomainResult<Dashboard> {
        info!("Building dashboard for user {}", uid);
        let (transactions, budgets) = tokio::try_join!(
            self.transaction_service.list(uid),
            self.budget_service.list(uid)
        )?;
        Ok(aggregation::dashboard(&transactions, &budgets))
    }

    pub async fn savings_overview(&self, uid: &str) -> DomainResult<SavingsSummary> {
        let goals = self.savings_service.list_goals(uid).await?;
        Ok(aggregation::savings_summary(&goals))
    }
}
