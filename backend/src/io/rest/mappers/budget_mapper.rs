use shared::{Budget, Category, ReplaceBudgetsRequest};

use crate::domain::categories::CategoryInfo;
use crate::domain::commands::budgets::{BudgetEntry, ReplaceBudgetsCommand};
use crate::domain::models::budget::DomainBudget;

pub struct BudgetMapper;

impl BudgetMapper {
    pub fn to_dto(domain: DomainBudget) -> Budget {
        Budget {
            id: domain.id,
            category: domain.category,
            amount: domain.amount,
        }
    }

    pub fn to_dto_list(domain_budgets: Vec<DomainBudget>) -> Vec<Budget> {
        domain_budgets.into_iter().map(Self::to_dto).collect()
    }

    /// Rows from the manage-budget dialog; ids stay optional until the service assigns them
    pub fn to_replace_command(request: ReplaceBudgetsRequest) -> ReplaceBudgetsCommand {
        ReplaceBudgetsCommand {
            budgets: request
                .budgets
                .into_iter()
                .map(|input| BudgetEntry {
                    id: input.id.filter(|id| !id.trim().is_empty()),
                    category: input.category,
                    amount: input.amount,
                })
                .collect(),
        }
    }

    pub fn category_to_dto(info: &CategoryInfo) -> Category {
        Category {
            id: info.id.to_string(),
            name: info.name.to_string(),
            color: info.color.to_string(),
            icon: info.icon.to_string(),
        }
    }
}
