use shared::{
    AddContributionResponse, CreateSavingsGoalRequest, SavingsGoal, SavingsGoalProgress, SavingsOverview,
    SavingsTransaction,
};

use crate::domain::aggregation::{GoalProgress, SavingsSummary};
use crate::domain::commands::savings::{ContributionResult, CreateGoalCommand};
use crate::domain::models::savings::{DomainSavingsGoal, DomainSavingsTransaction};

pub struct SavingsMapper;

impl SavingsMapper {
    pub fn goal_to_dto(domain: DomainSavingsGoal) -> SavingsGoal {
        SavingsGoal {
            id: domain.id,
            name: domain.name,
            target_amount: domain.target_amount,
            current_amount: domain.current_amount,
            source: domain.source,
        }
    }

    pub fn contribution_to_dto(domain: DomainSavingsTransaction) -> SavingsTransaction {
        SavingsTransaction {
            id: domain.id,
            goal_id: domain.goal_id,
            amount: domain.amount,
            date: domain.date,
        }
    }

    pub fn contribution_list_to_dto(entries: Vec<DomainSavingsTransaction>) -> Vec<SavingsTransaction> {
        entries.into_iter().map(Self::contribution_to_dto).collect()
    }

    pub fn to_create_command(request: CreateSavingsGoalRequest) -> CreateGoalCommand {
        CreateGoalCommand {
            name: request.name,
            target_amount: request.target_amount,
            source: request.source,
        }
    }

    pub fn progress_to_dto(progress: GoalProgress) -> SavingsGoalProgress {
        SavingsGoalProgress {
            goal: Self::goal_to_dto(progress.goal),
            progress_percent: progress.progress_percent,
            remaining: progress.remaining,
        }
    }

    pub fn to_overview(summary: SavingsSummary) -> SavingsOverview {
        SavingsOverview {
            goals: summary.goals.into_iter().map(Self::progress_to_dto).collect(),
            total_saved: summary.total_saved,
            total_target: summary.total_target,
        }
    }

    pub fn to_contribution_response(result: ContributionResult) -> AddContributionResponse {
        let success_message = format!(
            "Added {:.2} to {}",
            result.contribution.amount, result.goal.name
        );
        AddContributionResponse {
            contribution: Self::contribution_to_dto(result.contribution),
            goal: Self::goal_to_dto(result.goal),
            success_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SavingsSource;

    #[test]
    fn test_contribution_response_message() {
        let response = SavingsMapper::to_contribution_response(ContributionResult {
            contribution: DomainSavingsTransaction {
                id: "c1".to_string(),
                goal_id: "g1".to_string(),
                amount: 200.0,
                date: "2025-06-01T00:00:00+00:00".to_string(),
                user_id: "u1".to_string(),
            },
            goal: DomainSavingsGoal {
                id: "g1".to_string(),
                name: "Laptop".to_string(),
                target_amount: 1000.0,
                current_amount: 200.0,
                source: SavingsSource::Bank,
                user_id: "u1".to_string(),
            },
        });
        assert_eq!(response.success_message, "Added 200.00 to Laptop");
        assert_eq!(response.goal.current_amount, 200.0);
        assert_eq!(response.contribution.goal_id, "g1");
    }
}
