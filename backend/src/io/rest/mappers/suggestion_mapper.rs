use shared::{BudgetSuggestion, BudgetSuggestionsResponse, SavingsSuggestionsResponse};

use crate::domain::suggestion_service::{BudgetSuggestionsOutput, SavingsSuggestionsOutput};

pub struct SuggestionMapper;

impl SuggestionMapper {
    pub fn to_budget_response(output: BudgetSuggestionsOutput) -> BudgetSuggestionsResponse {
        BudgetSuggestionsResponse {
            suggestions: output
                .suggestions
                .into_iter()
                .map(|item| BudgetSuggestion {
                    category: item.category,
                    suggestion: item.suggestion,
                    potential_savings: item.potential_savings,
                })
                .collect(),
        }
    }

    pub fn to_savings_response(output: SavingsSuggestionsOutput) -> SavingsSuggestionsResponse {
        SavingsSuggestionsResponse {
            suggestions: output.suggestions,
        }
    }
}
