//! AI suggestion flows.
//!
//! Each flow renders a prompt from structured input, asks the language model
//! for a JSON answer, and accepts the answer only if it parses and matches the
//! output schema. Anything else is an error for the caller to display; there
//! is no retry and no caching.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{GenerationRequest, LanguageModel};
use crate::domain::aggregation;
use crate::domain::errors::SuggestionError;
use crate::domain::models::budget::DomainBudget;
use crate::domain::models::savings::DomainSavingsGoal;
use crate::domain::models::transaction::DomainTransaction;
use crate::domain::prompts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSuggestionsInput {
    pub income: f64,
    /// Expense totals keyed by category id
    pub expenses: BTreeMap<String, f64>,
    /// Budget amounts keyed by category id
    pub budget_goals: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSuggestionItem {
    pub category: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_savings: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSuggestionsOutput {
    pub suggestions: Vec<BudgetSuggestionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalInput {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSuggestionsInput {
    pub savings_goals: Vec<SavingsGoalInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSuggestionsOutput {
    pub suggestions: Vec<String>,
}

impl BudgetSuggestionsInput {
    fn validate(&self) -> Result<(), SuggestionError> {
        if !self.income.is_finite() {
            return Err(SuggestionError::InvalidInput("income must be a finite number".to_string()));
        }
        for (label, map) in [("expenses", &self.expenses), ("budgetGoals", &self.budget_goals)] {
            if let Some((category, _)) = map.iter().find(|(_, amount)| !amount.is_finite()) {
                return Err(SuggestionError::InvalidInput(format!(
                    "{}.{} must be a finite number",
                    label, category
                )));
            }
        }
        Ok(())
    }
}

impl SavingsSuggestionsInput {
    fn validate(&self) -> Result<(), SuggestionError> {
        for goal in &self.savings_goals {
            if !goal.target_amount.is_finite() || !goal.current_amount.is_finite() {
                return Err(SuggestionError::InvalidInput(format!(
                    "amounts of goal '{}' must be finite numbers",
                    goal.name
                )));
            }
        }
        Ok(())
    }
}

/// Budget flow input from the user's stored transactions and budgets
pub fn build_budget_input(transactions: &[DomainTransaction], budgets: &[DomainBudget]) -> BudgetSuggestionsInput {
    BudgetSuggestionsInput {
        income: aggregation::total_income(transactions),
        expenses: aggregation::spending_by_category(transactions),
        budget_goals: budgets
            .iter()
            .map(|budget| (budget.category.clone(), budget.amount))
            .collect(),
    }
}

pub fn build_savings_input(goals: &[DomainSavingsGoal]) -> SavingsSuggestionsInput {
    SavingsSuggestionsInput {
        savings_goals: goals
            .iter()
            .map(|goal| SavingsGoalInput {
                name: goal.name.clone(),
                target_amount: goal.target_amount,
                current_amount: goal.current_amount,
            })
            .collect(),
    }
}

/// Drop a surrounding ```json fence if the model added one
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn validate_against_schema(value: &Value, schema: &Value) -> Result<(), SuggestionError> {
    let compiled = jsonschema::JSONSchema::compile(schema)
        .map_err(|e| SuggestionError::InvalidResponse(format!("invalid output schema: {}", e)))?;

    let errors: Vec<String> = compiled
        .validate(value)
        .err()
        .map(|errors| {
            errors
                .map(|error| {
                    let path = error.instance_path.to_string();
                    if path.is_empty() {
                        error.to_string()
                    } else {
                        format!("{}: {}", path, error)
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SuggestionError::SchemaMismatch(errors))
    }
}

/// Parse the model's text and check it against `schema`
pub fn parse_model_output<T: DeserializeOwned>(text: &str, schema: &Value) -> Result<T, SuggestionError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| SuggestionError::InvalidResponse(e.to_string()))?;
    validate_against_schema(&value, schema)?;
    serde_json::from_value(value).map_err(|e| SuggestionError::InvalidResponse(e.to_string()))
}

#[derive(Clone)]
pub struct SuggestionService {
    model: Arc<dyn LanguageModel>,
}

impl SuggestionService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn budget_suggestions(
        &self,
        input: BudgetSuggestionsInput,
    ) -> Result<BudgetSuggestionsOutput, SuggestionError> {
        input.validate()?;
        info!(
            "Requesting budget suggestions ({} expense categories, {} budgets)",
            input.expenses.len(),
            input.budget_goals.len()
        );
        let schema = prompts::budget_suggestions_schema();
        let text = self
            .model
            .generate(GenerationRequest {
                prompt: prompts::render_budget_prompt(&input),
                response_schema: Some(schema.clone()),
            })
            .await?;
        parse_model_output(&text, &schema).map_err(|e| {
            warn!("Discarding budget suggestions: {}", e);
            e
        })
    }

    pub async fn savings_suggestions(
        &self,
        input: SavingsSuggestionsInput,
    ) -> Result<SavingsSuggestionsOutput, SuggestionError> {
        input.validate()?;
        info!("Requesting savings suggestions for {} goals", input.savings_goals.len());
        let schema = prompts::savings_suggestions_schema();
        let text = self
            .model
            .generate(GenerationRequest {
                prompt: prompts::render_savings_prompt(&input),
                response_schema: Some(schema.clone()),
            })
            .await?;
        parse_model_output(&text, &schema).map_err(|e| {
            warn!("Discarding savings suggestions: {}", e);
            e
        })
    }
}
