//! Prompt templates and answer schemas for the suggestion flows.

use serde_json::{json, Value};
use std::fmt::Write;

use crate::domain::suggestion_service::{BudgetSuggestionsInput, SavingsSuggestionsInput};

pub fn budget_suggestions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "suggestions": {
                "type": "array",
                "description": "An array of AI-powered budget optimization suggestions.",
                "items": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "The expense category the suggestion applies to."
                        },
                        "suggestion": {
                            "type": "string",
                            "description": "The AI-powered budget optimization suggestion."
                        },
                        "potentialSavings": {
                            "type": "number",
                            "description": "The estimated potential savings from the suggestion."
                        }
                    },
                    "required": ["category", "suggestion"]
                }
            }
        },
        "required": ["suggestions"]
    })
}

pub fn savings_suggestions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "suggestions": {
                "type": "array",
                "description": "An array of AI-powered savings suggestions.",
                "items": {
                    "type": "string",
                    "description": "An AI-powered savings technique or encouragement."
                }
            }
        },
        "required": ["suggestions"]
    })
}

pub fn render_budget_prompt(input: &BudgetSuggestionsInput) -> String {
    let mut prompt = String::from(
        "You are an AI budget assistant for users in the Philippines. All currency values are in \
         Philippine Pesos (PHP). Analyze the user's income, expenses, and budget goals to provide \
         personalized suggestions for optimizing their budget in a Filipino context. It's okay to use \
         Tag-Lish in sentences for more casual modern Tagalog approach.\n\n",
    );

    let _ = writeln!(prompt, "Income: {}\n", input.income);
    prompt.push_str("Expenses:\n");
    for (category, amount) in &input.expenses {
        let _ = writeln!(prompt, "- {}: {}", category, amount);
    }
    prompt.push_str("\nBudget Goals:\n");
    for (category, amount) in &input.budget_goals {
        let _ = writeln!(prompt, "- {}: {}", category, amount);
    }

    prompt.push_str(
        "\nProvide specific, actionable, and culturally relevant suggestions for a Filipino user. Focus \
         on areas where they can save money and achieve their financial goals more effectively (e.g., \
         suggesting local alternatives, mentioning common Filipino spending habits). Include an \
         estimated potential savings in PHP if applicable.\n\n",
    );
    append_schema(&mut prompt, &budget_suggestions_schema());
    prompt
}

pub fn render_savings_prompt(input: &SavingsSuggestionsInput) -> String {
    let mut prompt = String::from(
        "You are a friendly and encouraging financial advisor for users in the Philippines. All \
         currency values are in Philippine Pesos (PHP). Your goal is to provide personalized savings \
         techniques and motivation. Use a casual, modern \"Tag-Lish\" (Tagalog-English) style.\n\n\
         Analyze the user's savings goals.\n\n",
    );

    if input.savings_goals.is_empty() {
        prompt.push_str(
            "The user has no savings goals yet. Provide 2-3 encouraging and gentle sentences to \
             motivate them to start saving. For example, \"Kahit maliit, ang mahalaga ay makapagsimula \
             ka!\" or \"Setting a small goal is a great first step.\" Explain why saving is important in \
             a simple, relatable way.\n\n",
        );
    } else {
        prompt.push_str("Here are their current goals:\n");
        for goal in &input.savings_goals {
            let _ = writeln!(
                prompt,
                "- Goal: \"{}\", Progress: {} / {}",
                goal.name, goal.current_amount, goal.target_amount
            );
        }
        prompt.push_str(
            "\nBased on these goals, provide 2-3 specific, actionable, and creative savings tips that \
             are relevant to a Filipino lifestyle. For example, mention things like \"ipon challenges\", \
             digital banks like Maya or GoTyme, or \"sinking funds\" for specific goals. Be encouraging \
             and positive.\n\n",
        );
    }

    append_schema(&mut prompt, &savings_suggestions_schema());
    prompt
}

fn append_schema(prompt: &mut String, schema: &Value) {
    prompt.push_str("Format your response as a JSON object matching the following schema:\n");
    prompt.push_str(&schema.to_string());
    prompt.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::suggestion_service::SavingsGoalInput;
    use std::collections::BTreeMap;

    #[test]
    fn test_budget_prompt_lists_every_category() {
        let input = BudgetSuggestionsInput {
            income: 5000.0,
            expenses: BTreeMap::from([("food".to_string(), 230.95), ("housing".to_string(), 1200.0)]),
            budget_goals: BTreeMap::from([("food".to_string(), 500.0)]),
        };
        let prompt = render_budget_prompt(&input);
        assert!(prompt.contains("Income: 5000"));
        assert!(prompt.contains("- food: 230.95"));
        assert!(prompt.contains("- housing: 1200"));
        assert!(prompt.contains("- food: 500"));
        assert!(prompt.contains("Philippine Pesos (PHP)"));
        assert!(prompt.contains("\"potentialSavings\""));
    }

    #[test]
    fn test_savings_prompt_without_goals_uses_motivational_branch() {
        let prompt = render_savings_prompt(&SavingsSuggestionsInput { savings_goals: vec![] });
        assert!(prompt.contains("no savings goals yet"));
        assert!(!prompt.contains("Here are their current goals"));
    }

    #[test]
    fn test_savings_prompt_with_goals_lists_progress() {
        let prompt = render_savings_prompt(&SavingsSuggestionsInput {
            savings_goals: vec![SavingsGoalInput {
                name: "Emergency Fund".to_string(),
                target_amount: 1000.0,
                current_amount: 700.0,
            }],
        });
        assert!(prompt.contains("- Goal: \"Emergency Fund\", Progress: 700 / 1000"));
        assert!(!prompt.contains("no savings goals yet"));
    }
}
