//! Starter budgets and transactions written for every new account.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use shared::TransactionType;

use crate::domain::models::budget::DomainBudget;
use crate::domain::models::transaction::DomainTransaction;

const DEFAULT_BUDGETS: [(&str, f64); 8] = [
    ("food", 500.0),
    ("transport", 150.0),
    ("entertainment", 200.0),
    ("housing", 1200.0),
    ("utilities", 150.0),
    ("health", 100.0),
    ("shopping", 250.0),
    ("other", 100.0),
];

// (day of month, name, amount, type, category)
const DEFAULT_TRANSACTIONS: [(u32, &str, f64, TransactionType, &str); 10] = [
    (1, "Monthly Salary", 5000.0, TransactionType::Income, "salary"),
    (2, "Groceries", 150.75, TransactionType::Expense, "food"),
    (3, "Gasoline", 45.50, TransactionType::Expense, "transport"),
    (5, "Rent", 1200.0, TransactionType::Expense, "housing"),
    (7, "Movie Night", 35.0, TransactionType::Expense, "entertainment"),
    (10, "Electricity Bill", 75.0, TransactionType::Expense, "utilities"),
    (12, "Dinner Out", 80.20, TransactionType::Expense, "food"),
    (15, "Pharmacy", 25.0, TransactionType::Expense, "health"),
    (18, "New Clothes", 120.0, TransactionType::Expense, "shopping"),
    (20, "Public Transport Pass", 55.0, TransactionType::Expense, "transport"),
];

pub fn default_budgets() -> Vec<DomainBudget> {
    DEFAULT_BUDGETS
        .iter()
        .map(|(category, amount)| DomainBudget {
            id: uuid::Uuid::new_v4().to_string(),
            category: category.to_string(),
            amount: *amount,
        })
        .collect()
}

/// Default transactions dated within the month of `now`
pub fn default_transactions(uid: &str, now: DateTime<Utc>) -> Vec<DomainTransaction> {
    DEFAULT_TRANSACTIONS
        .iter()
        .map(|(day, name, amount, transaction_type, category)| DomainTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            date: day_of_month(now, *day).to_rfc3339(),
            name: name.to_string(),
            amount: *amount,
            transaction_type: *transaction_type,
            category: category.to_string(),
            user_id: uid.to_string(),
        })
        .collect()
}

/// `now` moved to the given day of its month, keeping the time of day
pub fn day_of_month(now: DateTime<Utc>, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), day)
        .map(|date| Utc.from_utc_datetime(&date.and_time(now.time())))
        .unwrap_or(now)
}
