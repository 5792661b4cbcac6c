//! Conversions between `shared` DTOs and domain types.

pub mod budget_mapper;
pub mod dashboard_mapper;
pub mod savings_mapper;
pub mod suggestion_mapper;
pub mod transaction_mapper;
