//! Per-category monthly budgets.
//!
//! Budgets are only ever written as a whole: a replace deletes every stored
//! budget and inserts the new set in one batch, and a reset clears budgets
//! and transactions together. Both batches are awaited so the caller knows
//! the outcome.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::budgets::{ReplaceBudgetsCommand, ReplaceBudgetsResult, ResetResult};
use crate::domain::errors::DomainResult;
use crate::domain::models::budget::DomainBudget;
use crate::storage::{collections, to_document_data, CollectionRef, DocumentStore, UserScope, WriteBatch};

#[derive(Clone)]
pub struct BudgetService {
    store: Arc<dyn DocumentStore>,
}

impl BudgetService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn collection(uid: &str) -> CollectionRef {
        CollectionRef::for_user(uid, collections::BUDGETS)
    }

    /// Stored budgets in catalog order
    pub async fn list(&self, uid: &str) -> DomainResult<Vec<DomainBudget>> {
        let store = UserScope::shared(self.store.clone(), uid);
        let documents = store.list(&Self::collection(uid)).await?;
        let mut budgets = documents
            .iter()
            .map(|document| document.decode::<DomainBudget>())
            .collect::<Result<Vec<_>, _>>()?;
        DomainBudget::sort_by_catalog(&mut budgets);
        Ok(budgets)
    }

    /// Replace the full budget set; afterwards exactly `command.budgets` exist
    pub async fn replace(&self, uid: &str, command: ReplaceBudgetsCommand) -> DomainResult<ReplaceBudgetsResult> {
        info!("Replacing budgets for user {} with {} entries", uid, command.budgets.len());

        let mut budgets: Vec<DomainBudget> = command
            .budgets
            .into_iter()
            .map(|entry| DomainBudget {
                id: entry
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                category: entry.category,
                amount: entry.amount,
            })
            .collect();
        if let Err(e) = DomainBudget::validate_set(&budgets) {
            warn!("Rejected budget set for user {}: {}", uid, e);
            return Err(e.into());
        }

        let store = UserScope::shared(self.store.clone(), uid);
        let collection = Self::collection(uid);
        let existing = store.list(&collection).await?;

        let mut batch = WriteBatch::new();
        for document in &existing {
            batch.delete(document.reference.clone());
        }
        for budget in &budgets {
            batch.set(collection.doc(budget.id.clone()), to_document_data(budget)?);
        }
        store.commit(batch).await?;

        DomainBudget::sort_by_catalog(&mut budgets);
        info!(
            "Budgets for user {} replaced: {} removed, {} written",
            uid,
            existing.len(),
            budgets.len()
        );
        Ok(ReplaceBudgetsResult {
            budgets,
            removed_count: existing.len(),
        })
    }

    /// Delete every transaction and every budget of the user in one batch
    pub async fn reset(&self, uid: &str) -> DomainResult<ResetResult> {
        info!("Resetting budget data for user {}", uid);
        let store = UserScope::shared(self.store.clone(), uid);

        let transactions = store
            .list(&CollectionRef::for_user(uid, collections::TRANSACTIONS))
            .await?;
        let budgets = store.list(&Self::collection(uid)).await?;

        let mut batch = WriteBatch::new();
        for document in transactions.iter().chain(budgets.iter()) {
            batch.delete(document.reference.clone());
        }
        store.commit(batch).await?;

        info!(
            "Reset for user {} removed {} transactions and {} budgets",
            uid,
            transactions.len(),
            budgets.len()
        );
        Ok(ResetResult {
            deleted_transactions: transactions.len(),
            deleted_budgets: budgets.len(),
        })
    }
}
