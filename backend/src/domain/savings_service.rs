//! Savings goals and their contribution ledger.
//!
//! ## Business Rules
//!
//! - A goal starts at zero and only grows through contributions
//! - A contribution writes the ledger entry and the goal increment in one
//!   batch, so `currentAmount` and the ledger move together
//! - A contribution that would push `currentAmount` past the f64 range is
//!   rejected
//! - Deleting a goal removes its contributions in the same batch and leaves
//!   every other goal's contributions alone
//! - `reconcile` rebuilds `currentAmount` from the ledger

use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::commands::savings::{
    AddContributionCommand, ContributionResult, CreateGoalCommand, DeleteGoalResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::savings::{self, DomainSavingsGoal, DomainSavingsTransaction, SavingsValidationError};
use crate::storage::{
    collections, to_document_data, CollectionRef, DocumentData, DocumentRef, DocumentStore, ErrorEmitter,
    NonBlockingWriter, PendingWrite, PermissionErrorEvent, StoreOperation, UserScope, WriteBatch,
};

const GOAL_ID_FIELD: &str = "goalId";
const CURRENT_AMOUNT_FIELD: &str = "currentAmount";

#[derive(Clone)]
pub struct SavingsService {
    store: Arc<dyn DocumentStore>,
    emitter: ErrorEmitter,
}

impl SavingsService {
    pub fn new(store: Arc<dyn DocumentStore>, emitter: ErrorEmitter) -> Self {
        Self { store, emitter }
    }

    fn goals(uid: &str) -> CollectionRef {
        CollectionRef::for_user(uid, collections::SAVINGS_GOALS)
    }

    fn ledger(uid: &str) -> CollectionRef {
        CollectionRef::for_user(uid, collections::SAVINGS_TRANSACTIONS)
    }

    fn writer(&self, uid: &str) -> NonBlockingWriter {
        NonBlockingWriter::new(UserScope::shared(self.store.clone(), uid), self.emitter.clone())
    }

    pub async fn list_goals(&self, uid: &str) -> DomainResult<Vec<DomainSavingsGoal>> {
        let store = UserScope::shared(self.store.clone(), uid);
        let documents = store.list(&Self::goals(uid)).await?;
        Ok(documents
            .iter()
            .map(|document| document.decode::<DomainSavingsGoal>())
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn get_goal(&self, uid: &str, goal_id: &str) -> DomainResult<DomainSavingsGoal> {
        let store = UserScope::shared(self.store.clone(), uid);
        match store.get(&Self::goals(uid).doc(goal_id)).await? {
            Some(document) => Ok(document.decode()?),
            None => Err(DomainError::NotFound(format!("Savings goal {}", goal_id))),
        }
    }

    pub fn add_goal(&self, uid: &str, command: CreateGoalCommand) -> DomainResult<PendingWrite<DomainSavingsGoal>> {
        info!("Creating savings goal for user {}: {:?}", uid, command);
        let name = savings::validate_goal_name(&command.name)?;
        let target_amount = savings::validate_target(command.target_amount)?;

        let goal = DomainSavingsGoal {
            id: String::new(),
            name,
            target_amount,
            current_amount: 0.0,
            source: command.source,
            user_id: uid.to_string(),
        };
        let mut data = to_document_data(&goal)?;
        data.remove("id");
        let pending = self.writer(uid).add_document_non_blocking(&Self::goals(uid), data);
        Ok(pending.map(|doc| DomainSavingsGoal {
            id: doc.id().to_string(),
            ..goal
        }))
    }

    /// Append a ledger entry and raise the goal's `currentAmount` in one batch
    pub async fn add_contribution(
        &self,
        uid: &str,
        command: AddContributionCommand,
    ) -> DomainResult<PendingWrite<ContributionResult>> {
        info!("Adding contribution of {:.2} to goal {} for user {}", command.amount, command.goal_id, uid);
        let amount = savings::validate_contribution(command.amount).map_err(|e| {
            warn!("Rejected contribution for user {}: {}", uid, e);
            e
        })?;
        let goal = self.get_goal(uid, &command.goal_id).await?;
        let new_total = savings::validate_new_total(goal.current_amount, amount).map_err(|e| {
            warn!("Rejected contribution to goal {} for user {}: {}", goal.id, uid, e);
            e
        })?;

        let entry_ref = Self::ledger(uid).new_doc();
        let contribution = DomainSavingsTransaction {
            id: entry_ref.id().to_string(),
            goal_id: goal.id.clone(),
            amount,
            date: Utc::now().to_rfc3339(),
            user_id: uid.to_string(),
        };
        let updated_goal = DomainSavingsGoal {
            current_amount: new_total,
            ..goal
        };

        // The store adds to whatever total it holds at commit time, so
        // contributions racing each other all count
        let mut batch = WriteBatch::new();
        batch
            .set(entry_ref, to_document_data(&contribution)?)
            .increment(Self::goals(uid).doc(updated_goal.id.clone()), CURRENT_AMOUNT_FIELD, amount);

        let pending = self.writer(uid).commit_batch_non_blocking(batch);
        Ok(pending.map(|_| ContributionResult {
            contribution,
            goal: updated_goal,
        }))
    }

    /// Contributions to one goal, newest first
    pub async fn history(&self, uid: &str, goal_id: &str) -> DomainResult<Vec<DomainSavingsTransaction>> {
        let mut entries = self.contributions(uid, goal_id).await?;
        DomainSavingsTransaction::sort_newest_first(&mut entries);
        Ok(entries)
    }

    async fn contributions(&self, uid: &str, goal_id: &str) -> DomainResult<Vec<DomainSavingsTransaction>> {
        let store = UserScope::shared(self.store.clone(), uid);
        let documents = store
            .query_eq(&Self::ledger(uid), GOAL_ID_FIELD, &Value::String(goal_id.to_string()))
            .await?;
        Ok(documents
            .iter()
            .map(|document| document.decode::<DomainSavingsTransaction>())
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete a goal together with every contribution that references it
    pub async fn delete_goal(&self, uid: &str, goal_id: &str) -> DomainResult<DeleteGoalResult> {
        info!("Deleting savings goal {} for user {}", goal_id, uid);
        let store = UserScope::shared(self.store.clone(), uid);
        let ledger = Self::ledger(uid);

        let matching = match store
            .query_eq(&ledger, GOAL_ID_FIELD, &Value::String(goal_id.to_string()))
            .await
        {
            Ok(documents) => documents,
            Err(err) => {
                error!("Failed to query contributions of goal {}: {}", goal_id, err);
                self.emitter
                    .emit(PermissionErrorEvent::new(ledger.path(), StoreOperation::List, err.to_string()));
                return Err(err.into());
            }
        };

        let goal_ref: DocumentRef = Self::goals(uid).doc(goal_id);
        let mut batch = WriteBatch::new();
        for document in &matching {
            batch.delete(document.reference.clone());
        }
        batch.delete(goal_ref.clone());

        if let Err(err) = store.commit(batch).await {
            error!("Failed to delete goal {} and its contributions: {}", goal_id, err);
            self.emitter
                .emit(PermissionErrorEvent::new(goal_ref.path(), StoreOperation::Delete, err.to_string()));
            return Err(err.into());
        }

        info!("Deleted goal {} with {} contributions", goal_id, matching.len());
        Ok(DeleteGoalResult {
            goal_id: goal_id.to_string(),
            deleted_contributions: matching.len(),
        })
    }

    /// Set `currentAmount` to the sum of the goal's ledger entries
    pub async fn reconcile(&self, uid: &str, goal_id: &str) -> DomainResult<DomainSavingsGoal> {
        let goal = self.get_goal(uid, goal_id).await?;
        let ledger_total: f64 = self.contributions(uid, goal_id).await?.iter().map(|c| c.amount).sum();
        if !ledger_total.is_finite() {
            return Err(SavingsValidationError::TotalOutOfRange.into());
        }

        if (goal.current_amount - ledger_total).abs() > f64::EPSILON {
            warn!(
                "Goal {} drifted from its ledger: stored {:.2}, ledger {:.2}",
                goal_id, goal.current_amount, ledger_total
            );
        }

        let mut data = DocumentData::new();
        data.insert(CURRENT_AMOUNT_FIELD.to_string(), json!(ledger_total));
        let store = UserScope::shared(self.store.clone(), uid);
        store.update(&Self::goals(uid).doc(goal_id), data).await?;

        Ok(DomainSavingsGoal {
            current_amount: ledger_total,
            ..goal
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SavingsSource;

    use crate::storage::{DbConnection, SqliteDocumentStore};
    use crate::test_support::FailingStore;

    async fn setup_test_service() -> (SavingsService, Arc<dyn DocumentStore>, ErrorEmitter) {
        let connection = DbConnection::init_test().await.expect("Failed to create test database");
        let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(connection));
        let emitter = ErrorEmitter::new();
        (SavingsService::new(store.clone(), emitter.clone()), store, emitter)
    }

    async fn create_goal(service: &SavingsService, uid: &str, target: f64) -> DomainSavingsGoal {
        let (goal, ok) = service
            .add_goal(
                uid,
                CreateGoalCommand {
                    name: "Boracay Trip".to_string(),
                    target_amount: target,
                    source: SavingsSource::DigitalWallet,
                },
            )
            .unwrap()
            .wait()
            .await;
        assert!(ok);
        goal
    }

    async fn contribute(service: &SavingsService, uid: &str, goal_id: &str, amount: f64) -> ContributionResult {
        let (result, ok) = service
            .add_contribution(
                uid,
                AddContributionCommand {
                    goal_id: goal_id.to_string(),
                    amount,
                },
            )
            .await
            .unwrap()
            .wait()
            .await;
        assert!(ok);
        result
    }

    #[tokio::test]
    async fn test_new_goal_starts_at_zero() {
        let (service, _, _) = setup_test_service().await;
        let goal = create_goal(&service, "u1", 1000.0).await;

        let stored = service.get_goal("u1", &goal.id).await.unwrap();
        assert_eq!(stored.current_amount, 0.0);
        assert_eq!(stored.source, SavingsSource::DigitalWallet);
    }

    #[tokio::test]
    async fn test_contribution_updates_goal_and_ledger() {
        let (service, _, _) = setup_test_service().await;
        let goal = create_goal(&service, "u1", 1000.0).await;
        contribute(&service, "u1", &goal.id, 200.0).await;

        let result = contribute(&service, "u1", &goal.id, 500.0).await;
        assert_eq!(result.goal.current_amount, 700.0);
        assert_eq!(result.contribution.amount, 500.0);

        let stored = service.get_goal("u1", &goal.id).await.unwrap();
        assert_eq!(stored.current_amount, 700.0);
        let history = service.history("u1", &goal.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().filter(|c| c.amount == 500.0).count(), 1);
    }

    #[tokio::test]
    async fn test_contribution_validation_and_missing_goal() {
        let (service, _, _) = setup_test_service().await;
        let goal = create_goal(&service, "u1", 1000.0).await;

        let result = service
            .add_contribution("u1", AddContributionCommand { goal_id: goal.id.clone(), amount: 0.0 })
            .await;
        assert!(matches!(result, Err(DomainError::InvalidSavings(_))));

        let result = service
            .add_contribution("u1", AddContributionCommand { goal_id: "missing".to_string(), amount: 5.0 })
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_goal_cascades_only_its_contributions() {
        let (service, _, _) = setup_test_service().await;
        let doomed = create_goal(&service, "u1", 1000.0).await;
        let kept = create_goal(&service, "u1", 500.0).await;
        contribute(&service, "u1", &doomed.id, 100.0).await;
        contribute(&service, "u1", &doomed.id, 50.0).await;
        contribute(&service, "u1", &kept.id, 25.0).await;

        let result = service.delete_goal("u1", &doomed.id).await.unwrap();
        assert_eq!(result.deleted_contributions, 2);

        let goals = service.list_goals("u1").await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, kept.id);
        assert!(service.history("u1", &doomed.id).await.unwrap().is_empty());
        assert_eq!(service.history("u1", &kept.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_repairs_drift() {
        let (service, store, _) = setup_test_service().await;
        let goal = create_goal(&service, "u1", 1000.0).await;
        contribute(&service, "u1", &goal.id, 300.0).await;

        let mut drifted = DocumentData::new();
        drifted.insert("currentAmount".to_string(), json!(999.0));
        store.update(&SavingsService::goals("u1").doc(goal.id.clone()), drifted).await.unwrap();

        let repaired = service.reconcile("u1", &goal.id).await.unwrap();
        assert_eq!(repaired.current_amount, 300.0);
        assert_eq!(service.get_goal("u1", &goal.id).await.unwrap().current_amount, 300.0);
    }

    #[tokio::test]
    async fn test_concurrent_contributions_all_count() {
        let (service, _, _) = setup_test_service().await;
        let goal = create_goal(&service, "u1", 1000.0).await;

        let (first, second) = tokio::join!(
            service.add_contribution("u1", AddContributionCommand { goal_id: goal.id.clone(), amount: 200.0 }),
            service.add_contribution("u1", AddContributionCommand { goal_id: goal.id.clone(), amount: 500.0 }),
        );
        let (_, first_ok) = first.unwrap().wait().await;
        let (_, second_ok) = second.unwrap().wait().await;
        assert!(first_ok && second_ok);

        let stored = service.get_goal("u1", &goal.id).await.unwrap();
        let ledger_total: f64 = service.history("u1", &goal.id).await.unwrap().iter().map(|c| c.amount).sum();
        assert_eq!(stored.current_amount, 700.0);
        assert_eq!(stored.current_amount, ledger_total);
    }

    #[tokio::test]
    async fn test_contribution_overflowing_total_is_rejected() {
        let (service, _, _) = setup_test_service().await;
        let goal = create_goal(&service, "u1", 1000.0).await;
        contribute(&service, "u1", &goal.id, 1e308).await;

        let result = service
            .add_contribution("u1", AddContributionCommand { goal_id: goal.id.clone(), amount: 1e308 })
            .await;
        assert!(matches!(
            result,
            Err(DomainError::InvalidSavings(SavingsValidationError::TotalOutOfRange))
        ));

        let goals = service.list_goals("u1").await.unwrap();
        assert_eq!(goals[0].current_amount, 1e308);
        assert_eq!(service.history("u1", &goal.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_cascade_query_emits_list_event() {
        let (service, store, emitter) = setup_test_service().await;
        let goal = create_goal(&service, "u1", 1000.0).await;
        let failing = SavingsService::new(Arc::new(FailingStore::failing_queries(store)), emitter.clone());
        let mut events = emitter.subscribe();

        let result = failing.delete_goal("u1", &goal.id).await;
        assert!(matches!(result, Err(DomainError::Store(_))));

        let event = events.recv().await.unwrap();
        assert_eq!(event.operation, StoreOperation::List);
        assert_eq!(event.path, "users/u1/savingsTransactions");
        assert!(service.get_goal("u1", &goal.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_cascade_commit_emits_delete_event() {
        let (service, store, emitter) = setup_test_service().await;
        let goal = create_goal(&service, "u1", 1000.0).await;
        contribute(&service, "u1", &goal.id, 100.0).await;
        let failing = SavingsService::new(Arc::new(FailingStore::failing_commits(store)), emitter.clone());
        let mut events = emitter.subscribe();

        let result = failing.delete_goal("u1", &goal.id).await;
        assert!(matches!(result, Err(DomainError::Store(_))));

        let event = events.recv().await.unwrap();
        assert_eq!(event.operation, StoreOperation::Delete);
        assert_eq!(event.path, format!("users/u1/savingsGoals/{}", goal.id));
        assert_eq!(service.history("u1", &goal.id).await.unwrap().len(), 1);
    }
}
