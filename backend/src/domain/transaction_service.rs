//! Income and expense records.
//!
//! Reads are awaited; creates and deletes are non-blocking, so callers get
//! the optimistic record back before the store has acknowledged it. A failed
//! write shows up on the permission-error channel.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::transactions::CreateTransactionCommand;
use crate::domain::errors::DomainResult;
use crate::domain::models::transaction::{self, DomainTransaction};
use crate::domain::seed_data;
use crate::storage::{
    collections, to_document_data, CollectionRef, DocumentStore, ErrorEmitter, NonBlockingWriter, PendingWrite,
    UserScope,
};
use shared::TransactionType;

pub const INCOME_TRANSACTION_NAME: &str = "Monthly Salary";
pub const INCOME_CATEGORY: &str = "salary";

#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn DocumentStore>,
    emitter: ErrorEmitter,
}

impl TransactionService {
    pub fn new(store: Arc<dyn DocumentStore>, emitter: ErrorEmitter) -> Self {
        Self { store, emitter }
    }

    fn collection(uid: &str) -> CollectionRef {
        CollectionRef::for_user(uid, collections::TRANSACTIONS)
    }

    fn writer(&self, uid: &str) -> NonBlockingWriter {
        NonBlockingWriter::new(UserScope::shared(self.store.clone(), uid), self.emitter.clone())
    }

    /// Every transaction of the user, newest first
    pub async fn list(&self, uid: &str) -> DomainResult<Vec<DomainTransaction>> {
        let store = UserScope::shared(self.store.clone(), uid);
        let documents = store.list(&Self::collection(uid)).await?;
        let mut transactions = documents
            .iter()
            .map(|document| document.decode::<DomainTransaction>())
            .collect::<Result<Vec<_>, _>>()?;
        DomainTransaction::sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    pub async fn recent(&self, uid: &str, limit: usize) -> DomainResult<Vec<DomainTransaction>> {
        let mut transactions = self.list(uid).await?;
        transactions.truncate(limit);
        Ok(transactions)
    }

    pub fn add(&self, uid: &str, command: CreateTransactionCommand) -> DomainResult<PendingWrite<DomainTransaction>> {
        info!("Adding {} transaction for user {}: {:?}", command.transaction_type, uid, command.name);

        let name = transaction::validate_name(&command.name).map_err(|e| {
            warn!("Rejected transaction for user {}: {}", uid, e);
            e
        })?;
        let amount = transaction::validate_amount(command.amount)?;
        let category = transaction::validate_category(&command.category)?;
        let date = match command.date.as_deref() {
            Some(date) => transaction::validate_date(date)?,
            None => Utc::now().to_rfc3339(),
        };

        let record = DomainTransaction {
            id: String::new(),
            date,
            name,
            amount,
            transaction_type: command.transaction_type,
            category,
            user_id: uid.to_string(),
        };
        self.create(uid, record)
    }

    /// Record the monthly salary, dated the first of the current month
    pub fn set_income(&self, uid: &str, amount: f64) -> DomainResult<PendingWrite<DomainTransaction>> {
        info!("Setting monthly income for user {}: {:.2}", uid, amount);
        let amount = transaction::validate_amount(amount)?;
        let record = DomainTransaction {
            id: String::new(),
            date: seed_data::day_of_month(Utc::now(), 1).to_rfc3339(),
            name: INCOME_TRANSACTION_NAME.to_string(),
            amount,
            transaction_type: TransactionType::Income,
            category: INCOME_CATEGORY.to_string(),
            user_id: uid.to_string(),
        };
        self.create(uid, record)
    }

    pub fn delete(&self, uid: &str, transaction_id: &str) -> PendingWrite<String> {
        info!("Deleting transaction {} for user {}", transaction_id, uid);
        let doc = Self::collection(uid).doc(transaction_id);
        self.writer(uid)
            .delete_document_non_blocking(&doc)
            .map(|doc| doc.id().to_string())
    }

    fn create(&self, uid: &str, record: DomainTransaction) -> DomainResult<PendingWrite<DomainTransaction>> {
        let mut data = to_document_data(&record)?;
        data.remove("id");
        let pending = self.writer(uid).add_document_non_blocking(&Self::collection(uid), data);
        Ok(pending.map(|doc| DomainTransaction {
            id: doc.id().to_string(),
            ..record
        }))
    }
}
