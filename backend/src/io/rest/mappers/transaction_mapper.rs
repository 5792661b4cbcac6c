use shared::{CreateTransactionRequest, Transaction};

use crate::domain::commands::transactions::CreateTransactionCommand;
use crate::domain::models::transaction::DomainTransaction;

pub struct TransactionMapper;

impl TransactionMapper {
    /// Convert domain DomainTransaction to shared Transaction DTO
    pub fn to_dto(domain: DomainTransaction) -> Transaction {
        Transaction {
            id: domain.id,
            date: domain.date,
            name: domain.name,
            amount: domain.amount,
            transaction_type: domain.transaction_type,
            category: domain.category,
        }
    }

    pub fn to_dto_list(domain_transactions: Vec<DomainTransaction>) -> Vec<Transaction> {
        domain_transactions.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_create_command(request: CreateTransactionRequest) -> CreateTransactionCommand {
        CreateTransactionCommand {
            name: request.name,
            amount: request.amount,
            transaction_type: request.transaction_type,
            category: request.category,
            date: request.date,
        }
    }
}
