use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// loan performing, payments accepted
    Active,
    /// every installment paid; terminal
    PaidOff,
    /// one or more installments overdue relative to the calendar schedule.
    /// there is no cure transition back to Active; payments are blocked
    /// until an external reset.
    Delinquent,
}

/// account transaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    InterestCredit,
}
