use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::LoanStatus;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid loan terms: {message}")]
    InvalidLoanTerms {
        message: String,
    },

    #[error("loan already disbursed")]
    AlreadyDisbursed,

    #[error("loan not yet disbursed")]
    NotYetDisbursed,

    #[error("loan not active: current status is {status:?}")]
    LoanNotActive {
        status: LoanStatus,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: Money,
        requested: Money,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidRate {
        rate: Rate,
    },

    #[error("invalid document: {message}")]
    InvalidDocument {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LoanError>;
