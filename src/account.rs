use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::TransactionKind;

/// deposit/withdraw capability consumed by the loan engine
///
/// Implementations guard their own balances; the loan engine never coordinates
/// across two accounts.
pub trait Account {
    /// credit funds; fails with InvalidAmount when amount <= 0
    fn deposit_funds(&mut self, amount: Money, description: &str) -> Result<()>;

    /// debit funds; fails with InsufficientFunds when amount exceeds what the
    /// account can cover
    fn withdraw_funds(&mut self, amount: Money, description: &str) -> Result<()>;

    /// current balance
    fn balance(&self) -> Money;
}

/// one statement entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub amount: Money,
    pub description: String,
}

/// checking account with an overdraft credit line
///
/// Withdrawals may draw the balance negative up to the credit limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckingAccount {
    number: String,
    balance: Money,
    credit_limit: Money,
    transactions: Vec<Transaction>,
}

impl CheckingAccount {
    pub fn new(number: impl Into<String>, opening_balance: Money, credit_limit: Money) -> Self {
        Self {
            number: number.into(),
            balance: opening_balance,
            credit_limit,
            transactions: Vec::new(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn credit_limit(&self) -> Money {
        self.credit_limit
    }

    /// funds available for withdrawal, including the credit line
    pub fn available_funds(&self) -> Money {
        self.balance + self.credit_limit
    }

    pub fn statement(&self) -> &[Transaction] {
        &self.transactions
    }
}

impl Account for CheckingAccount {
    fn deposit_funds(&mut self, amount: Money, description: &str) -> Result<()> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidAmount { amount });
        }
        self.balance += amount;
        self.transactions.push(Transaction {
            kind: TransactionKind::Deposit,
            amount,
            description: description.to_string(),
        });
        Ok(())
    }

    fn withdraw_funds(&mut self, amount: Money, description: &str) -> Result<()> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidAmount { amount });
        }
        if amount > self.available_funds() {
            return Err(LoanError::InsufficientFunds {
                available: self.available_funds(),
                requested: amount,
            });
        }
        self.balance -= amount;
        self.transactions.push(Transaction {
            kind: TransactionKind::Withdrawal,
            amount,
            description: description.to_string(),
        });
        Ok(())
    }

    fn balance(&self) -> Money {
        self.balance
    }
}

/// savings account: no credit line, withdrawals limited to the balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsAccount {
    number: String,
    balance: Money,
    transactions: Vec<Transaction>,
}

impl SavingsAccount {
    pub fn new(number: impl Into<String>, opening_balance: Money) -> Self {
        Self {
            number: number.into(),
            balance: opening_balance,
            transactions: Vec::new(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn statement(&self) -> &[Transaction] {
        &self.transactions
    }

    /// credit yield on the current balance
    pub fn apply_interest(&mut self, rate: Rate) -> Result<Money> {
        if rate.is_zero() || rate.is_negative() {
            return Err(LoanError::InvalidRate { rate });
        }
        let yield_amount = self.balance * rate.as_decimal();
        self.balance += yield_amount;
        self.transactions.push(Transaction {
            kind: TransactionKind::InterestCredit,
            amount: yield_amount,
            description: format!("yield {}", rate),
        });
        Ok(yield_amount)
    }
}

impl Account for SavingsAccount {
    fn deposit_funds(&mut self, amount: Money, description: &str) -> Result<()> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidAmount { amount });
        }
        self.balance += amount;
        self.transactions.push(Transaction {
            kind: TransactionKind::Deposit,
            amount,
            description: description.to_string(),
        });
        Ok(())
    }

    fn withdraw_funds(&mut self, amount: Money, description: &str) -> Result<()> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidAmount { amount });
        }
        if amount > self.balance {
            return Err(LoanError::InsufficientFunds {
                available: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        self.transactions.push(Transaction {
            kind: TransactionKind::Withdrawal,
            amount,
            description: description.to_string(),
        });
        Ok(())
    }

    fn balance(&self) -> Money {
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checking_deposit_and_withdraw() {
        let mut account = CheckingAccount::new("CC-001", Money::from_major(100), Money::ZERO);

        account.deposit_funds(Money::from_major(50), "salary").unwrap();
        assert_eq!(account.balance(), Money::from_major(150));

        account.withdraw_funds(Money::from_major(30), "groceries").unwrap();
        assert_eq!(account.balance(), Money::from_major(120));

        assert_eq!(account.statement().len(), 2);
        assert_eq!(account.statement()[0].kind, TransactionKind::Deposit);
        assert_eq!(account.statement()[1].kind, TransactionKind::Withdrawal);
    }

    #[test]
    fn test_checking_credit_line() {
        let mut account =
            CheckingAccount::new("CC-002", Money::from_major(100), Money::from_major(500));

        // draw into the credit line
        account.withdraw_funds(Money::from_major(400), "rent").unwrap();
        assert_eq!(account.balance(), Money::from_major(-300));

        // beyond balance + limit fails
        let err = account
            .withdraw_funds(Money::from_major(300), "too much")
            .unwrap_err();
        assert!(matches!(
            err,
            LoanError::InsufficientFunds { available, requested }
                if available == Money::from_major(200) && requested == Money::from_major(300)
        ));
        assert_eq!(account.balance(), Money::from_major(-300));
    }

    #[test]
    fn test_savings_has_no_credit_line() {
        let mut account = SavingsAccount::new("SV-001", Money::from_major(100));

        assert!(account
            .withdraw_funds(Money::from_str_exact("100.01").unwrap(), "over")
            .is_err());
        account.withdraw_funds(Money::from_major(100), "all").unwrap();
        assert_eq!(account.balance(), Money::ZERO);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut account = CheckingAccount::new("CC-003", Money::from_major(10), Money::ZERO);

        assert!(matches!(
            account.deposit_funds(Money::ZERO, "nothing"),
            Err(LoanError::InvalidAmount { .. })
        ));
        assert!(matches!(
            account.withdraw_funds(Money::from_major(-5), "negative"),
            Err(LoanError::InvalidAmount { .. })
        ));
        assert!(account.statement().is_empty());
    }

    #[test]
    fn test_savings_yield() {
        let mut account = SavingsAccount::new("SV-002", Money::from_major(1000));

        let earned = account
            .apply_interest(Rate::from_decimal(dec!(0.005)))
            .unwrap();
        assert_eq!(earned, Money::from_major(5));
        assert_eq!(account.balance(), Money::from_major(1005));
        assert_eq!(account.statement()[0].kind, TransactionKind::InterestCredit);

        assert!(account.apply_interest(Rate::ZERO).is_err());
    }
}
