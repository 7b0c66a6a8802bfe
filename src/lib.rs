pub mod account;
pub mod decimal;
pub mod document;
pub mod errors;
pub mod events;
pub mod loan;
pub mod schedule;
pub mod types;

// re-export key types
pub use account::{Account, CheckingAccount, SavingsAccount, Transaction};
pub use decimal::{Money, Rate};
pub use document::DocumentKind;
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use loan::{Loan, LoanBuilder, LoanView, PaymentRecord};
pub use schedule::{AmortizationSchedule, InstallmentRow};
pub use types::{LoanId, LoanStatus, TransactionKind};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
