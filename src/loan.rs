use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::Account;
use crate::decimal::{Money, Rate};
use crate::document;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::schedule::{AmortizationSchedule, InstallmentRow};
use crate::types::{LoanId, LoanStatus};

/// one entry in the append-only payment ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub date: NaiveDate,
    pub amount: Money,
    /// 1-based, sequential
    pub installment_number: u32,
}

/// installment loan aggregate
///
/// Owns the amortization schedule (generated once at origination), the payment
/// ledger, and the status state machine. The ledger is only reachable through
/// the recording operations; accessors hand out read-only views.
pub struct Loan {
    pub id: LoanId,
    customer_id: String,
    principal: Money,
    periodic_rate: Rate,
    installment_count: u32,
    origination_date: NaiveDate,
    installments_paid: u32,
    status: LoanStatus,
    disbursed: bool,
    payments: Vec<PaymentRecord>,
    schedule: AmortizationSchedule,
    pub events: EventStore,
}

impl Loan {
    /// builder for creating loans
    pub fn builder() -> LoanBuilder {
        LoanBuilder::new()
    }

    /// originate a loan with validated terms
    ///
    /// The schedule is generated synchronously here and never regenerated.
    pub fn originate(
        customer_id: String,
        principal: Money,
        periodic_rate: Rate,
        installment_count: u32,
        origination_date: NaiveDate,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LoanError::InvalidLoanTerms {
                message: format!("principal must be positive, got {}", principal),
            });
        }
        if periodic_rate.is_negative() {
            return Err(LoanError::InvalidLoanTerms {
                message: format!("periodic rate must be >= 0, got {}", periodic_rate),
            });
        }
        if installment_count == 0 {
            return Err(LoanError::InvalidLoanTerms {
                message: "installment count must be positive".to_string(),
            });
        }

        let schedule = AmortizationSchedule::generate(
            principal,
            periodic_rate,
            installment_count,
            origination_date,
        );

        let id = Uuid::new_v4();
        let mut events = EventStore::new();
        events.emit(Event::LoanOriginated {
            loan_id: id,
            customer_id: customer_id.clone(),
            principal,
            installment_count,
            origination_date,
        });

        Ok(Self {
            id,
            customer_id,
            principal,
            periodic_rate,
            installment_count,
            origination_date,
            installments_paid: 0,
            status: LoanStatus::Active,
            disbursed: false,
            payments: Vec::new(),
            schedule,
            events,
        })
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn periodic_rate(&self) -> Rate {
        self.periodic_rate
    }

    pub fn installment_count(&self) -> u32 {
        self.installment_count
    }

    pub fn origination_date(&self) -> NaiveDate {
        self.origination_date
    }

    pub fn installments_paid(&self) -> u32 {
        self.installments_paid
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }

    pub fn is_disbursed(&self) -> bool {
        self.disbursed
    }

    pub fn schedule(&self) -> &AmortizationSchedule {
        &self.schedule
    }

    pub fn ledger(&self) -> &[PaymentRecord] {
        &self.payments
    }

    /// fixed installment amount (PMT)
    pub fn payment_amount(&self) -> Money {
        self.schedule.payment_amount()
    }

    /// next scheduled installment, if any remain
    pub fn next_installment(&self) -> Option<&InstallmentRow> {
        self.schedule.row(self.installments_paid + 1)
    }

    /// pay out the principal into the borrower's account, exactly once
    ///
    /// A repeated call fails with AlreadyDisbursed and leaves the account
    /// untouched.
    pub fn disburse(&mut self, account: &mut dyn Account) -> Result<()> {
        if self.disbursed {
            return Err(LoanError::AlreadyDisbursed);
        }

        account.deposit_funds(self.principal, "loan disbursement")?;
        self.disbursed = true;

        self.events.emit(Event::PrincipalDisbursed {
            loan_id: self.id,
            amount: self.principal,
        });

        Ok(())
    }

    /// record a payment against the ledger, with no account movement
    ///
    /// Date defaults to today, amount to the scheduled PMT. Reaching the full
    /// installment count transitions the loan to PaidOff (terminal).
    pub fn record_payment(
        &mut self,
        date: Option<NaiveDate>,
        amount: Option<Money>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        if self.status != LoanStatus::Active {
            return Err(LoanError::LoanNotActive {
                status: self.status,
            });
        }

        let date = date.unwrap_or_else(|| time_provider.now().date_naive());
        let amount = amount.unwrap_or_else(|| self.payment_amount());
        let installment_number = self.installments_paid + 1;

        self.payments.push(PaymentRecord {
            date,
            amount,
            installment_number,
        });
        self.installments_paid += 1;

        self.events.emit(Event::PaymentRecorded {
            loan_id: self.id,
            amount,
            installment_number,
            payment_date: date,
        });

        if self.installments_paid >= self.installment_count {
            self.status = LoanStatus::PaidOff;
            self.events.emit(Event::LoanPaidOff {
                loan_id: self.id,
                final_payment_date: date,
            });
        }

        Ok(())
    }

    /// record a payment dated with system time
    pub fn record_payment_now(&mut self, amount: Option<Money>) -> Result<()> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.record_payment(None, amount, &time)
    }

    /// debit the scheduled PMT from the account, then record the payment
    ///
    /// Account failures propagate unchanged and nothing is recorded.
    pub fn collect_from_account(
        &mut self,
        account: &mut dyn Account,
        date: Option<NaiveDate>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        if !self.disbursed {
            return Err(LoanError::NotYetDisbursed);
        }
        if self.status != LoanStatus::Active {
            return Err(LoanError::LoanNotActive {
                status: self.status,
            });
        }

        let pmt = self.payment_amount();
        let description = format!("loan installment {}", self.customer_id);
        account.withdraw_funds(pmt, &description)?;

        self.record_payment(date, Some(pmt), time_provider)
    }

    /// collect the scheduled PMT dated with system time
    pub fn collect_from_account_now(&mut self, account: &mut dyn Account) -> Result<()> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.collect_from_account(account, None, &time)
    }

    /// compare installments paid against installments due by the calendar
    ///
    /// The installment of a partially elapsed month is not yet due: when the
    /// reference day-of-month is earlier than the origination day, one month
    /// is subtracted. An Active loan behind schedule becomes Delinquent; the
    /// transition is one-way.
    pub fn check_delinquency(
        &mut self,
        reference_date: Option<NaiveDate>,
        time_provider: &SafeTimeProvider,
    ) -> LoanStatus {
        use chrono::Datelike;

        let reference = reference_date.unwrap_or_else(|| time_provider.now().date_naive());

        let mut elapsed_months = (reference.year() - self.origination_date.year()) as i64 * 12
            + (reference.month() as i64 - self.origination_date.month() as i64);
        if reference.day() < self.origination_date.day() {
            elapsed_months -= 1;
        }

        let installments_due = elapsed_months.clamp(0, self.installment_count as i64) as u32;

        if self.installments_paid < installments_due && self.status == LoanStatus::Active {
            self.status = LoanStatus::Delinquent;
            self.events.emit(Event::LoanMarkedDelinquent {
                loan_id: self.id,
                installments_due,
                installments_paid: self.installments_paid,
                reference_date: reference,
            });
        }

        self.status
    }

    /// check delinquency against system time
    pub fn check_delinquency_now(&mut self) -> LoanStatus {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.check_delinquency(None, &time)
    }

    /// remaining principal per the schedule and installments paid so far
    pub fn payoff_balance(&self) -> Money {
        if self.installments_paid >= self.installment_count {
            return Money::ZERO;
        }
        self.schedule.balance_after(self.installments_paid)
    }

    /// read-only snapshot as pretty-printed json
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&LoanView::from_loan(self))
            .unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}

/// serializable view of a loan's state
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub customer_id: String,
    pub status: LoanStatus,
    pub principal: Money,
    pub periodic_rate: Rate,
    pub installment_count: u32,
    pub origination_date: NaiveDate,
    pub payment_amount: Money,
    pub installments_paid: u32,
    pub disbursed: bool,
    pub payoff_balance: Money,
    pub ledger: Vec<PaymentRecord>,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            id: loan.id,
            customer_id: loan.customer_id.clone(),
            status: loan.status,
            principal: loan.principal,
            periodic_rate: loan.periodic_rate,
            installment_count: loan.installment_count,
            origination_date: loan.origination_date,
            payment_amount: loan.payment_amount(),
            installments_paid: loan.installments_paid,
            disbursed: loan.disbursed,
            payoff_balance: loan.payoff_balance(),
            ledger: loan.ledger().to_vec(),
        }
    }
}

/// builder for loans
pub struct LoanBuilder {
    customer_id: Option<String>,
    customer_document: Option<String>,
    principal: Option<Money>,
    periodic_rate: Option<Rate>,
    installment_count: Option<u32>,
    origination_date: Option<NaiveDate>,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self {
            customer_id: None,
            customer_document: None,
            principal: None,
            periodic_rate: None,
            installment_count: None,
            origination_date: None,
        }
    }

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// tag the loan with a national identifier (CPF or CNPJ)
    ///
    /// Validated and canonicalized at build time; a CPF becomes the customer
    /// id in XXX.XXX.XXX-XX form, a CNPJ its bare 14 digits.
    pub fn customer_document(mut self, document: impl Into<String>) -> Self {
        self.customer_document = Some(document.into());
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    /// fractional rate per installment period
    pub fn periodic_rate(mut self, rate: Rate) -> Self {
        self.periodic_rate = Some(rate);
        self
    }

    pub fn installment_count(mut self, count: u32) -> Self {
        self.installment_count = Some(count);
        self
    }

    pub fn origination_date(mut self, date: NaiveDate) -> Self {
        self.origination_date = Some(date);
        self
    }

    /// build with system time for the origination-date default
    pub fn build(self) -> Result<Loan> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.build_with_time(&time)
    }

    /// build with an explicit time provider
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let customer_id = match (self.customer_id, self.customer_document) {
            (_, Some(doc)) => document::canonicalize(&doc)?,
            (Some(id), None) => id,
            (None, None) => format!("CUST-{}", &Uuid::new_v4().to_string()[..8]),
        };

        let principal = self.principal.ok_or(LoanError::InvalidLoanTerms {
            message: "principal required".to_string(),
        })?;

        let periodic_rate = self.periodic_rate.ok_or(LoanError::InvalidLoanTerms {
            message: "periodic rate required".to_string(),
        })?;

        let installment_count = self.installment_count.ok_or(LoanError::InvalidLoanTerms {
            message: "installment count required".to_string(),
        })?;

        let origination_date = self
            .origination_date
            .unwrap_or_else(|| time_provider.now().date_naive());

        Loan::originate(
            customer_id,
            principal,
            periodic_rate,
            installment_count,
            origination_date,
        )
    }
}

impl Default for LoanBuilder {
    fn default() -> Self {
        Self::new()
    }
}
