use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanId;

/// all events that can be emitted by a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LoanOriginated {
        loan_id: LoanId,
        customer_id: String,
        principal: Money,
        installment_count: u32,
        origination_date: NaiveDate,
    },
    PrincipalDisbursed {
        loan_id: LoanId,
        amount: Money,
    },
    PaymentRecorded {
        loan_id: LoanId,
        amount: Money,
        installment_number: u32,
        payment_date: NaiveDate,
    },
    LoanPaidOff {
        loan_id: LoanId,
        final_payment_date: NaiveDate,
    },
    LoanMarkedDelinquent {
        loan_id: LoanId,
        installments_due: u32,
        installments_paid: u32,
        reference_date: NaiveDate,
    },
}

/// in-memory event store owned by the loan aggregate
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_event_store_take_drains() {
        let mut store = EventStore::new();
        store.emit(Event::PrincipalDisbursed {
            loan_id: Uuid::new_v4(),
            amount: Money::from_major(1000),
        });

        assert_eq!(store.events().len(), 1);
        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.events().is_empty());
    }
}
