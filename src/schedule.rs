use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// one row of an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentRow {
    /// 1-based installment number
    pub number: u32,
    pub due_date: NaiveDate,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub total_payment: Money,
    /// remaining principal after this installment is paid
    pub balance_after: Money,
}

/// fixed-payment (PRICE) amortization schedule
///
/// Generated eagerly and never mutated afterwards. Interest and principal
/// portions are rounded to cents per row; the final row absorbs the residual
/// rounding drift by forcing its principal portion to the exact remaining
/// balance and recomputing its total payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub periodic_rate: Rate,
    pub installment_count: u32,
    pub origination_date: NaiveDate,
    pub rows: Vec<InstallmentRow>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// generate the full schedule
    ///
    /// Callers validate terms first: principal > 0, rate >= 0, count > 0.
    pub fn generate(
        principal: Money,
        periodic_rate: Rate,
        installment_count: u32,
        origination_date: NaiveDate,
    ) -> Self {
        let pmt = payment_amount(principal, periodic_rate, installment_count);

        let mut rows = Vec::with_capacity(installment_count as usize);
        let mut balance = principal;

        for number in 1..=installment_count {
            let interest = balance * periodic_rate.as_decimal();
            let (principal_portion, total_payment) = if number == installment_count {
                // force exact closure on the last installment
                (balance, balance + interest)
            } else {
                (pmt - interest, pmt)
            };

            let balance_after = balance - principal_portion;

            rows.push(InstallmentRow {
                number,
                due_date: add_months(origination_date, number),
                interest_portion: interest,
                principal_portion,
                total_payment,
                balance_after,
            });

            balance = balance_after;
        }

        let total_interest = rows
            .iter()
            .map(|r| r.interest_portion)
            .fold(Money::ZERO, |acc, x| acc + x);

        let total_payment = rows
            .iter()
            .map(|r| r.total_payment)
            .fold(Money::ZERO, |acc, x| acc + x);

        Self {
            principal,
            periodic_rate,
            installment_count,
            origination_date,
            rows,
            total_interest,
            total_payment,
        }
    }

    /// fixed installment amount (PMT)
    pub fn payment_amount(&self) -> Money {
        payment_amount(self.principal, self.periodic_rate, self.installment_count)
    }

    /// get row for a 1-based installment number
    pub fn row(&self, number: u32) -> Option<&InstallmentRow> {
        if number == 0 {
            return None;
        }
        self.rows.get((number - 1) as usize)
    }

    /// remaining principal after the given number of installments are paid
    pub fn balance_after(&self, installments_paid: u32) -> Money {
        if installments_paid == 0 {
            return self.principal;
        }
        self.row(installments_paid.min(self.installment_count))
            .map(|r| r.balance_after)
            .unwrap_or(Money::ZERO)
    }
}

/// fixed payment under the annuity formula: P * r(1+r)^n / ((1+r)^n - 1)
///
/// A zero rate degenerates to straight division of the principal.
pub fn payment_amount(principal: Money, periodic_rate: Rate, installment_count: u32) -> Money {
    if installment_count == 0 {
        return principal;
    }

    let r = periodic_rate.as_decimal();
    if r.is_zero() {
        return principal / Decimal::from(installment_count);
    }

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + r;
    for _ in 0..installment_count {
        compound *= base;
    }

    let numerator = principal.as_decimal() * r * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}

/// add calendar months, clamping day-of-month to the target month's last day
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = date.month0() as i64 + months as i64;
    let year = date.year() + (zero_based / 12) as i32;
    let month = (zero_based % 12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));

    // year/month/day are in range by construction
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid date {year}-{month}-{day}"))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
