//! Installment schedule generation.
//!
//! Branches, evaluated in order:
//! 1. **Once** -- a single bullet installment at `start + duration` months.
//! 2. **Zero-rate fallback** -- the annuity formula is undefined at r = 0, so
//!    principal and interest are spread evenly over `n` months.
//! 3. **Annuity** -- constant payment `M`, interest on the running balance.
//!
//! No rounding is applied; presentation layers round for display.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::installment::{Installment, InstallmentStatus};
use super::terms::{InterestMethod, LoanTerms, RepaymentCycle};
use crate::error::LendingError;
use crate::time_value::{add_months, annuity_payment, flat_interest, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    /// Calendar date treated as "today" when classifying overdue installments.
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub installments: Vec<Installment>,
    pub installment_count: u32,
    /// Amount of the first installment.
    pub periodic_payment: Money,
    pub total_payable: Money,
    pub total_principal: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Generate the full repayment schedule for `terms`. Installments whose due
/// date falls before `as_of` are classified Overdue on the annuity path.
pub fn generate_schedule(terms: &LoanTerms, as_of: NaiveDate) -> LendingResult<Vec<Installment>> {
    plan_schedule(terms, as_of).map(|(_, installments)| installments)
}

/// Which of the three branches produced a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduleBasis {
    Bullet,
    StraightLine,
    Annuity,
}

impl ScheduleBasis {
    fn methodology(self) -> &'static str {
        match self {
            ScheduleBasis::Bullet => "Single bullet repayment",
            ScheduleBasis::StraightLine => "Straight-line repayment (zero rate)",
            ScheduleBasis::Annuity => "Level annuity amortisation",
        }
    }
}

fn plan_schedule(
    terms: &LoanTerms,
    as_of: NaiveDate,
) -> LendingResult<(ScheduleBasis, Vec<Installment>)> {
    terms.validate()?;

    if terms.repayment_cycle == RepaymentCycle::Once {
        return single_installment(terms).map(|i| (ScheduleBasis::Bullet, vec![i]));
    }

    let r = monthly_rate(terms.annual_interest_rate);
    match annuity_payment(terms.principal, r, terms.duration_months) {
        Ok(payment) => {
            amortising(terms, r, payment, as_of).map(|s| (ScheduleBasis::Annuity, s))
        }
        Err(LendingError::DivisionByZero { .. }) => {
            straight_line(terms).map(|s| (ScheduleBasis::StraightLine, s))
        }
        Err(e) => Err(e),
    }
}

fn single_installment(terms: &LoanTerms) -> LendingResult<Installment> {
    let due_date = add_months(terms.start_date, terms.duration_months)?;
    let one_period = flat_interest(terms.principal, terms.annual_interest_rate);
    let interest = match terms.interest_method {
        InterestMethod::Flat => one_period,
        // One-shot approximation: there is no balance to reduce.
        InterestMethod::Reducing => one_period * Decimal::from(terms.duration_months) / dec!(12),
    };

    Ok(Installment {
        sequence_number: 1,
        due_date,
        total_amount: terms.principal + interest,
        principal_portion: terms.principal,
        interest_portion: interest,
        remaining_balance: Decimal::ZERO,
        status: InstallmentStatus::Due,
        paid_at: None,
    })
}

fn straight_line(terms: &LoanTerms) -> LendingResult<Vec<Installment>> {
    let n = terms.duration_months;
    let n_dec = Decimal::from(n);
    let total_interest = match terms.interest_method {
        InterestMethod::Flat => flat_interest(terms.principal, terms.annual_interest_rate),
        InterestMethod::Reducing => Decimal::ZERO,
    };
    let payment = (terms.principal + total_interest) / n_dec;
    let principal_portion = terms.principal / n_dec;
    let interest_portion = total_interest / n_dec;

    let mut schedule = Vec::with_capacity(n as usize);
    let mut balance = terms.principal;

    for i in 1..=n {
        balance -= principal_portion;
        // Statuses are not classified on this path; every installment is Due.
        schedule.push(Installment {
            sequence_number: i,
            due_date: add_months(terms.start_date, i)?,
            total_amount: payment,
            principal_portion,
            interest_portion,
            remaining_balance: reported_balance(balance, i == n),
            status: InstallmentStatus::Due,
            paid_at: None,
        });
    }

    Ok(schedule)
}

fn amortising(
    terms: &LoanTerms,
    r: Decimal,
    payment: Money,
    as_of: NaiveDate,
) -> LendingResult<Vec<Installment>> {
    let n = terms.duration_months;
    let mut schedule = Vec::with_capacity(n as usize);
    let mut balance = terms.principal;

    for i in 1..=n {
        let interest = balance * r;
        let principal = payment - interest;
        balance -= principal;

        let due_date = add_months(terms.start_date, i)?;
        let status = if due_date < as_of {
            InstallmentStatus::Overdue
        } else {
            InstallmentStatus::Due
        };

        schedule.push(Installment {
            sequence_number: i,
            due_date,
            total_amount: payment,
            principal_portion: principal,
            interest_portion: interest,
            remaining_balance: reported_balance(balance, i == n),
            status,
            paid_at: None,
        });
    }

    Ok(schedule)
}

/// Balances are never reported negative, and the final installment closes
/// the loan exactly (the running balance only carries decimal dust there).
fn reported_balance(balance: Money, is_last: bool) -> Money {
    if is_last {
        Decimal::ZERO
    } else {
        balance.max(Decimal::ZERO)
    }
}

/// Generate a schedule and summarise it in the standard envelope.
pub fn build_schedule(input: &ScheduleInput) -> LendingResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let terms = &input.terms;
    let mut warnings: Vec<String> = Vec::new();

    let (basis, installments) = plan_schedule(terms, input.as_of)?;

    match terms.repayment_cycle {
        RepaymentCycle::Weekly | RepaymentCycle::Daily => warnings.push(format!(
            "{} repayment cycle is amortised monthly",
            terms.repayment_cycle
        )),
        RepaymentCycle::Once | RepaymentCycle::Monthly => {}
    }
    if basis == ScheduleBasis::StraightLine {
        warnings.push(
            "Zero interest rate: straight-line schedule, past-due installments are not marked overdue"
                .into(),
        );
    }

    let total_payable: Money = installments.iter().map(|i| i.total_amount).sum();
    let total_principal: Money = installments.iter().map(|i| i.principal_portion).sum();
    let total_interest: Money = installments.iter().map(|i| i.interest_portion).sum();
    let periodic_payment = installments
        .first()
        .map(|i| i.total_amount)
        .unwrap_or(Decimal::ZERO);

    tracing::debug!(
        installments = installments.len(),
        %total_payable,
        cycle = %terms.repayment_cycle,
        "schedule generated"
    );

    let output = ScheduleOutput {
        installment_count: installments.len() as u32,
        installments,
        periodic_payment,
        total_payable,
        total_principal,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        basis.methodology(),
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_interest_rate": terms.annual_interest_rate.to_string(),
            "duration_months": terms.duration_months,
            "interest_method": terms.interest_method,
            "repayment_cycle": terms.repayment_cycle,
            "as_of": input.as_of,
        }),
        warnings,
        elapsed,
        output,
    ))
}
