#![cfg(feature = "book")]

use chrono::{NaiveDate, TimeDelta};
use lending_core::book::{
    ActivityKind, ClientDetails, FixedClock, LoanBook, LoanStatus, NewClient, NewCollection,
    NewLoan, SequentialIds, DEFAULT_REMINDER_WINDOW_DAYS,
};
use lending_core::risk::{CreditProfile, LendingPolicy, RiskTier};
use lending_core::schedule::{InstallmentStatus, InterestMethod, LoanTerms, RepaymentCycle};
use lending_core::LendingError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn book_at(today: NaiveDate) -> LoanBook<SequentialIds, FixedClock> {
    LoanBook::with_parts(
        LendingPolicy::default(),
        SequentialIds::new(),
        FixedClock::at_date(today),
    )
}

fn borrower(name: &str, previous: u32, missed: u32, verified: bool) -> NewClient {
    NewClient {
        details: ClientDetails {
            name: name.into(),
            city: "Lahore".into(),
            ..Default::default()
        },
        monthly_income: dec!(4000),
        credit: CreditProfile {
            previous_loan_count: previous,
            missed_payment_count: missed,
            identity_verified: verified,
        },
    }
}

fn loan_for(client_id: &str, start: NaiveDate, months: u32) -> NewLoan {
    NewLoan {
        client_id: client_id.into(),
        loan_type: "Business".into(),
        terms: LoanTerms {
            principal: dec!(6000),
            duration_months: months,
            annual_interest_rate: dec!(12),
            start_date: start,
            interest_method: InterestMethod::Reducing,
            repayment_cycle: RepaymentCycle::Monthly,
        },
    }
}

// ===========================================================================
// Borrowers
// ===========================================================================

#[test]
fn test_verification_toggle_rescores_borrower() {
    let mut book = book_at(date(2024, 5, 1));
    let id = book.add_client(borrower("Sana", 1, 3, false)).unwrap();
    assert_eq!(book.client(&id).unwrap().risk_tier, RiskTier::High);

    book.set_identity_verified(&id, true).unwrap();
    let client = book.client(&id).unwrap();
    assert!(client.credit.identity_verified);
    assert_eq!(client.risk_tier, RiskTier::Medium);

    let latest = book.activity_log().next().unwrap();
    assert_eq!(latest.kind, ActivityKind::Security);
    assert_eq!(latest.message, format!("KYC status changed for client {id} to Verified."));
}

#[test]
fn test_eligibility_follows_tier() {
    let mut book = book_at(date(2024, 5, 1));
    let id = book.add_client(borrower("Omar", 0, 0, true)).unwrap();
    // Low risk: 4000 * 8
    assert_eq!(book.eligibility(&id).unwrap(), dec!(32000));
    assert!(matches!(
        book.eligibility("nobody").unwrap_err(),
        LendingError::ClientNotFound(_)
    ));
}

#[test]
fn test_unknown_client_verification_fails() {
    let mut book = book_at(date(2024, 5, 1));
    assert!(book.set_identity_verified("c42", true).is_err());
}

// ===========================================================================
// Loans and payments
// ===========================================================================

#[test]
fn test_add_loan_generates_schedule_against_clock() {
    let mut book = book_at(date(2024, 3, 20));
    let client = book.add_client(borrower("Hina", 0, 0, true)).unwrap();
    let loan_id = book.add_loan(loan_for(&client, date(2024, 1, 1), 6)).unwrap();

    let loan = book.loan(&loan_id).unwrap();
    assert_eq!(loan.status, LoanStatus::Pending);
    assert_eq!(loan.client_name, "Hina");
    assert_eq!(loan.repayment_schedule.len(), 6);
    // Feb 1 and Mar 1 are already past on Mar 20
    assert_eq!(loan.repayment_schedule[0].status, InstallmentStatus::Overdue);
    assert_eq!(loan.repayment_schedule[1].status, InstallmentStatus::Overdue);
    assert_eq!(loan.repayment_schedule[2].status, InstallmentStatus::Due);
    assert_eq!(book.loans_for_client(&client).count(), 1);
}

#[test]
fn test_paying_every_installment_closes_loan() {
    let mut book = book_at(date(2024, 1, 1));
    let client = book.add_client(borrower("Ali", 2, 0, true)).unwrap();
    let loan_id = book.add_loan(loan_for(&client, date(2024, 1, 1), 3)).unwrap();
    book.update_loan_status(&loan_id, LoanStatus::Active).unwrap();

    book.mark_installment_paid(&loan_id, 1).unwrap();
    book.mark_installment_paid(&loan_id, 2).unwrap();
    assert_eq!(book.loan(&loan_id).unwrap().status, LoanStatus::Active);

    book.clock().advance(TimeDelta::hours(5));
    book.record_collection(NewCollection {
        loan_id: loan_id.clone(),
        installment_no: 3,
        amount_collected: dec!(2040.13),
        collected_by: "Field Officer".into(),
        remarks: None,
    })
    .unwrap();

    let loan = book.loan(&loan_id).unwrap();
    assert_eq!(loan.status, LoanStatus::Paid);
    assert!(loan.repayment_schedule.iter().all(|i| i.is_paid()));
    assert_eq!(
        loan.repayment_schedule[2].paid_at,
        Some(date(2024, 1, 1).and_hms_opt(5, 0, 0).unwrap())
    );

    let collections = book.collections();
    assert_eq!(collections.len(), 3);
    assert_eq!(collections[0].collected_by, "System");
    assert_eq!(collections[0].amount_collected, loan.repayment_schedule[0].total_amount);
    assert_eq!(collections[2].collected_by, "Field Officer");
    assert_eq!(book.activity_log().next().unwrap().kind, ActivityKind::Payment);
}

#[test]
fn test_paying_twice_is_rejected() {
    let mut book = book_at(date(2024, 1, 1));
    let client = book.add_client(borrower("Zara", 0, 0, false)).unwrap();
    let loan_id = book.add_loan(loan_for(&client, date(2024, 1, 1), 3)).unwrap();
    book.mark_installment_paid(&loan_id, 1).unwrap();
    assert!(book.mark_installment_paid(&loan_id, 1).is_err());
    assert_eq!(book.collections().len(), 1);
}

#[test]
fn test_missing_loan_and_installment() {
    let mut book = book_at(date(2024, 1, 1));
    let client = book.add_client(borrower("Imran", 0, 0, false)).unwrap();
    let loan_id = book.add_loan(loan_for(&client, date(2024, 1, 1), 3)).unwrap();

    assert!(matches!(
        book.mark_installment_paid("l404", 1).unwrap_err(),
        LendingError::LoanNotFound(_)
    ));
    assert!(matches!(
        book.mark_installment_paid(&loan_id, 9).unwrap_err(),
        LendingError::InstallmentNotFound { installment_no: 9, .. }
    ));
}

// ===========================================================================
// Views
// ===========================================================================

#[test]
fn test_upcoming_repayments_window() {
    let mut book = book_at(date(2024, 2, 25));
    let client = book.add_client(borrower("Nadia", 0, 0, true)).unwrap();

    // Installments due Mar 1, Apr 1, ...
    let active = book.add_loan(loan_for(&client, date(2024, 2, 1), 6)).unwrap();
    book.update_loan_status(&active, LoanStatus::Active).unwrap();
    // First installment due Feb 28
    let second = book.add_loan(loan_for(&client, date(2024, 1, 28), 6)).unwrap();
    book.update_loan_status(&second, LoanStatus::Active).unwrap();
    // Pending loans never show up
    book.add_loan(loan_for(&client, date(2024, 2, 1), 6)).unwrap();

    let upcoming = book.upcoming_repayments(DEFAULT_REMINDER_WINDOW_DAYS);
    let seen: Vec<(String, u32, NaiveDate)> = upcoming
        .iter()
        .map(|r| (r.loan_id.clone(), r.installment_no, r.due_date))
        .collect();
    assert_eq!(
        seen,
        vec![
            (second.clone(), 1, date(2024, 2, 28)),
            (active.clone(), 1, date(2024, 3, 1)),
        ]
    );

    book.mark_installment_paid(&second, 1).unwrap();
    assert_eq!(book.upcoming_repayments(DEFAULT_REMINDER_WINDOW_DAYS).len(), 1);
}

#[test]
fn test_portfolio_stats() {
    let mut book = book_at(date(2024, 1, 1));
    let a = book.add_client(borrower("A", 0, 0, true)).unwrap();
    let b = book.add_client(borrower("B", 0, 4, false)).unwrap();
    let l1 = book.add_loan(loan_for(&a, date(2024, 1, 1), 6)).unwrap();
    let l2 = book.add_loan(loan_for(&b, date(2024, 1, 1), 12)).unwrap();
    book.add_loan(loan_for(&b, date(2024, 1, 1), 12)).unwrap();
    book.update_loan_status(&l1, LoanStatus::Active).unwrap();
    book.update_loan_status(&l2, LoanStatus::Default).unwrap();

    let stats = book.portfolio_stats();
    assert_eq!(stats.total_clients, 2);
    assert_eq!(stats.total_loan_amount, dec!(18000));
    assert_eq!(stats.active_loans, 1);
    assert_eq!(stats.defaulted_loans, 1);
    assert_eq!(stats.loans_by_status.get(&LoanStatus::Pending), Some(&1));
}
