use chrono::NaiveDate;
use lending_core::schedule::{
    build_schedule, generate_schedule, InstallmentStatus, InterestMethod, LoanTerms,
    RepaymentCycle, ScheduleInput,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn terms(principal: Decimal, months: u32, rate: Decimal) -> LoanTerms {
    LoanTerms {
        principal,
        duration_months: months,
        annual_interest_rate: rate,
        start_date: date(2024, 1, 1),
        interest_method: InterestMethod::Reducing,
        repayment_cycle: RepaymentCycle::Monthly,
    }
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_bullet_loan_worked_example() {
    let t = LoanTerms {
        interest_method: InterestMethod::Flat,
        repayment_cycle: RepaymentCycle::Once,
        ..terms(dec!(10000), 6, dec!(10))
    };
    let schedule = generate_schedule(&t, date(2024, 1, 1)).unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].due_date, date(2024, 7, 1));
    assert_eq!(schedule[0].interest_portion, dec!(1000));
    assert_eq!(schedule[0].total_amount, dec!(11000));
    assert_eq!(schedule[0].remaining_balance, Decimal::ZERO);
}

#[test]
fn test_zero_rate_worked_example() {
    let t = LoanTerms {
        interest_method: InterestMethod::Flat,
        ..terms(dec!(1200), 12, Decimal::ZERO)
    };
    let schedule = generate_schedule(&t, date(2030, 1, 1)).unwrap();
    assert_eq!(schedule.len(), 12);
    for inst in &schedule {
        assert_eq!(inst.principal_portion, dec!(100));
        assert_eq!(inst.interest_portion, Decimal::ZERO);
        assert_eq!(inst.total_amount, dec!(100));
        // Due dates are all before 2030 but this path never marks Overdue.
        assert_eq!(inst.status, InstallmentStatus::Due);
    }
}

#[test]
fn test_zero_rate_reducing_uneven_split_closes_at_zero() {
    let schedule = generate_schedule(&terms(dec!(1000), 3, Decimal::ZERO), date(2024, 1, 1)).unwrap();
    let principal: Decimal = schedule.iter().map(|i| i.principal_portion).sum();
    assert!((principal - dec!(1000)).abs() < dec!(0.0000001));
    assert!(schedule[0].remaining_balance > dec!(666));
    assert_eq!(schedule[2].remaining_balance, Decimal::ZERO);
}

#[test]
fn test_thirty_year_annuity() {
    // 100,000 at 6% over 360 months => M ≈ 599.55
    let t = terms(dec!(100000), 360, dec!(6));
    let schedule = generate_schedule(&t, date(2024, 1, 1)).unwrap();
    assert_eq!(schedule.len(), 360);
    assert!((schedule[0].total_amount - dec!(599.55)).abs() < dec!(0.01));
    assert_eq!(schedule[0].interest_portion, dec!(500));

    let principal: Decimal = schedule.iter().map(|i| i.principal_portion).sum();
    assert!((principal - t.principal).abs() / t.principal < dec!(0.000001));
    assert_eq!(schedule[359].remaining_balance, Decimal::ZERO);
    assert_eq!(schedule[359].due_date, date(2054, 1, 1));
}

#[test]
fn test_month_end_start_clamps() {
    let t = LoanTerms {
        start_date: date(2024, 1, 31),
        ..terms(dec!(3000), 3, dec!(12))
    };
    let schedule = generate_schedule(&t, date(2024, 1, 1)).unwrap();
    let due: Vec<NaiveDate> = schedule.iter().map(|i| i.due_date).collect();
    assert_eq!(due, vec![date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]);
}

// ===========================================================================
// Overdue classification
// ===========================================================================

#[test]
fn test_past_start_marks_first_installment_overdue() {
    let t = LoanTerms {
        start_date: date(2020, 1, 1),
        ..terms(dec!(5000), 24, dec!(15))
    };
    let schedule = generate_schedule(&t, date(2021, 6, 15)).unwrap();
    assert_eq!(schedule[0].status, InstallmentStatus::Overdue);
    // 2021-07-01 is after as_of
    assert_eq!(schedule[17].due_date, date(2021, 7, 1));
    assert_eq!(schedule[17].status, InstallmentStatus::Due);
    assert_eq!(schedule[16].status, InstallmentStatus::Overdue);
}

#[test]
fn test_future_start_is_all_due() {
    let t = LoanTerms {
        start_date: date(2030, 1, 1),
        ..terms(dec!(5000), 12, dec!(15))
    };
    let schedule = generate_schedule(&t, date(2024, 1, 1)).unwrap();
    assert!(schedule.iter().all(|i| i.status == InstallmentStatus::Due));
}

// ===========================================================================
// Determinism and envelope
// ===========================================================================

#[test]
fn test_same_inputs_same_schedule() {
    let t = terms(dec!(7500), 18, dec!(21.5));
    let as_of = date(2024, 9, 1);
    assert_eq!(
        generate_schedule(&t, as_of).unwrap(),
        generate_schedule(&t, as_of).unwrap()
    );
}

#[test]
fn test_build_schedule_from_json() {
    let json = r#"{
        "principal": "10000",
        "duration_months": 6,
        "annual_interest_rate": "10",
        "start_date": "2024-01-01",
        "interest_method": "Flat Interest",
        "repayment_cycle": "Once",
        "as_of": "2024-01-01"
    }"#;
    let input: ScheduleInput = serde_json::from_str(json).unwrap();
    let out = build_schedule(&input).unwrap();
    assert_eq!(out.result.installment_count, 1);
    assert_eq!(out.result.total_payable, dec!(11000));
    assert_eq!(out.result.total_interest, dec!(1000));
    assert_eq!(out.methodology, "Single bullet repayment");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_invalid_terms_are_errors() {
    let as_of = date(2024, 1, 1);
    assert!(generate_schedule(&terms(Decimal::ZERO, 12, dec!(10)), as_of).is_err());
    assert!(generate_schedule(&terms(dec!(1000), 0, dec!(10)), as_of).is_err());
    assert!(generate_schedule(&terms(dec!(1000), 12, dec!(-1)), as_of).is_err());
}
