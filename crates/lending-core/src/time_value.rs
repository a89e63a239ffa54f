use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LendingError;
use crate::types::{Money, Rate};
use crate::LendingResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Convert an annual rate quoted in percentage points (12 = 12%) into the
/// periodic monthly rate as a decimal (0.01).
pub fn monthly_rate(annual_rate_pct: Rate) -> Rate {
    annual_rate_pct / PERCENT / MONTHS_PER_YEAR
}

/// Simple interest on the original principal for one rate period:
/// `principal * rate / 100`.
pub fn flat_interest(principal: Money, annual_rate_pct: Rate) -> Money {
    principal * (annual_rate_pct / PERCENT)
}

/// Level annuity payment that fully amortises `principal` over `nper`
/// periods at `periodic_rate`:
///
/// `M = P * r / (1 - (1+r)^-n)`
///
/// Once `(1+r)^n` leaves the decimal range the discount term is below
/// decimal resolution and `M` converges to `P * r`.
///
/// A zero rate leaves the formula undefined and is reported as
/// [`LendingError::DivisionByZero`]; callers pick their own fallback.
pub fn annuity_payment(principal: Money, periodic_rate: Rate, nper: u32) -> LendingResult<Money> {
    if nper == 0 {
        return Err(LendingError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    let interest_only = principal
        .checked_mul(periodic_rate)
        .ok_or_else(|| LendingError::InvalidInput {
            field: "principal".into(),
            reason: "principal * rate exceeds the decimal range".into(),
        })?;

    let discount = match (Decimal::ONE + periodic_rate).checked_powu(u64::from(nper)) {
        Some(factor) => Decimal::ONE.checked_div(factor).unwrap_or(Decimal::ZERO),
        None => Decimal::ZERO,
    };
    let denominator = Decimal::ONE - discount;

    if denominator.is_zero() {
        return Err(LendingError::DivisionByZero {
            context: "annuity payment factor".into(),
        });
    }

    interest_only
        .checked_div(denominator)
        .ok_or_else(|| LendingError::InvalidInput {
            field: "principal".into(),
            reason: "Annuity payment exceeds the decimal range".into(),
        })
}

/// Standard logistic transform `1 / (1 + e^(-x))`, saturating at 0 and 1
/// where `e^(-x)` leaves the decimal range.
pub fn logistic(x: Decimal) -> Rate {
    match (-x).checked_exp() {
        Some(e) => Decimal::ONE / (Decimal::ONE + e),
        None if x.is_sign_positive() => Decimal::ONE,
        None => Decimal::ZERO,
    }
}

/// Calendar month addition. Day-of-month is clamped to the end of the
/// target month (31 Jan + 1 month = 28/29 Feb).
pub fn add_months(date: NaiveDate, months: u32) -> LendingResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LendingError::DateError(format!("{date} + {months} months is out of range")))
}
