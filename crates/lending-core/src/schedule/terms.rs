use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;
use crate::time_value::add_months;
use crate::types::{Money, Rate};
use crate::LendingResult;

/// How interest is charged over the life of the loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestMethod {
    /// Charged once on the original principal.
    #[serde(alias = "Flat Interest")]
    Flat,
    /// Charged each period on the outstanding balance.
    #[default]
    #[serde(alias = "Reducing Balance")]
    Reducing,
}

/// Repayment cadence requested for the loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentCycle {
    /// Single bullet repayment at maturity.
    Once,
    #[default]
    Monthly,
    /// Accepted, amortised monthly.
    Weekly,
    /// Accepted, amortised monthly.
    Daily,
}

impl std::fmt::Display for RepaymentCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepaymentCycle::Once => write!(f, "Once"),
            RepaymentCycle::Monthly => write!(f, "Monthly"),
            RepaymentCycle::Weekly => write!(f, "Weekly"),
            RepaymentCycle::Daily => write!(f, "Daily"),
        }
    }
}

/// Contractual terms the schedule is generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub duration_months: u32,
    /// Annual rate in percentage points (12 = 12%).
    pub annual_interest_rate: Rate,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub interest_method: InterestMethod,
    #[serde(default)]
    pub repayment_cycle: RepaymentCycle,
}

impl LoanTerms {
    pub fn validate(&self) -> LendingResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(LendingError::InvalidInput {
                field: "principal".into(),
                reason: "Loan principal must be positive".into(),
            });
        }
        if self.duration_months == 0 {
            return Err(LendingError::InvalidInput {
                field: "duration_months".into(),
                reason: "Duration must be at least 1 month".into(),
            });
        }
        if self.annual_interest_rate < Decimal::ZERO {
            return Err(LendingError::InvalidInput {
                field: "annual_interest_rate".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        // Maturity must be a representable date before any schedule is sized.
        add_months(self.start_date, self.duration_months)?;
        Ok(())
    }
}
