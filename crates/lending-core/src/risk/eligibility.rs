//! Advisory loan ceiling: a multiple of monthly income set by risk tier.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::policy::LendingPolicy;
use super::scoring::RiskTier;
use crate::error::LendingError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LendingResult;

/// Income multipliers per tier. `unassessed` applies to borrowers
/// that have not been scored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityMultipliers {
    pub low: Decimal,
    pub medium: Decimal,
    pub high: Decimal,
    pub unassessed: Decimal,
}

impl Default for EligibilityMultipliers {
    fn default() -> Self {
        Self {
            low: dec!(8),
            medium: dec!(4),
            high: dec!(2),
            unassessed: dec!(5),
        }
    }
}

impl EligibilityMultipliers {
    pub fn multiplier(&self, tier: Option<RiskTier>) -> Decimal {
        match tier {
            Some(RiskTier::Low) => self.low,
            Some(RiskTier::Medium) => self.medium,
            Some(RiskTier::High) => self.high,
            None => self.unassessed,
        }
    }

    pub fn max_eligible_principal(
        &self,
        monthly_income: Money,
        tier: Option<RiskTier>,
    ) -> LendingResult<Money> {
        if monthly_income < Decimal::ZERO {
            return Err(LendingError::InvalidInput {
                field: "monthly_income".into(),
                reason: "Monthly income cannot be negative".into(),
            });
        }
        Ok(monthly_income * self.multiplier(tier))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub monthly_income: Money,
    #[serde(default)]
    pub risk_tier: Option<RiskTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityOutput {
    pub monthly_income: Money,
    pub risk_tier: Option<RiskTier>,
    pub multiplier: Decimal,
    pub max_eligible_principal: Money,
}

/// Maximum principal under the standard multipliers.
pub fn max_eligible_principal(monthly_income: Money, tier: Option<RiskTier>) -> LendingResult<Money> {
    EligibilityMultipliers::default().max_eligible_principal(monthly_income, tier)
}

/// Enveloped eligibility calculation. The ceiling is for display only and
/// never blocks a loan application.
pub fn calculate_eligibility(
    input: &EligibilityInput,
    policy: &LendingPolicy,
) -> LendingResult<ComputationOutput<EligibilityOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let multiplier = policy.eligibility.multiplier(input.risk_tier);
    let ceiling = policy
        .eligibility
        .max_eligible_principal(input.monthly_income, input.risk_tier)?;

    if input.risk_tier.is_none() {
        warnings.push(format!(
            "No risk tier supplied; using the unassessed multiplier ({multiplier}x)"
        ));
    }
    if input.monthly_income.is_zero() {
        warnings.push("Zero monthly income gives a zero ceiling".into());
    }

    let output = EligibilityOutput {
        monthly_income: input.monthly_income,
        risk_tier: input.risk_tier,
        multiplier,
        max_eligible_principal: ceiling,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Income multiple by risk tier",
        &serde_json::json!({ "multipliers": policy.eligibility }),
        warnings,
        elapsed,
        output,
    ))
}
