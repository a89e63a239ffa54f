//! Borrower default-probability scoring.
//!
//! A fixed-coefficient logistic model over three credit attributes:
//!
//! `logit = intercept + w_prev * previous + w_missed * missed + w_verified * verified`
//!
//! `probability = 1 / (1 + e^(-logit))`, then bucketed into a [`RiskTier`]
//! by two exclusive-lower thresholds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::policy::LendingPolicy;
use crate::time_value::logistic;
use crate::types::{with_metadata, ComputationOutput, Rate};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// The slice of a borrower record the scorer reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditProfile {
    /// Loans the borrower has taken before.
    pub previous_loan_count: u32,
    /// Installments the borrower has missed on earlier loans.
    pub missed_payment_count: u32,
    /// National identity document checked (KYC).
    pub identity_verified: bool,
}

/// Coarse risk bucket derived from the default probability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Medium => write!(f, "Medium"),
            RiskTier::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            other => Err(format!("unknown risk tier '{other}'")),
        }
    }
}

/// Score and tier, always produced together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub logit: Decimal,
    /// Probability of default in [0, 1].
    pub probability: Rate,
    pub tier: RiskTier,
}

// ---------------------------------------------------------------------------
// Model parameters
// ---------------------------------------------------------------------------

/// Logistic-regression coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringModel {
    pub intercept: Decimal,
    pub previous_loan_weight: Decimal,
    pub missed_payment_weight: Decimal,
    /// Negative: a verified identity lowers risk.
    pub identity_verified_weight: Decimal,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            intercept: dec!(-2.0),
            previous_loan_weight: dec!(0.2),
            missed_payment_weight: dec!(0.8),
            identity_verified_weight: dec!(-1.0),
        }
    }
}

impl ScoringModel {
    pub fn logit(&self, profile: &CreditProfile) -> Decimal {
        let verified = if profile.identity_verified {
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
        self.intercept
            + self.previous_loan_weight * Decimal::from(profile.previous_loan_count)
            + self.missed_payment_weight * Decimal::from(profile.missed_payment_count)
            + self.identity_verified_weight * verified
    }

    pub fn score(&self, profile: &CreditProfile) -> Rate {
        logistic(self.logit(profile))
    }
}

/// Tier cut-offs. A probability strictly above `high_above` is High,
/// strictly above `medium_above` is Medium, anything else is Low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub high_above: Rate,
    pub medium_above: Rate,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high_above: dec!(0.6),
            medium_above: dec!(0.25),
        }
    }
}

impl TierThresholds {
    pub fn tier_of(&self, probability: Rate) -> RiskTier {
        if probability > self.high_above {
            RiskTier::High
        } else if probability > self.medium_above {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Default probability under the standard model.
pub fn score(profile: &CreditProfile) -> Rate {
    ScoringModel::default().score(profile)
}

/// Risk tier under the standard thresholds.
pub fn tier_of(probability: Rate) -> RiskTier {
    TierThresholds::default().tier_of(probability)
}

/// Score a profile under `policy` and wrap the result in the standard
/// computation envelope.
pub fn assess_risk(
    profile: &CreditProfile,
    policy: &LendingPolicy,
) -> LendingResult<ComputationOutput<RiskAssessment>> {
    let start = Instant::now();
    policy.validate()?;

    let assessment = policy.assess(profile);
    tracing::debug!(
        probability = %assessment.probability,
        tier = %assessment.tier,
        "credit profile scored"
    );

    let mut warnings = Vec::new();
    if !profile.identity_verified {
        warnings.push("Identity not verified; score excludes the verification credit".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Logistic credit scoring",
        &serde_json::json!({
            "profile": profile,
            "model": policy.scoring,
            "thresholds": policy.tiers,
        }),
        warnings,
        elapsed,
        assessment,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(previous: u32, missed: u32, verified: bool) -> CreditProfile {
        CreditProfile {
            previous_loan_count: previous,
            missed_payment_count: missed,
            identity_verified: verified,
        }
    }

    #[test]
    fn test_logit_uses_fixed_coefficients() {
        let model = ScoringModel::default();
        // -2.0 + 0.2*3 + 0.8*2 - 1.0 = -0.8
        assert_eq!(model.logit(&profile(3, 2, true)), dec!(-0.8));
        assert_eq!(model.logit(&CreditProfile::default()), dec!(-2.0));
    }

    #[test]
    fn test_score_clean_unverified_borrower() {
        // 1 / (1 + e^2) ≈ 0.1192
        let p = score(&profile(0, 0, false));
        assert!((p - dec!(0.1192029)).abs() < dec!(0.000001));
        assert_eq!(tier_of(p), RiskTier::Low);
    }

    #[test]
    fn test_score_heavy_misser_is_high() {
        // logit = -2.0 + 0.8*4 = 1.2 => p ≈ 0.7685
        let p = score(&profile(0, 4, false));
        assert!((p - dec!(0.76852)).abs() < dec!(0.0001));
        assert_eq!(tier_of(p), RiskTier::High);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_of(dec!(0.6)), RiskTier::Medium);
        assert_eq!(tier_of(dec!(0.6000001)), RiskTier::High);
        assert_eq!(tier_of(dec!(0.25)), RiskTier::Low);
        assert_eq!(tier_of(dec!(0.2500001)), RiskTier::Medium);
        assert_eq!(tier_of(Decimal::ZERO), RiskTier::Low);
        assert_eq!(tier_of(Decimal::ONE), RiskTier::High);
    }

    #[test]
    fn test_verification_lowers_score() {
        let unverified = score(&profile(2, 1, false));
        let verified = score(&profile(2, 1, true));
        assert!(verified < unverified);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("HIGH".parse::<RiskTier>().unwrap(), RiskTier::High);
        assert!("severe".parse::<RiskTier>().is_err());
    }

    #[test]
    fn test_assess_risk_envelope() {
        let out = assess_risk(&profile(1, 0, true), &LendingPolicy::default()).unwrap();
        assert_eq!(out.result.tier, tier_of(out.result.probability));
        assert!(out.warnings.is_empty());

        let out = assess_risk(&profile(1, 0, false), &LendingPolicy::default()).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }
}
