use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::eligibility::EligibilityMultipliers;
use super::scoring::{CreditProfile, RiskAssessment, ScoringModel, TierThresholds};
use crate::error::LendingError;
use crate::LendingResult;

/// Every tunable number the risk engine uses. Missing sections and
/// fields fall back to the standard values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    pub scoring: ScoringModel,
    pub tiers: TierThresholds,
    pub eligibility: EligibilityMultipliers,
}

impl LendingPolicy {
    pub fn validate(&self) -> LendingResult<()> {
        let t = &self.tiers;
        for (field, value) in [("tiers.high_above", t.high_above), ("tiers.medium_above", t.medium_above)] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(LendingError::InvalidInput {
                    field: field.into(),
                    reason: "Threshold must lie in [0, 1]".into(),
                });
            }
        }
        if t.medium_above > t.high_above {
            return Err(LendingError::InvalidInput {
                field: "tiers".into(),
                reason: "medium_above must not exceed high_above".into(),
            });
        }

        let m = &self.eligibility;
        for (field, value) in [
            ("eligibility.low", m.low),
            ("eligibility.medium", m.medium),
            ("eligibility.high", m.high),
            ("eligibility.unassessed", m.unassessed),
        ] {
            if value < Decimal::ZERO {
                return Err(LendingError::InvalidInput {
                    field: field.into(),
                    reason: "Multiplier cannot be negative".into(),
                });
            }
        }
        Ok(())
    }

    pub fn assess(&self, profile: &CreditProfile) -> RiskAssessment {
        let logit = self.scoring.logit(profile);
        let probability = self.scoring.score(profile);
        RiskAssessment {
            logit,
            probability,
            tier: self.tiers.tier_of(probability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(LendingPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_partial_policy_json_keeps_defaults() {
        let policy: LendingPolicy =
            serde_json::from_str(r#"{ "tiers": { "high_above": "0.7" } }"#).unwrap();
        assert_eq!(policy.tiers.high_above, dec!(0.7));
        assert_eq!(policy.tiers.medium_above, dec!(0.25));
        assert_eq!(policy.scoring, ScoringModel::default());
        assert_eq!(policy.eligibility, EligibilityMultipliers::default());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut policy = LendingPolicy::default();
        policy.tiers.medium_above = dec!(0.8);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let mut policy = LendingPolicy::default();
        policy.eligibility.high = dec!(-2);
        assert!(policy.validate().is_err());
    }
}
