use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::risk::eligibility::{self, EligibilityInput};
use lending_core::risk::scoring;
use lending_core::risk::{CreditProfile, LendingPolicy, RiskTier};

use crate::input;

/// Arguments for borrower risk scoring
#[derive(Args)]
pub struct RiskScoreArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Number of previous loans
    #[arg(long, default_value_t = 0)]
    pub previous_loans: u32,

    /// Number of missed payments on earlier loans
    #[arg(long, default_value_t = 0)]
    pub missed_payments: u32,

    /// Identity document has been verified
    #[arg(long)]
    pub verified: bool,
}

/// Arguments for the eligibility ceiling
#[derive(Args)]
pub struct EligibilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Risk tier (low, medium, high); scored from the profile flags if omitted
    #[arg(long)]
    pub tier: Option<RiskTier>,

    /// Number of previous loans
    #[arg(long)]
    pub previous_loans: Option<u32>,

    /// Number of missed payments on earlier loans
    #[arg(long)]
    pub missed_payments: Option<u32>,

    /// Identity document has been verified
    #[arg(long)]
    pub verified: bool,
}

pub fn run_risk_score(
    args: RiskScoreArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let profile: CreditProfile = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        CreditProfile {
            previous_loan_count: args.previous_loans,
            missed_payment_count: args.missed_payments,
            identity_verified: args.verified,
        }
    };

    let result = scoring::assess_risk(&profile, policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_eligibility(
    args: EligibilityArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let eligibility_input: EligibilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let scored_tier = if args.previous_loans.is_some()
            || args.missed_payments.is_some()
            || args.verified
        {
            let profile = CreditProfile {
                previous_loan_count: args.previous_loans.unwrap_or(0),
                missed_payment_count: args.missed_payments.unwrap_or(0),
                identity_verified: args.verified,
            };
            Some(policy.assess(&profile).tier)
        } else {
            None
        };

        EligibilityInput {
            monthly_income: args
                .monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            risk_tier: args.tier.or(scored_tier),
        }
    };

    let result = eligibility::calculate_eligibility(&eligibility_input, policy)?;
    Ok(serde_json::to_value(result)?)
}
