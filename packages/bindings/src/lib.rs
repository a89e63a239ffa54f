use napi::Result as NapiResult;
use napi_derive::napi;

use lending_core::risk::LendingPolicy;
use rust_decimal::Decimal;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional policy document; absent means the standard policy.
fn parse_policy(policy_json: Option<String>) -> NapiResult<LendingPolicy> {
    match policy_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(to_napi_error)
        }
        _ => Ok(LendingPolicy::default()),
    }
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_risk(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: lending_core::risk::CreditProfile =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = lending_core::risk::assess_risk(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Tier label ("Low", "Medium" or "High") for a default probability
/// passed as a decimal string.
#[napi]
pub fn risk_tier(probability: String) -> NapiResult<String> {
    let p: Decimal = probability.trim().parse().map_err(to_napi_error)?;
    Ok(lending_core::risk::tier_of(p).to_string())
}

#[napi]
pub fn calculate_eligibility(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: lending_core::risk::eligibility::EligibilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = lending_core::risk::calculate_eligibility(&input, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input: lending_core::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_core::schedule::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
