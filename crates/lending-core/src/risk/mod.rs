pub mod eligibility;
pub mod policy;
pub mod scoring;

pub use eligibility::{calculate_eligibility, max_eligible_principal};
pub use policy::LendingPolicy;
pub use scoring::{assess_risk, score, tier_of, CreditProfile, RiskAssessment, RiskTier};
