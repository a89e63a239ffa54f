use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::risk::{CreditProfile, RiskTier};
use crate::schedule::{Installment, LoanTerms};
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Borrowers
// ---------------------------------------------------------------------------

/// Contact and KYC details that do not feed the risk model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientDetails {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// National identity card number.
    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub occupation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    #[serde(flatten)]
    pub details: ClientDetails,
    pub monthly_income: Money,
    #[serde(flatten)]
    pub credit: CreditProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    #[serde(flatten)]
    pub details: ClientDetails,
    pub monthly_income: Money,
    #[serde(flatten)]
    pub credit: CreditProfile,
    pub risk_score: Rate,
    pub risk_tier: RiskTier,
    pub created_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum LoanStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Active,
    Paid,
    Default,
    Processing,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
            LoanStatus::Active => "Active",
            LoanStatus::Paid => "Paid",
            LoanStatus::Default => "Default",
            LoanStatus::Processing => "Processing",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoan {
    pub client_id: String,
    pub loan_type: String,
    #[serde(flatten)]
    pub terms: LoanTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub loan_type: String,
    #[serde(flatten)]
    pub terms: LoanTerms,
    pub status: LoanStatus,
    pub repayment_schedule: Vec<Installment>,
}

impl Loan {
    pub fn is_fully_paid(&self) -> bool {
        self.repayment_schedule.iter().all(Installment::is_paid)
    }

    pub fn installment_mut(&mut self, installment_no: u32) -> Option<&mut Installment> {
        self.repayment_schedule
            .iter_mut()
            .find(|i| i.sequence_number == installment_no)
    }
}

// ---------------------------------------------------------------------------
// Collections and activity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollection {
    pub loan_id: String,
    pub installment_no: u32,
    pub amount_collected: Money,
    pub collected_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub loan_id: String,
    pub client_name: String,
    pub installment_no: u32,
    pub amount_collected: Money,
    pub collected_by: String,
    pub collected_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    Create,
    Update,
    Delete,
    Payment,
    Security,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub kind: ActivityKind,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// An installment falling due soon on an active loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingRepayment {
    pub loan_id: String,
    pub installment_no: u32,
    pub client_name: String,
    pub due_date: NaiveDate,
    pub amount: Money,
}

/// Headline portfolio figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub total_clients: usize,
    pub total_loan_amount: Money,
    pub active_loans: usize,
    pub defaulted_loans: usize,
    pub loans_by_status: BTreeMap<LoanStatus, usize>,
}
