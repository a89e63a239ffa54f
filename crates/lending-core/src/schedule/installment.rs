use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentStatus {
    Due,
    Overdue,
    Paid,
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallmentStatus::Due => write!(f, "Due"),
            InstallmentStatus::Overdue => write!(f, "Overdue"),
            InstallmentStatus::Paid => write!(f, "Paid"),
        }
    }
}

/// One scheduled payment. Amounts are fixed at generation time; only
/// `status` and `paid_at` change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub sequence_number: u32,
    pub due_date: NaiveDate,
    pub total_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
    pub status: InstallmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<NaiveDateTime>,
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    pub fn mark_paid(&mut self, at: NaiveDateTime) {
        self.status = InstallmentStatus::Paid;
        self.paid_at = Some(at);
    }
}
