//! The loan book: borrowers, loans, collections and the activity log.
//!
//! Every create/update event runs the engine (scoring on borrowers,
//! schedule generation on loans) and stores the derived fields next to the
//! record. Identifiers and time come from the injected [`IdGenerator`] and
//! [`Clock`].

use chrono::TimeDelta;
use std::collections::{BTreeMap, VecDeque};

use super::clock::{Clock, SystemClock};
use super::ids::{IdGenerator, SequentialIds};
use super::records::*;
use crate::error::LendingError;
use crate::risk::LendingPolicy;
use crate::schedule::{generate_schedule, InstallmentStatus};
use crate::types::Money;
use crate::LendingResult;

/// Reminder window used by the dashboard.
pub const DEFAULT_REMINDER_WINDOW_DAYS: i64 = 7;

const SYSTEM_COLLECTOR: &str = "System";

pub struct LoanBook<I = SequentialIds, C = SystemClock> {
    policy: LendingPolicy,
    ids: I,
    clock: C,
    clients: Vec<Client>,
    loans: Vec<Loan>,
    collections: Vec<Collection>,
    activity: VecDeque<ActivityLogEntry>,
}

impl LoanBook {
    pub fn new() -> Self {
        Self::with_parts(LendingPolicy::default(), SequentialIds::new(), SystemClock)
    }
}

impl Default for LoanBook {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdGenerator, C: Clock> LoanBook<I, C> {
    pub fn with_parts(policy: LendingPolicy, ids: I, clock: C) -> Self {
        Self {
            policy,
            ids,
            clock,
            clients: Vec::new(),
            loans: Vec::new(),
            collections: Vec::new(),
            activity: VecDeque::new(),
        }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // -----------------------------------------------------------------------
    // Borrowers
    // -----------------------------------------------------------------------

    pub fn add_client(&mut self, new: NewClient) -> LendingResult<String> {
        if new.monthly_income < Money::ZERO {
            return Err(LendingError::InvalidInput {
                field: "monthly_income".into(),
                reason: "Monthly income cannot be negative".into(),
            });
        }
        let assessment = self.policy.assess(&new.credit);
        let id = self.ids.next_id("c");
        let client = Client {
            id: id.clone(),
            details: new.details,
            monthly_income: new.monthly_income,
            credit: new.credit,
            risk_score: assessment.probability,
            risk_tier: assessment.tier,
            created_at: self.clock.now(),
        };
        tracing::info!(client_id = %id, tier = %client.risk_tier, "borrower created");

        let message = format!("Created borrower {}.", client.details.name);
        self.clients.push(client);
        self.log(ActivityKind::Create, message);
        Ok(id)
    }

    /// Replace a borrower record. The id and creation time are kept, and
    /// the risk fields are recomputed from the new credit profile.
    pub fn update_client(&mut self, updated: Client) -> LendingResult<()> {
        let assessment = self.policy.assess(&updated.credit);
        let existing = self.client_mut(&updated.id)?;
        let created_at = existing.created_at;
        *existing = Client {
            risk_score: assessment.probability,
            risk_tier: assessment.tier,
            created_at,
            ..updated
        };
        let message = format!("Updated profile for {}.", existing.details.name);
        self.log(ActivityKind::Update, message);
        Ok(())
    }

    /// Toggle KYC verification and re-score the borrower.
    pub fn set_identity_verified(&mut self, client_id: &str, verified: bool) -> LendingResult<()> {
        let client = self
            .clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or_else(|| LendingError::ClientNotFound(client_id.to_string()))?;
        client.credit.identity_verified = verified;
        rescore(client, &self.policy);
        tracing::info!(
            client_id,
            verified,
            tier = %client.risk_tier,
            "identity verification changed"
        );

        let status = if verified { "Verified" } else { "Unverified" };
        self.log(
            ActivityKind::Security,
            format!("KYC status changed for client {client_id} to {status}."),
        );
        Ok(())
    }

    pub fn client(&self, client_id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == client_id)
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    fn client_mut(&mut self, client_id: &str) -> LendingResult<&mut Client> {
        self.clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or_else(|| LendingError::ClientNotFound(client_id.to_string()))
    }

    /// Advisory ceiling for a borrower's next loan.
    pub fn eligibility(&self, client_id: &str) -> LendingResult<Money> {
        let client = self
            .client(client_id)
            .ok_or_else(|| LendingError::ClientNotFound(client_id.to_string()))?;
        self.policy
            .eligibility
            .max_eligible_principal(client.monthly_income, Some(client.risk_tier))
    }

    // -----------------------------------------------------------------------
    // Loans
    // -----------------------------------------------------------------------

    /// Book a loan application for an existing borrower. The schedule is
    /// generated against the clock's current date.
    pub fn add_loan(&mut self, new: NewLoan) -> LendingResult<String> {
        let client_name = self
            .client(&new.client_id)
            .map(|c| c.details.name.clone())
            .ok_or_else(|| LendingError::ClientNotFound(new.client_id.clone()))?;

        let schedule = generate_schedule(&new.terms, self.clock.today())?;
        let id = self.ids.next_id("l");
        tracing::info!(
            loan_id = %id,
            client_id = %new.client_id,
            installments = schedule.len(),
            "loan application created"
        );

        self.loans.push(Loan {
            id: id.clone(),
            client_id: new.client_id,
            client_name: client_name.clone(),
            loan_type: new.loan_type,
            terms: new.terms,
            status: LoanStatus::Pending,
            repayment_schedule: schedule,
        });
        self.log(
            ActivityKind::Create,
            format!("New loan application created for {client_name}."),
        );
        Ok(id)
    }

    pub fn update_loan_status(&mut self, loan_id: &str, status: LoanStatus) -> LendingResult<()> {
        self.loan_mut(loan_id)?.status = status;
        self.log(
            ActivityKind::Update,
            format!("Loan {loan_id} status updated to {status}."),
        );
        Ok(())
    }

    pub fn loan(&self, loan_id: &str) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == loan_id)
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn loans_for_client<'a>(&'a self, client_id: &'a str) -> impl Iterator<Item = &'a Loan> + 'a {
        self.loans.iter().filter(move |l| l.client_id == client_id)
    }

    fn loan_mut(&mut self, loan_id: &str) -> LendingResult<&mut Loan> {
        self.loans
            .iter_mut()
            .find(|l| l.id == loan_id)
            .ok_or_else(|| LendingError::LoanNotFound(loan_id.to_string()))
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    /// Settle an installment for its full scheduled amount on behalf of the
    /// system user. Returns the collection id.
    pub fn mark_installment_paid(&mut self, loan_id: &str, installment_no: u32) -> LendingResult<String> {
        let amount = self
            .loan(loan_id)
            .ok_or_else(|| LendingError::LoanNotFound(loan_id.to_string()))?
            .repayment_schedule
            .iter()
            .find(|i| i.sequence_number == installment_no)
            .map(|i| i.total_amount)
            .ok_or_else(|| LendingError::InstallmentNotFound {
                loan_id: loan_id.to_string(),
                installment_no,
            })?;

        self.record_collection(NewCollection {
            loan_id: loan_id.to_string(),
            installment_no,
            amount_collected: amount,
            collected_by: SYSTEM_COLLECTOR.to_string(),
            remarks: Some("Marked as paid from Dashboard".into()),
        })
    }

    /// Record money collected against an installment and mark it Paid. The
    /// loan itself moves to Paid once every installment is settled.
    pub fn record_collection(&mut self, new: NewCollection) -> LendingResult<String> {
        if new.amount_collected < Money::ZERO {
            return Err(LendingError::InvalidInput {
                field: "amount_collected".into(),
                reason: "Collected amount cannot be negative".into(),
            });
        }

        let now = self.clock.now();
        let loan = self.loan_mut(&new.loan_id)?;
        let installment =
            loan.installment_mut(new.installment_no)
                .ok_or_else(|| LendingError::InstallmentNotFound {
                    loan_id: new.loan_id.clone(),
                    installment_no: new.installment_no,
                })?;
        if installment.is_paid() {
            return Err(LendingError::InvalidInput {
                field: "installment_no".into(),
                reason: format!("Installment #{} is already paid", new.installment_no),
            });
        }
        installment.mark_paid(now);

        if loan.is_fully_paid() {
            loan.status = LoanStatus::Paid;
            tracing::info!(loan_id = %loan.id, "loan fully repaid");
        }
        let client_name = loan.client_name.clone();

        let id = self.ids.next_id("col");
        let message = format!(
            "Payment received for Loan {}, Installment #{} ({}).",
            new.loan_id, new.installment_no, new.amount_collected
        );
        self.collections.push(Collection {
            id: id.clone(),
            loan_id: new.loan_id,
            client_name,
            installment_no: new.installment_no,
            amount_collected: new.amount_collected,
            collected_by: new.collected_by,
            collected_at: now,
            remarks: new.remarks,
        });
        self.log(ActivityKind::Payment, message);
        Ok(id)
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Due installments of active loans falling within `window_days` of
    /// today (both ends inclusive), earliest first.
    pub fn upcoming_repayments(&self, window_days: i64) -> Vec<UpcomingRepayment> {
        let today = self.clock.today();
        let horizon = today + TimeDelta::days(window_days);

        let mut reminders: Vec<UpcomingRepayment> = self
            .loans
            .iter()
            .filter(|l| l.status == LoanStatus::Active)
            .flat_map(|loan| {
                loan.repayment_schedule
                    .iter()
                    .filter(|i| {
                        i.status == InstallmentStatus::Due
                            && i.due_date >= today
                            && i.due_date <= horizon
                    })
                    .map(move |i| UpcomingRepayment {
                        loan_id: loan.id.clone(),
                        installment_no: i.sequence_number,
                        client_name: loan.client_name.clone(),
                        due_date: i.due_date,
                        amount: i.total_amount,
                    })
            })
            .collect();
        reminders.sort_by_key(|r| r.due_date);
        reminders
    }

    pub fn portfolio_stats(&self) -> PortfolioStats {
        let mut loans_by_status = BTreeMap::new();
        for loan in &self.loans {
            *loans_by_status.entry(loan.status).or_insert(0) += 1;
        }
        PortfolioStats {
            total_clients: self.clients.len(),
            total_loan_amount: self.loans.iter().map(|l| l.terms.principal).sum(),
            active_loans: loans_by_status.get(&LoanStatus::Active).copied().unwrap_or(0),
            defaulted_loans: loans_by_status.get(&LoanStatus::Default).copied().unwrap_or(0),
            loans_by_status,
        }
    }

    /// Activity entries, newest first.
    pub fn activity_log(&self) -> impl Iterator<Item = &ActivityLogEntry> {
        self.activity.iter()
    }

    fn log(&mut self, kind: ActivityKind, message: String) {
        let entry = ActivityLogEntry {
            id: self.ids.next_id("log"),
            message,
            timestamp: self.clock.now(),
            kind,
        };
        self.activity.push_front(entry);
    }
}

fn rescore(client: &mut Client, policy: &LendingPolicy) {
    let assessment = policy.assess(&client.credit);
    client.risk_score = assessment.probability;
    client.risk_tier = assessment.tier;
}
