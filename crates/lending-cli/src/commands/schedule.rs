use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use lending_core::schedule::{
    build_schedule, InterestMethod, LoanTerms, RepaymentCycle, ScheduleInput,
};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Flat,
    Reducing,
}

impl From<MethodArg> for InterestMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Flat => InterestMethod::Flat,
            MethodArg::Reducing => InterestMethod::Reducing,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CycleArg {
    Once,
    Monthly,
    Weekly,
    Daily,
}

impl From<CycleArg> for RepaymentCycle {
    fn from(c: CycleArg) -> Self {
        match c {
            CycleArg::Once => RepaymentCycle::Once,
            CycleArg::Monthly => RepaymentCycle::Monthly,
            CycleArg::Weekly => RepaymentCycle::Weekly,
            CycleArg::Daily => RepaymentCycle::Daily,
        }
    }
}

/// Arguments for installment schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Duration in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Annual interest rate in percent (12 = 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Disbursement date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Interest method
    #[arg(long, value_enum, default_value = "reducing")]
    pub method: MethodArg,

    /// Repayment cycle
    #[arg(long, value_enum, default_value = "monthly")]
    pub cycle: CycleArg,

    /// Date used to classify overdue installments (defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let today = chrono::Local::now().date_naive();

    let schedule_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        ScheduleInput {
            terms: LoanTerms {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                duration_months: args
                    .months
                    .ok_or("--months is required (or provide --input)")?,
                annual_interest_rate: args
                    .rate
                    .ok_or("--rate is required (or provide --input)")?,
                start_date: args.start_date.unwrap_or(today),
                interest_method: args.method.into(),
                repayment_cycle: args.cycle.into(),
            },
            as_of: args.as_of.unwrap_or(today),
        }
    };

    let result = build_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
