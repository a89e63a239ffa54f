pub mod generator;
pub mod installment;
pub mod terms;

pub use generator::{build_schedule, generate_schedule, ScheduleInput, ScheduleOutput};
pub use installment::{Installment, InstallmentStatus};
pub use terms::{InterestMethod, LoanTerms, RepaymentCycle};
