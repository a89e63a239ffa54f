pub mod risk;
pub mod schedule;
