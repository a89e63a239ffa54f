pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "book")]
pub mod book;

pub use error::LendingError;
pub use types::*;

/// Standard result type for all lending operations
pub type LendingResult<T> = Result<T, LendingError>;
