pub mod clock;
pub mod ids;
pub mod records;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdGenerator, SequentialIds};
pub use records::*;
pub use store::{LoanBook, DEFAULT_REMINDER_WINDOW_DAYS};
