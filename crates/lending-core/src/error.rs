use thiserror::Error;

#[derive(Debug, Error)]
pub enum LendingError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Loan not found: {0}")]
    LoanNotFound(String),

    #[error("Installment #{installment_no} not found on loan {loan_id}")]
    InstallmentNotFound { loan_id: String, installment_no: u32 },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LendingError {
    fn from(e: serde_json::Error) -> Self {
        LendingError::SerializationError(e.to_string())
    }
}
