//! Credit error taxonomy.

use thiserror::Error;

/// Result type used across the credit domain.
pub type CreditResult<T> = Result<T, CreditError>;

/// Domain-level failure surfaced to the caller.
///
/// Keep this focused on deterministic business failures of the admission
/// procedure and order lifecycle. Storage faults (connectivity, constraint
/// violations) are a distinct infrastructure class and must not leak backend
/// detail; they are folded into [`CreditError::Storage`] at the service
/// boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreditError {
    /// Referenced tariff does not exist in the catalog.
    #[error("tariff not found")]
    TariffNotFound,

    /// A pending (`IN_PROGRESS`) order for the same tariff blocks a new one.
    #[error("loan application already under consideration")]
    LoanUnderConsideration,

    /// An approved loan for the same tariff blocks re-application.
    #[error("loan already approved for this tariff")]
    LoanAlreadyApproved,

    /// A recent refusal is still inside the cooldown window.
    #[error("refused recently, try again later")]
    TryLater,

    /// Status lookup on an order that was never inserted (or was deleted).
    #[error("order not found")]
    OrderNotFound,

    /// Delete target does not exist for the given user.
    #[error("order cannot be deleted")]
    OrderNotDeletable,

    /// An identifier failed to parse at the transport boundary.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Infrastructure fault, surfaced as a generic failure.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl CreditError {
    /// Machine-readable wire code carried in HTTP error responses.
    pub fn code(&self) -> &'static str {
        match self {
            CreditError::TariffNotFound => "TARIFF_NOT_FOUND",
            CreditError::LoanUnderConsideration => "LOAN_CONSIDERATION",
            CreditError::LoanAlreadyApproved => "LOAN_ALREADY_APPROVED",
            CreditError::TryLater => "TRY_LATER",
            CreditError::OrderNotFound => "ORDER_NOT_FOUND",
            CreditError::OrderNotDeletable => "ORDER_IMPOSSIBLE_TO_DELETE",
            CreditError::InvalidId(_) => "invalid_id",
            CreditError::Storage(_) => "storage_error",
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
