//! Loan-product tariff record.

use serde::{Deserialize, Serialize};

use crate::id::TariffId;

/// A loan product definition users can apply against.
///
/// Immutable once created; owned by a tariff catalog external to this
/// service. The descriptive attributes are opaque to the admission logic,
/// which only cares about tariff identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub id: TariffId,
    pub name: String,
    /// Yearly interest rate, percent.
    pub interest_rate: f64,
    pub term_months: u32,
}
