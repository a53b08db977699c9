//! Loan order record and its status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{OrderId, TariffId, UserId};

/// Loan order status.
///
/// Closed enumeration in the core; storage keeps a short string column and
/// converts at the boundary so invalid states never reach the admission
/// logic. After creation, transitions (`IN_PROGRESS -> APPROVED/REFUSED`)
/// are performed by an external decision process; this core only assigns
/// the initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    InProgress,
    Approved,
    Refused,
}

impl OrderStatus {
    /// Storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Refused => "REFUSED",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that is not one of the known variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl core::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(OrderStatus::InProgress),
            "APPROVED" => Ok(OrderStatus::Approved),
            "REFUSED" => Ok(OrderStatus::Refused),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A single credit application tied to one user and one tariff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOrder {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub tariff_id: TariffId,
    /// Placeholder risk score in (0.1, 0.9], two decimals. Fixed at
    /// creation, never recomputed.
    pub credit_rating: f64,
    pub status: OrderStatus,
    /// Creation timestamp, immutable.
    pub time_insert: DateTime<Utc>,
    /// Last status-change timestamp; `time_update >= time_insert` always.
    pub time_update: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn status_round_trips_through_storage_string() {
        for status in [OrderStatus::InProgress, OrderStatus::Approved, OrderStatus::Refused] {
            assert_eq!(OrderStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        let err = OrderStatus::from_str("CANCELLED").unwrap_err();
        assert_eq!(err, ParseStatusError("CANCELLED".to_string()));
    }

    #[test]
    fn status_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
