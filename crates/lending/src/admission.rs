//! Order admission decision procedure.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use creditline_core::{CreditError, CreditResult, LoanOrder, OrderStatus, TariffId, UserId};

use crate::rating::{round_rating, OrderIdSource, RandomOrderIds, RatingSampler, UniformRating};

/// Cooldown after a refusal during which re-application for the same tariff
/// is blocked. Two minutes.
pub const REFUSAL_COOLDOWN_MS: i64 = 120_000;

/// Evaluates whether a (user, tariff) pair may become a new `IN_PROGRESS`
/// order and constructs the record when it may.
///
/// The engine is pure over its inputs: the caller supplies the current time
/// and the full list of the user's existing orders, and persists the
/// returned record itself. Tariff existence is checked by the caller before
/// admission; the engine only sees the user's order history.
pub struct AdmissionEngine {
    ids: Arc<dyn OrderIdSource>,
    ratings: Arc<dyn RatingSampler>,
    cooldown: Duration,
}

impl AdmissionEngine {
    pub fn new(ids: Arc<dyn OrderIdSource>, ratings: Arc<dyn RatingSampler>) -> Self {
        Self {
            ids,
            ratings,
            cooldown: Duration::milliseconds(REFUSAL_COOLDOWN_MS),
        }
    }

    /// Engine with production randomness (random v4 ids, uniform ratings).
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(RandomOrderIds), Arc::new(UniformRating))
    }

    /// Decide admission for `(user_id, tariff_id)` at `now` given the user's
    /// existing orders.
    ///
    /// Scans the full list in order and fails on the first blocking record:
    /// a pending application, an approved loan, or a refusal still inside
    /// the cooldown window. A refusal whose cooldown has elapsed does not
    /// block, and must not mask a blocking record later in the list. On
    /// success, returns the constructed (not yet persisted) order.
    pub fn admit(
        &self,
        user_id: UserId,
        tariff_id: TariffId,
        now: DateTime<Utc>,
        existing: &[LoanOrder],
    ) -> CreditResult<LoanOrder> {
        for order in existing.iter().filter(|o| o.tariff_id == tariff_id) {
            match order.status {
                OrderStatus::InProgress => return Err(CreditError::LoanUnderConsideration),
                OrderStatus::Approved => return Err(CreditError::LoanAlreadyApproved),
                OrderStatus::Refused => {
                    // Blocking only while the elapsed time is strictly less
                    // than the window; exactly 120_000 ms admits.
                    if now.signed_duration_since(order.time_update) < self.cooldown {
                        return Err(CreditError::TryLater);
                    }
                }
            }
        }

        let order = LoanOrder {
            order_id: self.ids.next_id(),
            user_id,
            tariff_id,
            credit_rating: round_rating(self.ratings.sample()),
            status: OrderStatus::InProgress,
            time_insert: now,
            time_update: now,
        };
        tracing::debug!(
            order_id = %order.order_id,
            user_id = %user_id,
            tariff_id = %tariff_id,
            "admission passed"
        );
        Ok(order)
    }
}
