//! `creditline-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the tariff and loan-order records, the order status lifecycle,
//! and the credit error taxonomy surfaced to callers.

pub mod error;
pub mod id;
pub mod order;
pub mod tariff;

pub use error::{CreditError, CreditResult};
pub use id::{OrderId, TariffId, UserId};
pub use order::{LoanOrder, OrderStatus, ParseStatusError};
pub use tariff::Tariff;
