//! `creditline-lending` — the order admission engine.
//!
//! Decides whether a requested (user, tariff) pair may become a new
//! `IN_PROGRESS` loan order given the user's existing orders, and constructs
//! the new record when admission passes. Randomness (order id, credit
//! rating) and the clock are injected so tests can substitute deterministic
//! sources.

pub mod admission;
pub mod rating;

pub use admission::{AdmissionEngine, REFUSAL_COOLDOWN_MS};
pub use rating::{OrderIdSource, RandomOrderIds, RatingSampler, UniformRating, round_rating};
