//! Pluggable id and rating generation.
//!
//! The admission engine never reaches for global randomness directly; it
//! draws from these capabilities so tests can pin both the minted order id
//! and the sampled rating.

use rand::distributions::OpenClosed01;
use rand::Rng;

use creditline_core::OrderId;

/// Source of fresh order identifiers.
pub trait OrderIdSource: Send + Sync {
    fn next_id(&self) -> OrderId;
}

/// Production id source: random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOrderIds;

impl OrderIdSource for RandomOrderIds {
    fn next_id(&self) -> OrderId {
        OrderId::random()
    }
}

/// Source of credit-rating samples.
///
/// Implementations return a raw sample; the engine applies [`round_rating`]
/// so every stored rating has exactly two decimals.
pub trait RatingSampler: Send + Sync {
    /// Draw a rating in the half-open interval (0.1, 0.9].
    ///
    /// After [`round_rating`] the stored value lies in [0.1, 0.9]: a raw
    /// sample just above the lower bound rounds down onto it.
    fn sample(&self) -> f64;
}

/// Production sampler: uniform over (0.1, 0.9].
///
/// Not a scored risk model; a bounded placeholder until one exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformRating;

impl RatingSampler for UniformRating {
    fn sample(&self) -> f64 {
        // OpenClosed01 is (0, 1], so the result lands in (0.1, 0.9].
        let r: f64 = rand::thread_rng().sample(OpenClosed01);
        0.1 + r * 0.8
    }
}

/// Round a rating to two decimal places (fixed decimal point, not
/// locale-dependent).
pub fn round_rating(raw: f64) -> f64 {
    (raw * 100.0).round() / 100.0
}
