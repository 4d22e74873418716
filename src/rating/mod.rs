//! Round rating estimation
//!
//! Fits a round's difficulty curve against the trusted ratings of the
//! players who played it ("propagators") and rates every result of the round
//! from that curve.

pub mod estimator;
pub mod regression;
pub mod storage;

// Re-export commonly used types
pub use estimator::{RoundRating, RoundRatingEstimator};
pub use regression::LinearFit;
pub use storage::{InMemoryRatingStore, RatingLookup, RoundRatingRecord};
