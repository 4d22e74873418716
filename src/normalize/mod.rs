//! Result normalization
//!
//! Converts raw per-hole records delivered by the fetch collaborator into
//! validated per-round results, applying the missing-score and missing-round
//! fallback policies.

pub mod normalizer;
pub mod raw;

// Re-export commonly used types
pub use normalizer::{HoleOverrides, MissingRoundPolicy, MissingScorePolicy, Normalizer};
pub use raw::{RawCompetition, RawHoleScore, RawResult, RawTrack};
