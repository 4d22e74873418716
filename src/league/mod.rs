//! League-wide aggregation
//!
//! Converts per-competition placements into league points, keeps every
//! player's per-competition records and picks the best results into the
//! published standings.

pub mod aggregator;
pub mod scoring;
pub mod standings;

// Re-export commonly used types
pub use aggregator::{LeagueAggregator, LeagueSettings};
pub use scoring::{PointsAward, ScoringMode};
pub use standings::{CategoryStandings, LeagueStandingEntry, LeagueStandings};
