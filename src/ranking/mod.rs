//! Per-competition category rankings
//!
//! Pools the results of every round of a competition, groups them by
//! category and player, and orders each category by total strokes with
//! disqualified entries last.

pub mod builder;
pub mod category;

// Re-export commonly used types
pub use builder::{CategoryRanking, CompetitionRankings, RankingBuilder, RankingEntry, TieBreak};
pub use category::{CategoryMapping, CategoryRule, CategoryRules};
