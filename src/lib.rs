//! League Ranker - seasonal disc-golf league standings
//!
//! This crate turns per-hole competition results into per-competition
//! category rankings, league points and season standings, and estimates
//! round ratings from the trusted ratings of the players in each round.

pub mod config;
pub mod error;
pub mod league;
pub mod normalize;
pub mod players;
pub mod provider;
pub mod ranking;
pub mod rating;
pub mod runner;
pub mod types;
pub mod utils;
pub mod warnings;

// Re-export commonly used types and traits
pub use error::{LeagueError, Result};
pub use types::*;
pub use warnings::{Warning, WarningKind, Warnings};

// Re-export key components
pub use config::AppConfig;
pub use league::{LeagueAggregator, LeagueStandings};
pub use normalize::Normalizer;
pub use players::PlayerRegistry;
pub use provider::{CompetitionProvider, JsonDirectoryProvider, StaticCompetitionProvider};
pub use ranking::RankingBuilder;
pub use rating::{InMemoryRatingStore, RatingLookup, RoundRatingEstimator};
pub use runner::{LeagueReport, LeagueRunner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
