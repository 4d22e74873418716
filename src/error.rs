//! Error types for the league ranking engine
//!
//! Hard failures only: data-quality problems and skipped units of work are
//! reported through [`crate::warnings::Warnings`] instead.

use crate::types::{CompetitionId, PlayerId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific league scenarios
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error("Competition not found: {competition_id}")]
    CompetitionNotFound { competition_id: CompetitionId },

    #[error("Malformed competition {competition_id}: {reason}")]
    MalformedCompetition {
        competition_id: CompetitionId,
        reason: String,
    },

    #[error("League not found: {name}")]
    LeagueNotFound { name: String },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: PlayerId },

    #[error("Identity merge failed: {reason}")]
    IdentityMergeFailed { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
