//! Competition data providers
//!
//! This module defines the interface the league runner uses to obtain raw
//! competition records, along with an in-memory implementation and one that
//! reads cached JSON documents from a directory.

use crate::error::{LeagueError, Result};
use crate::normalize::RawCompetition;
use crate::types::CompetitionId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Trait for providing raw competition records
pub trait CompetitionProvider: Send + Sync {
    /// Fetch one competition, including its sub-competitions
    fn fetch_competition(&self, competition_id: CompetitionId) -> Result<RawCompetition>;

    /// Fetch several competitions in the given order
    fn fetch_all(&self, competition_ids: &[CompetitionId]) -> Result<Vec<RawCompetition>> {
        competition_ids
            .iter()
            .map(|id| self.fetch_competition(*id))
            .collect()
    }
}

/// Provider serving competitions held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCompetitionProvider {
    competitions: BTreeMap<CompetitionId, RawCompetition>,
}

impl StaticCompetitionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_competitions(competitions: impl IntoIterator<Item = RawCompetition>) -> Self {
        let mut provider = Self::new();
        for competition in competitions {
            provider.insert(competition);
        }
        provider
    }

    /// Add or replace a competition
    pub fn insert(&mut self, competition: RawCompetition) {
        self.competitions.insert(competition.id, competition);
    }

    pub fn len(&self) -> usize {
        self.competitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitions.is_empty()
    }
}

impl CompetitionProvider for StaticCompetitionProvider {
    fn fetch_competition(&self, competition_id: CompetitionId) -> Result<RawCompetition> {
        self.competitions
            .get(&competition_id)
            .cloned()
            .ok_or_else(|| LeagueError::CompetitionNotFound { competition_id }.into())
    }
}

/// Provider reading `<dir>/<competition id>.json` files
#[derive(Debug, Clone)]
pub struct JsonDirectoryProvider {
    root: PathBuf,
}

impl JsonDirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, competition_id: CompetitionId) -> PathBuf {
        self.root.join(format!("{}.json", competition_id))
    }
}

impl CompetitionProvider for JsonDirectoryProvider {
    fn fetch_competition(&self, competition_id: CompetitionId) -> Result<RawCompetition> {
        let path = self.path_for(competition_id);
        debug!("Loading competition {} from {}", competition_id, path.display());

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LeagueError::CompetitionNotFound { competition_id }.into());
            }
            Err(e) => return Err(e.into()),
        };

        let competition: RawCompetition =
            serde_json::from_str(&contents).map_err(|e| LeagueError::MalformedCompetition {
                competition_id,
                reason: e.to_string(),
            })?;

        if competition.id != competition_id {
            return Err(LeagueError::MalformedCompetition {
                competition_id,
                reason: format!("file holds competition {}", competition.id),
            }
            .into());
        }

        Ok(competition)
    }
}
