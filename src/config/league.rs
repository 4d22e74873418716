//! Per-league configuration

use crate::league::{LeagueSettings, ScoringMode};
use crate::league::aggregator::DEFAULT_BEST_RESULTS;
use crate::normalize::HoleOverrides;
use crate::ranking::CategoryMapping;
use crate::types::CompetitionId;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Holes to neutralize in one competition (1-based positions)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleOverride {
    pub competition_id: CompetitionId,
    pub holes: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub mapping: CategoryMapping,
    /// Categories that take part in the league; empty accepts all
    pub recognized: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            mapping: CategoryMapping::default(),
            recognized: LeagueSettings::default().recognized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueConfig {
    #[serde(default)]
    pub title: String,
    pub competition_ids: Vec<CompetitionId>,
    #[serde(default = "default_best_n")]
    pub best_n: usize,
    #[serde(default)]
    pub scoring: ScoringMode,
    #[serde(default)]
    pub categories: CategoryConfig,
    #[serde(default)]
    pub ignore_holes: Vec<HoleOverride>,
}

fn default_best_n() -> usize {
    DEFAULT_BEST_RESULTS
}

impl LeagueConfig {
    pub fn new(title: impl Into<String>, competition_ids: Vec<CompetitionId>) -> Self {
        Self {
            title: title.into(),
            competition_ids,
            best_n: DEFAULT_BEST_RESULTS,
            scoring: ScoringMode::default(),
            categories: CategoryConfig::default(),
            ignore_holes: Vec::new(),
        }
    }

    /// Aggregation settings for this league
    pub fn settings(&self) -> LeagueSettings {
        LeagueSettings {
            scoring: self.scoring.clone(),
            best_n: self.best_n,
            recognized: self.categories.recognized.clone(),
        }
    }

    pub fn hole_overrides(&self) -> HoleOverrides {
        let mut overrides = HoleOverrides::new();
        for entry in &self.ignore_holes {
            overrides
                .entry(entry.competition_id)
                .or_default()
                .extend(entry.holes.iter().copied());
        }
        overrides
    }

    pub fn validate(&self) -> Result<()> {
        if self.competition_ids.is_empty() {
            return Err(anyhow!("League '{}' has no competitions", self.title));
        }
        if self.best_n == 0 {
            return Err(anyhow!("best_n must be greater than 0"));
        }
        match &self.scoring {
            ScoringMode::FixedTable { points } if points.is_empty() => {
                return Err(anyhow!("Fixed points table cannot be empty"));
            }
            ScoringMode::Proportional { open_category }
                if !self.categories.recognized.is_empty()
                    && !self.categories.recognized.contains(open_category) =>
            {
                return Err(anyhow!(
                    "Open category {} is not among the recognized categories",
                    open_category
                ));
            }
            _ => {}
        }
        if self
            .ignore_holes
            .iter()
            .any(|entry| entry.holes.contains(&0))
        {
            return Err(anyhow!("Hole numbers to ignore are 1-based"));
        }
        Ok(())
    }
}
