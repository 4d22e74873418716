//! League runner
//!
//! Drives one league end to end: fetches every configured competition,
//! normalizes it, optionally rates its rounds, builds the category
//! rankings and aggregates the season standings into a [`LeagueReport`].

use crate::config::{AppConfig, LeagueConfig};
use crate::error::Result;
use crate::league::{CategoryStandings, LeagueAggregator, LeagueStandings};
use crate::normalize::Normalizer;
use crate::players::PlayerRegistry;
use crate::provider::CompetitionProvider;
use crate::ranking::{CompetitionRankings, RankingBuilder};
use crate::rating::{InMemoryRatingStore, RoundRating, RoundRatingEstimator};
use crate::types::{Competition, CompetitionId, RoundResult};
use crate::warnings::{Warning, Warnings};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a league run produced
#[derive(Debug, Clone, Serialize)]
pub struct LeagueReport {
    pub title: String,
    /// Normalized competitions, in configuration order
    pub competitions: Vec<Competition>,
    pub rankings: Vec<CompetitionRankings>,
    pub standings: LeagueStandings,
    pub round_ratings: Vec<RoundRating>,
    pub warnings: Vec<Warning>,
}

impl LeagueReport {
    pub fn standings_for(&self, category: &str) -> Option<&CategoryStandings> {
        self.standings.get(category)
    }

    pub fn competition(&self, competition_id: CompetitionId) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == competition_id)
    }

    /// Round results across the season ordered by rating, highest first.
    /// Rounds without a computed rating fall back to the cached upstream
    /// rating; unrated rounds come last in season order.
    pub fn top_rounds(&self, limit: usize) -> Vec<(&Competition, &RoundResult)> {
        let mut rounds: Vec<(&Competition, &RoundResult)> = self
            .competitions
            .iter()
            .flat_map(|competition| competition.rounds())
            .flat_map(|round| round.results.iter().map(move |result| (round, result)))
            .collect();
        rounds.sort_by(|a, b| b.1.effective_rating().cmp(&a.1.effective_rating()));
        rounds.truncate(limit);
        rounds
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

pub struct LeagueRunner {
    provider: Arc<dyn CompetitionProvider>,
    league: LeagueConfig,
    normalizer: Normalizer,
    builder: RankingBuilder,
    estimator: Option<RoundRatingEstimator>,
    ratings: InMemoryRatingStore,
}

impl LeagueRunner {
    /// Create a runner with default normalization and no round rating
    pub fn new(league: LeagueConfig, provider: Arc<dyn CompetitionProvider>) -> Self {
        let builder = RankingBuilder::new(league.categories.mapping.clone());
        Self {
            provider,
            league,
            normalizer: Normalizer::default(),
            builder,
            estimator: None,
            ratings: InMemoryRatingStore::new(),
        }
    }

    /// Create a runner for a named league of the application configuration
    pub fn from_config(
        config: &AppConfig,
        league_name: &str,
        provider: Arc<dyn CompetitionProvider>,
        ratings: InMemoryRatingStore,
    ) -> Result<Self> {
        let league = config.league(league_name)?.clone();
        league.validate()?;

        let mut runner = Self::new(league, provider)
            .with_normalizer(config.normalizer.normalizer())
            .with_ratings(ratings);
        if config.rating.enabled {
            runner = runner.with_estimator(RoundRatingEstimator::new(config.rating.clone())?);
        }
        Ok(runner)
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_estimator(mut self, estimator: RoundRatingEstimator) -> Self {
        self.estimator = Some(estimator);
        self
    }

    pub fn with_ratings(mut self, ratings: InMemoryRatingStore) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn league(&self) -> &LeagueConfig {
        &self.league
    }

    /// Trusted ratings plus every round rating computed so far
    pub fn ratings(&self) -> &InMemoryRatingStore {
        &self.ratings
    }

    /// Run the league. Only fetch and malformed-data failures abort the
    /// run; everything else ends up in the report's warnings.
    pub fn run(&mut self) -> Result<LeagueReport> {
        info!(
            "Running league '{}' over {} competitions",
            self.league.title,
            self.league.competition_ids.len()
        );

        let mut warnings = Warnings::new();
        let mut registry = PlayerRegistry::new();
        let overrides = self.league.hole_overrides();

        let mut competitions = Vec::with_capacity(self.league.competition_ids.len());
        for competition_id in &self.league.competition_ids {
            let raw = self.provider.fetch_competition(*competition_id)?;
            let competition =
                self.normalizer
                    .normalize_competition(raw, &overrides, &mut registry, &mut warnings)?;
            info!(
                "Loaded {} #{} with {} rounds",
                competition.name,
                competition.id,
                competition.rounds().len()
            );
            competitions.push(competition);
        }

        // Identities merged by a later competition apply to earlier ones too
        for competition in &mut competitions {
            registry.apply_merges(competition);
        }

        let mut round_ratings = Vec::new();
        if let Some(estimator) = &self.estimator {
            for competition in &mut competitions {
                round_ratings.extend(estimator.rate_competition(
                    competition,
                    &self.ratings,
                    &mut warnings,
                ));
                self.ratings.record_competition(competition);
            }
        }

        let rankings: Vec<CompetitionRankings> = competitions
            .iter()
            .map(|competition| self.builder.build(competition))
            .collect();
        let standings =
            LeagueAggregator::aggregate(self.league.settings(), &rankings, &mut warnings);

        if !warnings.is_empty() {
            warn!(
                "League '{}' finished with {} warnings",
                self.league.title,
                warnings.len()
            );
        }
        info!(
            "League '{}' ranked {} players in {} categories",
            self.league.title,
            standings.player_count(),
            standings.categories.len()
        );

        Ok(LeagueReport {
            title: self.league.title.clone(),
            competitions,
            rankings,
            standings,
            round_ratings,
            warnings: warnings.into_vec(),
        })
    }
}
