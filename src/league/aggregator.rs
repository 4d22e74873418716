//! Season aggregation across competitions

use crate::league::scoring::{
    borrowed_points, dqf_points, fixed_table_points, proportional_points, PointsAward,
    ScoringMode, MIN_PROPORTIONAL_FIELD,
};
use crate::league::standings::{CategoryStandings, LeagueStandingEntry, LeagueStandings};
use crate::ranking::{CategoryRanking, CompetitionRankings, RankingEntry};
use crate::types::{CompetitionId, PlayerId};
use crate::utils::assign_places;
use crate::warnings::{WarningKind, Warnings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Number of best results counted by default
pub const DEFAULT_BEST_RESULTS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSettings {
    pub scoring: ScoringMode,
    /// How many of a player's results count towards the total
    pub best_n: usize,
    /// Categories that take part in the league; empty accepts every category
    pub recognized: Vec<String>,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            scoring: ScoringMode::default(),
            best_n: DEFAULT_BEST_RESULTS,
            recognized: ["OPEN", "WOMEN", "MASTERS", "JUNIOR"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Accumulates scored competition results and produces the standings.
/// Built fresh for every run.
#[derive(Debug)]
pub struct LeagueAggregator {
    settings: LeagueSettings,
    entries: BTreeMap<String, BTreeMap<PlayerId, LeagueStandingEntry>>,
    competitions: Vec<CompetitionId>,
}

impl LeagueAggregator {
    pub fn new(settings: LeagueSettings) -> Self {
        Self {
            settings,
            entries: BTreeMap::new(),
            competitions: Vec::new(),
        }
    }

    /// Score every competition in order and finalize the standings
    pub fn aggregate(
        settings: LeagueSettings,
        rankings: &[CompetitionRankings],
        warnings: &mut Warnings,
    ) -> LeagueStandings {
        let mut aggregator = Self::new(settings);
        for competition in rankings {
            aggregator.add_competition(competition, warnings);
        }
        aggregator.finalize()
    }

    pub fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    /// Competitions scored so far, in the order they were added
    pub fn competitions(&self) -> &[CompetitionId] {
        &self.competitions
    }

    /// Score one competition's rankings and store the results per player
    pub fn add_competition(&mut self, rankings: &CompetitionRankings, warnings: &mut Warnings) {
        let competition_id = rankings.competition_id;

        let open = match &self.settings.scoring {
            ScoringMode::Proportional { open_category } => match rankings.get(open_category) {
                Some(open) => Some(open),
                None => {
                    warn!(
                        "Competition {} has no {} category - skipping",
                        competition_id, open_category
                    );
                    warnings.push(
                        Some(competition_id),
                        WarningKind::MissingOpenCategory,
                        format!(
                            "{}: no {} category, competition not scored",
                            rankings.competition_name, open_category
                        ),
                    );
                    return;
                }
            },
            ScoringMode::FixedTable { .. } => None,
        };

        self.competitions.push(competition_id);

        for category in &rankings.categories {
            if !self.settings.recognized.is_empty()
                && !self.settings.recognized.contains(&category.name)
            {
                warnings.push(
                    Some(competition_id),
                    WarningKind::UnrecognizedCategory,
                    format!(
                        "{}: category {} is not part of the league ({} entries skipped)",
                        rankings.competition_name,
                        category.name,
                        category.len()
                    ),
                );
                continue;
            }

            debug!(
                "Scoring competition {} category {} ({} entries)",
                competition_id,
                category.name,
                category.len()
            );

            for entry in &category.entries {
                let award = self.award(entry, category, open);
                let mut scored = entry.clone();
                scored.points = award.points;
                scored.comment = Some(award.comment);

                self.entries
                    .entry(category.name.clone())
                    .or_default()
                    .entry(entry.player.id)
                    .or_insert_with(|| {
                        LeagueStandingEntry::new(entry.player.clone(), category.name.clone())
                    })
                    .results
                    .insert(competition_id, scored);
            }
        }
    }

    fn award(
        &self,
        entry: &RankingEntry,
        category: &CategoryRanking,
        open: Option<&CategoryRanking>,
    ) -> PointsAward {
        if entry.dqf {
            return dqf_points();
        }

        match (&self.settings.scoring, open) {
            (ScoringMode::FixedTable { points }, _) => fixed_table_points(entry.place, points),
            (ScoringMode::Proportional { .. }, _) if category.len() >= MIN_PROPORTIONAL_FIELD => {
                proportional_points(entry.place, category.len())
            }
            (ScoringMode::Proportional { .. }, Some(open)) => borrowed_points(entry.sum, open),
            // Unreachable in practice: competitions without an open category
            // are skipped before scoring.
            (ScoringMode::Proportional { .. }, None) => dqf_points(),
        }
    }

    /// Select every player's best results and rank each category by total
    pub fn finalize(self) -> LeagueStandings {
        let best_n = self.settings.best_n;
        let mut remaining = self.entries;

        let mut order: Vec<String> = self.settings.recognized.clone();
        order.extend(
            remaining
                .keys()
                .filter(|name| !self.settings.recognized.contains(name))
                .cloned(),
        );

        let categories = order
            .into_iter()
            .map(|name| {
                info!("Generating ranking: {}", name);
                let mut entries: Vec<LeagueStandingEntry> = remaining
                    .remove(&name)
                    .map(|players| players.into_values().collect())
                    .unwrap_or_default();

                for entry in &mut entries {
                    entry.select_best(best_n);
                }
                entries.sort_by(|a, b| {
                    b.total
                        .cmp(&a.total)
                        .then_with(|| a.player.id.cmp(&b.player.id))
                });

                let totals: Vec<u32> = entries.iter().map(|e| e.total).collect();
                let places = assign_places(&totals, |previous, total| total < previous);
                for (entry, place) in entries.iter_mut().zip(places) {
                    entry.place = place;
                }

                CategoryStandings { name, entries }
            })
            .collect();

        LeagueStandings { categories }
    }
}
