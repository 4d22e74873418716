//! Category ranking construction for a single competition

use crate::ranking::category::CategoryMapping;
use crate::types::{Competition, CompetitionId, Player, PlayerId, RoundMarker, RoundResult};
use crate::utils::assign_places;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Sort key of an entry: (total strokes, playoff result)
pub type TieBreak = (i64, i64);

/// Key given to disqualified entries so they sort after everyone else
const DQF_TIE_BREAK: TieBreak = (i64::MAX, i64::MAX);

/// One player's aggregated result in one category of one competition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player: Player,
    pub competition_id: CompetitionId,
    pub category: String,
    pub sum: i32,
    pub diff: i32,
    pub playoff: i32,
    pub rounds: usize,
    pub dqf: bool,
    pub dns: bool,
    /// League points, assigned by the league aggregator
    pub points: u32,
    /// How the points were derived, for audit display
    pub comment: Option<String>,
    /// Counted among the player's best results
    pub selected: bool,
    pub place: u32,
}

impl RankingEntry {
    pub fn tie_break(&self) -> TieBreak {
        if self.dqf {
            DQF_TIE_BREAK
        } else {
            (i64::from(self.sum), i64::from(self.playoff))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRanking {
    pub name: String,
    pub entries: Vec<RankingEntry>,
}

impl CategoryRanking {
    /// (place, entry) pairs in ranking order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &RankingEntry)> {
        self.entries.iter().map(|e| (e.place, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All category rankings of one competition, ordered by category name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionRankings {
    pub competition_id: CompetitionId,
    pub competition_name: String,
    pub categories: Vec<CategoryRanking>,
}

impl CompetitionRankings {
    pub fn get(&self, category: &str) -> Option<&CategoryRanking> {
        self.categories.iter().find(|c| c.name == category)
    }
}

/// A round result together with the number of holes of its round
struct Contribution<'a> {
    result: &'a RoundResult,
    track_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RankingBuilder {
    mapping: CategoryMapping,
}

impl RankingBuilder {
    pub fn new(mapping: CategoryMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &CategoryMapping {
        &self.mapping
    }

    /// Build one ranking per category. Grouping goes through ordered maps
    /// and ties are broken by player id, so the output is deterministic.
    pub fn build(&self, competition: &Competition) -> CompetitionRankings {
        let expected_rounds = competition.sub.len();

        let mut groups: BTreeMap<String, BTreeMap<PlayerId, Vec<Contribution<'_>>>> =
            BTreeMap::new();
        for round in competition.rounds() {
            for result in &round.results {
                groups
                    .entry(self.mapping.assign(&result.class_name))
                    .or_default()
                    .entry(result.player.id)
                    .or_default()
                    .push(Contribution {
                        result,
                        track_count: round.tracks.len(),
                    });
            }
        }

        let categories = groups
            .into_iter()
            .map(|(name, players)| {
                let mut entries: Vec<RankingEntry> = players
                    .into_values()
                    .map(|contributions| {
                        build_entry(competition.id, &name, &contributions, expected_rounds)
                    })
                    .collect();

                entries.sort_by_key(|e| (e.tie_break(), e.player.id));
                let keys: Vec<TieBreak> = entries.iter().map(|e| e.tie_break()).collect();
                let places = assign_places(&keys, |previous, key| key > previous);
                for (entry, place) in entries.iter_mut().zip(places) {
                    entry.place = place;
                }

                debug!(
                    "Competition {} category {}: {} entries",
                    competition.id,
                    name,
                    entries.len()
                );
                CategoryRanking { name, entries }
            })
            .collect();

        CompetitionRankings {
            competition_id: competition.id,
            competition_name: competition.name.clone(),
            categories,
        }
    }
}

fn build_entry(
    competition_id: CompetitionId,
    category: &str,
    contributions: &[Contribution<'_>],
    expected_rounds: usize,
) -> RankingEntry {
    let results: Vec<&RoundResult> = contributions.iter().map(|c| c.result).collect();

    let dns = results
        .iter()
        .any(|r| r.marker == Some(RoundMarker::DidNotStart));
    // Explicit markers first, then missed rounds, unfinished rounds and
    // rounds invalidated during normalization.
    let dqf = results.iter().any(|r| r.marker.is_some())
        || results.len() < expected_rounds
        || contributions
            .iter()
            .any(|c| c.result.scores.len() < c.track_count)
        || results.iter().any(|r| !r.valid);

    RankingEntry {
        player: results[0].player.clone(),
        competition_id,
        category: category.to_string(),
        sum: results.iter().map(|r| r.sum()).sum(),
        diff: results.iter().map(|r| r.diff()).sum(),
        playoff: results.iter().filter_map(|r| r.playoff).sum(),
        rounds: results.len(),
        dqf,
        dns,
        points: 0,
        comment: None,
        selected: false,
        place: 0,
    }
}
