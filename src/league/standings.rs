//! League standings records

use crate::ranking::RankingEntry;
use crate::types::{CompetitionId, Player};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One player's season in one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueStandingEntry {
    pub player: Player,
    pub category: String,
    pub results: BTreeMap<CompetitionId, RankingEntry>,
    /// Sum of the points of the selected best results
    pub total: u32,
    pub place: u32,
}

impl LeagueStandingEntry {
    pub fn new(player: Player, category: impl Into<String>) -> Self {
        Self {
            player,
            category: category.into(),
            results: BTreeMap::new(),
            total: 0,
            place: 0,
        }
    }

    /// Mark the best `count` results as selected and return their point
    /// total. Disqualified results rank below every scored result even
    /// though they carry a point.
    pub fn select_best(&mut self, count: usize) -> u32 {
        let mut ranked: Vec<(u32, CompetitionId)> = self
            .results
            .iter()
            .map(|(id, r)| (if r.dqf { 0 } else { r.points }, *id))
            .collect();
        // Stable: equal results keep competition id order
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        for result in self.results.values_mut() {
            result.selected = false;
        }

        let mut total = 0;
        for (_, id) in ranked.into_iter().take(count) {
            if let Some(result) = self.results.get_mut(&id) {
                result.selected = true;
                total += result.points;
            }
        }

        self.total = total;
        total
    }

    pub fn competitions_played(&self) -> usize {
        self.results.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStandings {
    pub name: String,
    pub entries: Vec<LeagueStandingEntry>,
}

/// The published standings, one list per category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueStandings {
    pub categories: Vec<CategoryStandings>,
}

impl LeagueStandings {
    pub fn get(&self, category: &str) -> Option<&CategoryStandings> {
        self.categories.iter().find(|c| c.name == category)
    }

    pub fn player_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }
}
