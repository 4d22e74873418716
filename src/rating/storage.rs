//! Trusted rating lookup and computed round rating store
//!
//! The trusted ratings come from an external source (a national rating list
//! cached by the fetch collaborator). Computed round ratings are collected
//! here so that a cache-persistence collaborator can store them.

use crate::types::{Competition, CompetitionId, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Source of trusted player ratings
pub trait RatingLookup {
    /// Trusted rating of a player, if one is known
    fn rating(&self, player_id: PlayerId) -> Option<i32>;
}

impl RatingLookup for HashMap<PlayerId, i32> {
    fn rating(&self, player_id: PlayerId) -> Option<i32> {
        self.get(&player_id).copied()
    }
}

impl RatingLookup for BTreeMap<PlayerId, i32> {
    fn rating(&self, player_id: PlayerId) -> Option<i32> {
        self.get(&player_id).copied()
    }
}

/// A computed rating for one player's round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRatingRecord {
    pub competition_id: CompetitionId,
    pub rating: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryRatingStore {
    trusted: BTreeMap<PlayerId, i32>,
    rounds: BTreeMap<PlayerId, Vec<RoundRatingRecord>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trusted(ratings: impl IntoIterator<Item = (PlayerId, i32)>) -> Self {
        Self {
            trusted: ratings.into_iter().collect(),
            rounds: BTreeMap::new(),
        }
    }

    pub fn set_trusted(&mut self, player_id: PlayerId, rating: i32) {
        self.trusted.insert(player_id, rating);
    }

    pub fn trusted_count(&self) -> usize {
        self.trusted.len()
    }

    /// Collect the computed ratings of every round of a competition.
    /// Recording the same round again replaces its earlier record.
    pub fn record_competition(&mut self, competition: &Competition) {
        for round in competition.rounds() {
            for result in &round.results {
                let records = self.rounds.entry(result.player.id).or_default();
                records.retain(|r| r.competition_id != round.id);
                if let Some(rating) = result.rating {
                    records.push(RoundRatingRecord {
                        competition_id: round.id,
                        rating,
                    });
                }
            }
        }
        self.rounds.retain(|_, records| !records.is_empty());
    }

    pub fn round_ratings(&self, player_id: PlayerId) -> &[RoundRatingRecord] {
        self.rounds
            .get(&player_id)
            .map(|records| records.as_slice())
            .unwrap_or(&[])
    }

    pub fn average_round_rating(&self, player_id: PlayerId) -> Option<f64> {
        let records = self.round_ratings(player_id);
        if records.is_empty() {
            return None;
        }
        Some(records.iter().map(|r| f64::from(r.rating)).sum::<f64>() / records.len() as f64)
    }

    /// Players with at least one computed round rating
    pub fn rated_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.rounds.keys().copied()
    }
}

impl RatingLookup for InMemoryRatingStore {
    fn rating(&self, player_id: PlayerId) -> Option<i32> {
        self.trusted.get(&player_id).copied()
    }
}
