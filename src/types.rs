//! Common types used throughout the league engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for players. Negative values are synthetic ids
/// derived from a player's name (see [`crate::players::PlayerRegistry`]).
pub type PlayerId = i64;

/// Unique identifier for competitions and their rounds
pub type CompetitionId = u64;

/// Score value used as a placeholder for a round without any recorded hole
pub const MISSING_ROUND_SCORE: i32 = 999;

/// Player identity; equality is defined purely by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl std::hash::Hash for Player {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A single hole of a course layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub number: u32,
    pub par: i32,
    pub number_alt: Option<String>,
}

impl Track {
    pub fn new(number: u32, par: i32) -> Self {
        Self {
            number,
            par,
            number_alt: None,
        }
    }
}

/// Outcome of one hole. `result == 0` marks a discarded hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub result: i32,
    pub diff: i32,
}

impl Score {
    pub fn new(result: i32, diff: i32) -> Self {
        Self { result, diff }
    }
}

/// Explicit marker reported upstream for a round that did not finish normally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundMarker {
    Disqualified,
    DidNotStart,
}

impl RoundMarker {
    /// Decode the upstream DNF code: 0 means none, 2 means did not start,
    /// every other value is a disqualification.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => None,
            2 => Some(RoundMarker::DidNotStart),
            _ => Some(RoundMarker::Disqualified),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            RoundMarker::Disqualified => 1,
            RoundMarker::DidNotStart => 2,
        }
    }
}

impl std::fmt::Display for RoundMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundMarker::Disqualified => write!(f, "DQF"),
            RoundMarker::DidNotStart => write!(f, "DNS"),
        }
    }
}

/// One player's result for one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResult {
    pub player: Player,
    pub class_name: String,
    pub scores: Vec<Score>,
    pub order_number: Option<i32>,
    /// Total as reported upstream, kept for cross-checking
    pub submitted_sum: i32,
    pub submitted_diff: i32,
    pub valid: bool,
    pub marker: Option<RoundMarker>,
    pub playoff: Option<i32>,
    /// Rating supplied by the fetch collaborator's cache, if any
    pub external_rating: Option<i32>,
    /// Rating computed by the round rating estimator
    pub rating: Option<i32>,
}

impl RoundResult {
    pub fn new(player: Player, class_name: impl Into<String>) -> Self {
        Self {
            player,
            class_name: class_name.into(),
            scores: Vec::new(),
            order_number: None,
            submitted_sum: 0,
            submitted_diff: 0,
            valid: true,
            marker: None,
            playoff: None,
            external_rating: None,
            rating: None,
        }
    }

    pub fn sum(&self) -> i32 {
        self.scores.iter().map(|s| s.result).sum()
    }

    pub fn diff(&self) -> i32 {
        self.scores.iter().map(|s| s.diff).sum()
    }

    /// Computed rating, falling back to the cached upstream one
    pub fn effective_rating(&self) -> Option<i32> {
        self.rating.or(self.external_rating)
    }
}

/// A competition: either a single round holding results directly, or a
/// multi-round event whose rounds live in `sub`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub date: NaiveDate,
    pub parent_id: Option<CompetitionId>,
    pub tracks: Vec<Track>,
    pub results: Vec<RoundResult>,
    pub sub: Vec<Competition>,
    pub rating_par: Option<i32>,
    pub rating_per_stroke: Option<f64>,
    pub rating_propagators: Option<usize>,
}

impl Competition {
    pub fn new(id: CompetitionId, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            date,
            parent_id: None,
            tracks: Vec::new(),
            results: Vec::new(),
            sub: Vec::new(),
            rating_par: None,
            rating_per_stroke: None,
            rating_propagators: None,
        }
    }

    pub fn par(&self) -> i32 {
        self.tracks.iter().map(|t| t.par).sum()
    }

    pub fn is_multi_round(&self) -> bool {
        !self.sub.is_empty()
    }

    /// The rounds holding actual results: sub-competitions when present,
    /// otherwise the competition itself.
    pub fn rounds(&self) -> Vec<&Competition> {
        if self.sub.is_empty() {
            vec![self]
        } else {
            self.sub.iter().collect()
        }
    }

    pub fn rounds_mut(&mut self) -> Vec<&mut Competition> {
        if self.sub.is_empty() {
            vec![self]
        } else {
            self.sub.iter_mut().collect()
        }
    }

    /// Attach a round, linking it back to this competition
    pub fn push_round(&mut self, mut round: Competition) {
        round.parent_id = Some(self.id);
        self.sub.push(round);
    }

    pub fn clear_rating(&mut self) {
        self.rating_par = None;
        self.rating_per_stroke = None;
        self.rating_propagators = None;
        for result in &mut self.results {
            result.rating = None;
        }
    }
}
