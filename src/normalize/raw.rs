//! Raw competition records as parsed from the results service

use crate::types::{CompetitionId, PlayerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCompetition {
    pub id: CompetitionId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub tracks: Vec<RawTrack>,
    #[serde(default)]
    pub results: Vec<RawResult>,
    #[serde(default)]
    pub sub_competitions: Vec<RawCompetition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrack {
    pub number: u32,
    pub par: i32,
    pub number_alt: Option<String>,
}

/// One player's round as reported; `holes` is indexed by track position
/// and holds `None` for holes without a recorded score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResult {
    pub user_id: Option<PlayerId>,
    pub name: String,
    pub class_name: String,
    pub order_number: Option<i32>,
    pub sum: i32,
    pub diff: i32,
    /// Upstream DNF code, see [`crate::types::RoundMarker::from_code`]
    pub dnf: Option<i64>,
    pub playoff: Option<i32>,
    pub rating: Option<i32>,
    #[serde(default)]
    pub holes: Vec<Option<RawHoleScore>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHoleScore {
    pub result: i32,
    pub diff: i32,
}

impl RawResult {
    pub fn recorded_holes(&self) -> usize {
        self.holes.iter().filter(|h| h.is_some()).count()
    }
}
