//! Test fixtures and builders for integration testing

#![allow(dead_code)]

use chrono::NaiveDate;
use league_ranker::normalize::{RawCompetition, RawHoleScore, RawResult, RawTrack};
use league_ranker::{CompetitionId, PlayerId};

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, day).unwrap_or_default()
}

pub fn par3_layout(holes: u32) -> Vec<RawTrack> {
    (1..=holes)
        .map(|number| RawTrack {
            number,
            par: 3,
            number_alt: None,
        })
        .collect()
}

/// Spread a round total over `holes` par-3 holes
pub fn holes_for_total(total: i32, holes: usize) -> Vec<Option<i32>> {
    let base = total / holes as i32;
    let extra = (total % holes as i32) as usize;
    (0..holes)
        .map(|i| Some(if i < extra { base + 1 } else { base }))
        .collect()
}

/// A player's round on a par-3 layout; `None` holes have no recorded score
pub fn round(user_id: Option<PlayerId>, name: &str, class_name: &str, holes: &[Option<i32>]) -> RawResult {
    let sum: i32 = holes.iter().flatten().sum();
    let recorded = holes.iter().flatten().count() as i32;
    RawResult {
        user_id,
        name: name.to_string(),
        class_name: class_name.to_string(),
        order_number: None,
        sum,
        diff: sum - 3 * recorded,
        dnf: None,
        playoff: None,
        rating: None,
        holes: holes
            .iter()
            .map(|hole| hole.map(|result| RawHoleScore { result, diff: result - 3 }))
            .collect(),
    }
}

pub fn round_total(user_id: PlayerId, name: &str, class_name: &str, total: i32, holes: usize) -> RawResult {
    round(Some(user_id), name, class_name, &holes_for_total(total, holes))
}

/// Builder for raw competitions on a par-3 layout
pub struct CompetitionBuilder {
    competition: RawCompetition,
    holes: usize,
}

impl CompetitionBuilder {
    pub fn new(id: CompetitionId, holes: u32) -> Self {
        Self {
            competition: RawCompetition {
                id,
                name: format!("League Day {}", id),
                date: date(1 + (id % 28) as u32),
                tracks: par3_layout(holes),
                results: Vec::new(),
                sub_competitions: Vec::new(),
            },
            holes: holes as usize,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.competition.name = name.to_string();
        self
    }

    pub fn result(mut self, result: RawResult) -> Self {
        self.competition.results.push(result);
        self
    }

    /// Add a player's round by total strokes
    pub fn player(self, user_id: PlayerId, name: &str, class_name: &str, total: i32) -> Self {
        let holes = self.holes;
        self.result(round_total(user_id, name, class_name, total, holes))
    }

    pub fn sub_round(mut self, round: RawCompetition) -> Self {
        self.competition.sub_competitions.push(round);
        self
    }

    pub fn build(self) -> RawCompetition {
        self.competition
    }
}

/// An 18-hole par-54 round where every trusted player scores exactly on
/// the line `score = 150 - rating / 10`
pub fn rating_line_round(id: CompetitionId, ratings: &[(PlayerId, i32)]) -> RawCompetition {
    ratings
        .iter()
        .fold(CompetitionBuilder::new(id, 18), |builder, (player, rating)| {
            builder.player(*player, &format!("Rated {}", player), "Open", 150 - rating / 10)
        })
        .build()
}
