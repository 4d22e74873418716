//! Point scoring rules

use crate::ranking::CategoryRanking;
use crate::utils::round_half_up;
use serde::{Deserialize, Serialize};

/// Points every disqualified entry receives
pub const DQF_POINTS: u32 = 1;

/// Smallest field that is scored on its own under proportional scoring
pub const MIN_PROPORTIONAL_FIELD: usize = 3;

/// How placements turn into league points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScoringMode {
    /// Points proportional to the share of the field beaten; small
    /// categories borrow the field of `open_category`.
    Proportional { open_category: String },
    /// Points looked up by place; places beyond the table score 1
    FixedTable { points: Vec<u32> },
}

impl Default for ScoringMode {
    fn default() -> Self {
        ScoringMode::Proportional {
            open_category: "OPEN".to_string(),
        }
    }
}

/// Points plus a readable derivation of how they were computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsAward {
    pub points: u32,
    pub comment: String,
}

pub fn dqf_points() -> PointsAward {
    PointsAward {
        points: DQF_POINTS,
        comment: format!("DQF = {}", DQF_POINTS),
    }
}

/// `(field - place + 1) * 100 / field`, rounded half up
pub fn proportional_points(place: u32, field_size: usize) -> PointsAward {
    let field = field_size as i64;
    let beaten = field - i64::from(place) + 1;
    let value = (beaten * 100) as f64 / field as f64;
    let points = round_half_up(value).max(0) as u32;

    PointsAward {
        points,
        comment: format!(
            "{} of {} = ({}-{}+1)*(100/{}) = {}*{:.3} = {}",
            place,
            field,
            field,
            place,
            field,
            beaten,
            100.0 / field as f64,
            points
        ),
    }
}

/// 1-based position an entry with `sum` strokes would take in the open
/// category: one past the leading open entries with strictly fewer strokes.
pub fn open_equivalent_position(sum: i32, open: &CategoryRanking) -> usize {
    1 + open.entries.iter().take_while(|e| e.sum < sum).count()
}

/// Points for an entry of an under-subscribed category, scored as if it
/// had played in the open field.
pub fn borrowed_points(sum: i32, open: &CategoryRanking) -> PointsAward {
    let field = open.len() as i64 + 1;
    let position = open_equivalent_position(sum, open) as i64;
    let beaten = field - position + 1;
    let value = (beaten * 100) as f64 / field as f64;
    let points = round_half_up(value).max(1) as u32;

    PointsAward {
        points,
        comment: format!(
            "({}) {} of {} = ({}-{}+1)*(100/{}) = {}*{:.2} = {}",
            open.name,
            position,
            field,
            field,
            position,
            field,
            beaten,
            100.0 / field as f64,
            points
        ),
    }
}

pub fn fixed_table_points(place: u32, table: &[u32]) -> PointsAward {
    match table.get((place as usize).wrapping_sub(1)) {
        Some(points) if place > 0 => PointsAward {
            points: *points,
            comment: format!("place {} = {}", place, points),
        },
        _ => PointsAward {
            points: 1,
            comment: format!("place {} beyond the table = 1", place),
        },
    }
}
