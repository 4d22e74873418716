//! Normalization of raw rounds into [`RoundResult`]s

use crate::error::{LeagueError, Result};
use crate::normalize::raw::{RawCompetition, RawResult};
use crate::players::PlayerRegistry;
use crate::types::{
    Competition, CompetitionId, RoundMarker, RoundResult, Score, Track, MISSING_ROUND_SCORE,
};
use crate::warnings::{WarningKind, Warnings};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 1-based hole positions to neutralize, keyed by competition or round id
pub type HoleOverrides = BTreeMap<CompetitionId, BTreeSet<u32>>;

/// What to do with a single hole the player has no score for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingScorePolicy {
    /// Substitute par + 3
    #[serde(rename = "set_par_plus_3")]
    SetParPlus3,
    /// Leave the hole out of the round
    #[serde(rename = "ignore")]
    Ignore,
}

/// What to do with a round the player has no hole scores for at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingRoundPolicy {
    /// Keep the round as invalid with a single 999-stroke placeholder
    #[serde(rename = "set_999")]
    Set999,
    /// Drop the round entirely
    #[serde(rename = "ignore")]
    Ignore,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    on_score_missing: MissingScorePolicy,
    on_round_missing: MissingRoundPolicy,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(MissingScorePolicy::SetParPlus3, MissingRoundPolicy::Set999)
    }
}

impl Normalizer {
    pub fn new(on_score_missing: MissingScorePolicy, on_round_missing: MissingRoundPolicy) -> Self {
        Self {
            on_score_missing,
            on_round_missing,
        }
    }

    /// Normalize a competition and all of its rounds
    pub fn normalize_competition(
        &self,
        raw: RawCompetition,
        overrides: &HoleOverrides,
        registry: &mut PlayerRegistry,
        warnings: &mut Warnings,
    ) -> Result<Competition> {
        self.normalize_tree(raw, None, overrides, registry, warnings)
    }

    fn normalize_tree(
        &self,
        raw: RawCompetition,
        parent_id: Option<CompetitionId>,
        overrides: &HoleOverrides,
        registry: &mut PlayerRegistry,
        warnings: &mut Warnings,
    ) -> Result<Competition> {
        let mut competition = Competition::new(raw.id, raw.name, raw.date);
        competition.parent_id = parent_id;
        competition.tracks = raw
            .tracks
            .into_iter()
            .map(|t| Track {
                number: t.number,
                par: t.par,
                number_alt: t.number_alt,
            })
            .collect();

        let mut ignored = overrides.get(&raw.id).cloned().unwrap_or_default();
        if let Some(parent) = parent_id.and_then(|id| overrides.get(&id)) {
            ignored.extend(parent.iter().copied());
        }

        for raw_result in &raw.results {
            if raw_result.holes.len() > competition.tracks.len() {
                return Err(LeagueError::MalformedCompetition {
                    competition_id: competition.id,
                    reason: format!(
                        "{} reported {} holes on a {}-hole layout",
                        raw_result.name,
                        raw_result.holes.len(),
                        competition.tracks.len()
                    ),
                }
                .into());
            }
            if let Some(result) =
                self.normalize_round(&competition, raw_result, &ignored, registry, warnings)
            {
                competition.results.push(result);
            }
        }

        for raw_round in raw.sub_competitions {
            let round = self.normalize_tree(
                raw_round,
                Some(competition.id),
                overrides,
                registry,
                warnings,
            )?;
            competition.sub.push(round);
        }

        Ok(competition)
    }

    /// Normalize one player's round. Returns `None` when the round has no
    /// hole scores and the missing-round policy drops it.
    pub fn normalize_round(
        &self,
        competition: &Competition,
        raw: &RawResult,
        ignored_holes: &BTreeSet<u32>,
        registry: &mut PlayerRegistry,
        warnings: &mut Warnings,
    ) -> Option<RoundResult> {
        let player = registry.resolve(raw.user_id, &raw.name);
        let context = format!("{} - {}", competition.name, player.name);

        let mut result = RoundResult::new(player, raw.class_name.clone());
        result.order_number = raw.order_number;
        result.submitted_sum = raw.sum;
        result.submitted_diff = raw.diff;
        result.playoff = raw.playoff;
        result.external_rating = raw.rating;
        result.marker = raw.dnf.and_then(RoundMarker::from_code);

        let mut neutralized = false;

        if raw.recorded_holes() == 0 {
            result.valid = false;
            match self.on_round_missing {
                MissingRoundPolicy::Set999 => {
                    warnings.push(
                        Some(competition.id),
                        WarningKind::MissingRound,
                        format!("{}: no hole scores for the round, using {}", context, MISSING_ROUND_SCORE),
                    );
                    result.scores.push(Score::new(
                        MISSING_ROUND_SCORE,
                        MISSING_ROUND_SCORE - competition.par(),
                    ));
                }
                MissingRoundPolicy::Ignore => {
                    warnings.push(
                        Some(competition.id),
                        WarningKind::MissingRound,
                        format!("{}: no hole scores for the round, dropping it", context),
                    );
                    return None;
                }
            }
        } else {
            for (index, track) in competition.tracks.iter().enumerate() {
                let hole = index as u32 + 1;
                let score = if ignored_holes.contains(&hole) {
                    neutralized = true;
                    warnings.push(
                        Some(competition.id),
                        WarningKind::IgnoredHole,
                        format!("{}: hole {} neutralized to par {}", context, hole, track.par),
                    );
                    Score::new(track.par, 0)
                } else {
                    match raw.holes.get(index).copied().flatten() {
                        Some(recorded) => Score::new(recorded.result, recorded.diff),
                        None => self.substitute_missing(track, hole, &context, competition.id, warnings),
                    }
                };

                if score.result > 0 {
                    result.scores.push(score);
                }
            }
        }

        if result.valid && !neutralized && result.submitted_sum != result.sum() {
            warnings.push(
                Some(competition.id),
                WarningKind::SumMismatch,
                format!(
                    "{}: reported total {} differs from computed {}",
                    context,
                    result.submitted_sum,
                    result.sum()
                ),
            );
        }

        if result.marker.is_some() {
            result.valid = false;
        }

        Some(result)
    }

    fn substitute_missing(
        &self,
        track: &Track,
        hole: u32,
        context: &str,
        competition_id: CompetitionId,
        warnings: &mut Warnings,
    ) -> Score {
        match self.on_score_missing {
            MissingScorePolicy::SetParPlus3 => {
                let score = Score::new(track.par + 3, 3);
                warnings.push(
                    Some(competition_id),
                    WarningKind::MissingScore,
                    format!("{}: no score on hole {}, using par+3 = {}", context, hole, score.result),
                );
                score
            }
            MissingScorePolicy::Ignore => {
                warnings.push(
                    Some(competition_id),
                    WarningKind::MissingScore,
                    format!("{}: no score on hole {}, discarding the hole", context, hole),
                );
                Score::new(0, 0)
            }
        }
    }
}
