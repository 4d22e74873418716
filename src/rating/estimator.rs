//! Robust round rating estimation
//!
//! Two-pass least squares of score against trusted rating: fit every
//! propagator, drop the worst-fitting fraction, refit, and invert the
//! refit line to rate the round's par and every result.

use crate::config::RatingConfig;
use crate::error::Result;
use crate::rating::regression::LinearFit;
use crate::rating::storage::RatingLookup;
use crate::types::{Competition, CompetitionId, MISSING_ROUND_SCORE};
use crate::warnings::{WarningKind, Warnings};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Fewest propagators a round needs to be rated
pub const MIN_PROPAGATORS: usize = 3;

/// Squared residuals at or below this are treated as an exact fit
const RESIDUAL_TOLERANCE: f64 = 1e-9;

/// Ratings within this distance below an integer are floating-point noise
const RATING_EPSILON: f64 = 1e-9;

/// Rating outputs of one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRating {
    pub competition_id: CompetitionId,
    /// Rating of a round played exactly at par
    pub rating_par: i32,
    /// Rating points per stroke
    pub rating_per_stroke: f64,
    pub propagators: usize,
    pub outliers: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RoundRatingEstimator {
    config: RatingConfig,
}

impl RoundRatingEstimator {
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Rate every round of a competition
    pub fn rate_competition(
        &self,
        competition: &mut Competition,
        lookup: &dyn RatingLookup,
        warnings: &mut Warnings,
    ) -> Vec<RoundRating> {
        competition
            .rounds_mut()
            .into_iter()
            .filter_map(|round| self.rate_round(round, lookup, warnings))
            .collect()
    }

    /// Rate one round in place. Returns `None`, leaving every rating field
    /// of the round and its results unset, when the round cannot be rated.
    pub fn rate_round(
        &self,
        round: &mut Competition,
        lookup: &dyn RatingLookup,
        warnings: &mut Warnings,
    ) -> Option<RoundRating> {
        round.clear_rating();
        let par = round.par();
        info!("Processing round {} #{} par {}", round.name, round.id, par);

        let (ratings, scores): (Vec<f64>, Vec<f64>) = round
            .results
            .iter()
            .filter_map(|result| {
                lookup
                    .rating(result.player.id)
                    .filter(|rating| *rating > self.config.min_propagator_rating)
                    .map(|rating| (f64::from(rating), f64::from(par + result.diff())))
            })
            .unzip();
        let propagators = ratings.len();

        info!(
            "Available propagators {} of {}",
            propagators,
            round.results.len()
        );
        if propagators < MIN_PROPAGATORS {
            warn!(
                "Too few propagators for {} #{} - skipping",
                round.name, round.id
            );
            warnings.push(
                Some(round.id),
                WarningKind::InsufficientPropagators,
                format!(
                    "{}: {} propagators, at least {} needed - round not rated",
                    round.name, propagators, MIN_PROPAGATORS
                ),
            );
            return None;
        }

        let Some(first) = LinearFit::fit(&ratings, &scores) else {
            return degenerate(round, warnings);
        };
        debug!(
            "First fit: slope {} intercept {} r {}",
            first.slope, first.intercept, first.r_value
        );

        let outliers = self.outliers(&first, &ratings, &scores);
        let (kept_ratings, kept_scores): (Vec<f64>, Vec<f64>) = ratings
            .iter()
            .zip(&scores)
            .enumerate()
            .filter(|(index, _)| !outliers.contains(index))
            .map(|(_, (rating, score))| (*rating, *score))
            .unzip();
        for index in &outliers {
            debug!(
                "Outlier: rating {} score {} predicted {:.2}",
                ratings[*index],
                scores[*index],
                first.predict(ratings[*index])
            );
        }

        let robust = match LinearFit::fit(&kept_ratings, &kept_scores) {
            Some(fit) if fit.slope != 0.0 && fit.slope.is_finite() => fit,
            _ => return degenerate(round, warnings),
        };

        if robust.slope > 0.0 {
            warn!(
                "Round {} #{}: scores rise with rating (slope {})",
                round.name, round.id, robust.slope
            );
            warnings.push(
                Some(round.id),
                WarningKind::UnexpectedSlope,
                format!(
                    "{}: better-rated players scored worse (slope {:.4}), ratings may be inverted",
                    round.name, robust.slope
                ),
            );
        }

        let rating_par = floor_rating(robust.invert(f64::from(par)));
        let rating_per_stroke = -1.0 / robust.slope;
        info!(
            "Robust round par score {} diff per stroke {:.2} r-val {:.3}",
            rating_par, rating_per_stroke, robust.r_value
        );

        round.rating_par = Some(rating_par);
        round.rating_per_stroke = Some(rating_per_stroke);
        round.rating_propagators = Some(propagators);

        for result in &mut round.results {
            let score = par + result.diff();
            result.rating = if score == MISSING_ROUND_SCORE {
                None
            } else {
                Some(floor_rating(robust.invert(f64::from(score))))
            };
        }

        Some(RoundRating {
            competition_id: round.id,
            rating_par,
            rating_per_stroke,
            propagators,
            outliers: outliers.len(),
        })
    }

    /// Indices of the `outlier_fraction` worst-fitting points (rounded down,
    /// leaving at least two points to refit). Points the fit explains
    /// exactly are never outliers.
    fn outliers(&self, fit: &LinearFit, ratings: &[f64], scores: &[f64]) -> Vec<usize> {
        let count = ((self.config.outlier_fraction * ratings.len() as f64) as usize)
            .min(ratings.len().saturating_sub(2));

        let residuals: Vec<f64> = ratings
            .iter()
            .zip(scores)
            .map(|(rating, score)| (fit.predict(*rating) - score).powi(2))
            .collect();

        let mut order: Vec<usize> = (0..residuals.len()).collect();
        order.sort_by(|a, b| residuals[*b].total_cmp(&residuals[*a]));

        let mut outliers: Vec<usize> = order
            .into_iter()
            .take(count)
            .filter(|index| residuals[*index] > RESIDUAL_TOLERANCE)
            .collect();
        outliers.sort_unstable();
        outliers
    }
}

fn degenerate(round: &Competition, warnings: &mut Warnings) -> Option<RoundRating> {
    warn!(
        "Round {} #{}: propagator scores do not define a rating curve - skipping",
        round.name, round.id
    );
    warnings.push(
        Some(round.id),
        WarningKind::DegenerateFit,
        format!(
            "{}: propagator ratings or scores are too uniform to fit - round not rated",
            round.name
        ),
    );
    None
}

fn floor_rating(value: f64) -> i32 {
    (value + RATING_EPSILON).floor() as i32
}
