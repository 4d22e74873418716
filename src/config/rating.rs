//! Round rating configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Compute round ratings during a league run
    pub enabled: bool,
    /// Players need a trusted rating above this to anchor a round
    pub min_propagator_rating: i32,
    /// Share of worst-fitting propagators dropped before the refit
    pub outlier_fraction: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_propagator_rating: 500,
            outlier_fraction: 0.25,
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.outlier_fraction) {
            return Err(anyhow!(
                "Outlier fraction must be in [0, 1), got {}",
                self.outlier_fraction
            ));
        }
        if self.min_propagator_rating < 0 {
            return Err(anyhow!("Minimum propagator rating cannot be negative"));
        }
        Ok(())
    }
}
