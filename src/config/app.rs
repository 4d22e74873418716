//! Main application configuration
//!
//! This module defines the primary configuration structures for the league
//! ranker, including TOML file loading, environment variable overrides and
//! validation.

use crate::config::league::LeagueConfig;
use crate::config::rating::RatingConfig;
use crate::error::LeagueError;
use crate::normalize::{MissingRoundPolicy, MissingScorePolicy, Normalizer};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub normalizer: NormalizerSettings,
    #[serde(default)]
    pub rating: RatingConfig,
    /// Leagues by name
    #[serde(default)]
    pub leagues: BTreeMap<String, LeagueConfig>,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Fallback policies for missing data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerSettings {
    pub on_score_missing: MissingScorePolicy,
    pub on_round_missing: MissingRoundPolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "league-ranker".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            on_score_missing: MissingScorePolicy::SetParPlus3,
            on_round_missing: MissingRoundPolicy::Set999,
        }
    }
}

impl NormalizerSettings {
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.on_score_missing, self.on_round_missing)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env_overrides()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        validate_config(&config)?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(min_rating) = env::var("MIN_PROPAGATOR_RATING") {
            self.rating.min_propagator_rating = min_rating
                .parse()
                .map_err(|_| anyhow!("Invalid MIN_PROPAGATOR_RATING value: {}", min_rating))?;
        }
        if let Ok(fraction) = env::var("OUTLIER_FRACTION") {
            self.rating.outlier_fraction = fraction
                .parse()
                .map_err(|_| anyhow!("Invalid OUTLIER_FRACTION value: {}", fraction))?;
        }

        // League settings apply to every configured league
        if let Ok(best_n) = env::var("BEST_RESULTS_COUNT") {
            let best_n: usize = best_n
                .parse()
                .map_err(|_| anyhow!("Invalid BEST_RESULTS_COUNT value: {}", best_n))?;
            for league in self.leagues.values_mut() {
                league.best_n = best_n;
            }
        }

        Ok(())
    }

    /// Look up a league by name
    pub fn league(&self, name: &str) -> Result<&LeagueConfig> {
        self.leagues.get(name).ok_or_else(|| {
            LeagueError::LeagueNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;

    for (name, league) in &config.leagues {
        league
            .validate()
            .map_err(|e| LeagueError::ConfigurationError {
                message: format!("league '{}': {}", name, e),
            })?;
    }

    Ok(())
}
