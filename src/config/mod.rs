//! Configuration management for the league ranker
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod app;
pub mod league;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, NormalizerSettings, ServiceSettings};
pub use league::{CategoryConfig, HoleOverride, LeagueConfig};
pub use rating::RatingConfig;
