//! Top-level configuration
//!
//! This module bundles the calculator parameters, score constants and log level
//! a hosting application hands to the engine, with loading from environment
//! variables or a TOML file.

use crate::config::rating::CalculatorConfig;
use crate::config::scores::OutcomeScores;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub calculator: CalculatorConfig,
    pub scores: OutcomeScores,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            calculator: CalculatorConfig::default(),
            scores: OutcomeScores::default(),
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", name, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.log_level = log_level;
        }

        // Calculator settings
        if let Some(value) = parse_env("GLICKO2_STANDARD_RATING")? {
            config.calculator.standard_rating = value;
        }
        if let Some(value) = parse_env("GLICKO2_DEFAULT_DEVIATION")? {
            config.calculator.default_deviation = value;
        }
        if let Some(value) = parse_env("GLICKO2_DEFAULT_VOLATILITY")? {
            config.calculator.default_volatility = value;
        }
        if let Some(value) = parse_env("GLICKO2_VOLATILITY_CONSTRAINT")? {
            config.calculator.volatility_constraint = value;
        }
        if let Some(value) = parse_env("GLICKO2_CONVERGENCE_TOLERANCE")? {
            config.calculator.convergence_tolerance = value;
        }
        if let Some(value) = parse_env("GLICKO2_MAX_SOLVER_ITERATIONS")? {
            config.calculator.max_solver_iterations = value;
        }
        if let Some(value) = parse_env("GLICKO2_MAX_BRACKET_STEPS")? {
            config.calculator.max_bracket_steps = value;
        }

        // Score constants
        if let Some(value) = parse_env("GLICKO2_WIN_SCORE")? {
            config.scores.win = value;
        }
        if let Some(value) = parse_env("GLICKO2_DRAW_SCORE")? {
            config.scores.draw = value;
        }
        if let Some(value) = parse_env("GLICKO2_LOSS_SCORE")? {
            config.scores.loss = value;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| anyhow!("Invalid TOML configuration: {}", e))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.log_level)),
    }

    config.calculator.validate()?;
    config.scores.validate()?;

    Ok(())
}
