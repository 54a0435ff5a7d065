//! Configuration management for the rating engine
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values.

pub mod app;
pub mod rating;
pub mod scores;

// Re-export commonly used types
pub use app::{validate_config, AppConfig};
pub use rating::CalculatorConfig;
pub use scores::OutcomeScores;
