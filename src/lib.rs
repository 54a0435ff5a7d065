//! Glicko2 Engine - rating periods for the Glicko-2 rating system
//!
//! This crate records pairwise match outcomes into rating periods and updates
//! every participant's rating, deviation and volatility in one deterministic
//! two-phase (stage, then commit) pass.

pub mod config;
pub mod error;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Glicko2Error, Result};
pub use types::*;

// Re-export key components
pub use config::{AppConfig, CalculatorConfig, OutcomeScores};
pub use rating::{
    Glicko2Calculator, Glicko2Formulas, MatchOutcome, Participant, PeriodReport, RatingEntity,
    RatingPeriod, StandardFormulas,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
