//! Glicko-2 rating system
//!
//! This module provides the rated participants, match outcomes, rating periods
//! and the calculator that updates them.

pub mod calculator;
pub mod entity;
pub mod formulas;
pub mod outcome;
pub mod period;
pub mod volatility;

// Re-export commonly used types
pub use calculator::{Game, GameAggregate, Glicko2Calculator};
pub use entity::{Participant, RatingEntity, StagedRating};
pub use formulas::{Glicko2Formulas, StandardFormulas, GLICKO2_SCALE};
pub use outcome::MatchOutcome;
pub use period::{PeriodReport, RatingPeriod};
pub use volatility::{SolverSettings, VolatilityProblem, VolatilitySolution};
