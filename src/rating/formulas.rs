//! Glicko-2 formula set
//!
//! The individual formulas are exposed as a trait with default bodies so an
//! alternative rating model can replace one of them (for example the variance
//! term) and hand the result to [`Glicko2Calculator::with_formulas`].
//!
//! [`Glicko2Calculator::with_formulas`]: crate::rating::Glicko2Calculator::with_formulas

use crate::rating::volatility::{SolverSettings, VolatilityProblem};
use std::f64::consts::PI;

/// Ratio between the conventional Glicko scale and the internal Glicko-2 scale
pub const GLICKO2_SCALE: f64 = 173.7178;

/// Formulas used by the calculator, each with the standard Glicko-2 body
pub trait Glicko2Formulas: Send + Sync + std::fmt::Debug {
    /// Divisor converting rating points to the internal scale
    fn scale(&self) -> f64 {
        GLICKO2_SCALE
    }

    /// Weight of an opponent, discounted by the opponent's own deviation
    fn g(&self, phi: f64) -> f64 {
        1.0 / (1.0 + 3.0 * phi * phi / (PI * PI)).sqrt()
    }

    /// Expected score of a player at `mu` against an opponent at `(mu_j, phi_j)`
    fn expected_score(&self, mu: f64, mu_j: f64, phi_j: f64) -> f64 {
        1.0 / (1.0 + (-self.g(phi_j) * (mu - mu_j)).exp())
    }

    /// One game's contribution to the inverse variance
    fn variance_term(&self, g: f64, expected: f64) -> f64 {
        g * g * expected * (1.0 - expected)
    }

    /// One game's contribution to the improvement sum
    fn improvement_term(&self, g: f64, score: f64, expected: f64) -> f64 {
        g * (score - expected)
    }

    /// New volatility for the period
    fn volatility(
        &self,
        problem: &VolatilityProblem,
        settings: &SolverSettings,
    ) -> crate::error::Result<f64> {
        problem.solve(settings).map(|solution| solution.volatility)
    }
}

/// The formulas as published by Glickman
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormulas;

impl Glicko2Formulas for StandardFormulas {}
