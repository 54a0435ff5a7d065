//! Rating calculator configuration

use crate::error::Glicko2Error;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the Glicko-2 calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Rating that maps to 0 on the internal scale
    pub standard_rating: f64,
    /// Deviation given to new participants
    pub default_deviation: f64,
    /// Volatility given to new participants
    pub default_volatility: f64,
    /// System constant tau, bounds how far volatility moves per period
    pub volatility_constraint: f64,
    /// Stopping precision epsilon of the volatility solver
    pub convergence_tolerance: f64,
    /// Hard cap on Illinois iterations
    pub max_solver_iterations: usize,
    /// Hard cap on the downward bracket search
    pub max_bracket_steps: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            standard_rating: 1500.0,
            default_deviation: 350.0,
            default_volatility: 0.06,
            volatility_constraint: 0.5,
            convergence_tolerance: 0.000_001,
            max_solver_iterations: 10_000,
            max_bracket_steps: 1_000,
        }
    }
}

impl CalculatorConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.standard_rating.is_finite() {
            return Err(Glicko2Error::Configuration {
                message: "Standard rating must be finite".to_string(),
            }
            .into());
        }

        if !(self.default_deviation.is_finite() && self.default_deviation > 0.0) {
            return Err(Glicko2Error::Configuration {
                message: "Default deviation must be positive".to_string(),
            }
            .into());
        }

        if !(self.default_volatility.is_finite() && self.default_volatility > 0.0) {
            return Err(Glicko2Error::Configuration {
                message: "Default volatility must be positive".to_string(),
            }
            .into());
        }

        if !(self.volatility_constraint.is_finite() && self.volatility_constraint > 0.0) {
            return Err(Glicko2Error::Configuration {
                message: "Volatility constraint (tau) must be positive".to_string(),
            }
            .into());
        }

        if !(self.convergence_tolerance.is_finite() && self.convergence_tolerance > 0.0) {
            return Err(Glicko2Error::Configuration {
                message: "Convergence tolerance must be positive".to_string(),
            }
            .into());
        }

        if self.max_solver_iterations == 0 {
            return Err(Glicko2Error::Configuration {
                message: "Solver iteration cap must be greater than 0".to_string(),
            }
            .into());
        }

        if self.max_bracket_steps == 0 {
            return Err(Glicko2Error::Configuration {
                message: "Bracket search cap must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
