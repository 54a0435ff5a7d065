//! Volatility solver
//!
//! Finds the new volatility by locating the root of Glickman's `f(x)` with the
//! Illinois variant of regula falsi. Both the bracket search and the main
//! iteration are capped, so pathological input ends in a
//! [`Glicko2Error::Convergence`] instead of spinning.

use crate::config::CalculatorConfig;
use crate::error::Glicko2Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Iteration controls for the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// System constant tau
    pub tau: f64,
    /// Stop once the bracket is narrower than this
    pub tolerance: f64,
    pub max_iterations: usize,
    pub max_bracket_steps: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self::from(&CalculatorConfig::default())
    }
}

impl From<&CalculatorConfig> for SolverSettings {
    fn from(config: &CalculatorConfig) -> Self {
        Self {
            tau: config.volatility_constraint,
            tolerance: config.convergence_tolerance,
            max_iterations: config.max_solver_iterations,
            max_bracket_steps: config.max_bracket_steps,
        }
    }
}

/// Inputs of one volatility update, all on the internal scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityProblem {
    /// Pre-period deviation (phi)
    pub phi: f64,
    /// Pre-period volatility (sigma)
    pub sigma: f64,
    /// Estimated improvement (Delta)
    pub delta: f64,
    /// Estimated variance of the rating from game outcomes (v)
    pub variance: f64,
}

/// Root found by the solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilitySolution {
    pub volatility: f64,
    /// Illinois iterations performed
    pub iterations: usize,
    /// Downward bracket steps taken; 0 when the closed-form bracket applied
    pub bracket_steps: usize,
}

impl VolatilityProblem {
    /// `ln(sigma^2)`, the anchor of the objective
    pub fn anchor(&self) -> f64 {
        (self.sigma * self.sigma).ln()
    }

    /// Glickman's `f(x)`, decreasing in `x`
    pub fn objective(&self, x: f64, tau: f64) -> f64 {
        let ex = x.exp();
        let phi_sq = self.phi * self.phi;
        let denom = phi_sq + self.variance + ex;
        let numerator = ex * (self.delta * self.delta - phi_sq - self.variance - ex);

        numerator / (2.0 * denom * denom) - (x - self.anchor()) / (tau * tau)
    }

    fn check_inputs(&self) -> crate::error::Result<()> {
        let positive = |value: f64| value.is_finite() && value > 0.0;

        if !positive(self.phi) || !positive(self.sigma) {
            return Err(Glicko2Error::DegenerateInput {
                reason: format!(
                    "deviation ({}) and volatility ({}) must be positive and finite",
                    self.phi, self.sigma
                ),
            }
            .into());
        }

        if !positive(self.variance) || !self.delta.is_finite() {
            return Err(Glicko2Error::DegenerateInput {
                reason: format!(
                    "variance ({}) must be positive and improvement ({}) finite",
                    self.variance, self.delta
                ),
            }
            .into());
        }

        Ok(())
    }

    fn convergence_error(reason: &str, iterations: usize) -> anyhow::Error {
        Glicko2Error::Convergence {
            reason: reason.to_string(),
            iterations,
        }
        .into()
    }

    /// Initial upper end of the bracket, returned with the number of search steps taken
    fn initial_bracket(&self, settings: &SolverSettings) -> crate::error::Result<(f64, usize)> {
        let a = self.anchor();
        let threshold = self.phi * self.phi + self.variance;
        let delta_sq = self.delta * self.delta;

        if delta_sq > threshold {
            return Ok(((delta_sq - threshold).ln(), 0));
        }

        for k in 1..=settings.max_bracket_steps {
            let candidate = a - k as f64 * settings.tau;
            let value = self.objective(candidate, settings.tau);
            if !value.is_finite() {
                return Err(Self::convergence_error(
                    "objective became non-finite during bracket search",
                    k,
                ));
            }
            if value >= 0.0 {
                return Ok((candidate, k));
            }
        }

        Err(Self::convergence_error(
            "bracket search found no sign change",
            settings.max_bracket_steps,
        ))
    }

    /// Solve for the new volatility
    pub fn solve(&self, settings: &SolverSettings) -> crate::error::Result<VolatilitySolution> {
        self.check_inputs()?;

        let tau = settings.tau;
        let (mut b, bracket_steps) = self.initial_bracket(settings)?;
        let mut a = self.anchor();
        let mut fa = self.objective(a, tau);
        let mut fb = self.objective(b, tau);

        if !fa.is_finite() || !fb.is_finite() {
            return Err(Self::convergence_error(
                "objective is non-finite at the bracket ends",
                0,
            ));
        }

        let mut iterations = 0;
        while (b - a).abs() > settings.tolerance {
            if iterations >= settings.max_iterations {
                return Err(Self::convergence_error(
                    "iteration cap reached before the bracket closed",
                    iterations,
                ));
            }
            iterations += 1;

            let denom = fb - fa;
            let c = a + (a - b) * fa / denom;
            let fc = self.objective(c, tau);
            if denom == 0.0 || !c.is_finite() || !fc.is_finite() {
                return Err(Self::convergence_error(
                    "secant step became non-finite",
                    iterations,
                ));
            }

            if fc * fb <= 0.0 {
                a = b;
                fa = fb;
            } else {
                fa /= 2.0;
            }
            b = c;
            fb = fc;

            trace!(iterations, a, b, fa, fb, "Illinois step");
        }

        let volatility = (a / 2.0).exp();
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(Self::convergence_error(
                "solver produced a non-positive volatility",
                iterations,
            ));
        }

        debug!(
            volatility,
            iterations, bracket_steps, "Volatility solver converged"
        );

        Ok(VolatilitySolution {
            volatility,
            iterations,
            bracket_steps,
        })
    }
}
