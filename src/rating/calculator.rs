//! Glicko-2 rating calculator
//!
//! This module turns a participant's committed state and the games it played in
//! one rating period into its next state. The calculator is pure: it never
//! touches a [`RatingEntity`](crate::rating::RatingEntity), which keeps the
//! period update free to compute every participant before staging anyone.

use crate::config::CalculatorConfig;
use crate::error::Glicko2Error;
use crate::rating::formulas::{Glicko2Formulas, StandardFormulas};
use crate::rating::volatility::{SolverSettings, VolatilityProblem};
use crate::types::{InternalRating, RatingSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One game from the subject's point of view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Opponent's committed state at the start of the period
    pub opponent: RatingSnapshot,
    /// Score the subject received
    pub score: f64,
}

impl Game {
    pub fn new(opponent: RatingSnapshot, score: f64) -> Self {
        Self { opponent, score }
    }
}

/// Sums accumulated over a participant's games
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameAggregate {
    /// Estimated variance `v`
    pub variance: f64,
    /// `sum g(phi_j) * (s_j - E_j)`
    pub improvement_sum: f64,
}

impl GameAggregate {
    /// Estimated improvement `Delta = v * sum g (s - E)`
    pub fn delta(&self) -> f64 {
        self.variance * self.improvement_sum
    }
}

fn check_state(snapshot: &RatingSnapshot, role: &str) -> crate::error::Result<()> {
    let positive = |value: f64| value.is_finite() && value > 0.0;

    if !snapshot.rating.is_finite() || !positive(snapshot.deviation) || !positive(snapshot.volatility)
    {
        return Err(Glicko2Error::DegenerateInput {
            reason: format!(
                "{} state must have a finite rating and positive deviation and volatility, got {:?}",
                role, snapshot
            ),
        }
        .into());
    }

    Ok(())
}

/// Glicko-2 rating calculator
#[derive(Debug, Clone)]
pub struct Glicko2Calculator<F: Glicko2Formulas = StandardFormulas> {
    config: CalculatorConfig,
    formulas: F,
}

impl Glicko2Calculator<StandardFormulas> {
    /// Create a calculator with the standard formulas
    pub fn new(config: CalculatorConfig) -> crate::error::Result<Self> {
        Self::with_formulas(config, StandardFormulas)
    }
}

impl Default for Glicko2Calculator<StandardFormulas> {
    fn default() -> Self {
        Self {
            config: CalculatorConfig::default(),
            formulas: StandardFormulas,
        }
    }
}

impl<F: Glicko2Formulas> Glicko2Calculator<F> {
    /// Create a calculator with a substituted formula set
    pub fn with_formulas(config: CalculatorConfig, formulas: F) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config, formulas })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn formulas(&self) -> &F {
        &self.formulas
    }

    pub fn solver_settings(&self) -> SolverSettings {
        SolverSettings::from(&self.config)
    }

    /// Get the initial rating for new participants
    pub fn initial_rating(&self) -> RatingSnapshot {
        RatingSnapshot {
            rating: self.config.standard_rating,
            deviation: self.config.default_deviation,
            volatility: self.config.default_volatility,
        }
    }

    /// Convert rating and deviation to the internal scale
    pub fn to_internal(&self, snapshot: &RatingSnapshot) -> InternalRating {
        let scale = self.formulas.scale();
        InternalRating {
            mu: (snapshot.rating - self.config.standard_rating) / scale,
            phi: snapshot.deviation / scale,
        }
    }

    /// Convert internal `(mu, phi)` back to `(rating, deviation)`
    pub fn to_conventional(&self, internal: &InternalRating) -> (f64, f64) {
        let scale = self.formulas.scale();
        (
            internal.mu * scale + self.config.standard_rating,
            internal.phi * scale,
        )
    }

    /// Expected score of `player` against `opponent`, both on the conventional scale
    pub fn expected_score(&self, player: &RatingSnapshot, opponent: &RatingSnapshot) -> f64 {
        let player = self.to_internal(player);
        let opponent = self.to_internal(opponent);
        self.formulas
            .expected_score(player.mu, opponent.mu, opponent.phi)
    }

    /// Accumulate variance and improvement over a non-empty list of games
    pub fn aggregate(
        &self,
        subject: &InternalRating,
        games: &[Game],
    ) -> crate::error::Result<GameAggregate> {
        let mut inverse_variance = 0.0;
        let mut improvement_sum = 0.0;

        for game in games {
            check_state(&game.opponent, "opponent")?;
            if !game.score.is_finite() {
                return Err(Glicko2Error::DegenerateInput {
                    reason: format!("game score must be finite, got {}", game.score),
                }
                .into());
            }

            let opponent = self.to_internal(&game.opponent);
            let g = self.formulas.g(opponent.phi);
            let expected = self
                .formulas
                .expected_score(subject.mu, opponent.mu, opponent.phi);

            inverse_variance += self.formulas.variance_term(g, expected);
            improvement_sum += self.formulas.improvement_term(g, game.score, expected);
        }

        if !(inverse_variance.is_finite() && inverse_variance > 0.0) {
            return Err(Glicko2Error::DegenerateInput {
                reason: format!(
                    "total inverse variance over {} games is {}",
                    games.len(),
                    inverse_variance
                ),
            }
            .into());
        }

        Ok(GameAggregate {
            variance: 1.0 / inverse_variance,
            improvement_sum,
        })
    }

    /// Compute the next state of a participant from its committed state and games
    pub fn compute(
        &self,
        current: &RatingSnapshot,
        games: &[Game],
    ) -> crate::error::Result<RatingSnapshot> {
        check_state(current, "subject")?;

        let scale = self.formulas.scale();
        let internal = self.to_internal(current);
        let sigma = current.volatility;

        if games.is_empty() {
            // Uncertainty grows while a participant sits out
            let phi = (internal.phi * internal.phi + sigma * sigma).sqrt();
            return Ok(RatingSnapshot {
                rating: current.rating,
                deviation: phi * scale,
                volatility: sigma,
            });
        }

        let aggregate = self.aggregate(&internal, games)?;
        let problem = VolatilityProblem {
            phi: internal.phi,
            sigma,
            delta: aggregate.delta(),
            variance: aggregate.variance,
        };
        let new_sigma = self
            .formulas
            .volatility(&problem, &self.solver_settings())?;

        let phi_star = (internal.phi * internal.phi + new_sigma * new_sigma).sqrt();
        let new_phi = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / aggregate.variance).sqrt();
        let new_mu = internal.mu + new_phi * new_phi * aggregate.improvement_sum;

        let (rating, deviation) = self.to_conventional(&InternalRating {
            mu: new_mu,
            phi: new_phi,
        });
        let next = RatingSnapshot {
            rating,
            deviation,
            volatility: new_sigma,
        };

        if check_state(&next, "computed").is_err() {
            return Err(Glicko2Error::DegenerateInput {
                reason: format!("update produced a non-finite state {:?}", next),
            }
            .into());
        }

        debug!(
            games = games.len(),
            old_rating = current.rating,
            new_rating = next.rating,
            new_deviation = next.deviation,
            new_volatility = next.volatility,
            "Computed rating update"
        );

        Ok(next)
    }

    /// Get current configuration as JSON
    pub fn config_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    /// Update configuration from JSON
    pub fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()> {
        let new_config: CalculatorConfig =
            serde_json::from_value(config).map_err(|e| Glicko2Error::Configuration {
                message: format!("Invalid calculator configuration: {}", e),
            })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
