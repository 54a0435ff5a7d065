//! Score constants used when recording outcomes

use crate::error::Glicko2Error;
use serde::{Deserialize, Serialize};

/// Scores awarded for a win, draw and loss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeScores {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl Default for OutcomeScores {
    fn default() -> Self {
        Self {
            win: 1.0,
            draw: 0.5,
            loss: 0.0,
        }
    }
}

impl OutcomeScores {
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.win.is_finite() && self.draw.is_finite() && self.loss.is_finite()) {
            return Err(Glicko2Error::Configuration {
                message: "Outcome scores must be finite".to_string(),
            }
            .into());
        }

        if self.win <= self.loss {
            return Err(Glicko2Error::Configuration {
                message: format!(
                    "Win score ({}) must be greater than loss score ({})",
                    self.win, self.loss
                ),
            }
            .into());
        }

        Ok(())
    }
}
