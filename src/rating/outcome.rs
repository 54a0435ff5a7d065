//! Match outcomes
//!
//! A [`MatchOutcome`] records one finished pairwise match: exactly two distinct
//! participants and the score each received. Outcomes are immutable once built.

use crate::config::OutcomeScores;
use crate::error::Glicko2Error;
use crate::rating::entity::Participant;
use crate::types::EntityId;

/// Immutable record of one pairwise outcome
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    sides: [(Participant, f64); 2],
}

impl MatchOutcome {
    /// Record that `first` scored `first_score` and `second` scored `second_score`
    pub fn new(
        first: &Participant,
        first_score: f64,
        second: &Participant,
        second_score: f64,
    ) -> crate::error::Result<Self> {
        if first == second {
            return Err(Glicko2Error::InvalidOutcome {
                reason: format!("participant {} cannot play against itself", first.id()),
            }
            .into());
        }

        for score in [first_score, second_score] {
            if !score.is_finite() {
                return Err(Glicko2Error::InvalidOutcome {
                    reason: format!("score must be finite, got {}", score),
                }
                .into());
            }
        }

        Ok(Self {
            sides: [(first.clone(), first_score), (second.clone(), second_score)],
        })
    }

    /// Build an outcome from a list of `(participant, score)` pairs
    ///
    /// Fails unless the list names exactly two distinct participants.
    pub fn from_scores<I>(scores: I) -> crate::error::Result<Self>
    where
        I: IntoIterator<Item = (Participant, f64)>,
    {
        let scores: Vec<(Participant, f64)> = scores.into_iter().collect();

        match scores.as_slice() {
            [(first, first_score), (second, second_score)] => {
                Self::new(first, *first_score, second, *second_score)
            }
            _ => Err(Glicko2Error::InvalidOutcome {
                reason: format!("an outcome needs exactly two participants, got {}", scores.len()),
            }
            .into()),
        }
    }

    /// `winner` beat `loser`
    pub fn win(
        winner: &Participant,
        loser: &Participant,
        scores: &OutcomeScores,
    ) -> crate::error::Result<Self> {
        Self::new(winner, scores.win, loser, scores.loss)
    }

    pub fn draw(
        first: &Participant,
        second: &Participant,
        scores: &OutcomeScores,
    ) -> crate::error::Result<Self> {
        Self::new(first, scores.draw, second, scores.draw)
    }

    /// Both participants, in the order they were supplied
    pub fn participants(&self) -> [&Participant; 2] {
        [&self.sides[0].0, &self.sides[1].0]
    }

    /// Whether `id` is one of the two participants
    pub fn participated(&self, id: EntityId) -> bool {
        self.sides.iter().any(|(participant, _)| participant.id() == id)
    }

    /// Score received by `id`, or `None` if it did not take part
    pub fn score_for(&self, id: EntityId) -> Option<f64> {
        self.sides
            .iter()
            .find(|(participant, _)| participant.id() == id)
            .map(|(_, score)| *score)
    }

    /// The participant `id` played against
    pub fn opponent_of(&self, id: EntityId) -> Option<&Participant> {
        let [(first, _), (second, _)] = &self.sides;
        if first.id() == id && second.id() != id {
            Some(second)
        } else if second.id() == id && first.id() != id {
            Some(first)
        } else {
            None
        }
    }

    /// True iff both participants received exactly the same score
    pub fn is_draw(&self) -> bool {
        self.sides[0].1 == self.sides[1].1
    }

    /// Participant with the higher score; `None` for a draw
    pub fn winner(&self) -> Option<&Participant> {
        let [(first, first_score), (second, second_score)] = &self.sides;
        if first_score > second_score {
            Some(first)
        } else if second_score > first_score {
            Some(second)
        } else {
            None
        }
    }

    /// Participant with the lower score; `None` for a draw
    pub fn loser(&self) -> Option<&Participant> {
        let winner = self.winner()?;
        self.opponent_of(winner.id())
    }
}
