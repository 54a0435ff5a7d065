//! Rating periods
//!
//! A [`RatingPeriod`] collects outcomes and the roster of participants they
//! involve, then updates everyone in one pass:
//!
//! 1. snapshot every participant's committed state,
//! 2. compute every next state from the snapshots only,
//! 3. stage every next state,
//! 4. commit every participant,
//! 5. clear the outcomes, keeping the roster for the next period.
//!
//! If any computation fails nothing is staged or committed and the outcomes
//! stay recorded, so the caller can fix the input and run the update again.

use crate::config::OutcomeScores;
use crate::error::Glicko2Error;
use crate::rating::calculator::{Game, Glicko2Calculator};
use crate::rating::entity::Participant;
use crate::rating::formulas::Glicko2Formulas;
use crate::rating::outcome::MatchOutcome;
use crate::types::{EntityId, RatingChange, RatingSnapshot};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Summary of one committed update pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodReport {
    /// One entry per roster participant, in roster order
    pub changes: Vec<RatingChange>,
    pub outcomes_processed: usize,
}

impl PeriodReport {
    pub fn change_for(&self, id: EntityId) -> Option<&RatingChange> {
        self.changes.iter().find(|change| change.entity_id == id)
    }
}

/// Outcomes and participants of one rating period
#[derive(Debug, Clone, Default)]
pub struct RatingPeriod {
    outcomes: Vec<MatchOutcome>,
    participants: Vec<Participant>,
    roster: HashSet<EntityId>,
}

impl RatingPeriod {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome and add both of its participants to the roster
    pub fn add_outcome(&mut self, outcome: MatchOutcome) {
        for participant in outcome.participants() {
            self.add_participant(participant.clone());
        }
        self.outcomes.push(outcome);
    }

    /// Record several outcomes, preserving their order
    pub fn add_outcomes<I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = MatchOutcome>,
    {
        for outcome in outcomes {
            self.add_outcome(outcome);
        }
    }

    /// Add a participant without an outcome; idle participants still get a
    /// deviation update
    pub fn add_participant(&mut self, participant: Participant) {
        if self.roster.insert(participant.id()) {
            self.participants.push(participant);
        }
    }

    pub fn add_participants<I>(&mut self, participants: I)
    where
        I: IntoIterator<Item = Participant>,
    {
        for participant in participants {
            self.add_participant(participant);
        }
    }

    /// Record a win of `winner` over `loser`
    pub fn record_win(
        &mut self,
        winner: &Participant,
        loser: &Participant,
        scores: &OutcomeScores,
    ) -> crate::error::Result<()> {
        self.add_outcome(MatchOutcome::win(winner, loser, scores)?);
        Ok(())
    }

    pub fn record_draw(
        &mut self,
        first: &Participant,
        second: &Participant,
        scores: &OutcomeScores,
    ) -> crate::error::Result<()> {
        self.add_outcome(MatchOutcome::draw(first, second, scores)?);
        Ok(())
    }

    /// Outcomes involving `id`, in the order they were recorded
    pub fn outcomes_for(&self, id: EntityId) -> Vec<&MatchOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.participated(id))
            .collect()
    }

    pub fn outcomes(&self) -> &[MatchOutcome] {
        &self.outcomes
    }

    /// Roster, in the order participants were first added
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn contains_participant(&self, id: EntityId) -> bool {
        self.roster.contains(&id)
    }

    /// Number of recorded outcomes
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Drop outcomes and the roster
    pub fn clear(&mut self) {
        self.outcomes.clear();
        self.participants.clear();
        self.roster.clear();
    }

    /// Drop outcomes but keep the roster for the next period
    pub fn clear_outcomes(&mut self) {
        self.outcomes.clear();
    }

    fn games_for(
        &self,
        id: EntityId,
        snapshots: &HashMap<EntityId, RatingSnapshot>,
    ) -> crate::error::Result<Vec<Game>> {
        self.outcomes_for(id)
            .into_iter()
            .map(|outcome| {
                let opponent = outcome.opponent_of(id).ok_or_else(|| {
                    anyhow::Error::from(Glicko2Error::DegenerateInput {
                        reason: format!("outcome names participant {} on both sides", id),
                    })
                })?;
                let score = outcome.score_for(id).ok_or_else(|| {
                    anyhow::Error::from(Glicko2Error::Internal {
                        message: format!("outcome has no score for participant {}", id),
                    })
                })?;
                let opponent = snapshots.get(&opponent.id()).ok_or_else(|| {
                    anyhow::Error::from(Glicko2Error::Internal {
                        message: format!("opponent {} missing from the roster", opponent.id()),
                    })
                })?;

                Ok(Game::new(*opponent, score))
            })
            .collect()
    }

    /// Compute, stage and commit new ratings for every participant, then clear
    /// the outcomes
    pub fn update_ratings<F: Glicko2Formulas>(
        &mut self,
        calculator: &Glicko2Calculator<F>,
    ) -> crate::error::Result<PeriodReport> {
        let snapshots = self
            .participants
            .iter()
            .map(|participant| Ok((participant.id(), participant.snapshot()?)))
            .collect::<crate::error::Result<HashMap<_, _>>>()?;

        let mut pending = Vec::with_capacity(self.participants.len());
        for participant in &self.participants {
            let id = participant.id();
            let current = snapshots[&id];
            let games = self.games_for(id, &snapshots)?;
            let next = calculator
                .compute(&current, &games)
                .with_context(|| format!("Rating update failed for participant {}", id))?;

            debug!(participant = %id, games = games.len(), "Computed next rating");
            pending.push((participant, current, next, games.len()));
        }

        for (participant, _, next, games) in &pending {
            participant.stage(*next, *games)?;
        }

        let mut changes = Vec::with_capacity(pending.len());
        for (participant, old_rating, new_rating, games) in pending {
            if !participant.commit()? {
                warn!(participant = %participant.id(), "Commit with nothing staged");
            }
            changes.push(RatingChange {
                entity_id: participant.id(),
                old_rating,
                new_rating,
                games,
            });
        }

        let report = PeriodReport {
            changes,
            outcomes_processed: self.outcomes.len(),
        };

        info!(
            participants = report.changes.len(),
            outcomes = report.outcomes_processed,
            "Rating period committed"
        );

        self.clear_outcomes();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculatorConfig;

    fn calculator() -> Glicko2Calculator {
        Glicko2Calculator::new(CalculatorConfig::default()).unwrap()
    }

    #[test]
    fn test_add_outcome_unions_roster() {
        let alice = Participant::default();
        let bob = Participant::default();
        let carol = Participant::default();
        let scores = OutcomeScores::default();

        let mut period = RatingPeriod::new();
        period.record_win(&alice, &bob, &scores).unwrap();
        period.record_draw(&bob, &carol, &scores).unwrap();
        period.add_participant(alice.clone());

        assert_eq!(period.len(), 2);
        assert_eq!(period.participants(), &[alice, bob, carol]);
    }

    #[test]
    fn test_outcomes_for_is_stable() {
        let alice = Participant::default();
        let bob = Participant::default();
        let carol = Participant::default();

        let first = MatchOutcome::new(&alice, 1.0, &bob, 0.0).unwrap();
        let second = MatchOutcome::new(&bob, 1.0, &carol, 0.0).unwrap();
        let third = MatchOutcome::new(&carol, 0.5, &alice, 0.5).unwrap();

        let mut period = RatingPeriod::new();
        period.add_outcomes(vec![first, second, third]);

        let for_alice = period.outcomes_for(alice.id());
        assert_eq!(for_alice.len(), 2);
        assert!(!for_alice[0].is_draw());
        assert!(for_alice[1].is_draw());

        let for_bob = period.outcomes_for(bob.id());
        assert_eq!(for_bob.len(), 2);
        assert_eq!(for_bob[0].score_for(bob.id()), Some(0.0));
        assert_eq!(for_bob[1].score_for(bob.id()), Some(1.0));

        assert!(period.outcomes_for(EntityId::new()).is_empty());
    }

    #[test]
    fn test_clear_variants() {
        let alice = Participant::default();
        let bob = Participant::default();
        let mut period = RatingPeriod::new();
        period
            .record_win(&alice, &bob, &OutcomeScores::default())
            .unwrap();

        period.clear_outcomes();
        assert!(period.is_empty());
        assert_eq!(period.participants().len(), 2);
        assert!(period.contains_participant(alice.id()));

        period.clear();
        assert!(period.participants().is_empty());
        assert!(!period.contains_participant(alice.id()));
    }

    #[test]
    fn test_update_commits_and_retains_roster() {
        let alice = Participant::default();
        let bob = Participant::default();
        let idle = Participant::with_rating(1500.0, 100.0, 0.06);

        let mut period = RatingPeriod::new();
        period
            .record_win(&alice, &bob, &OutcomeScores::default())
            .unwrap();
        period.add_participant(idle.clone());

        let report = period.update_ratings(&calculator()).unwrap();

        assert_eq!(report.outcomes_processed, 1);
        assert_eq!(report.changes.len(), 3);
        assert!(report.change_for(alice.id()).unwrap().rating_delta() > 0.0);
        assert!(report.change_for(bob.id()).unwrap().rating_delta() < 0.0);
        assert_eq!(report.change_for(idle.id()).unwrap().games, 0);

        assert!(alice.snapshot().unwrap().rating > 1500.0);
        assert!(alice.read().unwrap().working().is_none());
        assert_eq!(alice.read().unwrap().games_played(), 1);
        assert!(idle.snapshot().unwrap().deviation > 100.0);

        assert!(period.is_empty());
        assert_eq!(period.participants().len(), 3);
    }

    #[test]
    fn test_failed_update_applies_nothing() {
        let alice = Participant::default();
        let bob = Participant::default();
        let unreachable = Participant::with_rating(1.0e7, 30.0, 0.06);

        let mut period = RatingPeriod::new();
        period
            .record_win(&alice, &bob, &OutcomeScores::default())
            .unwrap();
        period
            .record_win(&unreachable, &alice, &OutcomeScores::default())
            .unwrap();

        let before = bob.snapshot().unwrap();
        let err = period.update_ratings(&calculator()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Glicko2Error>(),
            Some(Glicko2Error::DegenerateInput { .. })
        ));
        assert_eq!(bob.snapshot().unwrap(), before);
        assert!(bob.read().unwrap().working().is_none());
        assert_eq!(period.len(), 2);
    }
}
