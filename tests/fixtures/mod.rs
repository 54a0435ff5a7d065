//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use glicko2_engine::config::CalculatorConfig;
use glicko2_engine::rating::{Glicko2Calculator, MatchOutcome, Participant, RatingPeriod};
use glicko2_engine::types::RatingSnapshot;
use std::collections::HashMap;

/// Starting state of a named participant
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    pub name: &'static str,
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

pub const fn seed(name: &'static str, rating: f64, deviation: f64, volatility: f64) -> Seed {
    Seed {
        name,
        rating,
        deviation,
        volatility,
    }
}

/// Outcome between two named participants: (first, first score, second, second score)
pub type ScriptedOutcome = (&'static str, f64, &'static str, f64);

/// Glickman's worked example: subject plus three opponents
pub fn glickman_seeds() -> Vec<Seed> {
    vec![
        seed("subject", 1500.0, 200.0, 0.06),
        seed("first", 1400.0, 30.0, 0.06),
        seed("second", 1550.0, 100.0, 0.06),
        seed("third", 1700.0, 300.0, 0.06),
    ]
}

pub fn glickman_outcomes() -> Vec<ScriptedOutcome> {
    vec![
        ("subject", 1.0, "first", 0.0),
        ("subject", 0.0, "second", 1.0),
        ("subject", 0.0, "third", 1.0),
    ]
}

pub fn calculator() -> Glicko2Calculator {
    Glicko2Calculator::new(CalculatorConfig::default()).unwrap()
}

pub fn roster(seeds: &[Seed]) -> HashMap<&'static str, Participant> {
    seeds
        .iter()
        .map(|s| {
            (
                s.name,
                Participant::with_rating(s.rating, s.deviation, s.volatility),
            )
        })
        .collect()
}

/// Build a period whose roster is added in `order`, then record `outcomes`
pub fn scripted_period(
    players: &HashMap<&'static str, Participant>,
    order: &[&'static str],
    outcomes: &[ScriptedOutcome],
) -> RatingPeriod {
    let mut period = RatingPeriod::new();
    period.add_participants(order.iter().map(|name| players[name].clone()));
    period.add_outcomes(outcomes.iter().map(|(a, score_a, b, score_b)| {
        MatchOutcome::new(&players[a], *score_a, &players[b], *score_b).unwrap()
    }));
    period
}

pub fn snapshots(
    players: &HashMap<&'static str, Participant>,
) -> HashMap<&'static str, RatingSnapshot> {
    players
        .iter()
        .map(|(name, participant)| (*name, participant.snapshot().unwrap()))
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}",
        actual,
        tolerance,
        expected
    );
}
