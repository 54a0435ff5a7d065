//! Integration tests for the rating engine
//!
//! These tests drive whole rating periods through the public API:
//! - Glickman's reference example end to end
//! - Idle participants and symmetric draws
//! - Order independence of the two-phase update
//! - Several consecutive periods over a retained roster
//! - Sharing a period across threads behind a lock

mod fixtures;

use glicko2_engine::config::{CalculatorConfig, OutcomeScores};
use glicko2_engine::rating::{Glicko2Calculator, MatchOutcome, Participant, RatingPeriod};
use glicko2_engine::Glicko2Error;
use std::sync::{Arc, Mutex};
use std::thread;

use fixtures::{
    assert_close, calculator, glickman_outcomes, glickman_seeds, roster, scripted_period, seed,
    snapshots,
};

#[test]
fn test_glickman_example_through_period() {
    let players = roster(&glickman_seeds());
    let mut period = scripted_period(&players, &["subject"], &glickman_outcomes());

    let report = period.update_ratings(&calculator()).unwrap();
    let subject = players["subject"].snapshot().unwrap();

    assert_close(subject.rating, 1464.06, 0.01);
    assert_close(subject.deviation, 151.52, 0.01);
    assert_close(subject.volatility, 0.05999, 1e-4);

    assert_eq!(report.outcomes_processed, 3);
    assert_eq!(report.changes.len(), 4);
    assert_eq!(report.change_for(players["subject"].id()).unwrap().games, 3);
}

#[test]
fn test_idle_participant_only_gains_deviation() {
    let players = roster(&[seed("idle", 1725.0, 90.0, 0.08)]);
    let mut period = RatingPeriod::new();
    period.add_participant(players["idle"].clone());

    period.update_ratings(&calculator()).unwrap();
    let after = players["idle"].snapshot().unwrap();

    let phi = 90.0 / 173.7178;
    let expected = (phi * phi + 0.08f64 * 0.08).sqrt() * 173.7178;
    assert_eq!(after.rating, 1725.0);
    assert_eq!(after.volatility, 0.08);
    assert_close(after.deviation, expected, 1e-9);
    assert!(after.deviation > 90.0);
}

#[test]
fn test_symmetric_draw() {
    let players = roster(&[
        seed("left", 1580.0, 120.0, 0.06),
        seed("right", 1580.0, 120.0, 0.06),
    ]);
    let mut period = scripted_period(&players, &[], &[("left", 0.5, "right", 0.5)]);

    period.update_ratings(&calculator()).unwrap();
    let left = players["left"].snapshot().unwrap();
    let right = players["right"].snapshot().unwrap();

    assert_eq!(left.rating, right.rating);
    assert_close(left.rating, 1580.0, 1e-9);
    assert_eq!(left.deviation, right.deviation);
    assert!(left.deviation < 120.0);
    assert_eq!(left.volatility, right.volatility);
}

#[test]
fn test_update_order_does_not_matter() {
    let seeds = [
        seed("a", 1500.0, 200.0, 0.06),
        seed("b", 1650.0, 80.0, 0.05),
        seed("c", 1320.0, 300.0, 0.07),
        seed("d", 1800.0, 50.0, 0.06),
    ];
    let outcomes = [
        ("a", 1.0, "b", 0.0),
        ("b", 0.5, "c", 0.5),
        ("c", 1.0, "d", 0.0),
        ("d", 1.0, "a", 0.0),
        ("a", 1.0, "c", 0.0),
    ];

    let forward = roster(&seeds);
    scripted_period(&forward, &["a", "b", "c", "d"], &outcomes)
        .update_ratings(&calculator())
        .unwrap();

    let backward = roster(&seeds);
    scripted_period(&backward, &["d", "c", "b", "a"], &outcomes)
        .update_ratings(&calculator())
        .unwrap();

    let interleaved = roster(&seeds);
    scripted_period(&interleaved, &["c", "a", "d", "b"], &outcomes)
        .update_ratings(&calculator())
        .unwrap();

    let forward = snapshots(&forward);
    for other in [snapshots(&backward), snapshots(&interleaved)] {
        for (name, snapshot) in &forward {
            assert_eq!(snapshot, &other[name], "participant {} differs", name);
        }
    }
}

#[test]
fn test_consecutive_periods_reuse_roster() {
    let players = roster(&[
        seed("champion", 1500.0, 350.0, 0.06),
        seed("challenger", 1500.0, 350.0, 0.06),
    ]);
    let scores = OutcomeScores::default();
    let calculator = calculator();
    let mut period = RatingPeriod::new();

    let mut previous_gap = 0.0;
    for _ in 0..5 {
        period
            .record_win(&players["champion"], &players["challenger"], &scores)
            .unwrap();
        period.update_ratings(&calculator).unwrap();

        let champion = players["champion"].snapshot().unwrap();
        let challenger = players["challenger"].snapshot().unwrap();
        let gap = champion.rating - challenger.rating;
        assert!(gap > previous_gap);
        previous_gap = gap;
    }

    // An idle period afterwards still updates both from the retained roster
    let before = players["champion"].snapshot().unwrap();
    assert!(period.is_empty());
    period.update_ratings(&calculator).unwrap();
    let after = players["champion"].snapshot().unwrap();
    assert_eq!(after.rating, before.rating);
    assert!(after.deviation > before.deviation);

    assert_eq!(players["champion"].read().unwrap().games_played(), 5);
}

#[test]
fn test_custom_tau_changes_volatility_response() {
    let calm = Glicko2Calculator::new(CalculatorConfig {
        volatility_constraint: 0.3,
        ..CalculatorConfig::default()
    })
    .unwrap();
    let jumpy = Glicko2Calculator::new(CalculatorConfig {
        volatility_constraint: 1.2,
        ..CalculatorConfig::default()
    })
    .unwrap();

    // A large upset pushes volatility up, more so with a looser constraint
    let seeds = [
        seed("underdog", 1200.0, 50.0, 0.06),
        seed("favourite", 2000.0, 50.0, 0.06),
    ];
    let upset = [("underdog", 1.0, "favourite", 0.0)];

    let calm_players = roster(&seeds);
    scripted_period(&calm_players, &[], &upset)
        .update_ratings(&calm)
        .unwrap();
    let jumpy_players = roster(&seeds);
    scripted_period(&jumpy_players, &[], &upset)
        .update_ratings(&jumpy)
        .unwrap();

    let calm_volatility = calm_players["underdog"].snapshot().unwrap().volatility;
    let jumpy_volatility = jumpy_players["underdog"].snapshot().unwrap().volatility;
    assert!(calm_volatility > 0.06);
    assert!(jumpy_volatility > calm_volatility);
}

#[test]
fn test_failed_period_can_be_retried() {
    let players = roster(&[
        seed("alice", 1500.0, 200.0, 0.06),
        seed("bob", 1500.0, 200.0, 0.06),
    ]);
    let broken = Participant::with_rating(1500.0, 200.0, -0.5);

    let mut period = scripted_period(&players, &[], &[("alice", 1.0, "bob", 0.0)]);
    period.add_participant(broken);

    let err = period.update_ratings(&calculator()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Glicko2Error>(),
        Some(Glicko2Error::DegenerateInput { .. })
    ));
    assert_eq!(players["alice"].snapshot().unwrap().rating, 1500.0);
    assert_eq!(period.len(), 1);

    // Rebuild the roster without the broken participant and run again
    let outcomes: Vec<MatchOutcome> = period.outcomes().to_vec();
    period.clear();
    period.add_outcomes(outcomes);
    period.update_ratings(&calculator()).unwrap();
    assert!(players["alice"].snapshot().unwrap().rating > 1500.0);
}

#[test]
fn test_period_shared_across_threads() {
    let players: Vec<Participant> = (0..8)
        .map(|i| Participant::with_rating(1400.0 + i as f64 * 25.0, 150.0, 0.06))
        .collect();
    let period = Arc::new(Mutex::new(RatingPeriod::new()));
    let scores = OutcomeScores::default();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let period = Arc::clone(&period);
            let winner = players[2 * t].clone();
            let loser = players[2 * t + 1].clone();
            thread::spawn(move || {
                let outcome = MatchOutcome::win(&winner, &loser, &scores).unwrap();
                period.lock().unwrap().add_outcome(outcome);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let report = period
        .lock()
        .unwrap()
        .update_ratings(&calculator())
        .unwrap();

    assert_eq!(report.outcomes_processed, 4);
    assert_eq!(report.changes.len(), 8);
    for t in 0..4 {
        assert!(players[2 * t].snapshot().unwrap().rating > 1400.0 + (2 * t) as f64 * 25.0);
    }
}
