//! Planting, watering and boosting through the engine API. Every
//! failure path must leave the wallet and the plot untouched.

use susfarm_core::engine::FarmEngine;
use susfarm_core::state::PlotStage;

const T0: i64 = 1_700_000_100_000;

#[test]
fn planting_debits_the_seed_and_occupies_the_plot() {
    let mut engine = FarmEngine::build_test(11, T0);
    assert_eq!(engine.balance(), 100);

    assert!(engine.plant(0, "lungroot", T0));
    assert_eq!(engine.balance(), 95);

    let plot = &engine.state().plots[0];
    assert_eq!(plot.crop_key.as_deref(), Some("lungroot"));
    assert_eq!(plot.remaining_seconds, 300);
    assert_eq!(plot.stage, PlotStage::Seed);
    assert_eq!(plot.planted_at, T0);
}

#[test]
fn an_occupied_plot_rejects_a_second_seed() {
    let mut engine = FarmEngine::build_test(11, T0);
    assert!(engine.plant(0, "lungroot", T0));
    assert!(!engine.plant(0, "heartbean", T0 + 1_000));

    assert_eq!(engine.balance(), 95);
    assert_eq!(engine.state().plots[0].crop_key.as_deref(), Some("lungroot"));
}

#[test]
fn unknown_crops_and_out_of_range_plots_fail_clean() {
    let mut engine = FarmEngine::build_test(11, T0);
    assert!(!engine.plant(0, "ghostvine", T0));
    assert!(!engine.plant(99, "lungroot", T0));
    assert_eq!(engine.balance(), 100);
    assert!(engine.state().plots.iter().all(|p| p.crop_key.is_none()));
}

#[test]
fn a_short_wallet_refuses_to_plant() {
    let mut engine = FarmEngine::build_test(11, T0);
    assert!(engine.plant(0, "lungroot", T0));
    // Drain the remaining 95 coins through watering.
    for _ in 0..19 {
        assert!(engine.water(0));
    }
    assert_eq!(engine.balance(), 0);

    assert!(!engine.plant(1, "lungroot", T0));
    assert!(engine.state().plots[1].crop_key.is_none());
}

#[test]
fn water_and_boost_shorten_the_countdown() {
    let mut engine = FarmEngine::build_test(11, T0);
    assert!(engine.plant(0, "lungroot", T0));

    assert!(engine.water(0));
    assert_eq!(engine.state().plots[0].remaining_seconds, 240);
    assert_eq!(engine.balance(), 90);

    assert!(engine.boost(0));
    assert_eq!(engine.state().plots[0].remaining_seconds, 60);
    assert_eq!(engine.balance(), 70);

    // The countdown floors at zero.
    assert!(engine.boost(0));
    assert_eq!(engine.state().plots[0].remaining_seconds, 0);
}

#[test]
fn irrigating_an_empty_plot_fails() {
    let mut engine = FarmEngine::build_test(11, T0);
    assert!(!engine.water(0));
    assert!(!engine.boost(3));
    assert_eq!(engine.balance(), 100);
}

#[test]
fn next_reward_tracks_the_soonest_plot() {
    let mut engine = FarmEngine::build_test(11, T0);
    assert!(engine.plant(0, "eyeseed", T0));
    assert!(engine.plant(1, "lungroot", T0));

    let reward = engine.next_reward().expect("a growing plot");
    assert_eq!(reward.time_secs, 300);
    assert_eq!(reward.yield_amount, 30);
    assert_eq!(reward.crop_emoji, "🫁");
}
