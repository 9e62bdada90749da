//! Consumption, the cooldown, and buff mechanics.

use susfarm_core::engine::FarmEngine;
use susfarm_core::state::FarmState;
use susfarm_core::{catalog, metabolism};

const T0: i64 = 1_700_000_100_000;
const TICK: i64 = 60_000;

#[test]
fn consuming_feeds_the_meters_and_grants_the_paired_buff() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    state.add_goods("lung_chunk", 3);

    assert!(metabolism::consume(&mut state, &catalog, "lung_chunk", 1, T0));

    let meta = &state.player.metabolism;
    assert_eq!(meta.fullness, 18.0);
    assert_eq!(meta.purity, 56.0);
    assert_eq!(meta.corruption, 0.0); // -2 clamps at the floor
    assert_eq!(state.player.anomaly.pressure, 4.0);
    assert_eq!(state.inventory_count("lung_chunk"), 2);
    assert_eq!(state.player.buff_stacks("lung_calm"), 1);
}

#[test]
fn breaking_the_cooldown_costs_corruption_and_consumes_nothing() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    state.add_goods("lung_chunk", 2);

    assert!(metabolism::consume(&mut state, &catalog, "lung_chunk", 1, T0));
    assert!(!metabolism::consume(&mut state, &catalog, "lung_chunk", 1, T0 + 5_000));

    assert_eq!(state.player.metabolism.corruption, 5.0);
    assert_eq!(state.inventory_count("lung_chunk"), 1);
    assert_eq!(state.player.buff_stacks("lung_calm"), 1);

    // Exactly on the boundary the cooldown has passed.
    assert!(metabolism::consume(&mut state, &catalog, "lung_chunk", 1, T0 + 15_000));
    assert_eq!(state.inventory_count("lung_chunk"), 0);
}

#[test]
fn inedible_or_missing_goods_cannot_be_eaten() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    state.add_goods("bone_shard", 1);

    assert!(!metabolism::consume(&mut state, &catalog, "bone_shard", 1, T0));
    assert!(!metabolism::consume(&mut state, &catalog, "lung_chunk", 1, T0));
    assert_eq!(state.player.metabolism.fullness, 0.0);
}

#[test]
fn overeating_applies_the_debuff_and_spikes_pressure() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    state.add_goods("heart_pulse", 5);

    // 5 * 22 nutrition = 110 fullness, past the threshold.
    assert!(metabolism::consume(&mut state, &catalog, "heart_pulse", 5, T0));

    assert_eq!(state.player.metabolism.fullness, 110.0);
    assert!(state.player.buff("overeat").is_some());
    // 5 * 5 anomaly delta + 10 overeat spike
    assert_eq!(state.player.anomaly.pressure, 35.0);
    assert_eq!(state.player.buff_stacks("heart_surge"), 5);
}

#[test]
fn buff_stacks_cap_and_refresh_resets_the_clock() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();

    metabolism::apply_buff(&mut state, &catalog, "lung_calm", 3, T0);
    metabolism::apply_buff(&mut state, &catalog, "lung_calm", 4, T0 + TICK);

    let buff = state.player.buff("lung_calm").expect("buff");
    assert_eq!(buff.stacks, 5); // capped
    assert_eq!(buff.ends_at, T0 + TICK + 600_000); // refreshed
}

#[test]
fn the_reactor_lends_a_plot_and_detonates_on_expiry() {
    let mut state = FarmState::default();
    state.max_plots = 6;
    state.ensure_plots();
    let catalog = catalog::standard();

    metabolism::apply_buff(&mut state, &catalog, "womb_reactor", 1, T0);
    assert_eq!(state.max_plots, 7);
    assert_eq!(state.plots.len(), 7);

    metabolism::process_buffs(&mut state, &catalog, T0 + 601_000);
    assert!(state.player.buff("womb_reactor").is_none());
    assert_eq!(state.max_plots, 6);
    assert_eq!(state.player.anomaly.pressure, 100.0);
}

#[test]
fn lung_calm_regenerates_purity_each_tick() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    metabolism::apply_buff(&mut state, &catalog, "lung_calm", 2, T0);

    metabolism::process_buffs(&mut state, &catalog, T0 + TICK);
    let expected = 50.0 + 2.0 * 2.0 / 60.0;
    assert!((state.player.metabolism.purity - expected).abs() < 1e-9);
}

#[test]
fn consumption_through_the_engine_grants_the_buff() {
    let mut engine = FarmEngine::build_test(13, T0);
    let mut now = T0;

    // Farm lungroot cycles until a lung_chunk drops.
    for _ in 0..40 {
        if engine.state().inventory_count("lung_chunk") > 0 {
            break;
        }
        engine.plant(0, "lungroot", now);
        for _ in 0..6 {
            now += TICK;
            engine.tick(now);
        }
        engine.harvest(0, now);
    }
    assert!(
        engine.state().inventory_count("lung_chunk") > 0,
        "no drop in forty cycles"
    );

    assert!(engine.consume_goods("lung_chunk", 1, now));
    assert!(engine.state().player.buff_stacks("lung_calm") >= 1);
    assert_eq!(engine.state().player.metabolism.fullness, 18.0);
}
