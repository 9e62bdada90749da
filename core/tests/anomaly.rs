//! Pressure-driven anomaly triggering: fires at 100, resets to 30,
//! one at a time.

use susfarm_core::event::{FarmEvent, MarketNote};
use susfarm_core::rng::{EngineSlot, RngBank, SubsystemRng};
use susfarm_core::state::FarmState;
use susfarm_core::{anomaly, catalog};

const T0: i64 = 1_700_000_100_000;

fn anomaly_rng(seed: u64, at: i64) -> SubsystemRng {
    RngBank::new(seed).at(EngineSlot::Anomaly, at)
}

#[test]
fn pressure_at_the_cap_triggers_and_resets_to_thirty() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    state.player.anomaly.pressure = 100.0;

    let mut rng = anomaly_rng(21, T0);
    anomaly::check(&mut state, &catalog, &mut rng, T0);

    let active = state.player.anomaly.active.clone().expect("anomaly active");
    assert_eq!(state.player.anomaly.pressure, 30.0);
    assert!(catalog.anomaly(&active.id).is_some());
    // Duration rolls between 10 and 20 minutes.
    assert!(active.ends_at >= T0 + 10 * 60 * 1000);
    assert!(active.ends_at < T0 + 20 * 60 * 1000);

    // Both logs carry the event.
    assert!(state
        .log
        .entries()
        .iter()
        .any(|e| matches!(e.event, FarmEvent::AnomalyTriggered { .. })));
    assert!(state
        .market
        .log
        .entries()
        .iter()
        .any(|e| matches!(e.event, MarketNote::Anomaly { .. })));
}

#[test]
fn below_the_cap_nothing_happens() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    state.player.anomaly.pressure = 99.9;

    let mut rng = anomaly_rng(21, T0);
    anomaly::check(&mut state, &catalog, &mut rng, T0);

    assert!(state.player.anomaly.active.is_none());
    assert_eq!(state.player.anomaly.pressure, 99.9);
}

#[test]
fn only_one_anomaly_runs_at_a_time() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    state.player.anomaly.pressure = 100.0;

    let mut rng = anomaly_rng(21, T0);
    anomaly::check(&mut state, &catalog, &mut rng, T0);
    let first = state.player.anomaly.active.clone().expect("first anomaly");

    // Pressure slams back to the cap while the first still runs.
    state.player.anomaly.pressure = 100.0;
    let mut rng = anomaly_rng(21, T0 + 60_000);
    anomaly::check(&mut state, &catalog, &mut rng, T0 + 60_000);

    assert_eq!(state.player.anomaly.active, Some(first));
    assert_eq!(state.player.anomaly.pressure, 100.0);
}

#[test]
fn an_expired_anomaly_clears() {
    let mut state = FarmState::default();
    let catalog = catalog::standard();
    state.player.anomaly.pressure = 100.0;

    let mut rng = anomaly_rng(21, T0);
    anomaly::check(&mut state, &catalog, &mut rng, T0);
    let ends_at = state.player.anomaly.active.as_ref().expect("active").ends_at;

    let mut rng = anomaly_rng(21, ends_at);
    anomaly::check(&mut state, &catalog, &mut rng, ends_at);
    assert!(state.player.anomaly.active.is_none());
}
