//! Store round-trips: the farm and wallet survive closing and
//! reopening the database.

use susfarm_core::engine::FarmEngine;
use susfarm_core::store::FarmStore;

const T0: i64 = 1_700_000_100_000;

fn temp_db(tag: &str) -> String {
    std::env::temp_dir()
        .join(format!("susfarm-{tag}-{}.db", std::process::id()))
        .to_string_lossy()
        .into_owned()
}

#[test]
fn a_fresh_database_starts_with_defaults() {
    let engine = FarmEngine::build_test(1, T0);
    assert_eq!(engine.balance(), 100);
    assert_eq!(engine.state().version, 3);
    assert_eq!(engine.state().max_plots, 6);
    assert_eq!(engine.state().plots.len(), 6);
    assert_eq!(engine.state().default_crop, "lungroot");
    assert!(!engine.state().market.prices.is_empty());
    assert_eq!(engine.state().player.metabolism.purity, 50.0);
}

#[test]
fn state_and_wallet_survive_a_reopen() {
    let path = temp_db("reopen");
    let _ = std::fs::remove_file(&path);

    {
        let store = FarmStore::open(&path).expect("open");
        let mut engine = FarmEngine::load(store, 42, T0);
        assert!(engine.plant(2, "eyeseed", T0));
        assert_eq!(engine.balance(), 95);
    }

    let store = FarmStore::open(&path).expect("reopen");
    let engine = FarmEngine::load(store, 42, T0);
    assert_eq!(engine.balance(), 95);
    let plot = &engine.state().plots[2];
    assert_eq!(plot.crop_key.as_deref(), Some("eyeseed"));
    assert_eq!(plot.remaining_seconds, 900);
    assert_eq!(plot.planted_at, T0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn reopening_after_a_gap_replays_the_missed_ticks() {
    let path = temp_db("gap");
    let _ = std::fs::remove_file(&path);

    {
        let store = FarmStore::open(&path).expect("open");
        let mut engine = FarmEngine::load(store, 42, T0);
        assert!(engine.plant(0, "lungroot", T0));
    }

    // Ten minutes later the seed has long matured.
    let store = FarmStore::open(&path).expect("reopen");
    let engine = FarmEngine::load(store, 42, T0 + 10 * 60_000);
    assert_eq!(engine.state().tick_count, 10);
    assert_eq!(engine.state().plots[0].remaining_seconds, 0);

    let _ = std::fs::remove_file(&path);
}
