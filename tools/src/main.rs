//! farm-runner: headless runner for the SusFarm simulation.
//!
//! Usage:
//!   farm-runner --seed 12345 --ticks 120 --db farm.db
//!   farm-runner --seed 12345 --ticks 60 --offline-mins 300
//!
//! Runs the engine for N live ticks (60 simulated seconds each),
//! optionally preceded by an offline gap to exercise catch-up, then
//! prints an end-of-run summary.

use anyhow::Result;
use susfarm_core::{engine::FarmEngine, store::FarmStore, types::TICK_INTERVAL_MS};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 60u64);
    let offline_mins = parse_arg(&args, "--offline-mins", 0i64);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str());

    println!("SusFarm — farm-runner");
    println!("  seed:         {seed}");
    println!("  ticks:        {ticks}");
    println!("  offline_mins: {offline_mins}");
    println!("  db:           {}", db.unwrap_or(":memory:"));
    println!();

    let store = match db {
        Some(path) => FarmStore::open(path)?,
        None => FarmStore::in_memory()?,
    };

    let start = chrono::Utc::now().timestamp_millis();
    let mut engine = FarmEngine::load(store, seed, start);

    // Give automation something to do on a fresh save.
    engine.plant(0, "lungroot", start);
    engine.plant(1, "heartbean", start);
    engine.plant(2, "bonegrain", start);

    let mut now = start;
    if offline_mins > 0 {
        now += offline_mins * 60 * 1000;
        let replayed = engine.catch_up(now);
        println!("offline gap: replayed {replayed} ticks");
    }

    for _ in 0..ticks {
        now += TICK_INTERVAL_MS;
        engine.tick(now);
    }

    let state = engine.state();
    println!("── end of run ───────────────────────────────");
    println!("  balance:     {}", engine.balance());
    println!("  tithe credit:{}", state.church.credit);
    println!("  mood:        {:?}", state.market.mood);
    println!("  atmosphere:  {:?}", state.field_atmo.current);
    println!("  pressure:    {:.1}", state.player.anomaly.pressure);
    if let Some(active) = &state.player.anomaly.active {
        println!("  anomaly:     {}", active.id);
    }
    println!("  inventory:   {}", serde_json::to_string(&state.inventory)?);
    if let Some(reward) = engine.next_reward() {
        println!(
            "  next reward: {} in {}s (+{})",
            reward.crop_emoji, reward.time_secs, reward.yield_amount
        );
    }
    for entry in state.log.entries().iter().take(5) {
        println!("  log: {}", serde_json::to_string(&entry.event)?);
    }

    log::info!("run complete: {ticks} ticks from seed {seed}");
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
