//! The farm engine — owner of the whole simulation.
//!
//! TICK ORDER (fixed, documented, never reordered):
//!   1. Market price refresh (window-gated)
//!   2. Buff expiry + per-minute passives
//!   3. Anomaly trigger/expiry
//!   4. Global yield/wither buff expiry
//!   5. Field-atmosphere cycle
//!   6. Plot growth pass (wither rolls, ready transitions, tier-1 auto-harvest)
//!   7. Tier-2 auto-replant
//!   8. Tier-3 auto-water (suppressed offline, every 5th tick)
//!
//! RULES:
//!   - A tick never fails; persistence errors are logged and swallowed.
//!   - All randomness flows through the RngBank, keyed by the tick
//!     timestamp, so offline replay is bit-identical.
//!   - Game operations signal failure with a bare `false` and leave
//!     state untouched (the consume cooldown being the one documented
//!     exception).

use crate::catalog::{self, Catalog};
use crate::event::FarmEvent;
use crate::market;
use crate::metabolism;
use crate::plots::{self, NextReward};
use crate::rng::{EngineSlot, RngBank};
use crate::state::FarmState;
use crate::store::FarmStore;
use crate::types::{Millis, OFFLINE_CAP_MS, TICK_INTERVAL_MS};
use crate::wallet::Wallet;
use crate::{anomaly, atmosphere};

pub struct FarmEngine {
    state: FarmState,
    wallet: Wallet,
    catalog: Catalog,
    rng_bank: RngBank,
    store: FarmStore,
}

impl FarmEngine {
    /// Load (or initialize) the save in `store` and replay any missed
    /// ticks up to the 24-hour cap.
    pub fn load(store: FarmStore, seed: u64, now: Millis) -> Self {
        let state = store.load_state();
        let wallet = Wallet::new(store.load_wallet());
        let mut engine = Self {
            state,
            wallet,
            catalog: catalog::standard(),
            rng_bank: RngBank::new(seed),
            store,
        };

        if engine.state.last_seen_at == 0 {
            // Fresh save.
            engine.state.last_seen_at = now;
            engine.state.last_tick_at = now;
        }

        engine.recompute_capacity();
        engine.state.ensure_plots();

        if engine.state.market.prices.is_empty() {
            let mut rng = engine.rng_bank.at(EngineSlot::Market, now);
            market::refresh_prices(&mut engine.state, &engine.catalog, &mut rng, now);
        }

        engine.catch_up(now);
        engine.persist();
        engine
    }

    /// In-memory engine for tests: fixed seed, fresh state at `now`.
    pub fn build_test(seed: u64, now: Millis) -> Self {
        let store = FarmStore::in_memory().expect("in-memory store");
        Self::load(store, seed, now)
    }

    // ── Tick driving ───────────────────────────────────────────

    /// Live timer entry point: one tick at wall-clock `now`.
    pub fn tick(&mut self, now: Millis) {
        self.process_tick(now, false);
        self.state.last_tick_at = now;
        self.state.last_seen_at = now;
        self.persist();
    }

    /// Replay missed ticks since last-seen, oldest first, capped at
    /// 24 hours. Returns the number of ticks replayed.
    pub fn catch_up(&mut self, now: Millis) -> u64 {
        let elapsed = (now - self.state.last_seen_at).max(0).min(OFFLINE_CAP_MS);
        let ticks = (elapsed / TICK_INTERVAL_MS) as u64;

        if ticks > 0 {
            log::info!("offline catch-up: replaying {ticks} ticks");
            for i in 0..ticks {
                let tick_time = self.state.last_tick_at + (i as Millis + 1) * TICK_INTERVAL_MS;
                self.process_tick(tick_time, true);
            }
            self.state.last_tick_at = now;
            self.state.last_seen_at = now;
            self.persist();
        }
        ticks
    }

    /// Advance exactly one 60-second logical step at `tick_time`.
    /// Deterministic: same state + same timestamp = same result.
    fn process_tick(&mut self, tick_time: Millis, offline: bool) {
        self.state.tick_count += 1;

        let mut market_rng = self.rng_bank.at(EngineSlot::Market, tick_time);
        market::refresh_prices(&mut self.state, &self.catalog, &mut market_rng, tick_time);

        metabolism::process_buffs(&mut self.state, &self.catalog, tick_time);

        let mut anomaly_rng = self.rng_bank.at(EngineSlot::Anomaly, tick_time);
        anomaly::check(&mut self.state, &self.catalog, &mut anomaly_rng, tick_time);

        self.expire_global_buffs(tick_time);

        let mut atmo_rng = self.rng_bank.at(EngineSlot::Atmosphere, tick_time);
        atmosphere::advance(&mut self.state, &mut atmo_rng, tick_time);

        let mut plot_rng = self.rng_bank.at(EngineSlot::Plots, tick_time);
        plots::tick_plots(
            &mut self.state,
            &self.catalog,
            &mut self.wallet,
            &mut plot_rng,
            tick_time,
            TICK_INTERVAL_MS / 1000,
        );

        if self.state.upgrade_level("automation") >= 2 {
            plots::auto_replant(&mut self.state, &self.catalog, &mut self.wallet, tick_time);
        }

        // Watering tracks real minutes, so offline replay skips it.
        if self.state.upgrade_level("automation") >= 3
            && !offline
            && self.state.tick_count % 5 == 0
        {
            plots::auto_water(&mut self.state, &mut self.wallet);
        }

        log::debug!(
            "tick {} done at {tick_time} (offline={offline})",
            self.state.tick_count
        );
    }

    fn expire_global_buffs(&mut self, now: Millis) {
        let buffs = &mut self.state.buffs;
        if buffs.yield_expires_at > 0 && now >= buffs.yield_expires_at {
            buffs.yield_percent = 0;
            buffs.yield_expires_at = 0;
        }
        if buffs.wither_expires_at > 0 && now >= buffs.wither_expires_at {
            buffs.wither_reduction = 0.0;
            buffs.wither_expires_at = 0;
        }
    }

    // ── Player operations ──────────────────────────────────────

    pub fn plant(&mut self, index: usize, crop_key: &str, now: Millis) -> bool {
        let ok = plots::plant(
            &mut self.state,
            &self.catalog,
            &mut self.wallet,
            index,
            crop_key,
            now,
        );
        self.persist();
        ok
    }

    pub fn water(&mut self, index: usize) -> bool {
        let ok = plots::water(&mut self.state, &mut self.wallet, index);
        self.persist();
        ok
    }

    pub fn boost(&mut self, index: usize) -> bool {
        let ok = plots::boost(&mut self.state, &mut self.wallet, index);
        self.persist();
        ok
    }

    pub fn harvest(&mut self, index: usize, now: Millis) -> bool {
        let mut rng = self.rng_bank.at(EngineSlot::Plots, now);
        let ok = plots::harvest(
            &mut self.state,
            &self.catalog,
            &mut self.wallet,
            &mut rng,
            index,
            now,
            false,
        );
        self.persist();
        ok
    }

    pub fn sell_goods(&mut self, good_key: &str, count: u32, now: Millis) -> bool {
        let ok = market::sell(
            &mut self.state,
            &self.catalog,
            &mut self.wallet,
            good_key,
            count,
            now,
        );
        if ok {
            let mut rng = self.rng_bank.at(EngineSlot::Anomaly, now);
            anomaly::check(&mut self.state, &self.catalog, &mut rng, now);
        }
        self.persist();
        ok
    }

    pub fn consume_goods(&mut self, good_key: &str, count: u32, now: Millis) -> bool {
        let ok = metabolism::consume(&mut self.state, &self.catalog, good_key, count, now);
        if ok {
            let mut rng = self.rng_bank.at(EngineSlot::Anomaly, now);
            anomaly::check(&mut self.state, &self.catalog, &mut rng, now);
        }
        self.persist();
        ok
    }

    pub fn buy_upgrade(&mut self, upgrade_key: &str) -> bool {
        let Some(upgrade) = self.catalog.upgrade(upgrade_key) else {
            return false;
        };
        let level = self.state.upgrade_level(upgrade_key);
        if level >= upgrade.max_level {
            return false;
        }
        let cost = upgrade.costs[level as usize];
        if !self.wallet.debit(cost) {
            return false;
        }
        self.state
            .upgrades
            .insert(upgrade_key.to_string(), level + 1);

        if upgrade_key == "land" {
            self.recompute_capacity();
            self.state.ensure_plots();
        }
        self.persist();
        true
    }

    pub fn activate_rite(&mut self, rite_key: &str, now: Millis) -> bool {
        let Some(rite) = self.catalog.rite(rite_key) else {
            return false;
        };
        if !self.wallet.debit(rite.cost) {
            return false;
        }

        // The ritual upgrade stretches how long a blessing holds.
        let ritual_level = self.state.upgrade_level("ritual");
        let duration_secs = if ritual_level > 0 {
            self.catalog.ritual_buff_duration_secs(ritual_level)
        } else {
            rite.duration_secs
        };

        self.state.buffs.yield_percent = rite.yield_percent;
        self.state.buffs.yield_expires_at = now + duration_secs * 1000;

        self.state.log.push(
            now,
            FarmEvent::Blessed {
                rite: rite_key.to_string(),
            },
        );
        self.persist();
        true
    }

    /// External ritual hook: maybe start the bonus echo event.
    pub fn trigger_ritual_echo(&mut self, now: Millis) {
        let mut rng = self.rng_bank.at(EngineSlot::Market, now);
        market::trigger_ritual_echo(&mut self.state, &self.catalog, &mut rng, now);
        self.persist();
    }

    pub fn next_reward(&self) -> Option<NextReward> {
        plots::next_reward(&self.state, &self.catalog)
    }

    // ── Accessors ──────────────────────────────────────────────

    /// Read-only snapshot for rendering collaborators.
    pub fn state(&self) -> &FarmState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn balance(&self) -> u64 {
        self.wallet.balance()
    }

    pub fn subscribe_wallet(&mut self, observer: impl FnMut(u64) + Send + 'static) {
        self.wallet.subscribe(observer);
    }

    /// The shared wallet surface. Sibling site modules credit and
    /// debit the same balance the farm does.
    pub fn wallet_mut(&mut self) -> &mut Wallet {
        &mut self.wallet
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    // ── Internals ──────────────────────────────────────────────

    /// Capacity = land-upgrade plots + any live reactor bonus.
    fn recompute_capacity(&mut self) {
        let land = self.state.upgrade_level("land");
        let mut capacity = self.catalog.plots_for_land_level(land);
        for buff in &self.state.player.buffs {
            if let Some(def) = self.catalog.buff(&buff.id) {
                capacity += def.effects.temp_plot_bonus;
            }
        }
        self.state.max_plots = capacity;
    }

    /// Write-through persistence. Failures are logged by the store
    /// and never reach game operations.
    fn persist(&self) {
        self.store.save_state(&self.state);
        self.store.save_wallet(self.wallet.balance());
    }
}
