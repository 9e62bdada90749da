//! Market engine — the price board for goods.
//!
//! Prices regenerate at most once per 5-minute window. Each refresh
//! rolls for an event first (forced omens and insider hints outrank
//! the weighted draw), then prices every sellable good:
//!   base draw [0.8, 1.4) → event multiplier → event clamp →
//!   lung_calm damping → nullfield band.

use crate::catalog::{Catalog, MarketEventKind};
use crate::event::MarketNote;
use crate::rng::SubsystemRng;
use crate::state::{ActiveMarketEvent, FarmState, LargeSell, Mood, PlotStage};
use crate::types::{Millis, MARKET_WINDOW_MS};
use crate::wallet::Wallet;

/// A sale with profit above this leaves the manipulation bait marker.
pub const LARGE_SELL_THRESHOLD: u64 = 100;

/// The bait marker only works for this long.
const LARGE_SELL_WINDOW_MS: Millis = 2 * 60 * 1000;

pub fn window_id(now: Millis) -> i64 {
    now / MARKET_WINDOW_MS
}

/// Window-gated refresh: calling twice in the same window is a no-op.
pub fn refresh_prices(
    state: &mut FarmState,
    catalog: &Catalog,
    rng: &mut SubsystemRng,
    now: Millis,
) {
    let window = window_id(now);
    if window == state.market.last_window_id && !state.market.prices.is_empty() {
        return;
    }

    state.market.last_prices = state.market.prices.clone();

    roll_event(state, catalog, rng, now);

    let lung_calm_stacks = state.player.buff_stacks("lung_calm");
    let damping = catalog
        .buff("lung_calm")
        .map(|def| {
            (lung_calm_stacks as f64 * def.effects.volatility_reduction_per_stack).min(1.0)
        })
        .unwrap_or(0.0);
    let frozen = state.player.anomaly_is("nullfield_freeze");
    let band = catalog
        .anomaly("nullfield_freeze")
        .and_then(|def| def.effects.market_band)
        .unwrap_or((0.98, 1.02));

    for good in catalog.goods() {
        if !good.sellable() {
            state.market.prices.insert(good.key.to_string(), 0);
            continue;
        }

        let mut multiplier = rng.range_f64(0.8, 1.4);

        if let Some(event) = &state.market.active_event {
            if let Some(m) = event.multipliers.get(good.key) {
                multiplier *= m;
            }
            if let Some((min, max)) = event.volatility_clamp {
                multiplier = multiplier.clamp(min, max);
            }
        }

        if damping > 0.0 {
            multiplier = 1.0 + (multiplier - 1.0) * (1.0 - damping);
        }

        if frozen {
            multiplier = rng.range_f64(band.0, band.1);
        }

        let price = (good.base_price as f64 * multiplier).floor() as u64;
        state.market.prices.insert(good.key.to_string(), price);
    }

    state.market.last_window_id = window;
    log::debug!("market refreshed for window {window}, mood {:?}", state.market.mood);
}

/// Event selection, first match wins:
/// forced omen → insider hint → manipulation bait → weighted draw.
fn roll_event(state: &mut FarmState, catalog: &Catalog, rng: &mut SubsystemRng, now: Millis) {
    // Clear an expired event before anything else.
    if let Some(event) = &state.market.active_event {
        if now >= event.ends_at {
            state.market.active_event = None;
            state.market.mood = Mood::Calm;
        }
    }

    if state.market.omen_pending {
        state.market.omen_pending = false;
        let id = if rng.chance(0.5) { "surge" } else { "crash" };
        trigger_event(state, catalog, rng, now, id, None);
        return;
    }

    if let Some(hinted) = state.market.hinted_good.take() {
        if catalog.good(&hinted).is_some() {
            let boost = rng.range_f64(1.3, 1.5);
            let tip = catalog.market_event("insider_tip");
            state.market.active_event = Some(ActiveMarketEvent {
                id: "insider_boost".to_string(),
                ends_at: now + MARKET_WINDOW_MS,
                multipliers: [(hinted.clone(), boost)].into_iter().collect(),
                volatility_clamp: None,
                relic_listing: false,
                headline_key: tip.map(|t| t.headline_key.to_string()).unwrap_or_default(),
                body_key: tip.map(|t| t.body_key.to_string()).unwrap_or_default(),
                target_keys: vec![hinted.clone()],
            });
            state.market.mood = Mood::Hot;
            state
                .market
                .log
                .push(now, MarketNote::InsiderBoost { good: hinted });
            return;
        }
    }

    if let Some(bait) = state.market.last_large_sell.clone() {
        if now - bait.at < LARGE_SELL_WINDOW_MS {
            let mut chance = catalog
                .market_event("manipulation")
                .map(|e| e.chance)
                .unwrap_or(0.20);
            if state.player.anomaly_is("corruption_bloom") {
                if let Some(def) = catalog.anomaly("corruption_bloom") {
                    chance += def.effects.manipulation_chance_bonus;
                }
            }
            if rng.chance(chance) {
                trigger_event(state, catalog, rng, now, "manipulation", Some(&bait.good_key));
                state.market.last_large_sell = None;
                return;
            }
        }
    }

    // Weighted walk over the normal pool. Growing event-type crops
    // push the whole roll down, raising the odds of any event.
    let mut roll = rng.next_f64();
    roll -= passive_event_bonus(state, catalog);

    let mut cumulative = 0.0;
    for def in catalog.market_events() {
        if matches!(
            def.kind,
            MarketEventKind::RitualEcho | MarketEventKind::Manipulation
        ) {
            continue;
        }
        cumulative += effective_chance(state, catalog, def.kind, def.chance);
        if roll < cumulative {
            trigger_event(state, catalog, rng, now, def.id, None);
            return;
        }
    }
}

fn passive_event_bonus(state: &FarmState, catalog: &Catalog) -> f64 {
    state
        .plots
        .iter()
        .filter(|p| p.stage != PlotStage::Ready && p.stage != PlotStage::Empty)
        .filter_map(|p| p.crop_key.as_deref())
        .filter_map(|key| catalog.crop(key))
        .filter_map(|crop| match crop.special {
            Some(crate::catalog::CropSpecial::Event { chance }) => Some(chance),
            _ => None,
        })
        .sum()
}

fn effective_chance(
    state: &FarmState,
    catalog: &Catalog,
    kind: MarketEventKind,
    base: f64,
) -> f64 {
    let mut chance = base;
    match kind {
        MarketEventKind::Surge => {
            if let Some(def) = catalog.buff("heart_surge") {
                chance += state.player.buff_stacks("heart_surge") as f64
                    * def.effects.market_heat_bonus_per_stack;
            }
            if state.player.anomaly_is("blessing_overflow") {
                if let Some(def) = catalog.anomaly("blessing_overflow") {
                    chance += def.effects.market_surge_chance_bonus;
                }
            }
        }
        MarketEventKind::Crash => {
            if state.player.anomaly_is("corruption_bloom") {
                if let Some(def) = catalog.anomaly("corruption_bloom") {
                    chance += def.effects.crash_chance_bonus;
                }
            }
        }
        MarketEventKind::RelicListing => {
            if state.player.anomaly_is("relic_gravity") {
                if let Some(def) = catalog.anomaly("relic_gravity") {
                    chance *= def.effects.relic_listing_chance_multiplier;
                }
            }
        }
        _ => {}
    }
    chance
}

/// Activate a specific event, rolling its parameters.
pub fn trigger_event(
    state: &mut FarmState,
    catalog: &Catalog,
    rng: &mut SubsystemRng,
    now: Millis,
    event_id: &str,
    manipulated: Option<&str>,
) {
    let Some(def) = catalog.market_event(event_id) else {
        return;
    };

    let mut multipliers = std::collections::BTreeMap::new();
    let mut volatility_clamp = None;
    let mut relic_listing = false;
    let mut target_keys = Vec::new();

    match def.kind {
        MarketEventKind::Surge => {
            for good in catalog.goods().filter(|g| g.sellable()) {
                if rng.chance(0.3) {
                    multipliers.insert(good.key.to_string(), rng.range_f64(1.2, 1.6));
                    target_keys.push(good.key.to_string());
                }
            }
        }
        MarketEventKind::Crash => {
            let keys = catalog.good_keys();
            let target = keys[rng.next_u64_below(keys.len() as u64) as usize];
            multipliers.insert(target.to_string(), rng.range_f64(0.5, 0.8));
            target_keys.push(target.to_string());
        }
        MarketEventKind::Freeze => {
            volatility_clamp = Some((0.95, 1.05));
        }
        MarketEventKind::OmenLeak => {
            state.market.omen_pending = true;
        }
        MarketEventKind::InsiderTip => {
            let keys = catalog.good_keys();
            let hinted = keys[rng.next_u64_below(keys.len() as u64) as usize];
            state.market.hinted_good = Some(hinted.to_string());
            target_keys.push(hinted.to_string());
        }
        MarketEventKind::RelicListing => {
            relic_listing = true;
        }
        MarketEventKind::RitualEcho => {
            multipliers.insert("omen_token".to_string(), 1.1);
        }
        MarketEventKind::Manipulation => {
            let Some(target) = manipulated else {
                return;
            };
            multipliers.insert(target.to_string(), rng.range_f64(1.3, 1.6));
            target_keys.push(target.to_string());
        }
    }

    // Events run for one or two windows.
    let windows = 1 + rng.next_u64_below(2) as i64;
    state.market.active_event = Some(ActiveMarketEvent {
        id: def.id.to_string(),
        ends_at: now + MARKET_WINDOW_MS * windows,
        multipliers,
        volatility_clamp,
        relic_listing,
        headline_key: def.headline_key.to_string(),
        body_key: def.body_key.to_string(),
        target_keys,
    });
    state.market.mood = def.mood;
    state.market.log.push(
        now,
        MarketNote::Event {
            event: def.id.to_string(),
        },
    );
    log::info!("market event {} triggered, mood {:?}", def.id, def.mood);
}

/// Sell `count` units; tithe goes to church credit, the net to the
/// wallet. Fails whole — no partial sale.
pub fn sell(
    state: &mut FarmState,
    catalog: &Catalog,
    wallet: &mut Wallet,
    good_key: &str,
    count: u32,
    now: Millis,
) -> bool {
    if state.inventory_count(good_key) < count || count == 0 {
        return false;
    }
    let Some(good) = catalog.good(good_key) else {
        return false;
    };
    if !good.sellable() {
        return false;
    }

    let price = state
        .market
        .prices
        .get(good_key)
        .copied()
        .unwrap_or(good.base_price);
    let total = price * count as u64;

    let mut profit_multiplier = 1.0;
    let blood_debt_stacks = state.player.buff_stacks("blood_debt");
    if blood_debt_stacks > 0 {
        if let Some(def) = catalog.buff("blood_debt") {
            profit_multiplier += blood_debt_stacks as f64 * def.effects.sell_profit_per_stack;
            let meta = &mut state.player.metabolism;
            meta.corruption = (meta.corruption
                + blood_debt_stacks as f64 * def.effects.corruption_per_sell_per_stack)
                .clamp(0.0, 100.0);
            state.player.anomaly.pressure = (state.player.anomaly.pressure
                + blood_debt_stacks as f64 * def.effects.pressure_per_sell_per_stack)
                .clamp(0.0, 100.0);
        }
    }
    if state.player.anomaly_is("corruption_bloom") {
        if let Some(def) = catalog.anomaly("corruption_bloom") {
            profit_multiplier += def.effects.sell_profit_bonus;
        }
    }

    let profit = (total as f64 * profit_multiplier).floor() as u64;
    let tithe = (profit as f64 * state.church.tithe_rate).floor() as u64;
    let net = profit - tithe;

    state.remove_goods(good_key, count);
    wallet.credit(net);
    state.church.credit += tithe;

    if profit > LARGE_SELL_THRESHOLD {
        state.market.last_large_sell = Some(LargeSell {
            at: now,
            value: profit,
            good_key: good_key.to_string(),
        });
    }

    // Selling the hinted good before the boost lands earns a taunt.
    if state.market.hinted_good.as_deref() == Some(good_key) {
        state.market.log.push(
            now,
            MarketNote::InsiderTaunt {
                good: good_key.to_string(),
            },
        );
        state.market.hinted_good = None;
    }

    if state.player.anomaly_is("relic_gravity") {
        if let Some(def) = catalog.anomaly("relic_gravity") {
            state.player.anomaly.pressure =
                (state.player.anomaly.pressure + def.effects.pressure_per_trade).clamp(0.0, 100.0);
        }
    }

    state.market.log.push(
        now,
        MarketNote::Sold {
            good: good_key.to_string(),
            count,
            profit,
        },
    );
    log::debug!("sold {count}x {good_key} for {profit} ({tithe} tithed)");
    true
}

/// Hook for the external ritual feature: a 25% chance to start the
/// bonus echo event.
pub fn trigger_ritual_echo(
    state: &mut FarmState,
    catalog: &Catalog,
    rng: &mut SubsystemRng,
    now: Millis,
) {
    let chance = catalog
        .market_event("ritual_echo")
        .map(|e| e.chance)
        .unwrap_or(0.25);
    if rng.chance(chance) {
        trigger_event(state, catalog, rng, now, "ritual_echo", None);
    }
}
