//! Plot engine — planting, watering, boosting, harvesting, and the
//! per-tick growth/wither pass with the automation tiers.
//!
//! All operations return a bare success flag: invalid input, a busy
//! plot, or a short wallet all fail without mutating anything.

use crate::catalog::{Catalog, CropSpecial};
use crate::event::FarmEvent;
use crate::rng::SubsystemRng;
use crate::state::{AtmoPhase, FarmState, PlotStage};
use crate::types::Millis;
use crate::wallet::Wallet;

pub const WATER_COST: u64 = 5;
pub const WATER_REDUCTION_SECS: i64 = 60;
pub const BOOST_COST: u64 = 20;
pub const BOOST_REDUCTION_SECS: i64 = 180;

/// Growth-speed multiplier from buffs, atmosphere and anomalies.
fn growth_multiplier(state: &FarmState, catalog: &Catalog) -> f64 {
    let mut multiplier = 1.0;

    if let Some(surge) = state.player.buff("heart_surge") {
        if let Some(def) = catalog.buff("heart_surge") {
            multiplier += surge.stacks as f64 * def.effects.growth_speed_per_stack;
        }
    }

    if state.field_atmo.current == AtmoPhase::Dawn {
        multiplier *= 1.1;
    }

    if state.player.anomaly_is("nullfield_freeze") {
        if let Some(def) = catalog.anomaly("nullfield_freeze") {
            multiplier += def.effects.growth_speed_delta;
        }
    }

    multiplier
}

pub fn plant(
    state: &mut FarmState,
    catalog: &Catalog,
    wallet: &mut Wallet,
    index: usize,
    crop_key: &str,
    now: Millis,
) -> bool {
    if index >= state.max_plots {
        return false;
    }
    let Some(crop) = catalog.crop(crop_key) else {
        return false;
    };

    state.ensure_plots();
    if state.plots[index].crop_key.is_some() {
        return false;
    }
    if !wallet.debit(crop.seed_cost) {
        return false;
    }

    let plot = &mut state.plots[index];
    plot.crop_key = Some(crop_key.to_string());
    plot.planted_at = now;
    plot.remaining_seconds = crop.grow_seconds;
    plot.stage = PlotStage::Seed;

    state.log.push(
        now,
        FarmEvent::Planted {
            crop: crop.emoji.to_string(),
            crop_key: crop_key.to_string(),
            plot_id: index,
        },
    );
    true
}

pub fn water(state: &mut FarmState, wallet: &mut Wallet, index: usize) -> bool {
    irrigate(state, wallet, index, WATER_COST, WATER_REDUCTION_SECS)
}

pub fn boost(state: &mut FarmState, wallet: &mut Wallet, index: usize) -> bool {
    irrigate(state, wallet, index, BOOST_COST, BOOST_REDUCTION_SECS)
}

fn irrigate(
    state: &mut FarmState,
    wallet: &mut Wallet,
    index: usize,
    cost: u64,
    reduction_secs: i64,
) -> bool {
    let Some(plot) = state.plots.get(index) else {
        return false;
    };
    if plot.crop_key.is_none() || plot.stage == PlotStage::Ready {
        return false;
    }
    if !wallet.debit(cost) {
        return false;
    }
    let plot = &mut state.plots[index];
    plot.remaining_seconds = (plot.remaining_seconds - reduction_secs).max(0);
    true
}

pub fn harvest(
    state: &mut FarmState,
    catalog: &Catalog,
    wallet: &mut Wallet,
    rng: &mut SubsystemRng,
    index: usize,
    now: Millis,
    is_auto: bool,
) -> bool {
    let Some(plot) = state.plots.get(index) else {
        return false;
    };
    if plot.stage != PlotStage::Ready {
        return false;
    }
    let Some(crop_key) = plot.crop_key.clone() else {
        return false;
    };
    let Some(crop) = catalog.crop(&crop_key) else {
        return false;
    };

    let mut yield_amount = crop.base_yield;
    if state.buffs.yield_percent > 0 {
        yield_amount =
            (yield_amount as f64 * (1.0 + state.buffs.yield_percent as f64 / 100.0)) as u64;
    }

    // Atmosphere anomaly: +30% yield.
    if state.field_atmo.anomaly_active && state.field_atmo.current == AtmoPhase::Anomaly {
        yield_amount = (yield_amount as f64 * 1.3) as u64;
    }

    let mut is_crit = false;
    if let Some(CropSpecial::Crit { chance }) = crop.special {
        if rng.chance(chance) {
            yield_amount *= 2;
            is_crit = true;
        }
    }

    wallet.credit(yield_amount);

    // Buff-type crops overwrite the global yield buff, not stack it.
    if let Some(CropSpecial::Buff {
        duration_secs,
        yield_percent,
    }) = crop.special
    {
        state.buffs.yield_percent = yield_percent;
        state.buffs.yield_expires_at = now + duration_secs * 1000;
    }

    // Source-good drop: the chance itself is re-rolled each harvest.
    let mut dropped = None;
    if let Some(good_key) = catalog.good_for_crop(&crop_key) {
        let drop_chance = rng.range_f64(0.30, 0.60);
        if rng.chance(drop_chance) {
            state.add_goods(good_key, 1);
            dropped = Some(good_key.to_string());
        }
    }

    if let Some(CropSpecial::Rare { chance }) = crop.special {
        if rng.chance(chance) {
            state.add_goods("eye_fragment", 1);
        }
    }

    // Glitch harvest: a mutated extra drop from anywhere in the catalog.
    if state.player.anomaly_is("glitch_harvest") {
        if let Some(def) = catalog.anomaly("glitch_harvest") {
            if rng.chance(def.effects.harvest_mutation_chance) {
                let keys = catalog.good_keys();
                let mutated = keys[rng.next_u64_below(keys.len() as u64) as usize];
                state.add_goods(mutated, 1);
                state.log.push(
                    now,
                    FarmEvent::Mutated {
                        from: dropped.clone(),
                        to: mutated.to_string(),
                    },
                );
            }
        }
    }

    state.log.push(
        now,
        FarmEvent::Harvested {
            crop: crop.emoji.to_string(),
            crop_key: crop_key.clone(),
            plot_id: index,
            yield_amount,
            is_crit,
            is_auto,
        },
    );

    state.plots[index].clear();
    log::debug!("harvested {crop_key} on plot {index}: +{yield_amount} (crit={is_crit})");
    true
}

/// The per-tick growth pass: stage transitions, countdown, wither
/// rolls, and tier-1 auto-harvest.
pub fn tick_plots(
    state: &mut FarmState,
    catalog: &Catalog,
    wallet: &mut Wallet,
    rng: &mut SubsystemRng,
    tick_time: Millis,
    tick_secs: i64,
) {
    let auto_harvest = state.upgrade_level("automation") >= 1;

    for index in 0..state.plots.len() {
        let Some(crop_key) = state.plots[index].crop_key.clone() else {
            continue;
        };
        // Stale reference to a removed crop: silently no-op.
        let Some(crop) = catalog.crop(&crop_key) else {
            continue;
        };

        // Seeds take root on their first tick.
        if state.plots[index].stage == PlotStage::Seed {
            state.plots[index].stage = PlotStage::Grow;
        }

        let multiplier = growth_multiplier(state, catalog);

        if state.plots[index].remaining_seconds > 0 {
            let reduction = (tick_secs as f64 * multiplier).floor() as i64;
            let plot = &mut state.plots[index];
            plot.remaining_seconds = (plot.remaining_seconds - reduction).max(0);

            if let Some(CropSpecial::Wither { chance }) = crop.special {
                if state.plots[index].stage == PlotStage::Grow {
                    let mut wither_chance = chance;
                    if state.field_atmo.current == AtmoPhase::Night {
                        wither_chance += 0.05;
                    }
                    if state.field_atmo.current == AtmoPhase::Anomaly {
                        wither_chance *= 1.2;
                    }
                    if state.buffs.wither_reduction > 0.0 {
                        wither_chance *= 1.0 - state.buffs.wither_reduction;
                    }
                    if rng.chance(wither_chance) {
                        state.plots[index].clear();
                        state.log.push(
                            tick_time,
                            FarmEvent::Withered {
                                crop: crop.emoji.to_string(),
                                plot_id: index,
                            },
                        );
                        continue;
                    }
                }
            }
        }

        if state.plots[index].remaining_seconds <= 0
            && state.plots[index].stage != PlotStage::Ready
        {
            state.plots[index].stage = PlotStage::Ready;
        }

        if state.plots[index].stage == PlotStage::Ready && auto_harvest {
            harvest(state, catalog, wallet, rng, index, tick_time, true);
        }
    }
}

/// Tier-2 automation: refill empty plots with the default crop while
/// the wallet can afford the seed.
pub fn auto_replant(
    state: &mut FarmState,
    catalog: &Catalog,
    wallet: &mut Wallet,
    now: Millis,
) {
    let default_crop = state.default_crop.clone();
    if catalog.crop(&default_crop).is_none() {
        return;
    }
    for index in 0..state.plots.len() {
        if state.plots[index].crop_key.is_none() {
            plant(state, catalog, wallet, index, &default_crop, now);
        }
    }
}

/// Tier-3 automation: one watering per growing plot, 5 coins each.
pub fn auto_water(state: &mut FarmState, wallet: &mut Wallet) {
    for plot in &mut state.plots {
        if plot.crop_key.is_some()
            && plot.remaining_seconds > WATER_REDUCTION_SECS
            && wallet.debit(WATER_COST)
        {
            plot.remaining_seconds = (plot.remaining_seconds - WATER_REDUCTION_SECS).max(0);
        }
    }
}

/// The soonest-maturing plot's remaining time and projected yield.
#[derive(Debug, Clone, PartialEq)]
pub struct NextReward {
    pub time_secs: i64,
    pub yield_amount: u64,
    pub crop_emoji: String,
}

pub fn next_reward(state: &FarmState, catalog: &Catalog) -> Option<NextReward> {
    let mut best: Option<NextReward> = None;
    for plot in &state.plots {
        let Some(crop_key) = plot.crop_key.as_deref() else {
            continue;
        };
        if plot.remaining_seconds <= 0 {
            continue;
        }
        let Some(crop) = catalog.crop(crop_key) else {
            continue;
        };
        let mut yield_amount = crop.base_yield;
        if state.buffs.yield_percent > 0 {
            yield_amount =
                (yield_amount as f64 * (1.0 + state.buffs.yield_percent as f64 / 100.0)) as u64;
        }
        if best
            .as_ref()
            .map(|b| plot.remaining_seconds < b.time_secs)
            .unwrap_or(true)
        {
            best = Some(NextReward {
                time_secs: plot.remaining_seconds,
                yield_amount,
                crop_emoji: crop.emoji.to_string(),
            });
        }
    }
    best
}
