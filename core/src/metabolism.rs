//! Metabolism & buff engine — consumption of edible goods, the
//! fullness/purity/corruption meters, and the stacking timed buffs
//! they grant. Anomaly pressure accumulates here too.

use crate::catalog::Catalog;
use crate::event::FarmEvent;
use crate::state::{BuffInstance, FarmState};
use crate::types::Millis;

/// Minimum gap between consumption events.
pub const CONSUME_COOLDOWN_MS: Millis = 15 * 1000;

/// Corruption penalty for breaking the cooldown.
const COOLDOWN_VIOLATION_CORRUPTION: f64 = 5.0;

/// Fullness above this applies the overeat debuff.
const OVEREAT_THRESHOLD: f64 = 100.0;

fn clamp_meter(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Eat `count` units of an edible good. The cooldown violation is the
/// one failure that still punishes: +5 corruption, nothing consumed.
pub fn consume(
    state: &mut FarmState,
    catalog: &Catalog,
    good_key: &str,
    count: u32,
    now: Millis,
) -> bool {
    let Some(good) = catalog.good(good_key) else {
        return false;
    };
    let Some(profile) = good.edible else {
        return false;
    };
    if count == 0 || state.inventory_count(good_key) < count {
        return false;
    }

    if now - state.player.metabolism.last_consume_at < CONSUME_COOLDOWN_MS {
        let meta = &mut state.player.metabolism;
        meta.corruption = clamp_meter(meta.corruption + COOLDOWN_VIOLATION_CORRUPTION);
        state.log.push(now, FarmEvent::ConsumeCooldown);
        log::debug!("consume cooldown violated, corruption +{COOLDOWN_VIOLATION_CORRUPTION}");
        return false;
    }

    for _ in 0..count {
        let meta = &mut state.player.metabolism;
        meta.fullness += profile.nutrition;
        meta.purity = clamp_meter(meta.purity + profile.purity_delta);
        meta.corruption = clamp_meter(meta.corruption + profile.corruption_delta);
        state.player.anomaly.pressure =
            clamp_meter(state.player.anomaly.pressure + profile.anomaly_delta);
    }

    if state.player.metabolism.fullness > OVEREAT_THRESHOLD {
        apply_buff(state, catalog, "overeat", 1, now);
        state.player.anomaly.pressure = clamp_meter(state.player.anomaly.pressure + 10.0);
        state.log.push(now, FarmEvent::Overeat);
    }

    if let Some(buff_id) = catalog.buff_for_good(good_key) {
        apply_buff(state, catalog, buff_id, count, now);
    }

    state.remove_goods(good_key, count);
    state.player.metabolism.last_consume_at = now;
    state.log.push(
        now,
        FarmEvent::Consumed {
            good: good_key.to_string(),
            count,
        },
    );
    true
}

/// Create or refresh the single instance for a buff id: refresh
/// always resets the expiry, stacks add up to the definition's cap.
pub fn apply_buff(state: &mut FarmState, catalog: &Catalog, buff_id: &str, stacks: u32, now: Millis) {
    let Some(def) = catalog.buff(buff_id) else {
        return;
    };

    let ends_at = now + def.base_duration_secs * 1000;
    if let Some(existing) = state.player.buffs.iter_mut().find(|b| b.id == buff_id) {
        existing.ends_at = ends_at;
        existing.stacks = (existing.stacks + stacks).min(def.max_stacks);
        return;
    }

    state.player.buffs.push(BuffInstance {
        id: buff_id.to_string(),
        stacks: stacks.min(def.max_stacks),
        ends_at,
    });

    // The reactor lends a plot for its lifetime; expiry takes back
    // exactly this delta.
    if def.effects.temp_plot_bonus > 0 {
        state.max_plots += def.effects.temp_plot_bonus;
        state.ensure_plots();
    }
    log::debug!("buff {buff_id} applied ({stacks} stacks)");
}

/// Expire finished buffs and apply the per-minute passives
/// (lung_calm purity regen, overeat corruption drip).
pub fn process_buffs(state: &mut FarmState, catalog: &Catalog, now: Millis) {
    let land_capacity = catalog.plots_for_land_level(state.upgrade_level("land"));

    let mut reclaim_plots = 0;
    let mut force_pressure = false;
    state.player.buffs.retain(|buff| {
        if now < buff.ends_at {
            return true;
        }
        if let Some(def) = catalog.buff(&buff.id) {
            reclaim_plots += def.effects.temp_plot_bonus;
            if def.effects.trigger_anomaly_on_expire {
                force_pressure = true;
            }
        }
        log::debug!("buff {} expired", buff.id);
        false
    });

    if reclaim_plots > 0 {
        state.max_plots = state.max_plots.saturating_sub(reclaim_plots).max(land_capacity);
    }
    if force_pressure {
        state.player.anomaly.pressure = 100.0;
    }

    if let Some(lung_calm) = state.player.buff("lung_calm") {
        if let Some(def) = catalog.buff("lung_calm") {
            let regen = lung_calm.stacks as f64 * def.effects.purity_regen_per_stack;
            let meta = &mut state.player.metabolism;
            meta.purity = clamp_meter(meta.purity + regen / 60.0);
        }
    }

    if state.player.buff("overeat").is_some() {
        if let Some(def) = catalog.buff("overeat") {
            let meta = &mut state.player.metabolism;
            meta.corruption = clamp_meter(meta.corruption + def.effects.corruption_gain_per_min / 60.0);
        }
    }
}
