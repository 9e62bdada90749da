//! Anomaly engine — rare global modifiers driven by accumulated
//! pressure. At most one anomaly runs at a time; triggering resets
//! pressure to a partial value, not zero, so the meter keeps tension.

use crate::catalog::Catalog;
use crate::event::{FarmEvent, MarketNote};
use crate::rng::SubsystemRng;
use crate::state::{ActiveAnomaly, FarmState};
use crate::types::Millis;

/// Pressure level that triggers an anomaly.
pub const TRIGGER_PRESSURE: f64 = 100.0;

/// Pressure left after a trigger.
pub const RESET_PRESSURE: f64 = 30.0;

/// Evaluate trigger and expiry. Called every tick and after any
/// mutation that feeds pressure.
pub fn check(state: &mut FarmState, catalog: &Catalog, rng: &mut SubsystemRng, now: Millis) {
    if state.player.anomaly.pressure >= TRIGGER_PRESSURE && state.player.anomaly.active.is_none() {
        state.player.anomaly.pressure = RESET_PRESSURE;

        let ids = catalog.anomaly_ids();
        let id = ids[rng.next_u64_below(ids.len() as u64) as usize];
        let duration_ms = (rng.range_f64(10.0, 20.0) * 60.0 * 1000.0) as Millis;

        state.player.anomaly.active = Some(ActiveAnomaly {
            id: id.to_string(),
            ends_at: now + duration_ms,
        });

        state
            .log
            .push(now, FarmEvent::AnomalyTriggered { id: id.to_string() });
        state
            .market
            .log
            .push(now, MarketNote::Anomaly { id: id.to_string() });
        log::info!("anomaly {id} triggered for {}s", duration_ms / 1000);
    }

    if let Some(active) = &state.player.anomaly.active {
        if now >= active.ends_at {
            log::info!("anomaly {} expired", active.id);
            state.player.anomaly.active = None;
        }
    }
}
