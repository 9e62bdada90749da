//! Field atmosphere — the dawn/day/dusk/night loop with a rare
//! anomaly override. A separate dimension from player anomalies:
//! atmosphere shifts growth and wither odds, nothing else.

use crate::event::FarmEvent;
use crate::rng::SubsystemRng;
use crate::state::{AtmoPhase, FarmState};
use crate::types::Millis;

/// Atmosphere anomaly override duration.
const ANOMALY_DURATION_MS: Millis = 10 * 60 * 1000;

/// Triggering roll once the cycle counter reaches 5.
const ANOMALY_CHANCE: f64 = 0.05;

/// Advance the cycle one tick. The counter climbs every tick; at 5+
/// a 5% anomaly roll fires, otherwise at 7+ the four-phase loop
/// advances and the counter resets.
pub fn advance(state: &mut FarmState, rng: &mut SubsystemRng, now: Millis) {
    let atmo = &mut state.field_atmo;

    // Expire the anomaly override first.
    if atmo.anomaly_active && now >= atmo.anomaly_ends_at {
        atmo.anomaly_active = false;
        atmo.anomaly_ends_at = 0;
        if atmo.current == AtmoPhase::Anomaly {
            atmo.current = AtmoPhase::Day;
        }
    }

    if atmo.anomaly_active {
        return;
    }

    atmo.cycle_tick += 1;
    if atmo.cycle_tick < 5 {
        return;
    }

    if rng.chance(ANOMALY_CHANCE) {
        atmo.anomaly_active = true;
        atmo.current = AtmoPhase::Anomaly;
        atmo.anomaly_ends_at = now + ANOMALY_DURATION_MS;
        atmo.cycle_tick = 0;
        log::info!("atmosphere anomaly started, ends at {}", atmo.anomaly_ends_at);
        state.log.push(now, FarmEvent::AtmosphereAnomaly);
    } else if atmo.cycle_tick >= 7 {
        atmo.current = atmo.current.next_in_cycle();
        atmo.cycle_tick = 0;
        log::debug!("atmosphere shifted to {:?}", atmo.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{EngineSlot, RngBank};

    fn rng_missing_anomaly(at: Millis) -> Option<SubsystemRng> {
        // Find a timestamp whose first roll does NOT trigger the 5%.
        let bank = RngBank::new(1);
        let mut probe = bank.at(EngineSlot::Atmosphere, at);
        if probe.chance(ANOMALY_CHANCE) {
            return None;
        }
        Some(bank.at(EngineSlot::Atmosphere, at))
    }

    #[test]
    fn phase_advances_after_seven_ticks() {
        let mut state = FarmState::default();
        assert_eq!(state.field_atmo.current, AtmoPhase::Day);
        let mut at = 0;
        // Feed ticks until the phase flips; anomaly rolls are skipped
        // by only using timestamps whose roll misses.
        let mut advanced = 0;
        while advanced < 7 {
            at += 60_000;
            if let Some(mut rng) = rng_missing_anomaly(at) {
                advance(&mut state, &mut rng, at);
                advanced += 1;
            }
        }
        assert_eq!(state.field_atmo.current, AtmoPhase::Dusk);
        assert_eq!(state.field_atmo.cycle_tick, 0);
    }

    #[test]
    fn anomaly_override_expires_back_to_day() {
        let mut state = FarmState::default();
        state.field_atmo.anomaly_active = true;
        state.field_atmo.current = AtmoPhase::Anomaly;
        state.field_atmo.anomaly_ends_at = 1_000;
        let bank = RngBank::new(1);
        let mut rng = bank.at(EngineSlot::Atmosphere, 2_000);
        advance(&mut state, &mut rng, 2_000);
        assert!(!state.field_atmo.anomaly_active);
        assert_eq!(state.field_atmo.current, AtmoPhase::Day);
    }
}
