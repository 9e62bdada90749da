//! Log payloads — everything noteworthy the simulation does gets a
//! typed entry in one of the two bounded ring logs (gameplay, market).

use crate::types::{GoodKey, Millis};
use serde::{Deserialize, Serialize};

/// Gameplay log payloads, newest-first in `FarmState::log`.
/// Variants are added as features land — never removed or renamed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FarmEvent {
    Planted {
        crop: String,
        crop_key: String,
        plot_id: usize,
    },
    Harvested {
        crop: String,
        crop_key: String,
        plot_id: usize,
        #[serde(rename = "yield")]
        yield_amount: u64,
        is_crit: bool,
        is_auto: bool,
    },
    Withered {
        crop: String,
        plot_id: usize,
    },
    Blessed {
        rite: String,
    },
    Consumed {
        good: GoodKey,
        count: u32,
    },
    ConsumeCooldown,
    Overeat,
    Mutated {
        from: Option<GoodKey>,
        to: GoodKey,
    },
    AnomalyTriggered {
        id: String,
    },
    AtmosphereAnomaly,
}

/// Market log payloads, newest-first in `MarketState::log`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketNote {
    Event { event: String },
    InsiderBoost { good: GoodKey },
    InsiderTaunt { good: GoodKey },
    Sold { good: GoodKey, count: u32, profit: u64 },
    Anomaly { id: String },
}

/// A timestamped ring-log entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry<T> {
    pub at: Millis,
    #[serde(flatten)]
    pub event: T,
}
