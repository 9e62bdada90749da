//! The single persisted simulation state and its subtrees.
//!
//! Every field carries `#[serde(default)]` (or a defaulted container)
//! so a record written by an older version loads cleanly: missing
//! fields heal to their catalog defaults, extra fields are ignored.
//! Only a record that fails to parse at all is discarded.

use crate::catalog::BASE_PLOTS;
use crate::event::{FarmEvent, LogEntry, MarketNote};
use crate::types::{CropKey, GoodKey, Millis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bump when a release changes state semantics, not just shape.
pub const STATE_VERSION: u32 = 3;

/// Both ring logs keep this many entries, newest first.
pub const LOG_CAP: usize = 30;

/// Fixed-capacity, newest-first log ring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RingLog<T> {
    entries: Vec<LogEntry<T>>,
}

impl<T> Default for RingLog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> RingLog<T> {
    pub fn push(&mut self, at: Millis, event: T) {
        self.entries.insert(0, LogEntry { at, event });
        self.entries.truncate(LOG_CAP);
    }

    pub fn entries(&self) -> &[LogEntry<T>] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&LogEntry<T>> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlotStage {
    Empty,
    Seed,
    Grow,
    Ready,
}

impl Default for PlotStage {
    fn default() -> Self {
        Self::Empty
    }
}

/// One farming slot. `crop_key == None ⇔ stage == Empty`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plot {
    pub id: usize,
    #[serde(default)]
    pub crop_key: Option<CropKey>,
    #[serde(default)]
    pub planted_at: Millis,
    #[serde(default)]
    pub remaining_seconds: i64,
    #[serde(default)]
    pub stage: PlotStage,
}

impl Plot {
    pub fn empty(id: usize) -> Self {
        Self {
            id,
            crop_key: None,
            planted_at: 0,
            remaining_seconds: 0,
            stage: PlotStage::Empty,
        }
    }

    pub fn clear(&mut self) {
        self.crop_key = None;
        self.planted_at = 0;
        self.remaining_seconds = 0;
        self.stage = PlotStage::Empty;
    }
}

/// Global timed modifiers granted by rites and buff-type crops.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalBuffs {
    #[serde(default)]
    pub yield_percent: u32,
    #[serde(default)]
    pub yield_expires_at: Millis,
    #[serde(default)]
    pub wither_reduction: f64,
    #[serde(default)]
    pub wither_expires_at: Millis,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AtmoPhase {
    Dawn,
    Day,
    Dusk,
    Night,
    Anomaly,
}

impl Default for AtmoPhase {
    fn default() -> Self {
        Self::Day
    }
}

impl AtmoPhase {
    /// The normal four-phase loop, anomaly excluded.
    pub fn next_in_cycle(self) -> Self {
        match self {
            Self::Dawn => Self::Day,
            Self::Day => Self::Dusk,
            Self::Dusk => Self::Night,
            // From Night or from a stale Anomaly value, restart at Dawn.
            Self::Night | Self::Anomaly => Self::Dawn,
        }
    }
}

/// The cyclic weather-like field dimension, separate from anomalies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldAtmosphere {
    #[serde(default)]
    pub current: AtmoPhase,
    #[serde(default)]
    pub cycle_tick: u32,
    #[serde(default)]
    pub anomaly_active: bool,
    #[serde(default)]
    pub anomaly_ends_at: Millis,
}

impl Default for FieldAtmosphere {
    fn default() -> Self {
        Self {
            current: AtmoPhase::Day,
            cycle_tick: 0,
            anomaly_active: false,
            anomaly_ends_at: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metabolism {
    #[serde(default)]
    pub fullness: f64,
    #[serde(default = "default_purity")]
    pub purity: f64,
    #[serde(default)]
    pub corruption: f64,
    #[serde(default)]
    pub last_consume_at: Millis,
}

fn default_purity() -> f64 {
    50.0
}

impl Default for Metabolism {
    fn default() -> Self {
        Self {
            fullness: 0.0,
            purity: 50.0,
            corruption: 0.0,
            last_consume_at: 0,
        }
    }
}

/// An active stacking buff. At most one instance per buff id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuffInstance {
    pub id: String,
    pub stacks: u32,
    pub ends_at: Millis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveAnomaly {
    pub id: String,
    pub ends_at: Millis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnomalyState {
    /// Clamped to [0, 100]; 100 triggers when no anomaly is active.
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub active: Option<ActiveAnomaly>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    #[serde(default)]
    pub metabolism: Metabolism,
    #[serde(default)]
    pub buffs: Vec<BuffInstance>,
    #[serde(default)]
    pub anomaly: AnomalyState,
}

impl PlayerState {
    pub fn buff(&self, id: &str) -> Option<&BuffInstance> {
        self.buffs.iter().find(|b| b.id == id)
    }

    pub fn buff_stacks(&self, id: &str) -> u32 {
        self.buff(id).map(|b| b.stacks).unwrap_or(0)
    }

    pub fn active_anomaly(&self) -> Option<&ActiveAnomaly> {
        self.anomaly.active.as_ref()
    }

    pub fn anomaly_is(&self, id: &str) -> bool {
        self.anomaly.active.as_ref().is_some_and(|a| a.id == id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Calm,
    Hot,
    Panic,
    Corrupted,
    Sacred,
}

impl Default for Mood {
    fn default() -> Self {
        Self::Calm
    }
}

/// A market event that has been triggered and is still running.
/// Parameter ranges were rolled at trigger time; this is the result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveMarketEvent {
    pub id: String,
    pub ends_at: Millis,
    #[serde(default)]
    pub multipliers: BTreeMap<GoodKey, f64>,
    #[serde(default)]
    pub volatility_clamp: Option<(f64, f64)>,
    #[serde(default)]
    pub relic_listing: bool,
    #[serde(default)]
    pub headline_key: String,
    #[serde(default)]
    pub body_key: String,
    #[serde(default)]
    pub target_keys: Vec<GoodKey>,
}

/// Marker left by a sale with profit > 100, bait for manipulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LargeSell {
    pub at: Millis,
    pub value: u64,
    pub good_key: GoodKey,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketState {
    #[serde(default)]
    pub last_window_id: i64,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub active_event: Option<ActiveMarketEvent>,
    #[serde(default)]
    pub last_prices: BTreeMap<GoodKey, u64>,
    #[serde(default)]
    pub prices: BTreeMap<GoodKey, u64>,
    #[serde(default)]
    pub log: RingLog<MarketNote>,
    #[serde(default)]
    pub omen_pending: bool,
    #[serde(default)]
    pub hinted_good: Option<GoodKey>,
    #[serde(default)]
    pub last_large_sell: Option<LargeSell>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChurchState {
    #[serde(default)]
    pub credit: u64,
    #[serde(default = "default_tithe_rate")]
    pub tithe_rate: f64,
}

fn default_tithe_rate() -> f64 {
    0.08
}

impl Default for ChurchState {
    fn default() -> Self {
        Self {
            credit: 0,
            tithe_rate: 0.08,
        }
    }
}

/// The whole persisted farm. One record, one storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmState {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub plots: Vec<Plot>,
    #[serde(default = "default_max_plots")]
    pub max_plots: usize,
    #[serde(default)]
    pub upgrades: BTreeMap<String, u32>,
    #[serde(default)]
    pub buffs: GlobalBuffs,
    #[serde(default)]
    pub field_atmo: FieldAtmosphere,
    /// Sparse: a zero count removes the key.
    #[serde(default)]
    pub inventory: BTreeMap<GoodKey, u32>,
    #[serde(default)]
    pub player: PlayerState,
    #[serde(default)]
    pub market: MarketState,
    #[serde(default)]
    pub church: ChurchState,
    #[serde(default)]
    pub streak: u32,
    #[serde(default = "default_crop")]
    pub default_crop: CropKey,
    #[serde(default)]
    pub log: RingLog<FarmEvent>,
    #[serde(default)]
    pub tick_count: u64,
    #[serde(default)]
    pub last_seen_at: Millis,
    #[serde(default)]
    pub last_tick_at: Millis,
}

fn default_version() -> u32 {
    STATE_VERSION
}

fn default_max_plots() -> usize {
    BASE_PLOTS
}

fn default_crop() -> CropKey {
    "lungroot".to_string()
}

impl Default for FarmState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            plots: Vec::new(),
            max_plots: BASE_PLOTS,
            upgrades: BTreeMap::new(),
            buffs: GlobalBuffs::default(),
            field_atmo: FieldAtmosphere::default(),
            inventory: BTreeMap::new(),
            player: PlayerState::default(),
            market: MarketState::default(),
            church: ChurchState::default(),
            streak: 0,
            default_crop: default_crop(),
            log: RingLog::default(),
            tick_count: 0,
            last_seen_at: 0,
            last_tick_at: 0,
        }
    }
}

impl FarmState {
    pub fn upgrade_level(&self, key: &str) -> u32 {
        self.upgrades.get(key).copied().unwrap_or(0)
    }

    /// Materialize plot slots up to the current capacity.
    pub fn ensure_plots(&mut self) {
        while self.plots.len() < self.max_plots {
            self.plots.push(Plot::empty(self.plots.len()));
        }
    }

    pub fn inventory_count(&self, good: &str) -> u32 {
        self.inventory.get(good).copied().unwrap_or(0)
    }

    pub fn add_goods(&mut self, good: &str, count: u32) {
        *self.inventory.entry(good.to_string()).or_insert(0) += count;
    }

    /// Removes `count` units; the key disappears at zero.
    /// Callers must have checked the count first.
    pub fn remove_goods(&mut self, good: &str, count: u32) {
        if let Some(have) = self.inventory.get_mut(good) {
            *have = have.saturating_sub(count);
            if *have == 0 {
                self.inventory.remove(good);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_log_caps_at_thirty_newest_first() {
        let mut log: RingLog<FarmEvent> = RingLog::default();
        for i in 0..40 {
            log.push(i, FarmEvent::Overeat);
        }
        assert_eq!(log.len(), LOG_CAP);
        assert_eq!(log.latest().unwrap().at, 39);
        assert_eq!(log.entries().last().unwrap().at, 10);
    }

    #[test]
    fn partial_record_heals_to_defaults() {
        // A v1-era record: only plots and an old-style field present.
        let json = r#"{"version":1,"plots":[],"streak":4}"#;
        let state: FarmState = serde_json::from_str(json).unwrap();
        assert_eq!(state.streak, 4);
        assert_eq!(state.max_plots, BASE_PLOTS);
        assert_eq!(state.player.metabolism.purity, 50.0);
        assert_eq!(state.church.tithe_rate, 0.08);
        assert_eq!(state.default_crop, "lungroot");
    }

    #[test]
    fn zero_inventory_count_removes_key() {
        let mut state = FarmState::default();
        state.add_goods("lung_chunk", 2);
        state.remove_goods("lung_chunk", 2);
        assert!(!state.inventory.contains_key("lung_chunk"));
    }

    #[test]
    fn atmosphere_cycle_wraps() {
        assert_eq!(AtmoPhase::Night.next_in_cycle(), AtmoPhase::Dawn);
        assert_eq!(AtmoPhase::Anomaly.next_in_cycle(), AtmoPhase::Dawn);
    }
}
