//! The immutable game catalog: crops, goods, upgrades, rites, buffs,
//! market events and anomalies. Pure lookup tables — no behavior
//! beyond a few effect formulas, no mutation after construction.

use crate::state::Mood;
use std::collections::BTreeMap;

/// Plot capacity before any land upgrade.
pub const BASE_PLOTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Optional special behavior attached to a crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropSpecial {
    /// Chance of double yield on harvest.
    Crit { chance: f64 },
    /// Harvest grants a timed global yield buff.
    Buff { duration_secs: i64, yield_percent: u32 },
    /// Per-tick chance of destruction while growing.
    Wither { chance: f64 },
    /// Passively raises the market-event chance while growing.
    Event { chance: f64 },
    /// Chance of a bonus rare-good drop on harvest.
    Rare { chance: f64 },
}

#[derive(Debug, Clone)]
pub struct CropDef {
    pub key: &'static str,
    pub emoji: &'static str,
    pub name_key: &'static str,
    pub grow_seconds: i64,
    pub base_yield: u64,
    pub seed_cost: u64,
    pub risk: RiskTier,
    pub special: Option<CropSpecial>,
}

/// Metabolic deltas applied per unit consumed.
#[derive(Debug, Clone, Copy)]
pub struct EdibleProfile {
    pub nutrition: f64,
    pub purity_delta: f64,
    pub corruption_delta: f64,
    pub anomaly_delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    Special,
}

#[derive(Debug, Clone)]
pub struct GoodDef {
    pub key: &'static str,
    pub emoji: &'static str,
    pub name_key: &'static str,
    /// 0 means unsellable — always priced at 0.
    pub base_price: u64,
    /// Display-only risk hint; the price formula is a flat draw.
    pub volatility: f64,
    pub rarity: Rarity,
    pub edible: Option<EdibleProfile>,
    pub source_crop: Option<&'static str>,
}

impl GoodDef {
    pub fn sellable(&self) -> bool {
        self.base_price > 0
    }
}

#[derive(Debug, Clone)]
pub struct UpgradeDef {
    pub key: &'static str,
    pub name_key: &'static str,
    pub max_level: u32,
    /// costs[level] is the price of buying level+1.
    pub costs: &'static [u64],
}

#[derive(Debug, Clone)]
pub struct RiteDef {
    pub key: &'static str,
    pub name_key: &'static str,
    pub desc_key: &'static str,
    pub cost: u64,
    pub duration_secs: i64,
    pub yield_percent: u32,
}

/// Effect parameters a buff may carry. Unused fields stay at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuffEffects {
    pub growth_speed_per_stack: f64,
    pub market_heat_bonus_per_stack: f64,
    pub extra_spores: u32,
    pub confess_success_bonus: f64,
    pub volatility_reduction_per_stack: f64,
    pub purity_regen_per_stack: f64,
    pub sell_profit_per_stack: f64,
    pub corruption_per_sell_per_stack: f64,
    pub pressure_per_sell_per_stack: f64,
    pub temp_plot_bonus: usize,
    pub trigger_anomaly_on_expire: bool,
    pub yield_reduction: f64,
    pub corruption_gain_per_min: f64,
}

#[derive(Debug, Clone)]
pub struct BuffDef {
    pub id: &'static str,
    pub name_key: &'static str,
    pub desc_key: &'static str,
    pub emoji: &'static str,
    pub base_duration_secs: i64,
    pub max_stacks: u32,
    pub effects: BuffEffects,
}

/// How a market event manifests when triggered. Parameter ranges are
/// rolled at trigger time by the market engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketEventKind {
    /// ~30% of goods pumped x1.2–1.6.
    Surge,
    /// One good dumped x0.5–0.8.
    Crash,
    /// Price multipliers clamped to [0.95, 1.05].
    Freeze,
    /// Forces a surge-or-crash coin flip at the next refresh.
    OmenLeak,
    /// Hints a good; its price boosts x1.3–1.5 next window.
    InsiderTip,
    /// Flags a rare relic listing for the UI.
    RelicListing,
    /// Ritual-triggered omen_token blip. Never rolled normally.
    RitualEcho,
    /// Retaliatory pump x1.3–1.6 of a recently dumped good.
    Manipulation,
}

#[derive(Debug, Clone)]
pub struct MarketEventDef {
    pub id: &'static str,
    pub kind: MarketEventKind,
    pub chance: f64,
    pub mood: Mood,
    pub headline_key: &'static str,
    pub body_key: &'static str,
}

/// Effect parameters an anomaly may carry. Unused fields stay at
/// their neutral value.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyEffects {
    pub ritual_success_bonus: f64,
    pub market_surge_chance_bonus: f64,
    pub crash_chance_bonus: f64,
    pub manipulation_chance_bonus: f64,
    pub sell_profit_bonus: f64,
    pub ritual_purity_loss: f64,
    pub ritual_corruption_gain: f64,
    pub ritual_credit_bonus: f64,
    pub market_band: Option<(f64, f64)>,
    pub growth_speed_delta: f64,
    pub relic_listing_chance_multiplier: f64,
    pub pressure_per_trade: f64,
    pub harvest_mutation_chance: f64,
}

impl Default for AnomalyEffects {
    fn default() -> Self {
        Self {
            ritual_success_bonus: 0.0,
            market_surge_chance_bonus: 0.0,
            crash_chance_bonus: 0.0,
            manipulation_chance_bonus: 0.0,
            sell_profit_bonus: 0.0,
            ritual_purity_loss: 0.0,
            ritual_corruption_gain: 0.0,
            ritual_credit_bonus: 0.0,
            market_band: None,
            growth_speed_delta: 0.0,
            relic_listing_chance_multiplier: 1.0,
            pressure_per_trade: 0.0,
            harvest_mutation_chance: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnomalyDef {
    pub id: &'static str,
    pub headline_key: &'static str,
    pub body_key: &'static str,
    pub effects: AnomalyEffects,
}

pub struct Catalog {
    crops: BTreeMap<&'static str, CropDef>,
    goods: BTreeMap<&'static str, GoodDef>,
    upgrades: BTreeMap<&'static str, UpgradeDef>,
    rites: BTreeMap<&'static str, RiteDef>,
    buffs: BTreeMap<&'static str, BuffDef>,
    /// Ordered — the weighted event roll walks this in order.
    market_events: Vec<MarketEventDef>,
    anomalies: BTreeMap<&'static str, AnomalyDef>,
}

impl Catalog {
    pub fn crop(&self, key: &str) -> Option<&CropDef> {
        self.crops.get(key)
    }

    pub fn good(&self, key: &str) -> Option<&GoodDef> {
        self.goods.get(key)
    }

    pub fn upgrade(&self, key: &str) -> Option<&UpgradeDef> {
        self.upgrades.get(key)
    }

    pub fn rite(&self, key: &str) -> Option<&RiteDef> {
        self.rites.get(key)
    }

    pub fn buff(&self, id: &str) -> Option<&BuffDef> {
        self.buffs.get(id)
    }

    pub fn anomaly(&self, id: &str) -> Option<&AnomalyDef> {
        self.anomalies.get(id)
    }

    pub fn crops(&self) -> impl Iterator<Item = &CropDef> {
        self.crops.values()
    }

    /// Goods in stable key order — price refresh and surge targeting
    /// depend on this order being deterministic.
    pub fn goods(&self) -> impl Iterator<Item = &GoodDef> {
        self.goods.values()
    }

    pub fn good_keys(&self) -> Vec<&'static str> {
        self.goods.keys().copied().collect()
    }

    pub fn market_events(&self) -> &[MarketEventDef] {
        &self.market_events
    }

    pub fn market_event(&self, id: &str) -> Option<&MarketEventDef> {
        self.market_events.iter().find(|e| e.id == id)
    }

    /// Anomaly ids in stable order, for uniform selection.
    pub fn anomaly_ids(&self) -> Vec<&'static str> {
        self.anomalies.keys().copied().collect()
    }

    /// The good a harvested crop may drop.
    pub fn good_for_crop(&self, crop_key: &str) -> Option<&'static str> {
        self.goods
            .values()
            .find(|g| g.source_crop == Some(crop_key))
            .map(|g| g.key)
    }

    /// The buff granted by consuming a good, if any.
    pub fn buff_for_good(&self, good_key: &str) -> Option<&'static str> {
        match good_key {
            "lung_chunk" => Some("lung_calm"),
            "heart_pulse" => Some("heart_surge"),
            "brain_dust" => Some("brain_bloom"),
            "blood_drop" => Some("blood_debt"),
            _ => None,
        }
    }

    /// Plot capacity granted by a land-upgrade level.
    pub fn plots_for_land_level(&self, level: u32) -> usize {
        BASE_PLOTS + 3 * level as usize
    }

    /// Global-buff duration granted by the ritual upgrade, in seconds.
    pub fn ritual_buff_duration_secs(&self, level: u32) -> i64 {
        let base = 30.0 * 60.0;
        (base * (1.0 + level as f64 * 0.5)) as i64
    }
}

pub fn standard() -> Catalog {
    let mut crops = BTreeMap::new();
    for crop in [
        CropDef {
            key: "lungroot",
            emoji: "🫁",
            name_key: "g.susfarm.crop.lungroot",
            grow_seconds: 300,
            base_yield: 30,
            seed_cost: 5,
            risk: RiskTier::Low,
            special: None,
        },
        CropDef {
            key: "heartbean",
            emoji: "🫀",
            name_key: "g.susfarm.crop.heartbean",
            grow_seconds: 480,
            base_yield: 55,
            seed_cost: 5,
            risk: RiskTier::Medium,
            special: Some(CropSpecial::Crit { chance: 0.10 }),
        },
        CropDef {
            key: "brainmint",
            emoji: "🧠",
            name_key: "g.susfarm.crop.brainmint",
            grow_seconds: 600,
            base_yield: 70,
            seed_cost: 5,
            risk: RiskTier::Low,
            special: Some(CropSpecial::Buff {
                duration_secs: 600,
                yield_percent: 10,
            }),
        },
        CropDef {
            key: "bonegrain",
            emoji: "🦴",
            name_key: "g.susfarm.crop.bonegrain",
            grow_seconds: 720,
            base_yield: 85,
            seed_cost: 5,
            risk: RiskTier::High,
            special: Some(CropSpecial::Wither { chance: 0.08 }),
        },
        CropDef {
            key: "bloodberry",
            emoji: "🩸",
            name_key: "g.susfarm.crop.bloodberry",
            grow_seconds: 360,
            base_yield: 40,
            seed_cost: 5,
            risk: RiskTier::Medium,
            special: Some(CropSpecial::Event { chance: 0.05 }),
        },
        CropDef {
            key: "eyeseed",
            emoji: "👁️",
            name_key: "g.susfarm.crop.eyeseed",
            grow_seconds: 900,
            base_yield: 120,
            seed_cost: 5,
            risk: RiskTier::Low,
            special: Some(CropSpecial::Rare { chance: 0.05 }),
        },
    ] {
        crops.insert(crop.key, crop);
    }

    let mut goods = BTreeMap::new();
    for good in [
        GoodDef {
            key: "lung_chunk",
            emoji: "🫁",
            name_key: "g.susfarm.goods.lung_chunk",
            base_price: 12,
            volatility: 0.15,
            rarity: Rarity::Common,
            edible: Some(EdibleProfile {
                nutrition: 18.0,
                purity_delta: 6.0,
                corruption_delta: -2.0,
                anomaly_delta: 4.0,
            }),
            source_crop: Some("lungroot"),
        },
        GoodDef {
            key: "heart_pulse",
            emoji: "🫀",
            name_key: "g.susfarm.goods.heart_pulse",
            base_price: 18,
            volatility: 0.25,
            rarity: Rarity::Common,
            edible: Some(EdibleProfile {
                nutrition: 22.0,
                purity_delta: 4.0,
                corruption_delta: 2.0,
                anomaly_delta: 5.0,
            }),
            source_crop: Some("heartbean"),
        },
        GoodDef {
            key: "brain_dust",
            emoji: "🧠",
            name_key: "g.susfarm.goods.brain_dust",
            base_price: 22,
            volatility: 0.18,
            rarity: Rarity::Common,
            edible: Some(EdibleProfile {
                nutrition: 20.0,
                purity_delta: 8.0,
                corruption_delta: -3.0,
                anomaly_delta: 3.0,
            }),
            source_crop: Some("brainmint"),
        },
        GoodDef {
            key: "bone_shard",
            emoji: "🦴",
            name_key: "g.susfarm.goods.bone_shard",
            base_price: 35,
            volatility: 0.12,
            rarity: Rarity::Uncommon,
            edible: None,
            source_crop: Some("bonegrain"),
        },
        GoodDef {
            key: "blood_drop",
            emoji: "🩸",
            name_key: "g.susfarm.goods.blood_drop",
            base_price: 15,
            volatility: 0.22,
            rarity: Rarity::Common,
            edible: Some(EdibleProfile {
                nutrition: 16.0,
                purity_delta: -2.0,
                corruption_delta: 8.0,
                anomaly_delta: 6.0,
            }),
            source_crop: Some("bloodberry"),
        },
        GoodDef {
            key: "eye_fragment",
            emoji: "👁️",
            name_key: "g.susfarm.goods.eye_fragment",
            base_price: 60,
            volatility: 0.20,
            rarity: Rarity::Rare,
            edible: None,
            source_crop: Some("eyeseed"),
        },
        GoodDef {
            key: "relic_seed",
            emoji: "🔮",
            name_key: "g.susfarm.goods.relic_seed",
            base_price: 100,
            volatility: 0.30,
            rarity: Rarity::Legendary,
            edible: None,
            source_crop: None, // event only
        },
        GoodDef {
            key: "omen_token",
            emoji: "🧿",
            name_key: "g.susfarm.goods.omen_token",
            base_price: 0, // not sellable
            volatility: 0.0,
            rarity: Rarity::Special,
            edible: None,
            source_crop: None, // ritual only
        },
    ] {
        goods.insert(good.key, good);
    }

    let mut upgrades = BTreeMap::new();
    for upgrade in [
        UpgradeDef {
            key: "land",
            name_key: "g.susfarm.upgrade.land",
            max_level: 10,
            costs: &[
                200, 600, 1400, 3000, 6000, 12000, 25000, 50000, 100000, 200000,
            ],
        },
        UpgradeDef {
            key: "automation",
            name_key: "g.susfarm.upgrade.auto",
            max_level: 5,
            costs: &[300, 900, 2000, 5000, 12000],
        },
        UpgradeDef {
            key: "ritual",
            name_key: "g.susfarm.upgrade.ritual",
            max_level: 3,
            costs: &[500, 2000, 8000],
        },
    ] {
        upgrades.insert(upgrade.key, upgrade);
    }

    let mut rites = BTreeMap::new();
    rites.insert(
        "baptism",
        RiteDef {
            key: "baptism",
            name_key: "g.susfarm.rite.baptism",
            desc_key: "g.susfarm.rite.baptism.desc",
            cost: 50,
            duration_secs: 30 * 60,
            yield_percent: 10,
        },
    );

    let mut buffs = BTreeMap::new();
    for buff in [
        BuffDef {
            id: "heart_surge",
            name_key: "g.susfarm.buff.heart_surge.name",
            desc_key: "g.susfarm.buff.heart_surge.desc",
            emoji: "🫀",
            base_duration_secs: 10 * 60,
            max_stacks: 5,
            effects: BuffEffects {
                growth_speed_per_stack: 0.15,
                market_heat_bonus_per_stack: 0.1,
                ..Default::default()
            },
        },
        BuffDef {
            id: "brain_bloom",
            name_key: "g.susfarm.buff.brain_bloom.name",
            desc_key: "g.susfarm.buff.brain_bloom.desc",
            emoji: "🧠",
            base_duration_secs: 10 * 60,
            max_stacks: 5,
            effects: BuffEffects {
                extra_spores: 1,
                confess_success_bonus: 0.10,
                ..Default::default()
            },
        },
        BuffDef {
            id: "lung_calm",
            name_key: "g.susfarm.buff.lung_calm.name",
            desc_key: "g.susfarm.buff.lung_calm.desc",
            emoji: "🫁",
            base_duration_secs: 10 * 60,
            max_stacks: 5,
            effects: BuffEffects {
                volatility_reduction_per_stack: 0.3,
                purity_regen_per_stack: 2.0, // per minute
                ..Default::default()
            },
        },
        BuffDef {
            id: "blood_debt",
            name_key: "g.susfarm.buff.blood_debt.name",
            desc_key: "g.susfarm.buff.blood_debt.desc",
            emoji: "🩸",
            base_duration_secs: 10 * 60,
            max_stacks: 5,
            effects: BuffEffects {
                sell_profit_per_stack: 0.2,
                corruption_per_sell_per_stack: 3.0,
                pressure_per_sell_per_stack: 2.0,
                ..Default::default()
            },
        },
        BuffDef {
            id: "womb_reactor",
            name_key: "g.susfarm.buff.womb_reactor.name",
            desc_key: "g.susfarm.buff.womb_reactor.desc",
            emoji: "🫃",
            base_duration_secs: 10 * 60,
            max_stacks: 1,
            effects: BuffEffects {
                temp_plot_bonus: 1,
                trigger_anomaly_on_expire: true,
                ..Default::default()
            },
        },
        BuffDef {
            id: "overeat",
            name_key: "g.susfarm.buff.overeat.name",
            desc_key: "g.susfarm.buff.overeat.desc",
            emoji: "🫨",
            base_duration_secs: 5 * 60, // debuff
            max_stacks: 1,
            effects: BuffEffects {
                yield_reduction: -0.15,
                corruption_gain_per_min: 1.0,
                ..Default::default()
            },
        },
    ] {
        buffs.insert(buff.id, buff);
    }

    // Order matters: the weighted roll walks this list front to back.
    let market_events = vec![
        MarketEventDef {
            id: "surge",
            kind: MarketEventKind::Surge,
            chance: 0.12,
            mood: Mood::Hot,
            headline_key: "g.susfarm.market.event.surge.headline",
            body_key: "g.susfarm.market.event.surge.body",
        },
        MarketEventDef {
            id: "crash",
            kind: MarketEventKind::Crash,
            chance: 0.10,
            mood: Mood::Panic,
            headline_key: "g.susfarm.market.event.crash.headline",
            body_key: "g.susfarm.market.event.crash.body",
        },
        MarketEventDef {
            id: "freeze",
            kind: MarketEventKind::Freeze,
            chance: 0.07,
            mood: Mood::Calm,
            headline_key: "g.susfarm.market.event.freeze.headline",
            body_key: "g.susfarm.market.event.freeze.body",
        },
        MarketEventDef {
            id: "omen_leak",
            kind: MarketEventKind::OmenLeak,
            chance: 0.06,
            mood: Mood::Corrupted,
            headline_key: "g.susfarm.market.event.omen_leak.headline",
            body_key: "g.susfarm.market.event.omen_leak.body",
        },
        MarketEventDef {
            id: "insider_tip",
            kind: MarketEventKind::InsiderTip,
            chance: 0.04,
            mood: Mood::Hot,
            headline_key: "g.susfarm.market.event.insider_tip.headline",
            body_key: "g.susfarm.market.event.insider_tip.body",
        },
        MarketEventDef {
            id: "relic_listing",
            kind: MarketEventKind::RelicListing,
            chance: 0.03,
            mood: Mood::Sacred,
            headline_key: "g.susfarm.market.event.relic_listing.headline",
            body_key: "g.susfarm.market.event.relic_listing.body",
        },
        // Special-trigger only — excluded from the weighted roll.
        MarketEventDef {
            id: "ritual_echo",
            kind: MarketEventKind::RitualEcho,
            chance: 0.25,
            mood: Mood::Sacred,
            headline_key: "g.susfarm.market.event.ritual_echo.headline",
            body_key: "g.susfarm.market.event.ritual_echo.body",
        },
        MarketEventDef {
            id: "manipulation",
            kind: MarketEventKind::Manipulation,
            chance: 0.20,
            mood: Mood::Corrupted,
            headline_key: "g.susfarm.market.event.manipulation.headline",
            body_key: "g.susfarm.market.event.manipulation.body",
        },
    ];

    let mut anomalies = BTreeMap::new();
    for anomaly in [
        AnomalyDef {
            id: "blessing_overflow",
            headline_key: "g.susfarm.anomaly.blessing_overflow.headline",
            body_key: "g.susfarm.anomaly.blessing_overflow.body",
            effects: AnomalyEffects {
                ritual_success_bonus: 0.25,
                market_surge_chance_bonus: 0.15,
                ..Default::default()
            },
        },
        AnomalyDef {
            id: "corruption_bloom",
            headline_key: "g.susfarm.anomaly.corruption_bloom.headline",
            body_key: "g.susfarm.anomaly.corruption_bloom.body",
            effects: AnomalyEffects {
                crash_chance_bonus: 0.15,
                manipulation_chance_bonus: 0.10,
                sell_profit_bonus: 0.10,
                ..Default::default()
            },
        },
        AnomalyDef {
            id: "inverse_mercy",
            headline_key: "g.susfarm.anomaly.inverse_mercy.headline",
            body_key: "g.susfarm.anomaly.inverse_mercy.body",
            effects: AnomalyEffects {
                ritual_purity_loss: 5.0,
                ritual_corruption_gain: 3.0,
                ritual_credit_bonus: 0.2,
                ..Default::default()
            },
        },
        AnomalyDef {
            id: "nullfield_freeze",
            headline_key: "g.susfarm.anomaly.nullfield_freeze.headline",
            body_key: "g.susfarm.anomaly.nullfield_freeze.body",
            effects: AnomalyEffects {
                market_band: Some((0.98, 1.02)),
                growth_speed_delta: -0.20,
                ..Default::default()
            },
        },
        AnomalyDef {
            id: "relic_gravity",
            headline_key: "g.susfarm.anomaly.relic_gravity.headline",
            body_key: "g.susfarm.anomaly.relic_gravity.body",
            effects: AnomalyEffects {
                relic_listing_chance_multiplier: 2.0,
                pressure_per_trade: 2.0,
                ..Default::default()
            },
        },
        AnomalyDef {
            id: "glitch_harvest",
            headline_key: "g.susfarm.anomaly.glitch_harvest.headline",
            body_key: "g.susfarm.anomaly.glitch_harvest.body",
            effects: AnomalyEffects {
                harvest_mutation_chance: 0.20,
                ..Default::default()
            },
        },
    ] {
        anomalies.insert(anomaly.id, anomaly);
    }

    Catalog {
        crops,
        goods,
        upgrades,
        rites,
        buffs,
        market_events,
        anomalies,
    }
}
