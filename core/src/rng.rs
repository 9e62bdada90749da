//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SubsystemRng instances derived from
//! the single master seed plus a timestamp, so a replayed offline
//! tick consumes exactly the same stream as the live tick it stands
//! in for.
//!
//! Each engine gets its own stream, keyed by a stable slot index.
//! Adding a new engine never perturbs existing engines' streams.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream for a single engine at a single
/// point in time.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Derive a stream from the master seed, a stable slot index and a
    /// timestamp. The slot index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64, at_ms: i64) -> Self {
        let derived = master_seed
            ^ slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ (at_ms as u64).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform draw in [lo, hi).
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

/// Factory for all engine streams of a single save, keyed by slot.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream for `slot` at timestamp `at_ms`. Ticks pass the tick
    /// timestamp; interactive operations pass the caller's `now`.
    pub fn at(&self, slot: EngineSlot, at_ms: i64) -> SubsystemRng {
        SubsystemRng::new(self.master_seed, slot as u64, at_ms).with_name(slot.name())
    }
}

/// Stable engine slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every engine's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum EngineSlot {
    Atmosphere = 0,
    Plots = 1,
    Market = 2,
    Metabolism = 3,
    Anomaly = 4,
    // Add new engines here — append only.
}

impl EngineSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Atmosphere => "atmosphere",
            Self::Plots => "plots",
            Self::Market => "market",
            Self::Metabolism => "metabolism",
            Self::Anomaly => "anomaly",
        }
    }
}
